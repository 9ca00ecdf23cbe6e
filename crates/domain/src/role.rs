use gatehouse_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityMetadata, entity_id};

entity_id!(
    /// Unique identifier for a role row.
    RoleId
);

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    metadata: EntityMetadata,
}

impl Role {
    /// Creates a new role with a fresh identifier and timestamps.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id: RoleId::new(),
            name: NonEmptyString::new(name)?,
            description: description.into(),
            metadata: EntityMetadata::new(),
        })
    }

    /// Rebuilds a role loaded from storage.
    pub fn restore(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        metadata: EntityMetadata,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            metadata,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns lifecycle timestamps.
    #[must_use]
    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }
}
