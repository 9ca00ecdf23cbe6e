use gatehouse_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityMetadata, entity_id};

entity_id!(
    /// Unique identifier for a permission row.
    PermissionId
);

/// A named capability that can be granted to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    name: NonEmptyString,
    description: String,
    metadata: EntityMetadata,
}

impl Permission {
    /// Creates a new permission with a fresh identifier and timestamps.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id: PermissionId::new(),
            name: NonEmptyString::new(name)?,
            description: description.into(),
            metadata: EntityMetadata::new(),
        })
    }

    /// Rebuilds a permission loaded from storage.
    pub fn restore(
        id: PermissionId,
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

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the unique permission name, e.g. `user:read`.
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
