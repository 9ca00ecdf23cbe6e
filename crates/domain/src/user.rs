//! User domain types.

use gatehouse_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::PasswordHash;
use crate::entity::{EntityMetadata, entity_id};

entity_id!(
    /// Unique identifier for a user record.
    UserId
);

/// Validated, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        // Column width of users.email.
        if trimmed.len() > 100 {
            return Err(AppError::Validation(
                "email address must not exceed 100 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// An account that can be granted roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
    first_name: String,
    last_name: String,
    active: bool,
    metadata: EntityMetadata,
}

impl User {
    /// Creates a new active user with a fresh identifier and timestamps.
    #[must_use]
    pub fn new(
        email: EmailAddress,
        password_hash: PasswordHash,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: true,
            metadata: EntityMetadata::new(),
        }
    }

    /// Rebuilds a user loaded from storage.
    #[must_use]
    pub fn restore(
        id: UserId,
        email: EmailAddress,
        password_hash: PasswordHash,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        active: bool,
        metadata: EntityMetadata,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            first_name: first_name.into(),
            last_name: last_name.into(),
            active,
            metadata,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the canonical email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored credential hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns whether the account may sign in.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns lifecycle timestamps.
    #[must_use]
    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }
}
