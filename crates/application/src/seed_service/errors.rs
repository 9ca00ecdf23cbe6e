use std::fmt::{Display, Formatter};

use thiserror::Error;

use gatehouse_core::AppError;

use crate::{HashError, StoreError};

/// Entity touched by a failed store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Permission catalog row.
    Permission,
    /// Role row.
    Role,
    /// User row.
    User,
    /// Role to permission grant.
    RolePermission,
    /// User to role assignment.
    UserRole,
    /// The enclosing transaction.
    Transaction,
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Permission => "permission",
            Self::Role => "role",
            Self::User => "user",
            Self::RolePermission => "role permissions",
            Self::UserRole => "user roles",
            Self::Transaction => "transaction",
        })
    }
}

/// Store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    /// Find by unique key.
    Lookup,
    /// Insert ignoring conflicts.
    Insert,
    /// Fetch all rows.
    List,
    /// Replace an association set.
    Associate,
    /// Open the transaction.
    Begin,
    /// Commit the transaction.
    Commit,
}

impl Display for StoreOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(match self {
            Self::Lookup => "look up",
            Self::Insert => "insert",
            Self::List => "list",
            Self::Associate => "replace",
            Self::Begin => "begin",
            Self::Commit => "commit",
        })
    }
}

/// A store failure with the entity and operation it happened in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {operation} {entity} '{key}': {source}")]
pub struct PersistenceError {
    /// Entity being read or written.
    pub entity: EntityKind,
    /// Operation attempted.
    pub operation: StoreOperation,
    /// Unique key of the row, e.g. the permission name.
    pub key: String,
    /// Underlying store failure.
    #[source]
    pub source: StoreError,
}

impl PersistenceError {
    /// Wraps a store failure with context.
    #[must_use]
    pub fn new(
        entity: EntityKind,
        operation: StoreOperation,
        key: impl Into<String>,
        source: StoreError,
    ) -> Self {
        Self {
            entity,
            operation,
            key: key.into(),
            source,
        }
    }
}

/// Any failure during a bootstrap run. Every variant means the transaction
/// was rolled back and the store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A store call failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The administrator credential could not be produced.
    #[error("failed to hash administrator password: {0}")]
    Hash(#[from] HashError),

    /// The seed plan itself is invalid.
    #[error("invalid seed plan: {0}")]
    InvalidPlan(String),
}

impl From<TransactionError> for AppError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::InvalidPlan(_) | TransactionError::Hash(HashError::Validation(_)) => {
                AppError::Validation(format!("rbac bootstrap failed: {error}"))
            }
            _ => AppError::Internal(format!("rbac bootstrap failed: {error}")),
        }
    }
}
