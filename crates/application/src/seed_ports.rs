//! Store contract consumed by the RBAC bootstrapper.

use async_trait::async_trait;
use thiserror::Error;

use gatehouse_domain::{
    Permission, PermissionId, Role, RoleId, RolePermission, User, UserId, UserRole,
};

/// Store-level failure. "Not found" is never an error: lookups return
/// `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or the transaction is no longer usable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A statement failed.
    #[error("query failed: {0}")]
    Query(String),

    /// A unique key is taken by a row this transaction cannot see.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored row violates a domain invariant.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Outcome of an insert that ignores unique-key conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written.
    Inserted,
    /// A live row with the same unique key already exists; nothing was written.
    AlreadyExists,
}

/// Opens transactions against the access-control store.
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Begins a new transaction.
    async fn begin(&self) -> Result<Box<dyn SeedTransaction>, StoreError>;
}

/// Unit of work over the RBAC tables. Dropping a transaction without
/// committing discards its writes.
#[async_trait]
pub trait SeedTransaction: Send {
    /// Finds a non-deleted permission by name.
    async fn find_permission_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Permission>, StoreError>;

    /// Inserts a permission unless a live one with the same name exists.
    async fn insert_permission(
        &mut self,
        permission: &Permission,
    ) -> Result<InsertOutcome, StoreError>;

    /// Lists every non-deleted permission.
    async fn list_permissions(&mut self) -> Result<Vec<Permission>, StoreError>;

    /// Finds a non-deleted role by name.
    async fn find_role_by_name(&mut self, name: &str) -> Result<Option<Role>, StoreError>;

    /// Inserts a role unless a live one with the same name exists.
    async fn insert_role(&mut self, role: &Role) -> Result<InsertOutcome, StoreError>;

    /// Finds a non-deleted user by email.
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user unless a live one with the same email exists.
    async fn insert_user(&mut self, user: &User) -> Result<InsertOutcome, StoreError>;

    /// Makes the role's permission set exactly `permission_ids`.
    async fn replace_role_permissions(
        &mut self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError>;

    /// Lists the permission grants of a role.
    async fn list_role_permissions(
        &mut self,
        role_id: RoleId,
    ) -> Result<Vec<RolePermission>, StoreError>;

    /// Makes the user's role set exactly `role_ids`.
    async fn replace_user_roles(
        &mut self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError>;

    /// Lists the role assignments of a user.
    async fn list_user_roles(&mut self, user_id: UserId) -> Result<Vec<UserRole>, StoreError>;

    /// Makes every write of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards every write of this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
