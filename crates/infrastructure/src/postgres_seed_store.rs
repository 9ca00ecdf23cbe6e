//! PostgreSQL-backed store for the RBAC bootstrap.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;

use gatehouse_application::{InsertOutcome, SeedStore, SeedTransaction, StoreError};
use gatehouse_domain::{
    EmailAddress, EntityMetadata, PasswordHash, Permission, PermissionId, Role, RoleId,
    RolePermission, User, UserId, UserRole,
};

mod permissions;
mod roles;
mod users;


/// PostgreSQL implementation of the seed store port.
#[derive(Clone)]
pub struct PostgresSeedStore {
    pool: PgPool,
}

impl PostgresSeedStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeedStore for PostgresSeedStore {
    async fn begin(&self) -> Result<Box<dyn SeedTransaction>, StoreError> {
        let transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error(error, "begin transaction"))?;

        Ok(Box::new(PostgresSeedTransaction { transaction }))
    }
}

/// Open transaction. Dropping it without commit rolls back.
pub struct PostgresSeedTransaction {
    transaction: Transaction<'static, Postgres>,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<PermissionRow> for Permission {
    type Error = StoreError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        Permission::restore(
            PermissionId::from_uuid(row.id),
            row.name,
            row.description,
            EntityMetadata::restore(row.created_at, row.updated_at, row.deleted_at),
        )
        .map_err(|error| corrupt("permissions", row.id, error))
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<RoleRow> for Role {
    type Error = StoreError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Role::restore(
            RoleId::from_uuid(row.id),
            row.name,
            row.description,
            EntityMetadata::restore(row.created_at, row.updated_at, row.deleted_at),
        )
        .map_err(|error| corrupt("roles", row.id, error))
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(row.email).map_err(|error| corrupt("users", row.id, error))?;
        let password_hash = PasswordHash::parse(row.password_hash)
            .map_err(|error| corrupt("users", row.id, error))?;

        Ok(User::restore(
            UserId::from_uuid(row.id),
            email,
            password_hash,
            row.first_name,
            row.last_name,
            row.active,
            EntityMetadata::restore(row.created_at, row.updated_at, row.deleted_at),
        ))
    }
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: uuid::Uuid,
    permission_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl From<RolePermissionRow> for RolePermission {
    fn from(row: RolePermissionRow) -> Self {
        Self {
            role_id: RoleId::from_uuid(row.role_id),
            permission_id: PermissionId::from_uuid(row.permission_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRoleRow {
    user_id: uuid::Uuid,
    role_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl From<UserRoleRow> for UserRole {
    fn from(row: UserRoleRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.user_id),
            role_id: RoleId::from_uuid(row.role_id),
            created_at: row.created_at,
        }
    }
}

fn store_error(error: sqlx::Error, context: &str) -> StoreError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            StoreError::Unavailable(format!("failed to {context}: {error}"))
        }
        other => StoreError::Query(format!("failed to {context}: {other}")),
    }
}

fn corrupt(table: &str, id: uuid::Uuid, error: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("{table} row {id}: {error}"))
}

fn insert_outcome(rows_affected: u64, table: &str, key: &str) -> InsertOutcome {
    if rows_affected == 0 {
        debug!(table, key, "insert skipped, live row already exists");
        InsertOutcome::AlreadyExists
    } else {
        InsertOutcome::Inserted
    }
}

#[async_trait]
impl SeedTransaction for PostgresSeedTransaction {
    async fn find_permission_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<Permission>, StoreError> {
        self.find_permission_by_name_impl(name).await
    }

    async fn insert_permission(
        &mut self,
        permission: &Permission,
    ) -> Result<InsertOutcome, StoreError> {
        self.insert_permission_impl(permission).await
    }

    async fn list_permissions(&mut self) -> Result<Vec<Permission>, StoreError> {
        self.list_permissions_impl().await
    }

    async fn find_role_by_name(&mut self, name: &str) -> Result<Option<Role>, StoreError> {
        self.find_role_by_name_impl(name).await
    }

    async fn insert_role(&mut self, role: &Role) -> Result<InsertOutcome, StoreError> {
        self.insert_role_impl(role).await
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_user_by_email_impl(email).await
    }

    async fn insert_user(&mut self, user: &User) -> Result<InsertOutcome, StoreError> {
        self.insert_user_impl(user).await
    }

    async fn replace_role_permissions(
        &mut self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> Result<(), StoreError> {
        self.replace_role_permissions_impl(role_id, permission_ids)
            .await
    }

    async fn list_role_permissions(
        &mut self,
        role_id: RoleId,
    ) -> Result<Vec<RolePermission>, StoreError> {
        self.list_role_permissions_impl(role_id).await
    }

    async fn replace_user_roles(
        &mut self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> Result<(), StoreError> {
        self.replace_user_roles_impl(user_id, role_ids).await
    }

    async fn list_user_roles(&mut self, user_id: UserId) -> Result<Vec<UserRole>, StoreError> {
        self.list_user_roles_impl(user_id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.transaction
            .commit()
            .await
            .map_err(|error| store_error(error, "commit transaction"))
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.transaction
            .rollback()
            .await
            .map_err(|error| store_error(error, "roll back transaction"))
    }
}
