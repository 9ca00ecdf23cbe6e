//! Idempotent, all-or-nothing bootstrap of the RBAC store.
//!
//! One run brings the store from any prior state to: the permission catalog,
//! the `admin` and `user` roles, the default administrator account, `admin`
//! holding exactly every live permission, and the administrator holding
//! exactly the `admin` role. Either every write commits or none does.

use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

use tracing::{debug, info, warn};

use gatehouse_domain::{
    ADMIN_ROLE_DESCRIPTION, ADMIN_ROLE_NAME, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_FIRST_NAME,
    DEFAULT_ADMIN_LAST_NAME, DEFAULT_ADMIN_PASSWORD, DEFAULT_PERMISSIONS, EmailAddress, Permission,
    PermissionId, Role, USER_ROLE_DESCRIPTION, USER_ROLE_NAME, User,
};

use crate::{InsertOutcome, PasswordPolicy, SeedStore, SeedTransaction, StoreError};

mod errors;


pub use errors::{EntityKind, PersistenceError, StoreOperation, TransactionError};

/// Name and description of a seeded permission or role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    /// Unique name.
    pub name: String,
    /// Human readable description.
    pub description: String,
}

impl SeedEntry {
    /// Creates a seed entry.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Administrator account created when none exists.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminAccountSpec {
    /// Login email.
    pub email: String,
    /// Initial plaintext password; hashed before it reaches the store.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl AdminAccountSpec {
    /// Returns whether the initial password is the built-in default.
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_ADMIN_PASSWORD
    }
}

impl Default for AdminAccountSpec {
    fn default() -> Self {
        Self {
            email: DEFAULT_ADMIN_EMAIL.to_owned(),
            password: DEFAULT_ADMIN_PASSWORD.to_owned(),
            first_name: DEFAULT_ADMIN_FIRST_NAME.to_owned(),
            last_name: DEFAULT_ADMIN_LAST_NAME.to_owned(),
        }
    }
}

impl Debug for AdminAccountSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AdminAccountSpec")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Target state of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    /// Permission catalog, in insertion order.
    pub permissions: Vec<SeedEntry>,
    /// Role granted every permission.
    pub admin_role: SeedEntry,
    /// Baseline role, created but not wired.
    pub user_role: SeedEntry,
    /// Administrator account.
    pub admin: AdminAccountSpec,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            permissions: DEFAULT_PERMISSIONS
                .iter()
                .map(|(name, description)| SeedEntry::new(*name, *description))
                .collect(),
            admin_role: SeedEntry::new(ADMIN_ROLE_NAME, ADMIN_ROLE_DESCRIPTION),
            user_role: SeedEntry::new(USER_ROLE_NAME, USER_ROLE_DESCRIPTION),
            admin: AdminAccountSpec::default(),
        }
    }
}

impl SeedPlan {
    /// Replaces the administrator account.
    #[must_use]
    pub fn with_admin(mut self, admin: AdminAccountSpec) -> Self {
        self.admin = admin;
        self
    }

    fn validate(&self) -> Result<EmailAddress, TransactionError> {
        let invalid = |message: String| TransactionError::InvalidPlan(message);

        let mut seen = HashSet::new();
        for entry in &self.permissions {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(invalid("permission names must not be empty".to_owned()));
            }
            if !seen.insert(name) {
                return Err(invalid(format!("permission '{name}' is listed twice")));
            }
        }

        let admin_role = self.admin_role.name.trim();
        let user_role = self.user_role.name.trim();
        if admin_role.is_empty() || user_role.is_empty() {
            return Err(invalid("role names must not be empty".to_owned()));
        }
        if admin_role == user_role {
            return Err(invalid(format!(
                "admin and user roles must differ, both are '{admin_role}'"
            )));
        }

        EmailAddress::new(self.admin.email.as_str()).map_err(|error| invalid(error.to_string()))
    }
}

/// Summary of a committed bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Canonical administrator email.
    pub admin_email: String,
    /// Whether this run created the administrator account.
    pub admin_created: bool,
    /// Catalog permissions inserted by this run.
    pub permissions_created: usize,
    /// Roles inserted by this run.
    pub roles_created: usize,
    /// Permissions now granted to the admin role.
    pub permission_count: usize,
}

/// Seeds permissions, default roles and the administrator account.
#[derive(Clone)]
pub struct SeedBootstrapper {
    password_policy: PasswordPolicy,
    plan: SeedPlan,
}

impl SeedBootstrapper {
    /// Creates a bootstrapper for the given plan.
    #[must_use]
    pub fn new(password_policy: PasswordPolicy, plan: SeedPlan) -> Self {
        Self {
            password_policy,
            plan,
        }
    }

    /// Returns the target state.
    #[must_use]
    pub fn plan(&self) -> &SeedPlan {
        &self.plan
    }

    /// Runs the bootstrap in a single transaction on `store`.
    ///
    /// Returns `Ok` only after commit. On any error the transaction is rolled
    /// back and the store is left as it was before the call.
    pub async fn seed(&self, store: &dyn SeedStore) -> Result<SeedReport, TransactionError> {
        let admin_email = self.plan.validate()?;

        let mut transaction = store.begin().await.map_err(|source| {
            PersistenceError::new(
                EntityKind::Transaction,
                StoreOperation::Begin,
                "rbac seed",
                source,
            )
        })?;

        let outcome = self.apply(transaction.as_mut(), &admin_email).await;
        let report = match outcome {
            Ok(report) => report,
            Err(error) => {
                if let Err(rollback_error) = transaction.rollback().await {
                    warn!(error = %rollback_error, "failed to roll back rbac bootstrap");
                }
                return Err(error);
            }
        };

        transaction.commit().await.map_err(|source| {
            PersistenceError::new(
                EntityKind::Transaction,
                StoreOperation::Commit,
                "rbac seed",
                source,
            )
        })?;

        info!(
            admin_email = %report.admin_email,
            permissions = report.permission_count,
            permissions_created = report.permissions_created,
            roles_created = report.roles_created,
            admin_created = report.admin_created,
            "rbac bootstrap committed"
        );
        info!(
            admin_email = %report.admin_email,
            "please change the default administrator password after first login"
        );
        if report.admin_created && self.plan.admin.uses_default_password() {
            warn!(
                admin_email = %report.admin_email,
                "administrator account was created with the built-in default password"
            );
        }

        Ok(report)
    }

    async fn apply(
        &self,
        transaction: &mut dyn SeedTransaction,
        admin_email: &EmailAddress,
    ) -> Result<SeedReport, TransactionError> {
        let mut report = SeedReport {
            admin_email: admin_email.to_string(),
            admin_created: false,
            permissions_created: 0,
            roles_created: 0,
            permission_count: 0,
        };

        for entry in &self.plan.permissions {
            if ensure_permission(transaction, entry).await? {
                report.permissions_created += 1;
            }
        }

        let (admin_role, admin_role_created) =
            ensure_role(transaction, &self.plan.admin_role).await?;
        let (_, user_role_created) = ensure_role(transaction, &self.plan.user_role).await?;
        report.roles_created = usize::from(admin_role_created) + usize::from(user_role_created);

        let permission_ids: Vec<PermissionId> = transaction
            .list_permissions()
            .await
            .map_err(|source| {
                PersistenceError::new(EntityKind::Permission, StoreOperation::List, "*", source)
            })?
            .iter()
            .map(Permission::id)
            .collect();

        transaction
            .replace_role_permissions(admin_role.id(), &permission_ids)
            .await
            .map_err(|source| {
                PersistenceError::new(
                    EntityKind::RolePermission,
                    StoreOperation::Associate,
                    admin_role.name(),
                    source,
                )
            })?;
        report.permission_count = permission_ids.len();

        let (admin_user, admin_created) = self.ensure_admin_user(transaction, admin_email).await?;
        report.admin_created = admin_created;

        transaction
            .replace_user_roles(admin_user.id(), &[admin_role.id()])
            .await
            .map_err(|source| {
                PersistenceError::new(
                    EntityKind::UserRole,
                    StoreOperation::Associate,
                    admin_email.as_str(),
                    source,
                )
            })?;

        Ok(report)
    }

    /// Finds the administrator or creates it. The password is hashed only
    /// when the account does not exist yet.
    async fn ensure_admin_user(
        &self,
        transaction: &mut dyn SeedTransaction,
        email: &EmailAddress,
    ) -> Result<(User, bool), TransactionError> {
        let lookup_error = |source: StoreError| {
            PersistenceError::new(
                EntityKind::User,
                StoreOperation::Lookup,
                email.as_str(),
                source,
            )
        };

        if let Some(existing) = transaction
            .find_user_by_email(email.as_str())
            .await
            .map_err(lookup_error)?
        {
            return Ok((existing, false));
        }

        let password_hash = self.password_policy.hash(&self.plan.admin.password)?;
        let user = User::new(
            email.clone(),
            password_hash,
            self.plan.admin.first_name.as_str(),
            self.plan.admin.last_name.as_str(),
        );

        let outcome = transaction.insert_user(&user).await.map_err(|source| {
            PersistenceError::new(
                EntityKind::User,
                StoreOperation::Insert,
                email.as_str(),
                source,
            )
        })?;

        match outcome {
            InsertOutcome::Inserted => Ok((user, true)),
            InsertOutcome::AlreadyExists => {
                debug!(email = %email, "administrator was created concurrently, reusing it");
                let existing = transaction
                    .find_user_by_email(email.as_str())
                    .await
                    .map_err(lookup_error)?
                    .ok_or_else(|| lookup_error(invisible_conflict(email.as_str())))?;
                Ok((existing, false))
            }
        }
    }
}

/// Returns whether the permission was inserted by this call.
async fn ensure_permission(
    transaction: &mut dyn SeedTransaction,
    entry: &SeedEntry,
) -> Result<bool, TransactionError> {
    let name = entry.name.trim();
    let lookup_error = |source: StoreError| {
        PersistenceError::new(
            EntityKind::Permission,
            StoreOperation::Lookup,
            name,
            source,
        )
    };

    if transaction
        .find_permission_by_name(name)
        .await
        .map_err(lookup_error)?
        .is_some()
    {
        return Ok(false);
    }

    let permission = Permission::new(name, entry.description.as_str())
        .map_err(|error| TransactionError::InvalidPlan(error.to_string()))?;

    let outcome = transaction
        .insert_permission(&permission)
        .await
        .map_err(|source| {
            PersistenceError::new(
                EntityKind::Permission,
                StoreOperation::Insert,
                name,
                source,
            )
        })?;

    match outcome {
        InsertOutcome::Inserted => Ok(true),
        InsertOutcome::AlreadyExists => {
            debug!(permission = name, "permission was created concurrently");
            transaction
                .find_permission_by_name(permission.name())
                .await
                .map_err(lookup_error)?
                .ok_or_else(|| lookup_error(invisible_conflict(permission.name())))?;
            Ok(false)
        }
    }
}

/// Returns the live role and whether this call inserted it.
async fn ensure_role(
    transaction: &mut dyn SeedTransaction,
    entry: &SeedEntry,
) -> Result<(Role, bool), TransactionError> {
    let name = entry.name.trim();
    let lookup_error = |source: StoreError| {
        PersistenceError::new(
            EntityKind::Role,
            StoreOperation::Lookup,
            name,
            source,
        )
    };

    if let Some(existing) = transaction
        .find_role_by_name(name)
        .await
        .map_err(lookup_error)?
    {
        return Ok((existing, false));
    }

    let role = Role::new(name, entry.description.as_str())
        .map_err(|error| TransactionError::InvalidPlan(error.to_string()))?;

    let outcome = transaction.insert_role(&role).await.map_err(|source| {
        PersistenceError::new(
            EntityKind::Role,
            StoreOperation::Insert,
            name,
            source,
        )
    })?;

    match outcome {
        InsertOutcome::Inserted => Ok((role, true)),
        InsertOutcome::AlreadyExists => {
            debug!(role = name, "role was created concurrently, reusing it");
            let existing = transaction
                .find_role_by_name(role.name())
                .await
                .map_err(lookup_error)?
                .ok_or_else(|| lookup_error(invisible_conflict(role.name())))?;
            Ok((existing, false))
        }
    }
}

fn invisible_conflict(key: &str) -> StoreError {
    StoreError::Conflict(format!(
        "'{key}' is taken by a row this transaction cannot see"
    ))
}
