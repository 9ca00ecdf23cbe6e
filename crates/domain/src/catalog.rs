//! Build-time RBAC catalog seeded at startup.

/// Canonical permission catalog as ordered `(name, description)` pairs.
pub const DEFAULT_PERMISSIONS: &[(&str, &str)] = &[
    ("user:create", "Can create users"),
    ("user:read", "Can read users"),
    ("user:update", "Can update users"),
    ("user:delete", "Can delete users"),
    ("role:create", "Can create roles"),
    ("role:read", "Can read roles"),
    ("role:update", "Can update roles"),
    ("role:delete", "Can delete roles"),
    ("permission:read", "Can read permissions"),
];

/// Name of the role that holds every permission.
pub const ADMIN_ROLE_NAME: &str = "admin";

/// Description of the administrator role.
pub const ADMIN_ROLE_DESCRIPTION: &str = "System administrator with full access";

/// Name of the baseline role for regular accounts.
pub const USER_ROLE_NAME: &str = "user";

/// Description of the baseline role.
pub const USER_ROLE_DESCRIPTION: &str = "Regular user with limited access";

/// Email of the administrator account created on first start.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

/// Initial administrator password. Must be rotated after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123!";

/// Given name stored on the administrator account.
pub const DEFAULT_ADMIN_FIRST_NAME: &str = "Admin";

/// Family name stored on the administrator account.
pub const DEFAULT_ADMIN_LAST_NAME: &str = "User";

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::validate_password;

    #[test]
    fn permission_names_are_unique() {
        let names: HashSet<&str> = DEFAULT_PERMISSIONS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), DEFAULT_PERMISSIONS.len());
    }

    #[test]
    fn default_admin_password_satisfies_policy() {
        assert!(validate_password(DEFAULT_ADMIN_PASSWORD).is_ok());
    }
}
