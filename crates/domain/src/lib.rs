//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod association;
mod catalog;
mod entity;
mod password;
mod permission;
mod role;
mod user;

pub use association::{RolePermission, UserRole};
pub use catalog::{
    ADMIN_ROLE_DESCRIPTION, ADMIN_ROLE_NAME, DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_FIRST_NAME,
    DEFAULT_ADMIN_LAST_NAME, DEFAULT_ADMIN_PASSWORD, DEFAULT_PERMISSIONS, USER_ROLE_DESCRIPTION,
    USER_ROLE_NAME,
};
pub use entity::EntityMetadata;
pub use password::{
    CharacterClass, DEFAULT_HASH_COST, PASSWORD_HASH_LENGTH, PASSWORD_MAX_LENGTH,
    PASSWORD_MIN_LENGTH, PasswordHash, PasswordValidationError, is_password_hash,
    validate_password,
};
pub use permission::{Permission, PermissionId};
pub use role::{Role, RoleId};
pub use user::{EmailAddress, User, UserId};
