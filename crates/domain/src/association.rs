//! Junction rows for the two many-to-many relations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PermissionId, RoleId, UserId};

/// Grants one permission to one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Granted role.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
    /// Time the grant was recorded.
    pub created_at: DateTime<Utc>,
}

impl RolePermission {
    /// Creates a grant stamped with the current time.
    #[must_use]
    pub fn new(role_id: RoleId, permission_id: PermissionId) -> Self {
        Self {
            role_id,
            permission_id,
            created_at: Utc::now(),
        }
    }
}

/// Assigns one role to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Time the assignment was recorded.
    pub created_at: DateTime<Utc>,
}

impl UserRole {
    /// Creates an assignment stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, role_id: RoleId) -> Self {
        Self {
            user_id,
            role_id,
            created_at: Utc::now(),
        }
    }
}
