//! Identity and lifecycle attributes shared by every primary entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares a UUID-backed identifier newtype.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: uuid::Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

pub(crate) use entity_id;

/// Creation, modification and soft-delete timestamps.
///
/// Built explicitly through [`EntityMetadata::new`] at the call site; nothing
/// fills these fields implicitly on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl EntityMetadata {
    /// Creates metadata for a row that is being created now.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Rebuilds metadata for a row loaded from storage.
    #[must_use]
    pub fn restore(
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-delete marker, if set.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the row is logically deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Advances the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    /// Marks the row as logically deleted.
    pub fn soft_delete(&mut self) {
        let now = Utc::now().max(self.updated_at);
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::EntityMetadata;

    #[test]
    fn new_metadata_is_live_with_equal_timestamps() {
        let metadata = EntityMetadata::new();
        assert!(!metadata.is_deleted());
        assert_eq!(metadata.created_at(), metadata.updated_at());
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut metadata = EntityMetadata::new();
        let before = metadata.updated_at();
        metadata.touch();
        assert!(metadata.updated_at() >= before);
        assert_eq!(metadata.created_at(), before);
    }

    #[test]
    fn soft_delete_sets_marker() {
        let mut metadata = EntityMetadata::new();
        metadata.soft_delete();
        assert!(metadata.is_deleted());
        assert_eq!(metadata.deleted_at(), Some(metadata.updated_at()));
    }
}
