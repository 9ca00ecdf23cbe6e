//! bcrypt password hasher implementation.
//!
//! Produces 60-character modular-crypt strings (`$2b$<cost>$<salt+digest>`)
//! with a fresh 16-byte salt per call.

use bcrypt::{BcryptError, HashParts};
use gatehouse_application::{PasswordHasher, PasswordHasherError};

/// bcrypt adapter for the password hashing port.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptPasswordHasher;

impl BcryptPasswordHasher {
    /// Creates a new bcrypt hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn malformed_or_failed(error: BcryptError) -> PasswordHasherError {
    match error {
        BcryptError::InvalidHash(_)
        | BcryptError::InvalidPrefix(_)
        | BcryptError::InvalidCost(_) => PasswordHasherError::Malformed(error.to_string()),
        other => PasswordHasherError::Failed(other.to_string()),
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash_password(&self, password: &str, cost: u32) -> Result<String, PasswordHasherError> {
        bcrypt::hash(password, cost)
            .map_err(|error| PasswordHasherError::Failed(format!("bcrypt hash: {error}")))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        bcrypt::verify(password, hash).map_err(malformed_or_failed)
    }

    fn hash_cost(&self, hash: &str) -> Result<u32, PasswordHasherError> {
        hash.parse::<HashParts>()
            .map(|parts| parts.get_cost())
            .map_err(malformed_or_failed)
    }
}
