//! Password policy: strength validation, hashing, verification and
//! generation of credentials.
//!
//! Hashing is CPU-bound and deliberately slow (about 100ms at the default
//! cost). Callers on a latency-sensitive path must move it to a blocking
//! context.

use std::sync::Arc;

use thiserror::Error;

use gatehouse_domain::{
    DEFAULT_HASH_COST, PASSWORD_MAX_LENGTH, PasswordHash, PasswordValidationError,
    is_password_hash, validate_password,
};

mod generation;

#[cfg(test)]
mod tests;

/// Failure reported by a hashing adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHasherError {
    /// The input is not a parseable encoded hash.
    #[error("malformed password hash: {0}")]
    Malformed(String),

    /// The primitive failed for another reason.
    #[error("password hashing failed: {0}")]
    Failed(String),
}

/// Port for the adaptive one-way hash primitive. Keeps the application layer
/// free of direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh salt at the given cost.
    fn hash_password(&self, password: &str, cost: u32) -> Result<String, PasswordHasherError>;

    /// Verifies a plaintext password against an encoded hash.
    /// Must run in constant time with respect to the mismatch position.
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;

    /// Reads the work factor encoded in a hash.
    fn hash_cost(&self, hash: &str) -> Result<u32, PasswordHasherError>;
}

/// Errors returned by [`PasswordPolicy::hash`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// The password failed the strength policy.
    #[error(transparent)]
    Validation(#[from] PasswordValidationError),

    /// The hashing primitive failed.
    #[error("failed to hash password: {0}")]
    HashFailed(String),
}

/// Errors returned by [`PasswordPolicy::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompareError {
    /// The password does not match the hash.
    #[error("password does not match hash")]
    Mismatch,

    /// The stored value is not a parseable hash.
    #[error("password hash is malformed")]
    Malformed,
}

/// Errors returned by [`PasswordPolicy::generate_random`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordGenerationError {
    /// The operating system random source failed.
    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    /// A sampling range was empty or wider than the sampler supports.
    #[error("cannot sample uniformly below {0}")]
    InvalidRange(usize),

    /// The generated value did not satisfy the policy.
    #[error("generated password violates policy: {0}")]
    PolicyViolation(#[from] PasswordValidationError),
}

/// Errors returned by [`PasswordPolicy::needs_rehash`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RehashError {
    /// The work factor could not be read from the hash.
    #[error("password hash is malformed")]
    Malformed,

    /// Computing the replacement hash failed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Result of [`PasswordPolicy::needs_rehash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RehashOutcome {
    /// The hash already uses the configured cost and is returned unchanged.
    Current(PasswordHash),
    /// The hash used a lower cost and was recomputed.
    Rehashed(PasswordHash),
}

impl RehashOutcome {
    /// Returns whether a new hash was computed.
    #[must_use]
    pub fn rehashed(&self) -> bool {
        matches!(self, Self::Rehashed(_))
    }

    /// Returns the hash to store.
    #[must_use]
    pub fn into_hash(self) -> PasswordHash {
        match self {
            Self::Current(hash) | Self::Rehashed(hash) => hash,
        }
    }
}

/// Storage-agnostic password policy.
#[derive(Clone)]
pub struct PasswordPolicy {
    hasher: Arc<dyn PasswordHasher>,
    cost: u32,
}

impl PasswordPolicy {
    /// Lowest work factor accepted by bcrypt.
    pub const MIN_COST: u32 = 4;

    /// Highest work factor accepted by bcrypt.
    pub const MAX_COST: u32 = 31;

    /// Creates a policy hashing at [`DEFAULT_HASH_COST`].
    #[must_use]
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::with_cost(hasher, DEFAULT_HASH_COST)
    }

    /// Creates a policy with an explicit work factor, clamped to the range
    /// the algorithm accepts.
    #[must_use]
    pub fn with_cost(hasher: Arc<dyn PasswordHasher>, cost: u32) -> Self {
        Self {
            hasher,
            cost: cost.clamp(Self::MIN_COST, Self::MAX_COST),
        }
    }

    /// Returns the configured work factor.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Checks a plaintext password against the strength rules.
    pub fn validate(&self, password: &str) -> Result<(), PasswordValidationError> {
        validate_password(password)
    }

    /// Validates then hashes a password with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHash, HashError> {
        validate_password(password)?;

        let encoded = self
            .hasher
            .hash_password(password, self.cost)
            .map_err(|error| HashError::HashFailed(error.to_string()))?;

        PasswordHash::parse(encoded).map_err(|error| HashError::HashFailed(error.to_string()))
    }

    /// Verifies `password` against an encoded `hash`.
    ///
    /// Input longer than the policy maximum never matches: bcrypt only reads
    /// the first 72 bytes, so such input would otherwise verify against the
    /// hash of its prefix.
    pub fn compare(&self, hash: &str, password: &str) -> Result<(), CompareError> {
        if password.len() > PASSWORD_MAX_LENGTH {
            return if is_password_hash(hash) {
                Err(CompareError::Mismatch)
            } else {
                Err(CompareError::Malformed)
            };
        }

        match self.hasher.verify_password(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CompareError::Mismatch),
            Err(_) => Err(CompareError::Malformed),
        }
    }

    /// Generates a random password of `length` characters (clamped to the
    /// policy bounds) that always passes [`PasswordPolicy::validate`].
    pub fn generate_random(&self, length: usize) -> Result<String, PasswordGenerationError> {
        generation::generate_password(length)
    }

    /// Returns whether `candidate` has the shape of an encoded hash.
    #[must_use]
    pub fn is_hash_format(&self, candidate: &str) -> bool {
        is_password_hash(candidate)
    }

    /// Recomputes `hash` from `password` when it was produced with a lower
    /// cost than the configured one.
    ///
    /// Does not verify the password; callers compare first.
    pub fn needs_rehash(&self, hash: &str, password: &str) -> Result<RehashOutcome, RehashError> {
        let current = PasswordHash::parse(hash).map_err(|_| RehashError::Malformed)?;
        let hash_cost = self
            .hasher
            .hash_cost(hash)
            .map_err(|_| RehashError::Malformed)?;

        if hash_cost < self.cost {
            return Ok(RehashOutcome::Rehashed(self.hash(password)?));
        }

        Ok(RehashOutcome::Current(current))
    }
}
