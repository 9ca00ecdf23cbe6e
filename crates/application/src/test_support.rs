use std::sync::atomic::{AtomicUsize, Ordering};

use gatehouse_domain::is_password_hash;

use crate::{PasswordHasher, PasswordHasherError};

/// Deterministic stand-in for bcrypt that produces correctly shaped hashes
/// without the work factor.
#[derive(Default)]
pub(crate) struct FakePasswordHasher {
    fail: bool,
    hash_calls: AtomicUsize,
}

impl FakePasswordHasher {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            hash_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }

    fn fingerprint(password: &str) -> String {
        let digest = password.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, byte| {
            (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        });
        format!("{digest:016x}{}", ".".repeat(37))
    }
}

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str, cost: u32) -> Result<String, PasswordHasherError> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PasswordHasherError::Failed("injected failure".to_owned()));
        }

        Ok(format!("$2b${cost:02}${}", Self::fingerprint(password)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        if !is_password_hash(hash) {
            return Err(PasswordHasherError::Malformed(hash.to_owned()));
        }

        Ok(hash[7..] == Self::fingerprint(password))
    }

    fn hash_cost(&self, hash: &str) -> Result<u32, PasswordHasherError> {
        hash.get(4..6)
            .and_then(|cost| cost.parse().ok())
            .ok_or_else(|| PasswordHasherError::Malformed(hash.to_owned()))
    }
}
