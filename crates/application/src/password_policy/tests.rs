use std::sync::Arc;

use proptest::prelude::*;

use gatehouse_domain::{
    DEFAULT_HASH_COST, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PasswordValidationError,
    validate_password,
};

use super::{CompareError, HashError, PasswordPolicy, RehashError, RehashOutcome};
use crate::test_support::FakePasswordHasher;

fn policy() -> PasswordPolicy {
    PasswordPolicy::new(Arc::new(FakePasswordHasher::default()))
}

#[test]
fn default_cost_is_twelve() {
    assert_eq!(policy().cost(), DEFAULT_HASH_COST);
    assert_eq!(DEFAULT_HASH_COST, 12);
}

#[test]
fn cost_is_clamped_to_algorithm_range() {
    let hasher = Arc::new(FakePasswordHasher::default());
    assert_eq!(PasswordPolicy::with_cost(hasher.clone(), 1).cost(), 4);
    assert_eq!(PasswordPolicy::with_cost(hasher, 99).cost(), 31);
}

#[test]
fn hash_then_compare_round_trips() {
    let policy = policy();
    let hash = policy.hash("TestPass123!");
    assert!(hash.is_ok());
    let hash = hash.unwrap_or_else(|_| unreachable!());

    assert!(policy.is_hash_format(hash.as_str()));
    assert_eq!(policy.compare(hash.as_str(), "TestPass123!"), Ok(()));
    assert_eq!(
        policy.compare(hash.as_str(), "TestPass123!x"),
        Err(CompareError::Mismatch)
    );
}

#[test]
fn hash_propagates_validation_error_unchanged() {
    let policy = policy();
    assert_eq!(
        policy.hash("Test1!"),
        Err(HashError::Validation(PasswordValidationError::TooShort))
    );
    assert_eq!(
        policy.hash("testpass123!"),
        Err(HashError::Validation(PasswordValidationError::TooWeak))
    );
}

#[test]
fn hash_reports_primitive_failure() {
    let policy = PasswordPolicy::new(Arc::new(FakePasswordHasher::failing()));
    assert!(matches!(
        policy.hash("TestPass123!"),
        Err(HashError::HashFailed(_))
    ));
}

#[test]
fn compare_never_accepts_input_longer_than_the_maximum() {
    let policy = policy();
    let longest = format!("Aa1!{}", "a".repeat(PASSWORD_MAX_LENGTH - 4));
    let hash = policy.hash(&longest).unwrap_or_else(|_| unreachable!());

    assert_eq!(policy.compare(hash.as_str(), &longest), Ok(()));
    assert_eq!(
        policy.compare(hash.as_str(), &format!("{longest}x")),
        Err(CompareError::Mismatch)
    );
    assert_eq!(
        policy.compare("invalid_hash", &format!("{longest}x")),
        Err(CompareError::Malformed)
    );
}

#[test]
fn compare_rejects_malformed_hash() {
    assert_eq!(
        policy().compare("invalid_hash", "TestPass123!"),
        Err(CompareError::Malformed)
    );
}

#[test]
fn needs_rehash_upgrades_lower_cost_hashes() {
    let hasher = Arc::new(FakePasswordHasher::default());
    let weak = PasswordPolicy::with_cost(hasher.clone(), 10);
    let strong = PasswordPolicy::with_cost(hasher, 12);

    let old_hash = weak
        .hash("TestPass123!")
        .unwrap_or_else(|_| unreachable!());

    let outcome = strong.needs_rehash(old_hash.as_str(), "TestPass123!");
    assert!(matches!(outcome, Ok(RehashOutcome::Rehashed(_))));
    let new_hash = outcome.unwrap_or_else(|_| unreachable!());
    assert!(new_hash.rehashed());

    let new_hash = new_hash.into_hash();
    assert!(new_hash.as_str().starts_with("$2b$12$"));
    assert_eq!(strong.compare(new_hash.as_str(), "TestPass123!"), Ok(()));
}

#[test]
fn needs_rehash_keeps_current_hashes() {
    let policy = policy();
    let hash = policy
        .hash("TestPass123!")
        .unwrap_or_else(|_| unreachable!());

    let outcome = policy.needs_rehash(hash.as_str(), "TestPass123!");
    assert_eq!(outcome, Ok(RehashOutcome::Current(hash)));
}

#[test]
fn needs_rehash_rejects_malformed_hash() {
    assert_eq!(
        policy().needs_rehash("not-a-hash", "TestPass123!"),
        Err(RehashError::Malformed)
    );
}

#[test]
fn generate_random_clamps_out_of_range_lengths() {
    let policy = policy();
    let short = policy.generate_random(PASSWORD_MIN_LENGTH - 1);
    let long = policy.generate_random(PASSWORD_MAX_LENGTH + 1);
    assert_eq!(short.map(|value| value.len()), Ok(PASSWORD_MIN_LENGTH));
    assert_eq!(long.map(|value| value.len()), Ok(PASSWORD_MAX_LENGTH));
}

#[test]
fn generated_passwords_are_not_constant() {
    let policy = policy();
    let first = policy.generate_random(32);
    let second = policy.generate_random(32);
    assert!(first.is_ok() && second.is_ok());
    assert_ne!(first, second);
}

proptest! {
    #[test]
    fn generated_passwords_pass_validation(length in 0usize..128) {
        let password = policy().generate_random(length);
        prop_assert!(password.is_ok());
        let password = password.unwrap_or_default();

        let expected = length.clamp(PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH);
        prop_assert_eq!(password.chars().count(), expected);
        prop_assert_eq!(validate_password(&password), Ok(()));
    }
}
