//! Password strength rules and the encoded-hash value type.
//!
//! Bounds follow bcrypt: it reads at most 72 bytes of input, so longer
//! passwords would be silently truncated and are rejected instead.

use gatehouse_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length, bounded by the bcrypt input limit.
pub const PASSWORD_MAX_LENGTH: usize = 72;

/// Work factor applied to new hashes.
pub const DEFAULT_HASH_COST: u32 = 12;

/// Length of a bcrypt modular-crypt string such as `$2b$12$<53 chars>`.
pub const PASSWORD_HASH_LENGTH: usize = 60;

/// Reasons a password fails the strength policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordValidationError {
    /// Fewer than [`PASSWORD_MIN_LENGTH`] characters.
    #[error("password must be at least {PASSWORD_MIN_LENGTH} characters long")]
    TooShort,

    /// More than [`PASSWORD_MAX_LENGTH`] characters or bytes.
    #[error("password must not exceed {PASSWORD_MAX_LENGTH} characters")]
    TooLong,

    /// At least one character category is missing.
    #[error(
        "password must contain at least one uppercase letter, one lowercase letter, one number, and one special character"
    )]
    TooWeak,
}

/// Character categories a password must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterClass {
    /// Uppercase letter.
    Uppercase,
    /// Lowercase letter.
    Lowercase,
    /// Numeric character.
    Digit,
    /// Punctuation or symbol.
    Special,
}

impl CharacterClass {
    /// All categories in the order they are reported.
    pub const ALL: [Self; 4] = [Self::Uppercase, Self::Lowercase, Self::Digit, Self::Special];

    /// Classifies a character, or returns `None` for whitespace and control
    /// characters, which satisfy no category.
    #[must_use]
    pub fn of(character: char) -> Option<Self> {
        if character.is_uppercase() {
            Some(Self::Uppercase)
        } else if character.is_lowercase() {
            Some(Self::Lowercase)
        } else if character.is_numeric() {
            Some(Self::Digit)
        } else if character.is_whitespace() || character.is_control() || character.is_alphabetic()
        {
            None
        } else {
            Some(Self::Special)
        }
    }

    /// ASCII alphabet used when generating passwords.
    #[must_use]
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Uppercase => b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Lowercase => b"abcdefghijklmnopqrstuvwxyz",
            Self::Digit => b"0123456789",
            Self::Special => b"!@#$%^&*()_+-=[]{}|;:,.<>?",
        }
    }
}

/// Validates a plaintext password against the strength policy.
///
/// Length is checked first and short-circuits the category checks.
pub fn validate_password(password: &str) -> Result<(), PasswordValidationError> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(PasswordValidationError::TooShort);
    }

    if char_count > PASSWORD_MAX_LENGTH || password.len() > PASSWORD_MAX_LENGTH {
        return Err(PasswordValidationError::TooLong);
    }

    let mut seen = [false; 4];
    for class in password.chars().filter_map(CharacterClass::of) {
        seen[class as usize] = true;
    }

    if seen.iter().all(|present| *present) {
        Ok(())
    } else {
        Err(PasswordValidationError::TooWeak)
    }
}

/// Returns whether `candidate` has the shape of a bcrypt hash.
///
/// Checks only the layout (`$2a$`, `$2b$`, `$2x$` or `$2y$`, a two digit
/// cost, then 53 characters of bcrypt base64); nothing is decoded.
#[must_use]
pub fn is_password_hash(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != PASSWORD_HASH_LENGTH {
        return false;
    }

    let prefix_ok = bytes[0] == b'$'
        && bytes[1] == b'2'
        && matches!(bytes[2], b'a' | b'b' | b'x' | b'y')
        && bytes[3] == b'$'
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
        && bytes[6] == b'$';

    prefix_ok
        && bytes[7..]
            .iter()
            .all(|byte| byte.is_ascii_alphanumeric() || *byte == b'.' || *byte == b'/')
}

/// An encoded one-way password hash. Never holds plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an encoded hash after checking its shape.
    pub fn parse(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if !is_password_hash(value.as_str()) {
            return Err(AppError::Validation(
                "value is not an encoded password hash".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SAMPLE_HASH: &str = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW";

    #[test]
    fn strong_password_is_accepted() {
        assert_eq!(validate_password("TestPass123!"), Ok(()));
    }

    #[test]
    fn short_password_is_rejected() {
        assert_eq!(
            validate_password("Test1!"),
            Err(PasswordValidationError::TooShort)
        );
    }

    #[test]
    fn long_password_is_rejected() {
        let password = format!("{}A1!", "a".repeat(73));
        assert_eq!(
            validate_password(&password),
            Err(PasswordValidationError::TooLong)
        );
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        assert!(validate_password("Aa1!aaaa").is_ok());
        let max = format!("Aa1!{}", "a".repeat(PASSWORD_MAX_LENGTH - 4));
        assert!(validate_password(&max).is_ok());
    }

    #[test]
    fn multibyte_password_over_byte_limit_is_rejected() {
        let password = format!("Aa1!{}", "é".repeat(40));
        assert!(password.chars().count() <= PASSWORD_MAX_LENGTH);
        assert_eq!(
            validate_password(&password),
            Err(PasswordValidationError::TooLong)
        );
    }

    #[test]
    fn each_missing_category_is_too_weak() {
        for password in ["testpass123!", "TESTPASS123!", "TestPass!!!", "TestPass123"] {
            assert_eq!(
                validate_password(password),
                Err(PasswordValidationError::TooWeak),
                "{password}"
            );
        }
    }

    #[test]
    fn whitespace_does_not_count_as_special() {
        assert_eq!(
            validate_password("Test Pass 123"),
            Err(PasswordValidationError::TooWeak)
        );
    }

    #[test]
    fn hash_shape_is_recognised() {
        assert!(is_password_hash(SAMPLE_HASH));
        assert!(is_password_hash(&SAMPLE_HASH.replacen("$2b$", "$2y$", 1)));
        assert!(!is_password_hash("invalid_hash"));
        assert!(!is_password_hash(&SAMPLE_HASH.replacen("$2b$", "$3b$", 1)));
        assert!(!is_password_hash(&SAMPLE_HASH[..59]));
    }

    #[test]
    fn password_hash_rejects_plaintext() {
        assert!(PasswordHash::parse("Admin@123!").is_err());
        assert!(PasswordHash::parse(SAMPLE_HASH).is_ok());
    }

    #[test]
    fn password_hash_debug_hides_value() {
        let hash = PasswordHash::parse(SAMPLE_HASH).unwrap_or_else(|_| unreachable!());
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    proptest! {
        #[test]
        fn compliant_passwords_validate(
            upper in "[A-Z]",
            lower in "[a-z]",
            digit in "[0-9]",
            special in "[!@#$%^&*()_+=.,;:?-]",
            filler in "[A-Za-z0-9!@#$%^&*]{4,68}",
        ) {
            let password = format!("{filler}{upper}{lower}{digit}{special}");
            prop_assert_eq!(validate_password(&password), Ok(()));
        }

        #[test]
        fn short_passwords_are_too_short(password in "\\PC{0,7}") {
            prop_assert_eq!(validate_password(&password), Err(PasswordValidationError::TooShort));
        }

        #[test]
        fn passwords_without_uppercase_are_too_weak(password in "[a-z0-9!@#$%]{8,72}") {
            prop_assert_eq!(validate_password(&password), Err(PasswordValidationError::TooWeak));
        }
    }
}
