use gatehouse_domain::{CharacterClass, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, validate_password};

use super::PasswordGenerationError;

/// Builds a password with one character per category, fills the rest from the
/// union of all categories and shuffles the whole buffer. All randomness comes
/// from the operating system CSPRNG.
pub(super) fn generate_password(length: usize) -> Result<String, PasswordGenerationError> {
    let length = length.clamp(PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH);

    let union: Vec<u8> = CharacterClass::ALL
        .iter()
        .flat_map(|class| class.alphabet().iter().copied())
        .collect();

    let mut buffer = Vec::with_capacity(length);
    for class in CharacterClass::ALL {
        buffer.push(pick(class.alphabet())?);
    }

    while buffer.len() < length {
        buffer.push(pick(&union)?);
    }

    // Fisher-Yates.
    for index in (1..buffer.len()).rev() {
        let swap_with = random_below(index + 1)?;
        buffer.swap(index, swap_with);
    }

    let password: String = buffer.into_iter().map(char::from).collect();
    validate_password(&password)?;

    Ok(password)
}

fn pick(alphabet: &[u8]) -> Result<u8, PasswordGenerationError> {
    let index = random_below(alphabet.len())?;
    Ok(alphabet[index])
}

/// Returns a uniformly distributed value in `0..bound` using rejection
/// sampling, so small alphabets carry no modulo bias.
fn random_below(bound: usize) -> Result<usize, PasswordGenerationError> {
    let bound = match u32::try_from(bound) {
        Ok(0) | Err(_) => return Err(PasswordGenerationError::InvalidRange(bound)),
        Ok(bound) => bound,
    };

    let zone = (u32::MAX / bound) * bound;
    loop {
        let mut bytes = [0u8; 4];
        getrandom::fill(&mut bytes).map_err(|error| {
            PasswordGenerationError::RandomSourceUnavailable(error.to_string())
        })?;

        let value = u32::from_le_bytes(bytes);
        if value < zone {
            return Ok((value % bound) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::random_below;
    use crate::PasswordGenerationError;

    #[test]
    fn random_below_stays_in_range() {
        for bound in [1usize, 2, 10, 26, 88] {
            for _ in 0..200 {
                let value = random_below(bound);
                assert!(matches!(value, Ok(value) if value < bound));
            }
        }
    }

    #[test]
    fn random_below_rejects_empty_range() {
        assert_eq!(random_below(0), Err(PasswordGenerationError::InvalidRange(0)));
    }
}
