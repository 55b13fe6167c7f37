use std::fmt;

use super::validation_error::ValidationError;

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let len = raw.chars().count();
        if !(MIN_LEN..=MAX_LEN).contains(&len) {
            return Err(ValidationError::FullNameLength {
                min: MIN_LEN,
                max: MAX_LEN,
            });
        }

        // Digits, punctuation and whitespace alone do not make a name.
        if !raw.chars().any(char::is_alphabetic) {
            return Err(ValidationError::FullNameNotAlphabetic);
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
