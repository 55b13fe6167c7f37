use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use secrecy::{ExposeSecret, Secret};

use super::validation_error::ValidationError;

/// Numbering plan a phone number is normalized and validated against.
///
/// Each country owns its own `normalize`/`validate` pair; adding a
/// country adds a variant and its two arms without touching the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Country {
    #[default]
    Bd,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Bd => "BD",
        }
    }

    /// Takes the digits-only form and returns the E.164 form.
    fn normalize(&self, digits: &str) -> String {
        match self {
            Self::Bd => {
                if digits.starts_with('0') {
                    format!("+88{digits}")
                } else if digits.starts_with("88") {
                    format!("+{digits}")
                } else {
                    format!("+880{digits}")
                }
            }
        }
    }

    fn validate(&self, normalized: &str) -> Result<(), ValidationError> {
        match self {
            Self::Bd => {
                const OPERATOR_PREFIXES: [&str; 7] = ["13", "14", "15", "16", "17", "18", "19"];

                if normalized.len() != 14 {
                    return Err(ValidationError::InvalidPhoneLength {
                        country: self.code(),
                    });
                }
                let operator = normalized.get(4..6).unwrap_or_default();
                if !OPERATOR_PREFIXES.contains(&operator) {
                    return Err(ValidationError::InvalidOperatorPrefix {
                        country: self.code(),
                    });
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BD" => Ok(Self::Bd),
            other => Err(ValidationError::UnsupportedCountry(other.to_owned())),
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Phone number in E.164 form, e.g. `+8801712345678`.
#[derive(Debug, Clone)]
pub struct PhoneNumber(Secret<String>);

impl PhoneNumber {
    pub fn create(raw: &str, country: Country) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::PhoneRequired);
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let normalized = country.normalize(&digits);
        country.validate(&normalized)?;

        Ok(Self(Secret::new(normalized)))
    }
}

impl AsRef<Secret<String>> for PhoneNumber {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}
