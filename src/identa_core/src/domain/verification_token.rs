use constant_time_eq::constant_time_eq;
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

use super::validation_error::ValidationError;

const TOKEN_BYTES: usize = 32;

/// Single-use email verification token: 32 random bytes, hex encoded.
#[derive(Debug, Clone)]
pub struct VerificationToken(Secret<String>);

impl VerificationToken {
    /// Draws a fresh token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        Self(Secret::new(hex::encode(bytes)))
    }

    /// Rehydrates a stored token; must be 64 lowercase hex characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let lowercase = !raw.chars().any(|c| c.is_ascii_uppercase());
        let decoded = hex::decode(raw).map_err(|_| ValidationError::InvalidVerificationToken)?;
        if decoded.len() != TOKEN_BYTES || !lowercase {
            return Err(ValidationError::InvalidVerificationToken);
        }
        Ok(Self(Secret::new(raw.to_owned())))
    }

    /// Compares against untrusted input without short-circuiting on the
    /// first differing byte.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.expose_secret().as_bytes(), candidate.as_bytes())
    }
}

impl AsRef<Secret<String>> for VerificationToken {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl PartialEq for VerificationToken {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.0.expose_secret())
    }
}

impl Eq for VerificationToken {}
