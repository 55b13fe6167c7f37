use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};

use super::{user_error::UserError, validation_error::ValidationError};

pub const MIN_PASSWORD_LENGTH: usize = 12;

/// One-way hashed password. The plaintext never outlives `create`.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    /// Validates composition, then hashes with Argon2id on the blocking pool.
    #[tracing::instrument(name = "Password::create", skip_all)]
    pub async fn create(plaintext: Secret<String>) -> Result<Self, UserError> {
        validate(plaintext.expose_secret())?;

        let current_span = tracing::Span::current();
        let hash = tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| compute_password_hash(&plaintext))
        })
        .await
        .map_err(|e| UserError::PasswordHashing(e.to_string()))??;

        Ok(Self(hash))
    }

    /// Rehydrates a stored PHC hash string. The hash is opaque, so the
    /// composition rules are not re-applied.
    pub fn from_hashed(hash: Secret<String>) -> Self {
        Self(hash)
    }

    /// Returns `true` only when `candidate` hashes to the stored value.
    #[tracing::instrument(name = "Password::compare", skip_all)]
    pub async fn compare(&self, candidate: &Secret<String>) -> bool {
        let hash = self.0.clone();
        let candidate = candidate.clone();
        let current_span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| verify_password_hash(&hash, &candidate))
        })
        .await
        .unwrap_or(false)
    }

    pub fn hashed_value(&self) -> &Secret<String> {
        &self.0
    }
}

fn validate(plaintext: &str) -> Result<(), ValidationError> {
    if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    let categories = [
        plaintext.chars().any(|c| c.is_ascii_lowercase()),
        plaintext.chars().any(|c| c.is_ascii_uppercase()),
        plaintext.chars().any(|c| c.is_ascii_digit()),
        plaintext.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];

    if categories.iter().filter(|present| **present).count() < 3 {
        return Err(ValidationError::PasswordTooWeak);
    }

    Ok(())
}

fn hasher() -> Result<Argon2<'static>, UserError> {
    let params =
        Params::new(15000, 2, 1, None).map_err(|e| UserError::PasswordHashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn compute_password_hash(plaintext: &Secret<String>) -> Result<Secret<String>, UserError> {
    let salt = SaltString::generate(rand_core::OsRng);
    hasher()?
        .hash_password(plaintext.expose_secret().as_bytes(), &salt)
        .map(|hash| Secret::new(hash.to_string()))
        .map_err(|e| UserError::PasswordHashing(e.to_string()))
}

fn verify_password_hash(hash: &Secret<String>, candidate: &Secret<String>) -> bool {
    let Ok(expected) = PasswordHash::new(hash.expose_secret()) else {
        tracing::warn!("stored password hash is malformed");
        return false;
    };
    let Ok(argon2) = hasher() else {
        return false;
    };

    argon2
        .verify_password(candidate.expose_secret().as_bytes(), &expected)
        .is_ok()
}
