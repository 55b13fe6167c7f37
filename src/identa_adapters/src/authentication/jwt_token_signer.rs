use chrono::{DateTime, Utc};
use identa_core::{AccessClaims, Role, TokenSigner, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire form of the access token payload. The subject travels as `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub id: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

impl From<&AccessClaims> for JwtClaims {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            id: claims.id.to_string(),
            roles: claims.roles.clone(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenValidationError {
    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid subject")]
    InvalidSubject,
    #[error("Invalid timestamp")]
    InvalidTimestamp,
}

/// HS256 signer for access tokens.
#[derive(Clone)]
pub struct JwtTokenSigner {
    secret: Secret<String>,
}

impl JwtTokenSigner {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    /// Checks signature and expiry and returns the claims carried by `token`.
    pub fn validate(&self, token: &str) -> Result<AccessClaims, TokenValidationError> {
        let claims = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?
        .claims;

        let id = UserId::parse(&claims.id).map_err(|_| TokenValidationError::InvalidSubject)?;
        let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0)
            .ok_or(TokenValidationError::InvalidTimestamp)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or(TokenValidationError::InvalidTimestamp)?;

        Ok(AccessClaims {
            id,
            roles: claims.roles,
            issued_at,
            expires_at,
        })
    }
}

#[async_trait::async_trait]
impl TokenSigner for JwtTokenSigner {
    #[tracing::instrument(name = "Signing access token", skip_all)]
    async fn sign(&self, claims: &AccessClaims) -> Result<Secret<String>, String> {
        encode(
            &Header::new(Algorithm::HS256),
            &JwtClaims::from(claims),
            &EncodingKey::from_secret(self.as_bytes()),
        )
        .map(Secret::new)
        .map_err(|e| e.to_string())
    }
}
