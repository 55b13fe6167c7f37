pub mod authentication;
pub mod config;
pub mod email;
pub mod persistence;
pub mod telemetry;

pub use authentication::{JwtClaims, JwtTokenSigner, TokenValidationError};
pub use config::IdentaSettings;
pub use email::{EmailNotifier, MockEmailClient, PostmarkEmailClient, PostmarkError};
pub use persistence::{
    HashMapAccountStore, HashMapAuditStore, PostgresAccountStore, PostgresAuditStore,
};
