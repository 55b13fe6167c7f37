//! # Identa - Account Identity Library
//!
//! Facade crate re-exporting the public APIs of the identa components:
//! registration, email verification, authentication, email change,
//! profile management and the account lifecycle.
//!
//! ## Structure
//!
//! - **Core domain types**: `EmailAddress`, `PhoneNumber`, `Password`, `User`, etc.
//! - **Ports**: `AccountStore`, `AuditStore`, `Notifier`, `TokenSigner`, `EmailClient`
//! - **Use cases**: `RegisterUserUseCase`, `AuthenticateUserUseCase`, etc.
//! - **Adapters**: `PostgresAccountStore`, `EmailNotifier`, `JwtTokenSigner`, etc.
//! - **Service**: `AccountService` - wires collaborators and exposes every workflow

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use identa_core::*;
}

pub use identa_core::{
    AccountProfile, AuditAction, AuditLog, Country, EmailAddress, FullName, Password,
    PendingVerification, PhoneNumber, Role, User, UserError, UserId, UserStatus, ValidationError,
    VerificationToken,
};

// ============================================================================
// Ports
// ============================================================================

/// Collaborator traits implemented by adapters
pub mod ports {
    pub use identa_core::{
        ACCESS_TOKEN_TTL_SECONDS, AccessClaims, AccountStore, AccountStoreError, AuditStore,
        AuditStoreError, EmailClient, Notifier, OutgoingEmail, TokenSigner,
    };
}

pub use ports::{AccountStore, AuditStore, EmailClient, Notifier, TokenSigner};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use identa_application::*;
}

pub use identa_application::{AccountError, ErrorKind};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Account and audit stores
    pub mod persistence {
        pub use identa_adapters::persistence::*;
    }

    /// Email clients and the email notifier
    pub mod email {
        pub use identa_adapters::email::*;
    }

    /// Access token signing and validation
    pub mod authentication {
        pub use identa_adapters::authentication::*;
    }

    /// Configuration
    pub mod config {
        pub use identa_adapters::config::*;
    }

    pub use identa_adapters::telemetry::init_tracing;
}

pub use identa_adapters::{
    EmailNotifier, HashMapAccountStore, HashMapAuditStore, IdentaSettings, JwtTokenSigner,
    MockEmailClient, PostgresAccountStore, PostgresAuditStore, PostmarkEmailClient, PostmarkError,
};

// ============================================================================
// Account Service (Main Entry Point)
// ============================================================================

pub use identa_service::{
    AccountService, PostgresAccountService, ServiceSetupError, configure_postgresql,
    get_postgres_pool,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
