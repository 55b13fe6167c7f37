pub mod account_service;
pub mod helpers;

pub use account_service::{AccountService, PostgresAccountService};
pub use helpers::{ServiceSetupError, configure_postgresql, get_postgres_pool};
