use identa_adapters::IdentaSettings;
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceSetupError {
    #[error("Failed to create Postgres connection pool: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Invalid sender address: {0}")]
    InvalidSender(#[from] identa_core::ValidationError),
}

/// Configure and return a PostgreSQL connection pool
///
/// Connects to `postgres.url` from the settings and runs all pending
/// migrations.
pub async fn configure_postgresql(settings: &IdentaSettings) -> Result<PgPool, ServiceSetupError> {
    let pg_pool = get_postgres_pool(settings.postgres.url.expose_secret()).await?;

    sqlx::migrate!("../../migrations").run(&pg_pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pg_pool)
}

/// Create a PostgreSQL connection pool
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}
