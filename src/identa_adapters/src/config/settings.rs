use std::time::Duration;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{defaults, env};

#[derive(Debug, Clone, Deserialize)]
pub struct IdentaSettings {
    pub postgres: PostgresSettings,
    pub jwt: JwtSettings,
    pub email_client: EmailClientSettings,
    pub app: AppSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    pub secret: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_in_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// Prefix for links sent in account emails.
    pub base_url: String,
}

impl IdentaSettings {
    /// Loads settings from defaults, an optional `config/identa.*` file and
    /// `IDENTA__SECTION__KEY` environment variables, in increasing priority.
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name(env::CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR),
            );

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("postgres.url", defaults::POSTGRES_URL)?
            .set_default("app.base_url", defaults::APP_BASE_URL)?
            .set_default("email_client.base_url", defaults::email_client::BASE_URL)?
            .set_default("email_client.sender", defaults::email_client::SENDER)?
            .set_default(
                "email_client.timeout_in_millis",
                defaults::email_client::TIMEOUT_IN_MILLIS,
            )?
            .build()?
            .try_deserialize()
    }
}
