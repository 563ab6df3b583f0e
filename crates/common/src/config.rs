//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Seeded administrator account.
    pub admin: AdminConfig,
    /// Archival retry configuration.
    #[serde(default)]
    pub archive: ArchiveConfig,
    /// Document request lifecycle configuration.
    #[serde(default)]
    pub requests: RequestsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// The administrator account created at startup when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,
    pub password: String,
    #[serde(default = "default_admin_first_name")]
    pub first_name: String,
    #[serde(default = "default_admin_last_name")]
    pub last_name: String,
    #[serde(default = "default_admin_contact")]
    pub contact: String,
}

/// Bounded retry for the archival transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Attempts after the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// How strictly status changes are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may be set from any status.
    #[default]
    Permissive,
    /// Only the next status in progression order, or `Rejected`, may be set.
    Progressive,
}

/// Document request lifecycle configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestsConfig {
    #[serde(default)]
    pub transition_policy: TransitionPolicy,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_admin_email() -> String {
    "adminsislc@domain.com".to_string()
}

fn default_admin_first_name() -> String {
    "Admin".to_string()
}

fn default_admin_last_name() -> String {
    "User".to_string()
}

fn default_admin_contact() -> String {
    "09123456789".to_string()
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    50
}

const fn default_max_delay_ms() -> u64 {
    1000
}

const fn default_multiplier() -> f64 {
    2.0
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` in the working directory, if present
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `DOCPORTAL_ENV`)
    /// 4. Environment variables with `DOCPORTAL__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("DOCPORTAL_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCPORTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>().and_then(Self::validate)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("DOCPORTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize::<Self>().and_then(Self::validate)
    }

    /// Reject settings that deserialize but cannot be served.
    ///
    /// The admin password has no default; it must come from a local config
    /// file or `DOCPORTAL__ADMIN__PASSWORD`.
    pub fn validate(self) -> Result<Self, config::ConfigError> {
        if self.admin.password.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "admin.password is empty; set DOCPORTAL__ADMIN__PASSWORD".to_string(),
            ));
        }
        Ok(self)
    }
}
