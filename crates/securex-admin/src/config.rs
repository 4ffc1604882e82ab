//! Configuration management

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::session::MAX_SESSION_TIMEOUT_MINUTES;

pub const DEFAULT_ADMIN_USERNAME: &str = "PROXT";
pub const DEFAULT_ADMIN_PASSWORD: &str = "32Ipubib";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Deployment environment. Production turns on TLS for the store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid(format!("Unknown environment: {}", other))),
        }
    }
}

/// How the administrator password is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Plain password, hashed once at startup.
    Plain(String),
    /// Pre-computed argon2 PHC string.
    Hash(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub database_url: Option<String>,
    pub environment: Environment,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub run_migrations: bool,
    pub admin_username: String,
    pub admin_password: PasswordSource,
    pub session_timeout_minutes: i64,
    pub max_range_days: i64,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_url: None,
            environment: Environment::Development,
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_secs(5),
            run_migrations: false,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: PasswordSource::Plain(DEFAULT_ADMIN_PASSWORD.to_string()),
            session_timeout_minutes: 1440, // 24 hours
            max_range_days: 3660,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env`, environment variables and an optional TOML file
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;

        if let Ok(config_path) = std::env::var("SECUREX_ADMIN_CONFIG") {
            config.load_from_toml(&config_path)?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply overrides from a variable lookup (`std::env::var` in `load`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LISTEN_ADDR") {
            self.listen_addr = addr.parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid LISTEN_ADDR: {}", e)))?;
        } else if let Some(port) = lookup("PORT") {
            let port = port.parse::<u16>()
                .map_err(|e| ConfigError::Invalid(format!("Invalid PORT: {}", e)))?;
            self.listen_addr.set_port(port);
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = non_empty(url);
        }

        if let Some(env) = lookup("APP_ENV") {
            self.environment = env.parse()?;
        }

        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            self.db_max_connections = max.parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?;
        }

        if let Some(secs) = lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>()
                .map_err(|e| ConfigError::Invalid(format!("Invalid DB_ACQUIRE_TIMEOUT_SECS: {}", e)))?;
            self.db_acquire_timeout = Duration::from_secs(secs);
        }

        if let Some(flag) = lookup("RUN_MIGRATIONS") {
            self.run_migrations = parse_bool(&flag);
        }

        if let Some(username) = lookup("ADMIN_USERNAME") {
            self.admin_username = username;
        }

        if let Some(hash) = lookup("ADMIN_PASSWORD_HASH").and_then(non_empty) {
            self.admin_password = PasswordSource::Hash(hash);
        } else if let Some(password) = lookup("ADMIN_PASSWORD").and_then(non_empty) {
            self.admin_password = PasswordSource::Plain(password);
        }

        if let Some(minutes) = lookup("SESSION_TIMEOUT_MINUTES") {
            self.session_timeout_minutes = minutes.parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid SESSION_TIMEOUT_MINUTES: {}", e)))?;
        }

        if let Some(days) = lookup("MAX_RANGE_DAYS") {
            self.max_range_days = days.parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid MAX_RANGE_DAYS: {}", e)))?;
        }

        if let Some(path) = lookup("TLS_CERT_PATH").and_then(non_empty) {
            self.tls_cert_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("TLS_KEY_PATH").and_then(non_empty) {
            self.tls_key_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Load from TOML config file
    pub fn load_from_toml(&mut self, path: &str) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let toml_config: toml::Value = toml::from_str(&content)?;

        if let Some(addr) = toml_config.get("listen_addr").and_then(|v| v.as_str()) {
            self.listen_addr = addr.parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid listen_addr in TOML: {}", e)))?;
        }

        if let Some(url) = toml_config.get("database_url").and_then(|v| v.as_str()) {
            self.database_url = non_empty(url.to_string());
        }

        if let Some(env) = toml_config.get("environment").and_then(|v| v.as_str()) {
            self.environment = env.parse()?;
        }

        if let Some(max) = toml_config.get("db_max_connections").and_then(|v| v.as_integer()) {
            self.db_max_connections = u32::try_from(max)
                .map_err(|_| ConfigError::Invalid(format!("Invalid db_max_connections in TOML: {}", max)))?;
        }

        if let Some(secs) = toml_config.get("db_acquire_timeout_secs").and_then(|v| v.as_integer()) {
            let secs = u64::try_from(secs)
                .map_err(|_| ConfigError::Invalid(format!("Invalid db_acquire_timeout_secs in TOML: {}", secs)))?;
            self.db_acquire_timeout = Duration::from_secs(secs);
        }

        if let Some(flag) = toml_config.get("run_migrations").and_then(|v| v.as_bool()) {
            self.run_migrations = flag;
        }

        if let Some(username) = toml_config.get("admin_username").and_then(|v| v.as_str()) {
            self.admin_username = username.to_string();
        }

        if let Some(hash) = toml_config.get("admin_password_hash").and_then(|v| v.as_str()) {
            self.admin_password = PasswordSource::Hash(hash.to_string());
        }

        if let Some(minutes) = toml_config.get("session_timeout_minutes").and_then(|v| v.as_integer()) {
            self.session_timeout_minutes = minutes;
        }

        if let Some(days) = toml_config.get("max_range_days").and_then(|v| v.as_integer()) {
            self.max_range_days = days;
        }

        if let Some(path) = toml_config.get("tls_cert_path").and_then(|v| v.as_str()) {
            self.tls_cert_path = Some(PathBuf::from(path));
        }

        if let Some(path) = toml_config.get("tls_key_path").and_then(|v| v.as_str()) {
            self.tls_key_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_username.trim().is_empty() {
            return Err(ConfigError::Invalid("admin_username must not be empty".to_string()));
        }

        if self.session_timeout_minutes <= 0 || self.session_timeout_minutes > MAX_SESSION_TIMEOUT_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "session_timeout_minutes must be between 1 and {}",
                MAX_SESSION_TIMEOUT_MINUTES
            )));
        }

        if self.max_range_days <= 0 {
            return Err(ConfigError::Invalid("max_range_days must be > 0".to_string()));
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::Invalid("db_max_connections must be > 0".to_string()));
        }

        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            return Err(ConfigError::Invalid(
                "tls_cert_path and tls_key_path must be set together".to_string()
            ));
        }

        Ok(())
    }

    pub fn uses_default_password(&self) -> bool {
        matches!(&self.admin_password, PasswordSource::Plain(p) if p == DEFAULT_ADMIN_PASSWORD)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
