//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREPULSE_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)
//! - `STOREPULSE_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `STOREPULSE_CRON_SECRET` - Bearer token accepted by the scheduled-sync
//!   trigger endpoint
//!
//! ## Optional
//! - `STOREPULSE_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREPULSE_PORT` - Listen port (default: 3001)
//! - `STOREPULSE_ENV` - `development` or `production` (default: development)
//! - `SHOPIFY_API_VERSION` - Admin REST API version (default: 2024-01)
//! - `STOREPULSE_SYNC_PAGE_LIMIT` - Records requested per page (default: 250)
//! - `STOREPULSE_SYNC_FETCH_TIMEOUT_SECS` - Per-page fetch timeout (default: 30)
//! - `STOREPULSE_SYNC_DEADLINE_SECS` - Per-tenant sync deadline (default: 900)
//! - `STOREPULSE_SYNC_INTERVAL_HOURS` - Scheduled sync interval (default: 6)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
///
/// The unauthenticated manual sync trigger is only reachable in
/// `Development`; anything else is treated as production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Whether this is a production deployment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Bearer token for the cron-scoped sync trigger
    pub cron_secret: SecretString,
    /// Sync engine tuning
    pub sync: SyncConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Sync engine configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Shopify Admin REST API version (e.g., 2024-01)
    pub api_version: String,
    /// Records requested per page
    pub page_limit: u32,
    /// Timeout applied to each page fetch
    pub fetch_timeout: Duration,
    /// Overall deadline for one tenant's sync
    pub tenant_deadline: Duration,
    /// Interval between scheduled full syncs
    pub interval: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the session secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREPULSE_DATABASE_URL")?;
        let host = get_env_or_default("STOREPULSE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREPULSE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("STOREPULSE_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREPULSE_PORT".to_string(), e.to_string()))?;
        let environment = get_env_or_default("STOREPULSE_ENV", "development")
            .parse::<Environment>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREPULSE_ENV".to_string(), e))?;

        let session_secret = get_required_secret("STOREPULSE_SESSION_SECRET")?;
        validate_secret_length(&session_secret, "STOREPULSE_SESSION_SECRET")?;
        let cron_secret = get_required_secret("STOREPULSE_CRON_SECRET")?;

        let sync = SyncConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            environment,
            session_secret,
            cron_secret,
            sync,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SyncConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2024-01"),
            page_limit: parse_env_or_default("STOREPULSE_SYNC_PAGE_LIMIT", 250)?,
            fetch_timeout: Duration::from_secs(parse_env_or_default(
                "STOREPULSE_SYNC_FETCH_TIMEOUT_SECS",
                30,
            )?),
            tenant_deadline: Duration::from_secs(parse_env_or_default(
                "STOREPULSE_SYNC_DEADLINE_SECS",
                900,
            )?),
            interval: Duration::from_secs(
                parse_env_or_default("STOREPULSE_SYNC_INTERVAL_HOURS", 6)? * 60 * 60,
            ),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable, falling back to a default.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            "PRODUCTION".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_is_production() {
        assert!(Environment::Production.is_production());
        assert!(!Environment::Development.is_production());
    }

    #[test]
    fn test_validate_secret_length_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_secret_length(&secret, "TEST_SECRET").is_err());
    }

    #[test]
    fn test_validate_secret_length_ok() {
        let secret = SecretString::from("x".repeat(32));
        assert!(validate_secret_length(&secret, "TEST_SECRET").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            environment: Environment::Development,
            session_secret: SecretString::from("x".repeat(32)),
            cron_secret: SecretString::from("cron".repeat(8)),
            sync: SyncConfig {
                api_version: "2024-01".to_string(),
                page_limit: 250,
                fetch_timeout: Duration::from_secs(30),
                tenant_deadline: Duration::from_secs(900),
                interval: Duration::from_secs(6 * 60 * 60),
            },
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }
}
