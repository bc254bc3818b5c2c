//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_CATALOG_PATH` - Catalog JSON file (default: bundled catalog)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `STOREFRONT_SESSION_IDLE_MINUTES` - Session inactivity expiry (default: 60)
//! - `STOREFRONT_MAX_SESSIONS` - Sessions kept in memory before eviction (default: 100000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Catalog file; `None` uses the catalog compiled into the binary
    pub catalog_path: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Minutes of inactivity before a session (and its cart) is dropped
    pub session_idle_minutes: u32,
    /// Upper bound on sessions (and carts) held in memory
    pub max_sessions: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            static_dir: PathBuf::from("crates/storefront/static"),
            session_idle_minutes: 60,
            max_sessions: 100_000,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = parse_or("STOREFRONT_HOST", get("STOREFRONT_HOST"), defaults.host)?;
        let port = parse_or("STOREFRONT_PORT", get("STOREFRONT_PORT"), defaults.port)?;
        let base_url = get("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_URL".to_string(),
                "must start with http:// or https://".to_string(),
            ));
        }

        let catalog_path = get("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let static_dir = get("STOREFRONT_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from);

        let session_idle_minutes = parse_or(
            "STOREFRONT_SESSION_IDLE_MINUTES",
            get("STOREFRONT_SESSION_IDLE_MINUTES"),
            defaults.session_idle_minutes,
        )?;
        if session_idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SESSION_IDLE_MINUTES".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let max_sessions = parse_or(
            "STOREFRONT_MAX_SESSIONS",
            get("STOREFRONT_MAX_SESSIONS"),
            defaults.max_sessions,
        )?;
        if max_sessions == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_MAX_SESSIONS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let sentry_sample_rate = parse_rate(
            "SENTRY_SAMPLE_RATE",
            get("SENTRY_SAMPLE_RATE"),
            defaults.sentry_sample_rate,
        )?;
        let sentry_traces_sample_rate = parse_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            get("SENTRY_TRACES_SAMPLE_RATE"),
            defaults.sentry_traces_sample_rate,
        )?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            static_dir,
            session_idle_minutes,
            max_sessions,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// How long an untouched session and its cart are kept.
    #[must_use]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(u64::from(self.session_idle_minutes) * 60)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, falling back to a default.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a sampling rate, which must lie within `[0, 1]`.
fn parse_rate(key: &str, value: Option<String>, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_or(key, value, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
