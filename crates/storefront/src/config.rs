//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STORAGE_PATH` - Durable key-value file (default: data/storage.json)
//! - `STOREFRONT_CATALOG_PATH` - JSON product list replacing the built-in catalog
//! - `PAYMENT_PROCESSING_DELAY_MS` - Time spent processing a payment (default: 2000)
//! - `PAYMENT_SUCCESS_DELAY_MS` - Time the success state is shown (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::checkout::PaymentDelays;

/// Default location of the durable key-value file.
pub const DEFAULT_STORAGE_PATH: &str = "data/storage.json";

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
    /// Durable key-value storage file
    pub storage_path: PathBuf,
    /// Optional catalog override
    pub catalog_path: Option<PathBuf>,
    /// Simulated payment timings
    pub payment: PaymentDelays,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            catalog_path: None,
            payment: PaymentDelays::default(),
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or("STOREFRONT_HOST", &lookup, defaults.host)?;
        let port = parse_or("STOREFRONT_PORT", &lookup, defaults.port)?;
        let storage_path = lookup("STOREFRONT_STORAGE_PATH")
            .map_or(defaults.storage_path, PathBuf::from);
        let catalog_path = lookup("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let processing_ms = parse_or(
            "PAYMENT_PROCESSING_DELAY_MS",
            &lookup,
            millis(defaults.payment.processing),
        )?;
        let success_ms = parse_or(
            "PAYMENT_SUCCESS_DELAY_MS",
            &lookup,
            millis(defaults.payment.success),
        )?;

        let sentry_traces_sample_rate = parse_or(
            "SENTRY_TRACES_SAMPLE_RATE",
            &lookup,
            defaults.sentry_traces_sample_rate,
        )?;
        if !(0.0..=1.0).contains(&sentry_traces_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_TRACES_SAMPLE_RATE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            storage_path,
            catalog_path,
            payment: PaymentDelays {
                processing: Duration::from_millis(processing_ms),
                success: Duration::from_millis(success_ms),
            },
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Get the socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise use `default`.
fn parse_or<T>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
