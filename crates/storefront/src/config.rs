//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https` enables secure cookies
//!   (default: `http://localhost:3000`)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog to serve instead of the bundled one
//! - `STOREFRONT_AUTH_LATENCY_MS` - Simulated sign-in delay (default: 1000)
//! - `STOREFRONT_TAX_RATE` - Tax rate as a fraction (default: 0.08)
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee in dollars (default: 9.99)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Free shipping above this subtotal (default: 99)
//! - `STOREFRONT_PRICE_FILTER_MAX` - Upper bound of the price filter (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use elite_store_core::{Price, PricingPolicy};
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

/// Static assets served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

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
    /// Alternative catalog file; `None` serves the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Simulated latency of sign-in and registration
    pub auth_latency: Duration,
    /// Tax and shipping rules
    pub pricing: PricingPolicy,
    /// Upper bound of the listing's default price range
    pub price_filter_max: Price,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// Sentry client options.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl Default for StorefrontConfig {
    /// Local development defaults: plain HTTP on 127.0.0.1:3000, bundled
    /// catalog, one second of sign-in latency.
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            auth_latency: Duration::from_millis(1000),
            pricing: PricingPolicy::default(),
            price_filter_max: Price::new(Decimal::from(500)),
            sentry: SentryConfig::default(),
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
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);
        let defaults = Self::default();

        let host = env.parse_or("STOREFRONT_HOST", defaults.host)?;
        let port = env.parse_or("STOREFRONT_PORT", defaults.port)?;
        let base_url = env
            .optional("STOREFRONT_BASE_URL")
            .unwrap_or(defaults.base_url);
        let parsed = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_BASE_URL".to_string(),
                format!("unsupported scheme {}", parsed.scheme()),
            ));
        }
        let base_url = base_url.trim_end_matches('/').to_owned();

        let catalog_path = env.optional("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let auth_latency = Duration::from_millis(env.parse_or("STOREFRONT_AUTH_LATENCY_MS", 1000)?);

        let tax_rate: Decimal = env.parse_or("STOREFRONT_TAX_RATE", defaults.pricing.tax_rate)?;
        if tax_rate.is_sign_negative() || tax_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_TAX_RATE".to_string(),
                "must be a fraction between 0 and 1".to_string(),
            ));
        }
        let pricing = PricingPolicy {
            tax_rate,
            shipping_fee: env.price_or("STOREFRONT_SHIPPING_FEE", defaults.pricing.shipping_fee)?,
            free_shipping_threshold: env.price_or(
                "STOREFRONT_FREE_SHIPPING_THRESHOLD",
                defaults.pricing.free_shipping_threshold,
            )?,
        };
        let price_filter_max =
            env.price_or("STOREFRONT_PRICE_FILTER_MAX", defaults.price_filter_max)?;

        let sentry = SentryConfig {
            dsn: env.optional("SENTRY_DSN"),
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", defaults.sentry.sample_rate)?,
            traces_sample_rate: env
                .parse_or("SENTRY_TRACES_SAMPLE_RATE", defaults.sentry.traces_sample_rate)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            auth_latency,
            pricing,
            price_filter_max,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse a non-negative dollar amount.
    fn price_or(&self, key: &str, default: Price) -> Result<Price, ConfigError> {
        let amount: Decimal = self.parse_or(key, default.amount())?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must not be negative".to_string(),
            ));
        }
        Ok(Price::new(amount))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.pricing, PricingPolicy::default());
        assert_eq!(config.price_filter_max, Price::from_cents(50_000));
        assert_eq!(config.auth_latency, Duration::from_secs(1));
        assert!(config.catalog_path.is_none());
        assert!(!config.is_secure());
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://shop.example.com"),
            ("STOREFRONT_AUTH_LATENCY_MS", "0"),
            ("STOREFRONT_TAX_RATE", "0.1"),
            ("STOREFRONT_SHIPPING_FEE", "4.50"),
            ("STOREFRONT_CATALOG_PATH", "/srv/catalog.json"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(config.auth_latency, Duration::ZERO);
        assert_eq!(config.pricing.tax_rate, Decimal::new(1, 1));
        assert_eq!(config.pricing.shipping_fee, Price::from_cents(450));
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/srv/catalog.json"))
        );
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("STOREFRONT_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));

        let err = load(&[("STOREFRONT_TAX_RATE", "8")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_TAX_RATE"));

        let err = load(&[("STOREFRONT_SHIPPING_FEE", "-1")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_SHIPPING_FEE"));

        assert!(load(&[("STOREFRONT_BASE_URL", "ftp://files.example.com")]).is_err());
    }
}
