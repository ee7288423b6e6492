//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPEASE_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPEASE_PORT` - Listen port (default: 3000)
//! - `SHOPEASE_BASE_URL` - Public URL for the storefront (default: `http://127.0.0.1:3000`)
//! - `SHOPEASE_CART_SLOT_PREFIX` - Session key prefix for cart slots (default: `shopease_cart`)
//! - `SHOPEASE_CART_SLOTS` - Number of cart slots, i.e. max distinct products (default: 50)
//! - `SHOPEASE_FREE_SHIPPING_THRESHOLD` - Subtotal for free shipping (default: 2000)
//! - `SHOPEASE_SHIPPING_FEE` - Flat shipping fee below the threshold (default: 150)
//! - `SHOPEASE_SESSION_CAPACITY` - Most sessions kept in memory (default: 10000)
//! - `SHOPEASE_SESSION_IDLE_MINUTES` - Idle minutes before a session is dropped (default: 120)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use shopease_core::pricing::{DEFAULT_FLAT_SHIPPING_FEE, DEFAULT_FREE_SHIPPING_THRESHOLD};
use shopease_core::{Price, ShippingPolicy};
use thiserror::Error;

use crate::cart::SlotLayout;
use crate::cart::storage::{DEFAULT_SLOT_CAPACITY, DEFAULT_SLOT_PREFIX};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
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
    /// Cart storage and pricing
    pub cart: CartConfig,
    /// Session cache bounds
    pub session: SessionConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Cart slot layout and shipping rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Session key prefix of the cart slots
    pub slot_prefix: String,
    /// Number of cart slots
    pub slot_capacity: usize,
    /// Shipping rules
    pub shipping: ShippingPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            slot_prefix: DEFAULT_SLOT_PREFIX.to_string(),
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            shipping: ShippingPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Slot layout described by this configuration.
    #[must_use]
    pub fn slot_layout(&self) -> SlotLayout {
        SlotLayout::new(self.slot_prefix.clone(), self.slot_capacity)
    }
}

/// Bounds of the in-memory session cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Most sessions held at once
    pub capacity: u64,
    /// Time without a request before a session is dropped
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            idle_timeout: Duration::from_secs(120 * 60),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://127.0.0.1:3000".to_string(),
            cart: CartConfig::default(),
            session: SessionConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
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

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let env = Env(&lookup);

        let host = env.parse_or("SHOPEASE_HOST", defaults.host)?;
        let port = env.parse_or("SHOPEASE_PORT", defaults.port)?;
        let base_url = env.get("SHOPEASE_BASE_URL").unwrap_or(defaults.base_url);

        let slot_prefix = env
            .get("SHOPEASE_CART_SLOT_PREFIX")
            .unwrap_or(defaults.cart.slot_prefix);
        if slot_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPEASE_CART_SLOT_PREFIX".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let slot_capacity: usize = env.parse_or("SHOPEASE_CART_SLOTS", defaults.cart.slot_capacity)?;
        if slot_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPEASE_CART_SLOTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let free_threshold = env.parse_or(
            "SHOPEASE_FREE_SHIPPING_THRESHOLD",
            DEFAULT_FREE_SHIPPING_THRESHOLD.amount(),
        )?;
        let flat_fee = env.parse_or("SHOPEASE_SHIPPING_FEE", DEFAULT_FLAT_SHIPPING_FEE.amount())?;

        let session_capacity: u64 =
            env.parse_or("SHOPEASE_SESSION_CAPACITY", defaults.session.capacity)?;
        if session_capacity == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPEASE_SESSION_CAPACITY".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let idle_minutes: u64 = env.parse_or(
            "SHOPEASE_SESSION_IDLE_MINUTES",
            defaults.session.idle_timeout.as_secs() / 60,
        )?;
        if idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPEASE_SESSION_IDLE_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            cart: CartConfig {
                slot_prefix,
                slot_capacity,
                shipping: ShippingPolicy::new(Price::new(free_threshold), Price::new(flat_fee)),
            },
            session: SessionConfig {
                capacity: session_capacity,
                idle_timeout: Duration::from_secs(idle_minutes.saturating_mul(60)),
            },
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with parsing helpers.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => Ok(default),
        }
    }
}
