//! Application settings loading from config.toml
//!
//! The configuration file carries the venue catalog seed data together with the
//! pricing rates, kitchen display timings and checkout behaviour. Every section
//! except `[[venues]]` has defaults, so a file listing only venues is valid.

use crate::{
    core::{pricing::PricingRates, search::Catalog, ticker::OrderTimings},
    errors::{Error, Result},
    models::Venue,
};
use serde::Deserialize;
use std::{path::Path, time::Duration};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "WORKOUT_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Fee and tax rates
    #[serde(default)]
    pub pricing: PricingRates,
    /// Kitchen display timer settings
    #[serde(default)]
    pub orders: OrderTimings,
    /// Simulated checkout behaviour
    #[serde(default)]
    pub checkout: CheckoutSettings,
    /// Venue catalog seed data
    #[serde(default)]
    pub venues: Vec<Venue>,
}

impl Config {
    /// Validates the settings and builds the venue catalog.
    ///
    /// # Errors
    /// Returns an error if a rate or timer is invalid or any venue breaks a
    /// catalog invariant.
    pub fn catalog(&self) -> Result<Catalog> {
        self.pricing.validate()?;
        self.orders.validate()?;
        Catalog::new(self.venues.clone())
    }
}

/// Settings for the simulated checkout round trip
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Delay before a checkout settles
    pub latency_ms: u64,
    /// Credit every new session starts with
    pub starting_credit: f64,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            latency_ms: 1_000,
            starting_credit: 0.0,
        }
    }
}

impl CheckoutSettings {
    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from {:?}", path_ref);

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {path_ref:?}: {e}"),
    })
}

/// Loads configuration from `$WORKOUT_CONFIG`, falling back to ./config.toml
///
/// # Errors
/// See [`load_config`].
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
