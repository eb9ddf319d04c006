//! Tunable constants for sheet calculations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a [`SheetConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Constants used by the inventory weight rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    /// Weight of a single coin in pounds, regardless of denomination.
    pub coin_weight: f64,

    /// Carrying capacity per point of Strength.
    pub capacity_per_strength: i32,

    /// Load percentage above which the character is close to their limit.
    pub warning_percent: f64,

    /// Load percentage above which the character is overloaded.
    pub overload_percent: f64,

    /// Largest count allowed for a single coin denomination.
    pub max_coins: u32,
}

impl SheetConfig {
    pub fn new() -> Self {
        Self {
            coin_weight: 0.02,
            capacity_per_strength: 15,
            warning_percent: 80.0,
            overload_percent: 100.0,
            max_coins: 9_999_999,
        }
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SheetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coin_weight.is_nan() || self.coin_weight <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "coin weight must be positive, got {}",
                self.coin_weight
            )));
        }
        if self.capacity_per_strength <= 0 {
            return Err(ConfigError::Invalid(format!(
                "capacity per strength must be positive, got {}",
                self.capacity_per_strength
            )));
        }
        if self.warning_percent > self.overload_percent {
            return Err(ConfigError::Invalid(format!(
                "warning threshold {}% exceeds overload threshold {}%",
                self.warning_percent, self.overload_percent
            )));
        }
        Ok(())
    }

    pub fn with_coin_weight(mut self, pounds: f64) -> Self {
        self.coin_weight = pounds;
        self
    }

    pub fn with_capacity_per_strength(mut self, pounds: i32) -> Self {
        self.capacity_per_strength = pounds;
        self
    }

    pub fn with_thresholds(mut self, warning_percent: f64, overload_percent: f64) -> Self {
        self.warning_percent = warning_percent;
        self.overload_percent = overload_percent;
        self
    }

    pub fn with_max_coins(mut self, max: u32) -> Self {
        self.max_coins = max;
        self
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::new()
    }
}
