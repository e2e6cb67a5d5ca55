//! Analytics configuration
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. Override in the config dir (~/.config/tally/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default value.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::analytics::forecast::DEFAULT_WINDOW;
use crate::analytics::patterns::{DEFAULT_IRREGULAR_MULTIPLIER, DEFAULT_TOP_CATEGORIES};
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Tunables for the analytics engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Months averaged by the forecaster
    pub forecast_window: NonZeroUsize,
    /// Reserved recurrence matching tolerance (no effect yet)
    pub recurrence_tolerance: Decimal,
    /// Length of the top-categories list
    pub top_categories: usize,
    /// Irregular expense threshold as a multiple of the mean expense
    pub irregular_multiplier: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            forecast_window: DEFAULT_WINDOW,
            recurrence_tolerance: Decimal::ZERO,
            top_categories: DEFAULT_TOP_CATEGORIES,
            irregular_multiplier: DEFAULT_IRREGULAR_MULTIPLIER,
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    forecast_window: Option<NonZeroUsize>,
    recurrence_tolerance: Option<Decimal>,
    top_categories: Option<usize>,
    irregular_multiplier: Option<Decimal>,
}

impl AnalyticsConfig {
    /// Load configuration, preferring `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => read_config(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => read_config(&default_path)?,
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Parse a TOML document over the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default override location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Loading config from {}", path.display());
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))?;

    let defaults = AnalyticsConfig::default();
    let config = AnalyticsConfig {
        forecast_window: raw.forecast_window.unwrap_or(defaults.forecast_window),
        recurrence_tolerance: raw
            .recurrence_tolerance
            .unwrap_or(defaults.recurrence_tolerance),
        top_categories: raw.top_categories.unwrap_or(defaults.top_categories),
        irregular_multiplier: raw
            .irregular_multiplier
            .unwrap_or(defaults.irregular_multiplier),
    };

    if config.recurrence_tolerance.is_sign_negative() {
        return Err(Error::Config(
            "recurrence_tolerance must not be negative".to_string(),
        ));
    }
    if config.irregular_multiplier <= Decimal::ZERO {
        return Err(Error::Config(
            "irregular_multiplier must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}
