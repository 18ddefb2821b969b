//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_NAME, DEFAULT_CAGE_NUT_TYPE};
use crate::models::{RackType, RackTypeRegistry};
use crate::validation::PlacementMode;

/// Placement defaults applied by the CLI when flags are not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Mode used unless `--strict` is passed
    #[serde(default)]
    pub default_mode: PlacementMode,
    /// Nut type written by automatic cage-nut installation
    #[serde(default = "default_cage_nut_type")]
    pub cage_nut_type: String,
    /// Install missing cage nuts automatically on placement
    #[serde(default)]
    pub auto_install_cage_nuts: bool,
}

/// Default cage nut type ("m6")
fn default_cage_nut_type() -> String {
    DEFAULT_CAGE_NUT_TYPE.to_string()
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            default_mode: PlacementMode::Default,
            cage_nut_type: default_cage_nut_type(),
            auto_install_cage_nuts: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "rackplan=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Default log level ("warn")
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Custom rack type entry (`[[rack_types]]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackTypeConfig {
    /// Type tag
    pub name: String,
    /// Number of rack units
    pub units: u32,
    /// Maximum load in kilograms
    pub max_weight: f64,
}

impl From<&RackTypeConfig> for RackType {
    fn from(entry: &RackTypeConfig) -> Self {
        Self::new(entry.name.clone(), entry.units, entry.max_weight)
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/RackPlan/config.toml`
/// - macOS: `~/Library/Application Support/RackPlan/config.toml`
/// - Windows: `%APPDATA%\RackPlan\config.toml`
///
/// # Validation
///
/// - `cage_nut_type` must be non-empty
/// - every custom rack type needs a name, at least one unit and a positive max weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Placement defaults
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Custom rack types, overriding built-ins with the same name
    #[serde(default)]
    pub rack_types: Vec<RackTypeConfig>,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/RackPlan/`
    /// - macOS: `~/Library/Application Support/RackPlan/`
    /// - Windows: `%APPDATA%\RackPlan\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from `path`, returning defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");

        // Write to temp file
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        // Atomic rename
        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.placement.cage_nut_type.trim().is_empty() {
            anyhow::bail!("placement.cage_nut_type cannot be empty");
        }

        for entry in &self.rack_types {
            RackType::from(entry)
                .validate()
                .with_context(|| format!("Invalid rack type '{}'", entry.name))?;
        }

        Ok(())
    }

    /// Rack type registry: built-ins plus the configured custom types.
    pub fn rack_type_registry(&self) -> Result<RackTypeRegistry> {
        let custom: Vec<RackType> = self.rack_types.iter().map(RackType::from).collect();
        RackTypeRegistry::with_custom(&custom)
    }
}
