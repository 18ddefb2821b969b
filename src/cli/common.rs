//! Shared CLI plumbing: error type, exit codes, common argument groups and
//! result rendering.

use crate::config::Config;
use crate::models::{Equipment, EquipmentKind, MountingMethod, Rack};
use crate::services::{PlacementEngine, PlacementOptions, PlacementResult, RackService};
use crate::validation::PlacementMode;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Placement or validation failure
    ValidationError = 1,
    /// File, parse or configuration failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands, carrying its exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Process exit code to report
    pub exit_code: ExitCode,
    /// Message printed after "Error: "
    pub message: String,
}

impl CliError {
    /// Placement or validation failure (exit 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// I/O or parse failure (exit 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::IoError,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// State shared by every command: the loaded configuration and where it lives.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded (or default) configuration
    pub config: Config,
    /// File `config set` writes back to
    pub config_path: PathBuf,
}

impl CommandContext {
    /// Loads configuration from `config_path`, or the platform default.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => Config::config_file_path()
                .map_err(|e| CliError::io(format!("Failed to locate configuration: {e:#}")))?,
        };
        let config = Config::load_from(&config_path)
            .map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Engine using the configured rack types.
    pub fn engine(&self) -> CliResult<PlacementEngine> {
        let rack_types = self
            .config
            .rack_type_registry()
            .map_err(|e| CliError::io(format!("Invalid rack types in configuration: {e:#}")))?;
        Ok(PlacementEngine::new(rack_types))
    }

    /// Mode from `--mode`, falling back to the configured default.
    #[must_use]
    pub fn mode(&self, requested: Option<PlacementMode>) -> PlacementMode {
        requested.unwrap_or(self.config.placement.default_mode)
    }
}

/// Parses a kebab-case or lowercase tag through its serde representation.
pub fn parse_tag<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("invalid value '{value}'"))
}

/// Equipment descriptor, from a JSON file or inline flags.
#[derive(Args, Debug, Clone)]
pub struct EquipmentArgs {
    /// Equipment descriptor JSON file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["name", "height"])]
    pub equipment: Option<PathBuf>,

    /// Catalog id (defaults to the name)
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Height in rack units
    #[arg(long, value_name = "UNITS")]
    pub height: Option<u32>,

    /// Equipment kind (server, switch, shelf, rail, ...)
    #[arg(long, value_name = "KIND", value_parser = parse_tag::<EquipmentKind>)]
    pub kind: Option<EquipmentKind>,

    /// Mounting method (rails, cage-nuts, direct)
    #[arg(long, value_name = "METHOD", value_parser = parse_tag::<MountingMethod>)]
    pub mounting: Option<MountingMethod>,

    /// Weight in kilograms
    #[arg(long, value_name = "KG")]
    pub weight: Option<f64>,

    /// Equipment has redundant power supplies
    #[arg(long)]
    pub dual_power: bool,

    /// Equipment must rest on a shelf
    #[arg(long)]
    pub needs_shelf: bool,

    /// Rail type tag (rail kits only)
    #[arg(long, value_name = "TYPE")]
    pub rail_type: Option<String>,
}

impl EquipmentArgs {
    /// Builds the descriptor.
    pub fn resolve(&self) -> CliResult<Equipment> {
        if let Some(path) = &self.equipment {
            let content = std::fs::read_to_string(path).map_err(|e| {
                CliError::io(format!(
                    "Failed to read equipment file {}: {e}",
                    path.display()
                ))
            })?;
            let equipment: Equipment = serde_json::from_str(&content).map_err(|e| {
                CliError::io(format!(
                    "Failed to parse equipment file {}: {e}",
                    path.display()
                ))
            })?;
            equipment
                .validate()
                .map_err(|e| CliError::validation(format!("Invalid equipment: {e:#}")))?;
            return Ok(equipment);
        }

        let name = self.name.clone().ok_or_else(|| {
            CliError::validation("Either --equipment <FILE> or --name and --height is required")
        })?;
        let height = self
            .height
            .ok_or_else(|| CliError::validation("--height is required with --name"))?;
        let id = self.id.clone().unwrap_or_else(|| name.clone());

        let mut equipment = Equipment::new(id, name, height)
            .map_err(|e| CliError::validation(format!("Invalid equipment: {e:#}")))?;
        if let Some(kind) = self.kind {
            equipment = equipment.with_kind(kind);
        }
        if let Some(mounting) = self.mounting {
            equipment = equipment.with_mounting(mounting);
        }
        if let Some(weight) = self.weight {
            equipment = equipment.with_weight(weight);
        }
        if self.dual_power {
            equipment = equipment.with_dual_power();
        }
        if self.needs_shelf {
            equipment = equipment.with_shelf_requirement();
        }
        if let Some(rail_type) = &self.rail_type {
            equipment = equipment.with_rail_type(rail_type.clone());
        }
        equipment
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid equipment: {e:#}")))?;

        Ok(equipment)
    }
}

/// Mode and policy flags for placement and move.
#[derive(Args, Debug, Clone)]
pub struct PlacementFlags {
    /// Operating mode (default or strict); falls back to the configured mode
    #[arg(long, value_name = "MODE", value_parser = parse_tag::<PlacementMode>)]
    pub mode: Option<PlacementMode>,

    /// Install missing cage nuts on the spanned units
    #[arg(long)]
    pub auto_install_cage_nuts: bool,

    /// Nut type for auto-install (falls back to the configured type)
    #[arg(long, value_name = "TYPE")]
    pub nut_type: Option<String>,

    /// Commit despite warnings
    #[arg(long)]
    pub skip_warnings: bool,

    /// Commit despite warnings and non-structural errors
    #[arg(long)]
    pub force: bool,

    /// Validate only; never writes the rack file
    #[arg(long)]
    pub validate_only: bool,
}

impl PlacementFlags {
    /// Options merged with configured defaults.
    #[must_use]
    pub fn options(&self, config: &Config) -> PlacementOptions {
        PlacementOptions {
            auto_install_cage_nuts: self.auto_install_cage_nuts
                || config.placement.auto_install_cage_nuts,
            skip_warnings: self.skip_warnings,
            force_override: self.force,
            validate_only: self.validate_only,
            cage_nut_type: Some(
                self.nut_type
                    .clone()
                    .unwrap_or_else(|| config.placement.cage_nut_type.clone()),
            ),
        }
    }
}

/// Loads a rack file, mapping failures to exit code 2.
pub fn load_rack(path: &Path) -> CliResult<Rack> {
    RackService::load(path).map_err(|e| CliError::io(format!("{e:#}")))
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Reports a placement result, writes the updated rack back on success and
/// maps failure to exit code 1.
pub fn finish(result: &PlacementResult, rack_path: &Path, json: bool, done: &str) -> CliResult<()> {
    if let Some(rack) = &result.updated_rack {
        RackService::save(rack, rack_path).map_err(|e| CliError::io(format!("{e:#}")))?;
    }

    if json {
        print_json(result)?;
    } else if result.success {
        println!("✓ {done}");
        if !result.validation.warnings.is_empty() {
            print!("{}", result.validation.format_message());
        }
    } else {
        print!("{}", result.validation.format_message());
    }

    if result.success {
        Ok(())
    } else {
        Err(CliError::validation("Operation rejected"))
    }
}
