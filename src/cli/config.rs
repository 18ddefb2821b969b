//! Configuration management CLI commands.

use crate::cli::common::{parse_tag, print_json, CliError, CliResult, CommandContext};
use crate::config::Config;
use crate::validation::PlacementMode;
use clap::{Args, Subcommand};
use serde::Serialize;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Default operating mode (default or strict)
    #[arg(long, value_name = "MODE", value_parser = parse_tag::<PlacementMode>)]
    default_mode: Option<PlacementMode>,

    /// Nut type used when installing cage nuts
    #[arg(long, value_name = "TYPE")]
    cage_nut_type: Option<String>,

    /// Install missing cage nuts automatically (true or false)
    #[arg(long, value_name = "BOOL")]
    auto_install_cage_nuts: Option<bool>,

    /// Default log filter (e.g. warn, info, rackplan=debug)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput<'a> {
    path: String,
    #[serde(flatten)]
    config: &'a Config,
    known_rack_types: Vec<String>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(ctx),
            ConfigCommand::Set(args) => args.execute(ctx),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let known_rack_types: Vec<String> = ctx
            .engine()?
            .rack_types()
            .names()
            .map(str::to_string)
            .collect();

        if self.json {
            return print_json(&ConfigOutput {
                path: ctx.config_path.to_string_lossy().to_string(),
                config: &ctx.config,
                known_rack_types,
            });
        }

        output_human_readable(ctx, &known_rack_types);
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        // At least one argument must be provided
        if self.default_mode.is_none()
            && self.cage_nut_type.is_none()
            && self.auto_install_cage_nuts.is_none()
            && self.log_level.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --default-mode, --cage-nut-type, --auto-install-cage-nuts, or --log-level",
            ));
        }

        let mut config = ctx.config.clone();

        if let Some(mode) = self.default_mode {
            config.placement.default_mode = mode;
        }
        if let Some(nut_type) = &self.cage_nut_type {
            config.placement.cage_nut_type.clone_from(nut_type);
        }
        if let Some(auto_install) = self.auto_install_cage_nuts {
            config.placement.auto_install_cage_nuts = auto_install;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e:#}")))?;

        config
            .save_to(&ctx.config_path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(ctx: &CommandContext, known_rack_types: &[String]) {
    let config = &ctx.config;

    println!("RackPlan Configuration");
    println!("======================");
    println!("File: {}", ctx.config_path.display());
    println!();

    println!("Placement:");
    println!("  Default Mode:           {}", config.placement.default_mode);
    println!("  Cage Nut Type:          {}", config.placement.cage_nut_type);
    println!(
        "  Auto-install Cage Nuts: {}",
        config.placement.auto_install_cage_nuts
    );
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!();

    println!("Rack Types:");
    for name in known_rack_types {
        println!("  {name}");
    }
    println!();
}
