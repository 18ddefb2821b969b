//! Command creating an empty rack file.

use crate::cli::common::{print_json, CliError, CliResult, CommandContext};
use crate::constants::DEFAULT_RACK_TYPE;
use crate::models::Rack;
use crate::services::RackService;
use clap::Args;
use std::path::PathBuf;

/// Create an empty rack file
#[derive(Debug, Clone, Args)]
pub struct NewArgs {
    /// Rack file to create
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Rack display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Rack type tag (built-in or from the configuration)
    #[arg(long = "type", value_name = "TYPE", default_value = DEFAULT_RACK_TYPE)]
    pub rack_type: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Output the new rack as JSON
    #[arg(long)]
    pub json: bool,
}

impl NewArgs {
    /// Execute the new command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        if self.rack.exists() && !self.force {
            return Err(CliError::validation(format!(
                "Rack file already exists: {} (use --force to overwrite)",
                self.rack.display()
            )));
        }

        let engine = ctx.engine()?;
        let rack_type = engine
            .rack_types()
            .resolve(&self.rack_type)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        let rack = Rack::new(&self.name, rack_type);

        RackService::save(&rack, &self.rack).map_err(|e| CliError::io(format!("{e:#}")))?;

        if self.json {
            print_json(&rack)?;
        } else {
            println!(
                "✓ Created rack '{}' ({}, {}U, max {} kg) at {}",
                rack.name,
                rack_type.name,
                rack_type.units,
                rack_type.max_weight,
                self.rack.display()
            );
        }

        Ok(())
    }
}
