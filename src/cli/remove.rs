//! Command removing equipment from a rack file.

use crate::cli::common::{finish, load_rack, CliResult, CommandContext};
use clap::Args;
use std::path::PathBuf;

/// Remove the equipment occupying a unit
#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Any unit of the equipment's span
    #[arg(short, long, value_name = "UNIT")]
    pub unit: u32,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl RemoveArgs {
    /// Execute the remove command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let result = ctx.engine()?.remove(&rack, self.unit);

        let name = rack
            .equipment_at(self.unit)
            .map_or_else(String::new, |placed| placed.equipment.name.clone());
        finish(
            &result,
            &self.rack,
            self.json,
            &format!("Removed '{name}'"),
        )
    }
}
