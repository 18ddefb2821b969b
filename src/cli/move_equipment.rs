//! Command moving equipment within a rack file.

use crate::cli::common::{finish, load_rack, CliResult, CommandContext, PlacementFlags};
use clap::Args;
use std::path::PathBuf;

/// Move equipment to a new main unit
#[derive(Debug, Clone, Args)]
pub struct MoveArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Any unit of the equipment's current span
    #[arg(long, value_name = "UNIT")]
    pub from: u32,

    /// New main (lowest) unit
    #[arg(long, value_name = "UNIT")]
    pub to: u32,

    /// Mode and policy flags
    #[command(flatten)]
    pub flags: PlacementFlags,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl MoveArgs {
    /// Execute the move command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let engine = ctx.engine()?;
        let options = self.flags.options(&ctx.config);
        let mode = ctx.mode(self.flags.mode);

        let result = engine.move_equipment(&rack, self.from, self.to, &options, mode);

        let done = result.position.map_or_else(
            || format!("Moved equipment from unit {}", self.from),
            |position| {
                format!(
                    "Moved equipment from unit {} to units {}-{}",
                    self.from, position.start_unit, position.end_unit
                )
            },
        );
        finish(&result, &self.rack, self.json, &done)
    }
}
