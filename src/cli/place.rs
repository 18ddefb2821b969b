//! Command placing equipment into a rack file.

use crate::cli::common::{finish, load_rack, CliResult, CommandContext, EquipmentArgs, PlacementFlags};
use clap::Args;
use std::path::PathBuf;

/// Place equipment at a unit
#[derive(Debug, Clone, Args)]
pub struct PlaceArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Main (lowest) unit of the placement
    #[arg(short, long, value_name = "UNIT")]
    pub unit: u32,

    /// Equipment to check
    #[command(flatten)]
    pub equipment: EquipmentArgs,

    /// Mode and policy flags
    #[command(flatten)]
    pub flags: PlacementFlags,

    /// Output the placement result as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlaceArgs {
    /// Execute the place command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let equipment = self.equipment.resolve()?;
        let engine = ctx.engine()?;
        let options = self.flags.options(&ctx.config);
        let mode = ctx.mode(self.flags.mode);

        let result = engine.place(&rack, self.unit, &equipment, &options, mode);

        let done = match (options.validate_only, result.position) {
            (true, _) => format!("'{}' fits at unit {}", equipment.name, self.unit),
            (false, Some(position)) => format!(
                "Placed '{}' at units {}-{}",
                equipment.name, position.start_unit, position.end_unit
            ),
            (false, None) => format!("Placed '{}'", equipment.name),
        };
        finish(&result, &self.rack, self.json, &done)
    }
}
