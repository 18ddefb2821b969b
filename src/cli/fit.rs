//! Command listing where equipment would fit.

use crate::cli::common::{
    load_rack, parse_tag, print_json, CliResult, CommandContext, EquipmentArgs,
};
use crate::validation::PlacementMode;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List start units where equipment validates without errors
#[derive(Debug, Clone, Args)]
pub struct FitArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Equipment to check
    #[command(flatten)]
    pub equipment: EquipmentArgs,

    /// Operating mode (default or strict); falls back to the configured mode
    #[arg(long, value_name = "MODE", value_parser = parse_tag::<PlacementMode>)]
    pub mode: Option<PlacementMode>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FitOutput {
    equipment_id: String,
    mode: PlacementMode,
    positions: Vec<u32>,
}

impl FitArgs {
    /// Execute the fit command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let equipment = self.equipment.resolve()?;
        let mode = ctx.mode(self.mode);
        let positions = ctx.engine()?.available_positions(&rack, &equipment, mode);

        if self.json {
            return print_json(&FitOutput {
                equipment_id: equipment.id,
                mode,
                positions,
            });
        }

        if positions.is_empty() {
            println!("'{}' does not fit anywhere in '{}'", equipment.name, rack.name);
        } else {
            let starts: Vec<String> = positions.iter().map(u32::to_string).collect();
            println!(
                "'{}' ({}U) fits at start units: {}",
                equipment.name,
                equipment.height,
                starts.join(", ")
            );
        }

        Ok(())
    }
}
