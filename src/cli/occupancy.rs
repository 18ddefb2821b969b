//! Command printing a rack's occupancy.

use crate::cli::common::{load_rack, print_json, CliError, CliResult, CommandContext};
use crate::services::{occupancy, summarize, OccupancyMap, RackSummary};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Show what occupies each unit
#[derive(Debug, Clone, Args)]
pub struct OccupancyArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct OccupancyOutput {
    summary: RackSummary,
    units: OccupancyMap,
}

impl OccupancyArgs {
    /// Execute the occupancy command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let engine = ctx.engine()?;
        let summary = summarize(&rack, engine.rack_types())
            .map_err(|e| CliError::io(format!("{e:#}")))?;
        let units = occupancy(&rack);

        if self.json {
            return print_json(&OccupancyOutput { summary, units });
        }

        println!("{} ({}, {}U)", summary.name, summary.rack_type, summary.units);
        println!();
        // Top unit first, the way a rack reads
        for (unit, entry) in units.iter().rev() {
            let nuts = if rack.cage_nuts.get(unit).is_some_and(|r| r.is_complete()) {
                "N"
            } else {
                " "
            };
            let rail = if rack.rails.get(unit).is_some_and(|r| r.any_installed()) {
                "R"
            } else {
                " "
            };
            match entry {
                Some(entry) if entry.is_main_unit => println!(
                    "{unit:>3} {nuts}{rail} {} [{}-{}]",
                    entry.equipment.name, entry.span.start_unit, entry.span.end_unit
                ),
                Some(_) => println!("{unit:>3} {nuts}{rail}   |"),
                None => println!("{unit:>3} {nuts}{rail} ."),
            }
        }
        println!();
        println!(
            "Used {}/{}U ({:.0}%), weight {:.1}/{:.1} kg",
            summary.used_units,
            summary.units,
            summary.utilization * 100.0,
            summary.total_weight,
            summary.max_weight
        );

        Ok(())
    }
}
