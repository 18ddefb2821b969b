//! Hardware staging commands.

use crate::cli::common::{finish, load_rack, CliResult, CommandContext};
use crate::services::{install_cage_nuts, remove_cage_nuts, remove_rails};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Cage nut and rail staging commands
#[derive(Args, Debug)]
pub struct HardwareArgs {
    #[command(subcommand)]
    command: HardwareCommand,
}

#[derive(Subcommand, Debug)]
enum HardwareCommand {
    /// Install a complete cage-nut set at a unit
    InstallNuts(InstallNutsArgs),
    /// Remove the cage nuts at a unit
    RemoveNuts(UnitArgs),
    /// Remove the rail kit installed at a unit
    RemoveRails(UnitArgs),
}

/// Install a complete cage-nut set at a unit
#[derive(Args, Debug)]
pub struct InstallNutsArgs {
    #[command(flatten)]
    target: UnitArgs,

    /// Nut type (falls back to the configured type)
    #[arg(long, value_name = "TYPE")]
    nut_type: Option<String>,
}

/// Rack file and unit
#[derive(Args, Debug)]
pub struct UnitArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    rack: PathBuf,

    /// Unit number
    #[arg(short, long, value_name = "UNIT")]
    unit: u32,

    /// Output the result as JSON
    #[arg(long)]
    json: bool,
}

impl HardwareArgs {
    /// Execute hardware subcommand
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        match &self.command {
            HardwareCommand::InstallNuts(args) => {
                let target = &args.target;
                let rack = load_rack(&target.rack)?;
                let nut_type = args
                    .nut_type
                    .as_deref()
                    .unwrap_or(&ctx.config.placement.cage_nut_type);
                let result = install_cage_nuts(&rack, target.unit, nut_type);
                finish(
                    &result,
                    &target.rack,
                    target.json,
                    &format!("Installed {nut_type} cage nuts at unit {}", target.unit),
                )
            }
            HardwareCommand::RemoveNuts(target) => {
                let rack = load_rack(&target.rack)?;
                let result = remove_cage_nuts(&rack, target.unit);
                finish(
                    &result,
                    &target.rack,
                    target.json,
                    &format!("Removed cage nuts at unit {}", target.unit),
                )
            }
            HardwareCommand::RemoveRails(target) => {
                let rack = load_rack(&target.rack)?;
                let result = remove_rails(&rack, target.unit);
                let done = result.position.map_or_else(
                    || format!("Removed rails at unit {}", target.unit),
                    |span| {
                        format!(
                            "Removed rail kit at units {}-{}",
                            span.start_unit, span.end_unit
                        )
                    },
                );
                finish(&result, &target.rack, target.json, &done)
            }
        }
    }
}
