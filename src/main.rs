//! RackPlan - rack equipment placement planner
//!
//! Command-line front end for the placement engine: lays out equipment in
//! rack files, stages cage nuts and rails, and reports occupancy.

use clap::{Parser, Subcommand};
use rackplan::cli::{
    ClearArgs, CliError, CommandContext, ConfigArgs, ExitCode, FitArgs, HardwareArgs, MoveArgs,
    NewArgs, OccupancyArgs, PlaceArgs, RemoveArgs,
};
use rackplan::constants::APP_BINARY_NAME;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RackPlan - validate and execute rack equipment placements
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty rack file
    New(NewArgs),
    /// Place equipment at a unit
    Place(PlaceArgs),
    /// Remove the equipment occupying a unit
    Remove(RemoveArgs),
    /// Move equipment to a new main unit
    Move(MoveArgs),
    /// Remove all equipment, cage nuts and rails
    Clear(ClearArgs),
    /// Show what occupies each unit
    Occupancy(OccupancyArgs),
    /// List start units where equipment fits
    Fit(FitArgs),
    /// Stage cage nuts and rails
    Hardware(HardwareArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `--verbose` and the config.
fn init_tracing(verbose: bool, configured_level: &str) {
    let filter = if verbose { "debug" } else { configured_level };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = CommandContext::load(cli.config)?;
    init_tracing(cli.verbose, &ctx.config.logging.level);

    match &cli.command {
        Command::New(args) => args.execute(&ctx),
        Command::Place(args) => args.execute(&ctx),
        Command::Remove(args) => args.execute(&ctx),
        Command::Move(args) => args.execute(&ctx),
        Command::Clear(args) => args.execute(&ctx),
        Command::Occupancy(args) => args.execute(&ctx),
        Command::Fit(args) => args.execute(&ctx),
        Command::Hardware(args) => args.execute(&ctx),
        Command::Config(args) => args.execute(&ctx),
    }
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code
        }
    };

    std::process::exit(code.code());
}
