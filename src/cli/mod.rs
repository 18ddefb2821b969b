//! CLI command handlers for RackPlan.
//!
//! This module provides headless, scriptable access to the placement engine
//! over rack files stored as JSON.

pub mod clear;
pub mod common;
pub mod config;
pub mod fit;
pub mod hardware;
pub mod move_equipment;
pub mod new;
pub mod occupancy;
pub mod place;
pub mod remove;

// Re-export types used by main.rs and tests
pub use clear::ClearArgs;
pub use common::{CliError, CliResult, CommandContext, ExitCode};
pub use config::ConfigArgs;
pub use fit::FitArgs;
pub use hardware::HardwareArgs;
pub use move_equipment::MoveArgs;
pub use new::NewArgs;
pub use occupancy::OccupancyArgs;
pub use place::PlaceArgs;
pub use remove::RemoveArgs;
