//! Command clearing a rack file.

use crate::cli::common::{finish, load_rack, CliResult, CommandContext};
use clap::Args;
use std::path::PathBuf;

/// Remove all equipment, cage nuts and rails
#[derive(Debug, Clone, Args)]
pub struct ClearArgs {
    /// Rack file
    #[arg(value_name = "RACK")]
    pub rack: PathBuf,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ClearArgs {
    /// Execute the clear command
    pub fn execute(&self, ctx: &CommandContext) -> CliResult<()> {
        let rack = load_rack(&self.rack)?;
        let result = ctx.engine()?.clear_all(&rack);
        let done = format!(
            "Cleared rack '{}' ({} records removed)",
            rack.name,
            result.applied_changes.len()
        );
        finish(&result, &self.rack, self.json, &done)
    }
}
