//! Rack file I/O service.
//!
//! Racks are stored as pretty-printed JSON, the same plain-data shape the
//! engine reads and returns.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::models::Rack;

/// Service for loading and saving rack files.
pub struct RackService;

impl RackService {
    /// Loads a rack from a JSON file and checks its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid rack, or
    /// breaks the occupancy invariants (overlaps, broken spans, units out of range).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use rackplan::services::RackService;
    ///
    /// let rack = RackService::load(Path::new("lab.json"))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(path: &Path) -> Result<Rack> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rack file: {}", path.display()))?;

        let rack: Rack = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse rack file: {}", path.display()))?;

        rack.check_invariants()
            .with_context(|| format!("Rack file is inconsistent: {}", path.display()))?;

        Ok(rack)
    }

    /// Saves a rack to a JSON file.
    ///
    /// This performs an atomic write using a temp file + rename pattern to ensure
    /// the file is never left in a corrupted state.
    ///
    /// # Errors
    ///
    /// Returns an error on serialization, I/O or rename failure.
    pub fn save(rack: &Rack, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(rack).context("Failed to serialize rack")?;

        let temp_path = path.with_extension("json.tmp");

        // Write to temp file
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        // Atomic rename
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

        Ok(())
    }
}
