//! Shared test fixtures for engine and E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use rackplan::models::{Equipment, EquipmentKind, MountingMethod, Rack, RackTypeRegistry};
use rackplan::services::{PlacementEngine, PlacementOptions, RackService};
use rackplan::validation::PlacementMode;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Empty rack of a built-in type.
pub fn empty_rack(rack_type: &str) -> Rack {
    let registry = RackTypeRegistry::builtin();
    Rack::new("Test Rack", registry.resolve(rack_type).unwrap())
}

/// Empty 42U standard rack.
pub fn rack_42u() -> Rack {
    empty_rack("42u-standard")
}

/// Direct-mounted server of the given height.
pub fn server(id: &str, height: u32) -> Equipment {
    Equipment::new(id, format!("Server {id}"), height)
        .unwrap()
        .with_weight(10.0)
}

/// 1U switch mounted with cage nuts.
pub fn cage_nut_switch() -> Equipment {
    Equipment::new("switch-1u", "Access Switch", 1)
        .unwrap()
        .with_kind(EquipmentKind::Switch)
        .with_mounting(MountingMethod::CageNuts)
        .with_weight(4.0)
}

/// Rail-mounted storage array.
pub fn rail_storage(height: u32) -> Equipment {
    Equipment::new("storage", "Storage Array", height)
        .unwrap()
        .with_kind(EquipmentKind::Storage)
        .with_mounting(MountingMethod::Rails)
        .with_weight(30.0)
}

/// Rail kit of the given height.
pub fn rail_kit(height: u32) -> Equipment {
    Equipment::new("rail-kit", "Slide Rail Kit", height)
        .unwrap()
        .with_kind(EquipmentKind::Rail)
        .with_rail_type("slide")
}

/// 1U shelf.
pub fn shelf() -> Equipment {
    Equipment::new("shelf-1u", "Cantilever Shelf", 1)
        .unwrap()
        .with_kind(EquipmentKind::Shelf)
        .with_mounting(MountingMethod::CageNuts)
        .with_weight(2.0)
}

/// Device that must sit on a shelf.
pub fn shelf_device() -> Equipment {
    Equipment::new("modem", "Desktop Modem", 1)
        .unwrap()
        .with_kind(EquipmentKind::Other)
        .with_shelf_requirement()
        .with_weight(1.0)
}

/// Places and returns the updated rack, panicking on failure.
pub fn place_ok(engine: &PlacementEngine, rack: &Rack, start_unit: u32, equipment: &Equipment) -> Rack {
    let result = engine.place(
        rack,
        start_unit,
        equipment,
        &PlacementOptions::new(),
        PlacementMode::Default,
    );
    assert!(
        result.success,
        "placement of {} at {start_unit} failed: {}",
        equipment.id,
        result.validation.format_message()
    );
    result.updated_rack.unwrap()
}

/// Canonical serialized form, for byte-equality checks.
pub fn snapshot(rack: &Rack) -> String {
    serde_json::to_string(rack).unwrap()
}

/// Writes `rack` into a fresh temp dir, returning its path and the dir guard.
pub fn create_temp_rack_file(rack: &Rack) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let rack_path = temp_dir.path().join("rack.json");
    RackService::save(rack, &rack_path).expect("Failed to write rack file");
    (rack_path, temp_dir)
}

/// Path to the rackplan binary (set by cargo at compile time)
pub fn rackplan_bin() -> &'static str {
    env!("CARGO_BIN_EXE_rackplan")
}

/// Runs the binary with an isolated config file inside `config_dir`.
pub fn run_rackplan(args: &[&str], config_dir: &Path) -> Output {
    let config_path = config_dir.join("config.toml");
    Command::new(rackplan_bin())
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Parses stdout as JSON.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}
