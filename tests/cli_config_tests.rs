//! End-to-end tests for `rackplan config` commands and config-driven behavior.

use rackplan::config::Config;
use rackplan::services::RackService;
use rackplan::validation::PlacementMode;
use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_rackplan(&["config", "show"], temp_dir.path());

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RackPlan Configuration"));
    assert!(stdout.contains("42u-standard"));
}

#[test]
fn test_config_show_json_format() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_rackplan(&["config", "show", "--json"], temp_dir.path());

    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["placement"]["default_mode"], "default");
    assert_eq!(json["placement"]["cage_nut_type"], "m6");
    assert_eq!(json["logging"]["level"], "warn");
    assert_eq!(json["known_rack_types"].as_array().unwrap().len(), 4);
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_persists() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_rackplan(
        &[
            "config",
            "set",
            "--default-mode",
            "strict",
            "--cage-nut-type",
            "m5",
            "--auto-install-cage-nuts",
            "true",
        ],
        temp_dir.path(),
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(config.placement.default_mode, PlacementMode::Strict);
    assert_eq!(config.placement.cage_nut_type, "m5");
    assert!(config.placement.auto_install_cage_nuts);
}

#[test]
fn test_config_set_requires_an_option() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_rackplan(&["config", "set"], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_rejects_empty_nut_type() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_rackplan(&["config", "set", "--cage-nut-type", " "], temp_dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_malformed_config_exits_two() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("config.toml"), "[placement\n").unwrap();

    let output = run_rackplan(&["config", "show"], temp_dir.path());
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// Config-driven behavior
// ============================================================================

#[test]
fn test_custom_rack_type_from_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[[rack_types]]\nname = \"lab-8u\"\nunits = 8\nmax_weight = 80.0\n",
    )
    .unwrap();
    let rack_path = temp_dir.path().join("lab.json");

    let output = run_rackplan(
        &[
            "new",
            rack_path.to_str().unwrap(),
            "--name",
            "Bench",
            "--type",
            "lab-8u",
        ],
        temp_dir.path(),
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(RackService::load(&rack_path).unwrap().units, 8);

    // Weight limit comes from the custom type
    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "1",
            "--name",
            "UPS",
            "--kind",
            "ups",
            "--height",
            "2",
            "--weight",
            "90",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("WEIGHT_EXCEEDED"));
}

#[test]
fn test_configured_strict_mode_and_auto_install() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[placement]\ndefault_mode = \"strict\"\nauto_install_cage_nuts = true\ncage_nut_type = \"m5\"\n",
    )
    .unwrap();
    let (rack_path, _rack_dir) = create_temp_rack_file(&rack_42u());

    // Strict mode from config: cage nuts must exist before placement
    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "4",
            "--name",
            "Switch",
            "--height",
            "1",
            "--mounting",
            "cage-nuts",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    // Default mode on the command line; configured auto-install applies
    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "4",
            "--name",
            "Switch",
            "--height",
            "1",
            "--mounting",
            "cage-nuts",
            "--mode",
            "default",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
    let rack = RackService::load(&rack_path).unwrap();
    assert_eq!(rack.cage_nuts[&4].front_left.top.as_deref(), Some("m5"));
}
