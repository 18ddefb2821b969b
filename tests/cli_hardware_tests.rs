//! End-to-end tests for `rackplan hardware` commands.

use rackplan::services::{PlacementEngine, RackService};

mod fixtures;
use fixtures::*;

#[test]
fn test_install_and_remove_cage_nuts() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());
    let rack_arg = rack_path.to_str().unwrap();

    let output = run_rackplan(
        &["hardware", "install-nuts", rack_arg, "--unit", "6", "--nut-type", "m5"],
        temp_dir.path(),
    );
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let rack = RackService::load(&rack_path).unwrap();
    assert!(rack.cage_nuts[&6].is_complete());

    let output = run_rackplan(
        &["hardware", "remove-nuts", rack_arg, "--unit", "6"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(RackService::load(&rack_path).unwrap().cage_nuts.is_empty());

    let output = run_rackplan(
        &["hardware", "remove-nuts", rack_arg, "--unit", "6", "--json"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout_json(&output)["validation"]["errors"][0]["code"],
        "CAGE_NUT_NOT_FOUND"
    );
}

#[test]
fn test_install_nuts_out_of_range() {
    let (rack_path, temp_dir) = create_temp_rack_file(&empty_rack("12u-wall"));

    let output = run_rackplan(
        &[
            "hardware",
            "install-nuts",
            rack_path.to_str().unwrap(),
            "--unit",
            "13",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("EXCEED_RACK_CAPACITY"));
}

#[test]
fn test_remove_rails_removes_kit() {
    let engine = PlacementEngine::default();
    let rack = place_ok(&engine, &rack_42u(), 15, &rail_kit(3));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(
        &[
            "hardware",
            "remove-rails",
            rack_path.to_str().unwrap(),
            "--unit",
            "16",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("units 15-17"));

    let cleared = RackService::load(&rack_path).unwrap();
    assert!(cleared.rails.is_empty());
    assert!(cleared.part_inventory.is_empty());
}
