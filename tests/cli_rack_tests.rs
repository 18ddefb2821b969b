//! End-to-end tests for the rack commands (`new`, `place`, `remove`, `move`,
//! `clear`, `occupancy`, `fit`).

use rackplan::services::RackService;
use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ============================================================================
// New Command Tests
// ============================================================================

#[test]
fn test_new_creates_empty_rack() {
    let temp_dir = TempDir::new().unwrap();
    let rack_path = temp_dir.path().join("lab.json");

    let output = run_rackplan(
        &[
            "new",
            rack_path.to_str().unwrap(),
            "--name",
            "Lab A",
            "--type",
            "24u-standard",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let rack = RackService::load(&rack_path).unwrap();
    assert_eq!(rack.name, "Lab A");
    assert_eq!(rack.units, 24);
    assert!(rack.equipment.is_empty());
}

#[test]
fn test_new_refuses_to_overwrite() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());

    let output = run_rackplan(
        &["new", rack_path.to_str().unwrap(), "--name", "Again"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));

    let output = run_rackplan(
        &["new", rack_path.to_str().unwrap(), "--name", "Again", "--force"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(RackService::load(&rack_path).unwrap().name, "Again");
}

#[test]
fn test_new_unknown_rack_type() {
    let temp_dir = TempDir::new().unwrap();
    let rack_path = temp_dir.path().join("lab.json");

    let output = run_rackplan(
        &[
            "new",
            rack_path.to_str().unwrap(),
            "--name",
            "Lab",
            "--type",
            "99u-mystery",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown rack type"));
    assert!(!rack_path.exists());
}

// ============================================================================
// Place Command Tests
// ============================================================================

#[test]
fn test_place_writes_rack() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "3",
            "--name",
            "Web Server",
            "--height",
            "2",
            "--weight",
            "18.5",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Placed 'Web Server' at units 3-4"));

    let rack = RackService::load(&rack_path).unwrap();
    assert!(rack.equipment[&3].is_main_unit);
    assert!(!rack.equipment[&4].is_main_unit);
    assert_eq!(rack.labels.len(), 1);
}

#[test]
fn test_place_json_output() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "10",
            "--name",
            "Switch",
            "--height",
            "1",
            "--mounting",
            "cage-nuts",
            "--auto-install-cage-nuts",
            "--nut-type",
            "10-32",
            "--json",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["position"]["startUnit"], 10);
    assert_eq!(json["validation"]["isValid"], true);
    let cage_nut_adds = json["appliedChanges"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|change| change["type"] == "cagenut" && change["action"] == "add")
        .count();
    assert_eq!(cage_nut_adds, 1);
    assert_eq!(
        json["updatedRack"]["cageNuts"]["10"]["frontLeft"]["top"],
        "10-32"
    );
}

#[test]
fn test_place_conflict_exits_one_and_keeps_file() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &rack_42u(), 1, &server("a", 2));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);
    let before = fs::read_to_string(&rack_path).unwrap();

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "2",
            "--name",
            "Overlap",
            "--height",
            "1",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("UNIT_OCCUPIED"), "stdout: {stdout}");
    assert_eq!(fs::read_to_string(&rack_path).unwrap(), before);
}

#[test]
fn test_place_validate_only_does_not_write() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());
    let before = fs::read_to_string(&rack_path).unwrap();

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "5",
            "--name",
            "Server",
            "--height",
            "2",
            "--validate-only",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(fs::read_to_string(&rack_path).unwrap(), before);
}

#[test]
fn test_place_strict_mode_from_flag() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "5",
            "--name",
            "Storage",
            "--height",
            "2",
            "--mounting",
            "rails",
            "--mode",
            "strict",
            "--json",
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["validation"]["errors"][0]["code"], "RAIL_REQUIRED");
    assert!(json.get("updatedRack").is_none());
}

#[test]
fn test_place_from_equipment_file() {
    let (rack_path, temp_dir) = create_temp_rack_file(&rack_42u());
    let equipment_path = temp_dir.path().join("switch.json");
    fs::write(
        &equipment_path,
        serde_json::to_string(&cage_nut_switch()).unwrap(),
    )
    .unwrap();

    let output = run_rackplan(
        &[
            "place",
            rack_path.to_str().unwrap(),
            "--unit",
            "7",
            "--equipment",
            equipment_path.to_str().unwrap(),
        ],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let rack = RackService::load(&rack_path).unwrap();
    assert_eq!(rack.equipment[&7].equipment.id, "switch-1u");
}

#[test]
fn test_place_missing_rack_file_exits_two() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");

    let output = run_rackplan(
        &[
            "place",
            missing.to_str().unwrap(),
            "--unit",
            "1",
            "--name",
            "Server",
            "--height",
            "1",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// Remove / Move / Clear Command Tests
// ============================================================================

#[test]
fn test_remove_and_missing_unit() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &rack_42u(), 4, &server("a", 3));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(
        &["remove", rack_path.to_str().unwrap(), "--unit", "5"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(RackService::load(&rack_path).unwrap().equipment.is_empty());

    let output = run_rackplan(
        &["remove", rack_path.to_str().unwrap(), "--unit", "5", "--json"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["validation"]["errors"][0]["code"], "EQUIPMENT_NOT_FOUND");
}

#[test]
fn test_move_command() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &rack_42u(), 1, &server("a", 2));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(
        &[
            "move",
            rack_path.to_str().unwrap(),
            "--from",
            "1",
            "--to",
            "30",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let moved = RackService::load(&rack_path).unwrap();
    let occupied: Vec<u32> = moved.equipment.keys().copied().collect();
    assert_eq!(occupied, vec![30, 31]);
    assert_eq!(moved.labels, rack.labels);
}

#[test]
fn test_clear_command() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &rack_42u(), 1, &server("a", 2));
    let rack = place_ok(&engine, &rack, 10, &rail_kit(1));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(&["clear", rack_path.to_str().unwrap()], temp_dir.path());
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let cleared = RackService::load(&rack_path).unwrap();
    assert!(cleared.equipment.is_empty());
    assert!(cleared.rails.is_empty());
    assert!(cleared.part_inventory.is_empty());
}

// ============================================================================
// Query Command Tests
// ============================================================================

#[test]
fn test_occupancy_json() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &empty_rack("12u-wall"), 2, &server("a", 2));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(
        &["occupancy", rack_path.to_str().unwrap(), "--json"],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let json = stdout_json(&output);
    assert_eq!(json["summary"]["usedUnits"], 2);
    assert_eq!(json["summary"]["freeUnits"], 10);
    assert!(json["units"]["1"].is_null());
    assert_eq!(json["units"]["2"]["isMainUnit"], true);
    assert_eq!(json["units"]["3"]["isMainUnit"], false);
    assert_eq!(json["units"].as_object().unwrap().len(), 12);
}

#[test]
fn test_occupancy_human_readable() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &empty_rack("12u-wall"), 2, &server("a", 2));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(&["occupancy", rack_path.to_str().unwrap()], temp_dir.path());
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Server a [2-3]"));
    assert!(stdout.contains("Used 2/12U"));
}

#[test]
fn test_fit_lists_free_starts() {
    let engine = rackplan::services::PlacementEngine::default();
    let rack = place_ok(&engine, &empty_rack("12u-wall"), 3, &server("a", 2));
    let (rack_path, temp_dir) = create_temp_rack_file(&rack);

    let output = run_rackplan(
        &[
            "fit",
            rack_path.to_str().unwrap(),
            "--name",
            "Probe",
            "--height",
            "2",
            "--json",
        ],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let json = stdout_json(&output);
    assert_eq!(
        json["positions"],
        serde_json::json!([1, 5, 6, 7, 8, 9, 10, 11])
    );
    assert_eq!(json["mode"], "default");
}
