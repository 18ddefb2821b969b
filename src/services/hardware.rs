//! Hardware staging: cage nuts and rail kits independent of equipment.
//!
//! These operations follow the same snapshot-in/snapshot-out contract as
//! placement and report through [`PlacementResult`].

use tracing::info;

use crate::models::{CageNutRecord, Position, Rack, RailRecord};
use crate::services::changes::{Change, ChangeTarget, ChangeType, ChangeValue};
use crate::services::placement::PlacementResult;
use crate::validation::{
    ErrorCode, ValidationError, ValidationReport, ValidationWarning, WarningCode,
};

/// Range error for a single unit outside `1..=N`, if any.
fn unit_range_error(rack: &Rack, unit: u32) -> Option<ValidationError> {
    if unit < 1 {
        return Some(ValidationError::new(
            ErrorCode::InvalidStartUnit,
            format!("Unit {unit} is invalid: units start at 1"),
            vec![unit],
        ));
    }
    if unit > rack.units {
        return Some(
            ValidationError::new(
                ErrorCode::ExceedRackCapacity,
                format!("Unit {unit} is above the top unit ({})", rack.units),
                vec![unit],
            )
            .with_suggestion(format!("Choose a unit between 1 and {}", rack.units)),
        );
    }
    None
}

/// Writes a complete cage-nut set of `nut_type` at `unit`.
///
/// Replaces any existing record (logged as `update`). A rail installed on
/// the same unit produces a non-blocking `RAIL_CONFLICT` warning.
#[must_use]
pub fn install_cage_nuts(rack: &Rack, unit: u32, nut_type: &str) -> PlacementResult {
    let position = Some(Position::new(unit, unit));

    if let Some(error) = unit_range_error(rack, unit) {
        return PlacementResult::failure(ValidationReport::from_error(error), position);
    }
    if nut_type.trim().is_empty() {
        return PlacementResult::failure(
            ValidationReport::from_error(ValidationError::new(
                ErrorCode::ConstraintError,
                "Cage nut type cannot be empty",
                vec![unit],
            )),
            position,
        );
    }

    let mut validation = ValidationReport::new();
    if rack.rails.get(&unit).is_some_and(RailRecord::any_installed) {
        validation.add_warning(
            ValidationWarning::new(
                WarningCode::RailConflict,
                format!("Unit {unit} already carries a rail; cage nuts may block its brackets"),
                vec![unit],
            )
            .with_suggestion("Remove the rail kit first if the nuts are meant for other equipment"),
        );
    }

    let mut next = rack.clone();
    let record = CageNutRecord::complete(nut_type);
    let change = match next.cage_nuts.insert(unit, record.clone()) {
        Some(old) => Change::update(
            ChangeType::CageNut,
            ChangeTarget::Unit(unit),
            ChangeValue::CageNut(old),
            ChangeValue::CageNut(record),
        ),
        None => Change::add(
            ChangeType::CageNut,
            ChangeTarget::Unit(unit),
            ChangeValue::CageNut(record),
        ),
    };

    info!(rack = %rack.name, unit, nut_type, "cage nuts installed");

    PlacementResult::committed(next, vec![change], validation, position)
}

/// Deletes the cage-nut record at `unit`.
#[must_use]
pub fn remove_cage_nuts(rack: &Rack, unit: u32) -> PlacementResult {
    let position = Some(Position::new(unit, unit));

    if !rack.cage_nuts.contains_key(&unit) {
        return PlacementResult::failure(
            ValidationReport::from_error(ValidationError::new(
                ErrorCode::CageNutNotFound,
                format!("No cage nuts installed at unit {unit}"),
                vec![unit],
            )),
            position,
        );
    }

    let mut next = rack.clone();
    let mut changes = Vec::new();
    if let Some(old) = next.cage_nuts.remove(&unit) {
        changes.push(Change::remove(
            ChangeType::CageNut,
            ChangeTarget::Unit(unit),
            ChangeValue::CageNut(old),
        ));
    }

    info!(rack = %rack.name, unit, "cage nuts removed");

    PlacementResult::committed(next, changes, ValidationReport::new(), position)
}

/// Deletes the rail kit installed at `unit`: every rail record carrying its
/// id and its part-inventory entry.
///
/// Records without a kit id are removed from `unit` alone.
#[must_use]
pub fn remove_rails(rack: &Rack, unit: u32) -> PlacementResult {
    let Some(record) = rack.rails.get(&unit).filter(|record| record.any_installed()) else {
        return PlacementResult::failure(
            ValidationReport::from_error(ValidationError::new(
                ErrorCode::RailNotFound,
                format!("No rail installed at unit {unit}"),
                vec![unit],
            )),
            Some(Position::new(unit, unit)),
        );
    };

    let rail_id = record.rail_id().map(str::to_string);
    let units: Vec<u32> = match &rail_id {
        Some(id) => rack
            .rails
            .iter()
            .filter(|(_, record)| record.belongs_to(id))
            .map(|(&unit, _)| unit)
            .collect(),
        None => vec![unit],
    };

    let mut next = rack.clone();
    let mut changes = Vec::new();
    for &rail_unit in &units {
        if let Some(old) = next.rails.remove(&rail_unit) {
            changes.push(Change::remove(
                ChangeType::Rail,
                ChangeTarget::Unit(rail_unit),
                ChangeValue::Rail(old),
            ));
        }
    }

    let mut position = units
        .first()
        .zip(units.last())
        .map(|(&start, &end)| Position::new(start, end));

    if let Some(part) = rail_id.as_ref().and_then(|id| next.part_inventory.remove(id)) {
        position = Some(part.span());
        changes.push(Change::remove(
            ChangeType::Rail,
            ChangeTarget::Part(part.id.clone()),
            ChangeValue::Part(part),
        ));
    }

    info!(
        rack = %rack.name,
        unit,
        rail = rail_id.as_deref().unwrap_or("-"),
        records = units.len(),
        "rail kit removed"
    );

    PlacementResult::committed(next, changes, ValidationReport::new(), position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Equipment, EquipmentKind, RackType};
    use crate::services::changes::ChangeAction;
    use crate::services::placement::{PlacementEngine, PlacementOptions};
    use crate::validation::PlacementMode;

    fn rack() -> Rack {
        Rack::new("Test", &RackType::new("24u-standard", 24, 600.0))
    }

    fn rack_with_rails(start_unit: u32) -> (Rack, String) {
        let rail = Equipment::new("rail-kit", "Slide Rail", 2)
            .unwrap()
            .with_kind(EquipmentKind::Rail);
        let result = PlacementEngine::default().place(
            &rack(),
            start_unit,
            &rail,
            &PlacementOptions::new(),
            PlacementMode::Default,
        );
        (result.updated_rack.unwrap(), result.instance_id.unwrap())
    }

    #[test]
    fn test_install_cage_nuts_adds_complete_record() {
        let result = install_cage_nuts(&rack(), 4, "m5");
        assert!(result.success);
        let next = result.updated_rack.unwrap();
        assert!(next.cage_nuts[&4].is_complete());
        assert_eq!(next.cage_nuts[&4].rear_right.middle.as_deref(), Some("m5"));
        assert_eq!(result.applied_changes[0].action, ChangeAction::Add);
    }

    #[test]
    fn test_install_cage_nuts_over_existing_is_update() {
        let first = install_cage_nuts(&rack(), 4, "m5").updated_rack.unwrap();
        let result = install_cage_nuts(&first, 4, "m6");
        assert!(result.success);
        assert_eq!(result.applied_changes.len(), 1);
        assert_eq!(result.applied_changes[0].action, ChangeAction::Update);
    }

    #[test]
    fn test_install_cage_nuts_out_of_range() {
        let result = install_cage_nuts(&rack(), 0, "m6");
        assert!(result.validation.has_error(ErrorCode::InvalidStartUnit));

        let result = install_cage_nuts(&rack(), 25, "m6");
        assert!(!result.success);
        assert!(result.validation.has_error(ErrorCode::ExceedRackCapacity));
        assert!(result.updated_rack.is_none());
    }

    #[test]
    fn test_install_cage_nuts_over_rail_warns_but_commits() {
        let (rack, _) = rack_with_rails(3);
        let result = install_cage_nuts(&rack, 3, "m6");
        assert!(result.success);
        assert!(result.validation.has_warning(WarningCode::RailConflict));
    }

    #[test]
    fn test_remove_cage_nuts() {
        let staged = install_cage_nuts(&rack(), 4, "m6").updated_rack.unwrap();
        let result = remove_cage_nuts(&staged, 4);
        assert!(result.success);
        assert!(result.updated_rack.unwrap().cage_nuts.is_empty());

        let result = remove_cage_nuts(&rack(), 4);
        assert!(!result.success);
        assert!(result.validation.has_error(ErrorCode::CageNutNotFound));
    }

    #[test]
    fn test_remove_rails_deletes_whole_kit() {
        let (rack, rail_id) = rack_with_rails(3);
        let result = remove_rails(&rack, 4);
        assert!(result.success);
        assert_eq!(result.position, Some(Position::new(3, 4)));
        let next = result.updated_rack.unwrap();
        assert!(next.rails.is_empty());
        assert!(!next.part_inventory.contains_key(&rail_id));
        // two unit records + the inventory part
        assert_eq!(result.applied_changes.len(), 3);
    }

    #[test]
    fn test_remove_rails_not_found() {
        let result = remove_rails(&rack(), 3);
        assert!(!result.success);
        assert_eq!(
            result
                .validation
                .error(ErrorCode::RailNotFound)
                .unwrap()
                .affected_units,
            vec![3]
        );
    }
}
