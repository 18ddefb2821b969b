//! Placement orchestration and the inverse operations.
//!
//! Every operation takes a rack snapshot by reference and returns a
//! [`PlacementResult`]. The input is never mutated; on success the result
//! carries a new snapshot plus the change log, on failure it carries only
//! the validation detail.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::DEFAULT_CAGE_NUT_TYPE;
use crate::models::{
    CageNutRecord, Equipment, InventoryPart, LabelRecord, MountingOption, PartKind,
    PlacedEquipment, Position, PowerConnection, Rack, RackTypeRegistry, RailRecord,
};
use crate::services::changes::{Change, ChangeTarget, ChangeType, ChangeValue};
use crate::validation::{
    ErrorCode, NoopObserver, PlacementMode, RuleContext, ValidationError, ValidationPipeline,
    ValidationReport, WarningCode,
};

/// Caller intent for a placement or move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementOptions {
    /// Install complete cage-nut sets on spanned units that lack them
    pub auto_install_cage_nuts: bool,
    /// Commit despite warnings
    pub skip_warnings: bool,
    /// Commit despite warnings and non-structural errors
    pub force_override: bool,
    /// Validate and report without mutating
    pub validate_only: bool,
    /// Nut type used by auto-install (defaults to "m6")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cage_nut_type: Option<String>,
}

impl PlacementOptions {
    /// Creates options with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs missing cage nuts on commit.
    #[must_use]
    pub fn with_auto_install_cage_nuts(mut self) -> Self {
        self.auto_install_cage_nuts = true;
        self
    }

    /// Commits despite warnings.
    #[must_use]
    pub fn with_skip_warnings(mut self) -> Self {
        self.skip_warnings = true;
        self
    }

    /// Commits despite warnings and non-structural errors.
    #[must_use]
    pub fn with_force_override(mut self) -> Self {
        self.force_override = true;
        self
    }

    /// Reports without committing.
    #[must_use]
    pub fn with_validate_only(mut self) -> Self {
        self.validate_only = true;
        self
    }

    /// Sets the nut type auto-install writes.
    #[must_use]
    pub fn with_cage_nut_type(mut self, nut_type: impl Into<String>) -> Self {
        self.cage_nut_type = Some(nut_type.into());
        self
    }

    /// Nut type auto-install writes.
    #[must_use]
    pub fn nut_type(&self) -> &str {
        self.cage_nut_type.as_deref().unwrap_or(DEFAULT_CAGE_NUT_TYPE)
    }
}

/// Outcome of any engine operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementResult {
    /// True when the operation committed (or, for validate-only, would be valid)
    pub success: bool,
    /// Span the operation targeted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Aggregated validation detail
    pub validation: ValidationReport,
    /// One entry per created, deleted or replaced record
    #[serde(default)]
    pub applied_changes: Vec<Change>,
    /// New snapshot; absent when nothing was committed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_rack: Option<Rack>,
    /// Instance identifier of the placed or moved equipment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

impl PlacementResult {
    /// Failed operation; nothing was committed.
    #[must_use]
    pub const fn failure(validation: ValidationReport, position: Option<Position>) -> Self {
        Self {
            success: false,
            position,
            validation,
            applied_changes: Vec::new(),
            updated_rack: None,
            instance_id: None,
        }
    }

    /// Committed operation.
    #[must_use]
    pub const fn committed(
        rack: Rack,
        applied_changes: Vec<Change>,
        validation: ValidationReport,
        position: Option<Position>,
    ) -> Self {
        Self {
            success: true,
            position,
            validation,
            applied_changes,
            updated_rack: Some(rack),
            instance_id: None,
        }
    }

    /// Validate-only outcome: success mirrors validity, nothing is committed.
    fn checked(validation: ValidationReport, position: Position) -> Self {
        Self {
            success: validation.is_valid(),
            ..Self::failure(validation, Some(position))
        }
    }

    #[must_use]
    fn with_instance_id(mut self, instance_id: String) -> Self {
        self.instance_id = Some(instance_id);
        self
    }
}

/// Failure for an operation addressing a unit with no equipment.
fn equipment_not_found(unit: u32) -> PlacementResult {
    PlacementResult::failure(
        ValidationReport::from_error(ValidationError::new(
            ErrorCode::EquipmentNotFound,
            format!("No equipment found at unit {unit}"),
            vec![unit],
        )),
        None,
    )
}

/// Placement validation-and-execution engine.
///
/// Holds only immutable configuration (rack types and the rule pipeline),
/// so a single engine can serve any number of snapshots.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    rack_types: RackTypeRegistry,
    pipeline: ValidationPipeline,
}

impl PlacementEngine {
    /// Engine using `rack_types` and the standard rule pipeline.
    #[must_use]
    pub fn new(rack_types: RackTypeRegistry) -> Self {
        Self {
            rack_types,
            pipeline: ValidationPipeline::default(),
        }
    }

    /// Replaces the validation pipeline.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: ValidationPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Rack types used for capacity limits.
    #[must_use]
    pub const fn rack_types(&self) -> &RackTypeRegistry {
        &self.rack_types
    }

    /// Runs every rule for `equipment` anchored at `start_unit`.
    #[must_use]
    pub fn validate(
        &self,
        rack: &Rack,
        start_unit: u32,
        equipment: &Equipment,
        mode: PlacementMode,
    ) -> ValidationReport {
        self.pipeline
            .run(&self.context(rack, start_unit, equipment, mode))
    }

    /// Places `equipment` with its main unit at `start_unit`.
    #[must_use]
    pub fn place(
        &self,
        rack: &Rack,
        start_unit: u32,
        equipment: &Equipment,
        options: &PlacementOptions,
        mode: PlacementMode,
    ) -> PlacementResult {
        let position = equipment.span_at(start_unit);
        let validation = self.validate(rack, start_unit, equipment, mode);

        if options.validate_only {
            return PlacementResult::checked(validation, position);
        }

        if !admits(&validation, equipment, options, mode) {
            debug!(
                equipment = %equipment.id,
                start_unit,
                errors = validation.errors.len(),
                warnings = validation.warnings.len(),
                "placement rejected"
            );
            return PlacementResult::failure(validation, Some(position));
        }

        let mut next = rack.clone();
        let mut changes = Vec::new();
        let instance_id = Uuid::new_v4().to_string();

        if equipment.is_rail() {
            install_rail_kit(&mut next, &mut changes, &instance_id, equipment, position);
        } else {
            if options.auto_install_cage_nuts && equipment.requires_cage_nuts() {
                install_missing_cage_nuts(&mut next, &mut changes, position, options.nut_type());
            }
            write_span(&mut next, &mut changes, &instance_id, equipment, position);
            write_aux_records(&mut next, &mut changes, &instance_id, equipment, position);
        }

        info!(
            rack = %rack.name,
            equipment = %equipment.id,
            instance = %instance_id,
            start_unit = position.start_unit,
            end_unit = position.end_unit,
            changes = changes.len(),
            "equipment placed"
        );

        PlacementResult::committed(next, changes, validation, Some(position))
            .with_instance_id(instance_id)
    }

    /// Removes the equipment occupying `unit`, whichever copy it is.
    ///
    /// Cage-nut and rail records are left untouched.
    #[must_use]
    pub fn remove(&self, rack: &Rack, unit: u32) -> PlacementResult {
        let Some(target) = rack.equipment_at(unit) else {
            return equipment_not_found(unit);
        };
        let span = target.span();
        let instance_id = target.instance_id.clone();

        let mut next = rack.clone();
        let mut changes = Vec::new();
        detach_span(&mut next, &mut changes, &instance_id, span);
        detach_aux_records(&mut next, &mut changes, &instance_id);

        info!(
            rack = %rack.name,
            instance = %instance_id,
            start_unit = span.start_unit,
            end_unit = span.end_unit,
            "equipment removed"
        );

        PlacementResult::committed(next, changes, ValidationReport::new(), Some(span))
            .with_instance_id(instance_id)
    }

    /// Moves the equipment occupying `from_unit` so its main unit lands on `to_unit`.
    ///
    /// The destination is validated against the rack with the source already
    /// detached; both steps commit together or not at all. The instance keeps
    /// its identifier, power and label records; its mounting record is
    /// re-derived from the hardware under the new span.
    #[must_use]
    pub fn move_equipment(
        &self,
        rack: &Rack,
        from_unit: u32,
        to_unit: u32,
        options: &PlacementOptions,
        mode: PlacementMode,
    ) -> PlacementResult {
        let Some(source) = rack.equipment_at(from_unit) else {
            return equipment_not_found(from_unit);
        };
        let instance_id = source.instance_id.clone();
        let equipment = source.equipment.clone();
        let old_span = source.span();

        let mut staged = rack.clone();
        let mut changes = Vec::new();
        detach_span(&mut staged, &mut changes, &instance_id, old_span);

        let position = equipment.span_at(to_unit);
        let validation = self.validate(&staged, to_unit, &equipment, mode);

        if options.validate_only {
            return PlacementResult::checked(validation, position);
        }

        if !admits(&validation, &equipment, options, mode) {
            debug!(
                instance = %instance_id,
                from_unit,
                to_unit,
                errors = validation.errors.len(),
                warnings = validation.warnings.len(),
                "move rejected"
            );
            return PlacementResult::failure(validation, Some(position));
        }

        if options.auto_install_cage_nuts && equipment.requires_cage_nuts() {
            install_missing_cage_nuts(&mut staged, &mut changes, position, options.nut_type());
        }
        write_span(&mut staged, &mut changes, &instance_id, &equipment, position);
        remount(&mut staged, &mut changes, &instance_id, &equipment, position);

        info!(
            rack = %rack.name,
            instance = %instance_id,
            from = old_span.start_unit,
            to = position.start_unit,
            "equipment moved"
        );

        PlacementResult::committed(staged, changes, validation, Some(position))
            .with_instance_id(instance_id)
    }

    /// Deletes every equipment, cage-nut and rail record along with the
    /// per-instance records and the part inventory. Always succeeds.
    #[must_use]
    pub fn clear_all(&self, rack: &Rack) -> PlacementResult {
        let mut next = rack.clone();
        let mut changes = Vec::new();

        for (unit, placed) in std::mem::take(&mut next.equipment) {
            changes.push(Change::remove(
                ChangeType::Equipment,
                ChangeTarget::Unit(unit),
                ChangeValue::Equipment(placed),
            ));
        }
        for (unit, record) in std::mem::take(&mut next.cage_nuts) {
            changes.push(Change::remove(
                ChangeType::CageNut,
                ChangeTarget::Unit(unit),
                ChangeValue::CageNut(record),
            ));
        }
        for (unit, record) in std::mem::take(&mut next.rails) {
            changes.push(Change::remove(
                ChangeType::Rail,
                ChangeTarget::Unit(unit),
                ChangeValue::Rail(record),
            ));
        }
        for (id, part) in std::mem::take(&mut next.part_inventory) {
            changes.push(Change::remove(
                ChangeType::Rail,
                ChangeTarget::Part(id),
                ChangeValue::Part(part),
            ));
        }
        for (id, power) in std::mem::take(&mut next.power_connections) {
            changes.push(Change::remove(
                ChangeType::Power,
                ChangeTarget::Equipment(id),
                ChangeValue::Power(power),
            ));
        }
        for (id, mounting) in std::mem::take(&mut next.mounting_options) {
            changes.push(Change::remove(
                ChangeType::Mounting,
                ChangeTarget::Equipment(id),
                ChangeValue::Mounting(mounting),
            ));
        }
        for (id, label) in std::mem::take(&mut next.labels) {
            changes.push(Change::remove(
                ChangeType::Label,
                ChangeTarget::Equipment(id),
                ChangeValue::Label(label),
            ));
        }

        info!(rack = %rack.name, changes = changes.len(), "rack cleared");

        PlacementResult::committed(next, changes, ValidationReport::new(), None)
    }

    /// Start units where `equipment` would validate without errors, ascending.
    #[must_use]
    pub fn available_positions(
        &self,
        rack: &Rack,
        equipment: &Equipment,
        mode: PlacementMode,
    ) -> Vec<u32> {
        let quiet = self.pipeline.clone().with_observer(Arc::new(NoopObserver));
        (1..=rack.units)
            .filter(|&start_unit| {
                quiet
                    .run(&self.context(rack, start_unit, equipment, mode))
                    .is_valid()
            })
            .collect()
    }

    fn context<'a>(
        &'a self,
        rack: &'a Rack,
        start_unit: u32,
        equipment: &'a Equipment,
        mode: PlacementMode,
    ) -> RuleContext<'a> {
        RuleContext {
            rack,
            position: equipment.span_at(start_unit),
            equipment,
            mode,
            registry: &self.rack_types,
        }
    }
}

/// Success policy applied to a validation report.
///
/// Errors block unless `force_override` is set, and structural errors
/// (range, occupancy) block even then. Warnings block unless ignored by
/// caller intent or by the auto-install and default-mode leniency rules.
fn admits(
    report: &ValidationReport,
    equipment: &Equipment,
    options: &PlacementOptions,
    mode: PlacementMode,
) -> bool {
    if !report.is_valid() {
        if !options.force_override {
            return false;
        }
        if report.errors.iter().any(|error| error.code.is_structural()) {
            return false;
        }
        // A malformed descriptor cannot be written even when forced
        if equipment.validate().is_err() {
            return false;
        }
    }

    if report.warnings.is_empty() {
        return true;
    }

    options.skip_warnings
        || options.force_override
        || (options.auto_install_cage_nuts
            && report.warnings_all_in(&[WarningCode::CageNutMissing]))
        || (mode == PlacementMode::Default
            && report.warnings_all_in(&[WarningCode::CageNutMissing, WarningCode::RailsRequired]))
}

fn write_span(
    rack: &mut Rack,
    changes: &mut Vec<Change>,
    instance_id: &str,
    equipment: &Equipment,
    position: Position,
) {
    for unit in position.units() {
        let placed = PlacedEquipment {
            instance_id: instance_id.to_string(),
            equipment: equipment.clone(),
            start_unit: position.start_unit,
            end_unit: position.end_unit,
            is_main_unit: unit == position.start_unit,
        };
        rack.equipment.insert(unit, placed.clone());
        changes.push(Change::add(
            ChangeType::Equipment,
            ChangeTarget::Unit(unit),
            ChangeValue::Equipment(placed),
        ));
    }
}

/// Deletes every copy of `instance_id` inside `span`.
fn detach_span(rack: &mut Rack, changes: &mut Vec<Change>, instance_id: &str, span: Position) {
    for unit in span.units() {
        let owned = rack
            .equipment
            .get(&unit)
            .is_some_and(|placed| placed.instance_id == instance_id);
        if !owned {
            continue;
        }
        if let Some(placed) = rack.equipment.remove(&unit) {
            changes.push(Change::remove(
                ChangeType::Equipment,
                ChangeTarget::Unit(unit),
                ChangeValue::Equipment(placed),
            ));
        }
    }
}

fn write_aux_records(
    rack: &mut Rack,
    changes: &mut Vec<Change>,
    instance_id: &str,
    equipment: &Equipment,
    position: Position,
) {
    let power = PowerConnection::unconnected_for(equipment);
    let mounting = mounting_at(rack, equipment, position);
    let label = LabelRecord::blank(Utc::now().date_naive());

    rack.power_connections
        .insert(instance_id.to_string(), power.clone());
    changes.push(Change::add(
        ChangeType::Power,
        ChangeTarget::Equipment(instance_id.to_string()),
        ChangeValue::Power(power),
    ));

    rack.mounting_options
        .insert(instance_id.to_string(), mounting.clone());
    changes.push(Change::add(
        ChangeType::Mounting,
        ChangeTarget::Equipment(instance_id.to_string()),
        ChangeValue::Mounting(mounting),
    ));

    rack.labels.insert(instance_id.to_string(), label.clone());
    changes.push(Change::add(
        ChangeType::Label,
        ChangeTarget::Equipment(instance_id.to_string()),
        ChangeValue::Label(label),
    ));
}

/// Mounting record describing the hardware currently under `position`.
fn mounting_at(rack: &Rack, equipment: &Equipment, position: Position) -> MountingOption {
    let mut mounting = MountingOption::for_equipment(equipment);
    if equipment.requires_cage_nuts() {
        mounting.cage_nut_type = rack
            .cage_nuts
            .get(&position.start_unit)
            .and_then(|record| record.front_left.top.clone());
    }
    if equipment.requires_rails() {
        mounting.rail_id = rack
            .rails
            .get(&position.start_unit)
            .and_then(RailRecord::rail_id)
            .map(str::to_string);
    }
    mounting
}

/// Re-derives a moved instance's mounting record for its new span.
fn remount(
    rack: &mut Rack,
    changes: &mut Vec<Change>,
    instance_id: &str,
    equipment: &Equipment,
    position: Position,
) {
    let mounting = mounting_at(rack, equipment, position);
    let target = ChangeTarget::Equipment(instance_id.to_string());
    match rack
        .mounting_options
        .insert(instance_id.to_string(), mounting.clone())
    {
        Some(old) if old == mounting => {}
        Some(old) => changes.push(Change::update(
            ChangeType::Mounting,
            target,
            ChangeValue::Mounting(old),
            ChangeValue::Mounting(mounting),
        )),
        None => changes.push(Change::add(
            ChangeType::Mounting,
            target,
            ChangeValue::Mounting(mounting),
        )),
    }
}

fn detach_aux_records(rack: &mut Rack, changes: &mut Vec<Change>, instance_id: &str) {
    let target = || ChangeTarget::Equipment(instance_id.to_string());

    if let Some(power) = rack.power_connections.remove(instance_id) {
        changes.push(Change::remove(
            ChangeType::Power,
            target(),
            ChangeValue::Power(power),
        ));
    }
    if let Some(mounting) = rack.mounting_options.remove(instance_id) {
        changes.push(Change::remove(
            ChangeType::Mounting,
            target(),
            ChangeValue::Mounting(mounting),
        ));
    }
    if let Some(label) = rack.labels.remove(instance_id) {
        changes.push(Change::remove(
            ChangeType::Label,
            target(),
            ChangeValue::Label(label),
        ));
    }
}

/// Writes a complete cage-nut record on every unit of `position` lacking one.
fn install_missing_cage_nuts(
    rack: &mut Rack,
    changes: &mut Vec<Change>,
    position: Position,
    nut_type: &str,
) {
    for unit in position.units() {
        if rack
            .cage_nuts
            .get(&unit)
            .is_some_and(CageNutRecord::is_complete)
        {
            continue;
        }

        let record = CageNutRecord::complete(nut_type);
        let change = match rack.cage_nuts.insert(unit, record.clone()) {
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
        changes.push(change);
    }
}

/// Rail kits live in the part inventory and the rail records, never in the
/// equipment occupancy map.
fn install_rail_kit(
    rack: &mut Rack,
    changes: &mut Vec<Change>,
    rail_id: &str,
    equipment: &Equipment,
    position: Position,
) {
    let part = InventoryPart {
        id: rail_id.to_string(),
        kind: PartKind::RailKit,
        equipment: equipment.clone(),
        start_unit: position.start_unit,
        end_unit: position.end_unit,
    };
    rack.part_inventory.insert(rail_id.to_string(), part.clone());
    changes.push(Change::add(
        ChangeType::Rail,
        ChangeTarget::Part(rail_id.to_string()),
        ChangeValue::Part(part),
    ));

    let rail_type = equipment.rail_type_tag();
    for unit in position.units() {
        let record = RailRecord::full(rail_id, &rail_type, position);
        rack.rails.insert(unit, record.clone());
        changes.push(Change::add(
            ChangeType::Rail,
            ChangeTarget::Unit(unit),
            ChangeValue::Rail(record),
        ));
    }
}
