//! Rack snapshot and unit span types.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::models::{
    CageNutRecord, InventoryPart, LabelRecord, MountingOption, PlacedEquipment, PowerConnection,
    RackType, RailRecord,
};

/// Contiguous unit range `[start_unit, end_unit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Lowest unit (the main unit)
    pub start_unit: u32,
    /// Highest unit
    pub end_unit: u32,
}

impl Position {
    /// Creates a span.
    #[must_use]
    pub const fn new(start_unit: u32, end_unit: u32) -> Self {
        Self {
            start_unit,
            end_unit,
        }
    }

    /// Units covered by the span.
    #[must_use]
    pub const fn units(&self) -> RangeInclusive<u32> {
        self.start_unit..=self.end_unit
    }

    /// Number of units covered.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.end_unit - self.start_unit + 1
    }

    /// True when `unit` lies inside the span.
    #[must_use]
    pub const fn contains(&self, unit: u32) -> bool {
        unit >= self.start_unit && unit <= self.end_unit
    }
}

/// Complete rack state as plain data.
///
/// Operations never mutate a `Rack` they are given; they return a new
/// snapshot. The value is fully serializable so hosts can persist or share
/// it without any attached behavior.
///
/// # Invariants
///
/// - every unit key lies in `1..=units`
/// - each occupied unit maps to exactly one placed copy; spans never overlap
/// - exactly one copy of each instance has `is_main_unit` set, at its start unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    /// Display name
    pub name: String,
    /// Type tag resolved through the rack type registry
    pub rack_type: String,
    /// Number of rack units (N)
    pub units: u32,
    /// Occupancy, one copy per occupied unit
    #[serde(default)]
    pub equipment: BTreeMap<u32, PlacedEquipment>,
    /// Cage nuts per unit
    #[serde(default)]
    pub cage_nuts: BTreeMap<u32, CageNutRecord>,
    /// Rails per unit
    #[serde(default)]
    pub rails: BTreeMap<u32, RailRecord>,
    /// Power records keyed by instance id
    #[serde(default)]
    pub power_connections: BTreeMap<String, PowerConnection>,
    /// Mounting records keyed by instance id
    #[serde(default)]
    pub mounting_options: BTreeMap<String, MountingOption>,
    /// Labels keyed by instance id
    #[serde(default)]
    pub labels: BTreeMap<String, LabelRecord>,
    /// Non-occupying hardware keyed by generated id
    #[serde(default)]
    pub part_inventory: BTreeMap<String, InventoryPart>,
}

impl Rack {
    /// Creates an empty rack of the given type.
    pub fn new(name: impl Into<String>, rack_type: &RackType) -> Self {
        Self {
            name: name.into(),
            rack_type: rack_type.name.clone(),
            units: rack_type.units,
            equipment: BTreeMap::new(),
            cage_nuts: BTreeMap::new(),
            rails: BTreeMap::new(),
            power_connections: BTreeMap::new(),
            mounting_options: BTreeMap::new(),
            labels: BTreeMap::new(),
            part_inventory: BTreeMap::new(),
        }
    }

    /// True when `unit` is a valid unit number for this rack.
    #[must_use]
    pub const fn contains_unit(&self, unit: u32) -> bool {
        unit >= 1 && unit <= self.units
    }

    /// Placed copy at `unit`, if occupied.
    #[must_use]
    pub fn equipment_at(&self, unit: u32) -> Option<&PlacedEquipment> {
        self.equipment.get(&unit)
    }

    /// Main-unit copies only (one per placed instance).
    pub fn main_units(&self) -> impl Iterator<Item = &PlacedEquipment> {
        self.equipment.values().filter(|placed| placed.is_main_unit)
    }

    /// Load in kilograms: one weight per placed instance plus installed rail kits.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        let placed: f64 = self.main_units().map(|placed| placed.equipment.weight).sum();
        let parts: f64 = self
            .part_inventory
            .values()
            .map(|part| part.equipment.weight)
            .sum();
        placed + parts
    }

    /// Units of `span` that already hold an equipment copy, ascending.
    #[must_use]
    pub fn occupied_units_in(&self, span: Position) -> Vec<u32> {
        self.equipment
            .range(span.units())
            .map(|(&unit, _)| unit)
            .collect()
    }

    /// Checks the structural invariants of the snapshot.
    ///
    /// Used when loading racks produced outside the engine.
    pub fn check_invariants(&self) -> Result<()> {
        let unit_keys = self
            .equipment
            .keys()
            .chain(self.cage_nuts.keys())
            .chain(self.rails.keys());
        for &unit in unit_keys {
            if !self.contains_unit(unit) {
                anyhow::bail!(
                    "Unit {unit} is outside rack '{}' (1..={})",
                    self.name,
                    self.units
                );
            }
        }

        for (&unit, placed) in &self.equipment {
            let span = placed.span();
            if span.start_unit > span.end_unit || !span.contains(unit) {
                anyhow::bail!(
                    "Unit {unit} holds '{}' with span {}-{} that does not cover it",
                    placed.instance_id,
                    span.start_unit,
                    span.end_unit
                );
            }
            if placed.is_main_unit != (unit == span.start_unit) {
                anyhow::bail!(
                    "Unit {unit} has an inconsistent main-unit flag for '{}'",
                    placed.instance_id
                );
            }
            for other_unit in span.units() {
                match self.equipment.get(&other_unit) {
                    Some(other) if other.instance_id == placed.instance_id => {}
                    _ => anyhow::bail!(
                        "Span of '{}' is broken at unit {other_unit}",
                        placed.instance_id
                    ),
                }
            }
        }

        Ok(())
    }
}
