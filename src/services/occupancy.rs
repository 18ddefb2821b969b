//! Read-only projections of a rack for display.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Equipment, Position, Rack, RackTypeRegistry};

/// What occupies one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyEntry {
    /// Instance identifier
    pub equipment_id: String,
    /// Descriptor of the occupant
    pub equipment: Equipment,
    /// Full span of the occupant
    pub span: Position,
    /// True at the occupant's start unit
    pub is_main_unit: bool,
}

/// Unit number to occupant (`None` for a free unit), covering `1..=N`.
pub type OccupancyMap = BTreeMap<u32, Option<OccupancyEntry>>;

/// Projects the rack's equipment map onto every unit.
#[must_use]
pub fn occupancy(rack: &Rack) -> OccupancyMap {
    (1..=rack.units)
        .map(|unit| {
            let entry = rack.equipment_at(unit).map(|placed| OccupancyEntry {
                equipment_id: placed.instance_id.clone(),
                equipment: placed.equipment.clone(),
                span: placed.span(),
                is_main_unit: placed.is_main_unit,
            });
            (unit, entry)
        })
        .collect()
}

/// Capacity figures for a rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackSummary {
    /// Rack display name
    pub name: String,
    /// Rack type tag
    pub rack_type: String,
    /// Total units
    pub units: u32,
    /// Units holding an equipment copy
    pub used_units: u32,
    /// Units with no equipment
    pub free_units: u32,
    /// Placed instances (main units)
    pub equipment_count: usize,
    /// Kilograms
    pub total_weight: f64,
    /// Kilograms
    pub max_weight: f64,
    /// Used units over total units, 0.0..=1.0
    pub utilization: f64,
    /// Units carrying a cage-nut record
    pub cage_nut_units: usize,
    /// Units carrying a rail record
    pub rail_units: usize,
}

/// Summarizes occupancy and load.
///
/// # Errors
///
/// Returns an error if the rack's type tag is not registered.
pub fn summarize(rack: &Rack, registry: &RackTypeRegistry) -> Result<RackSummary> {
    let rack_type = registry.resolve(&rack.rack_type)?;
    let used_units = u32::try_from(rack.equipment.len()).unwrap_or(u32::MAX);
    let utilization = if rack.units == 0 {
        0.0
    } else {
        f64::from(used_units) / f64::from(rack.units)
    };

    Ok(RackSummary {
        name: rack.name.clone(),
        rack_type: rack.rack_type.clone(),
        units: rack.units,
        used_units,
        free_units: rack.units.saturating_sub(used_units),
        equipment_count: rack.main_units().count(),
        total_weight: rack.total_weight(),
        max_weight: rack_type.max_weight,
        utilization,
        cage_nut_units: rack.cage_nuts.len(),
        rail_units: rack.rails.values().filter(|r| r.any_installed()).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RackType;
    use crate::services::placement::{PlacementEngine, PlacementOptions};
    use crate::validation::PlacementMode;

    fn populated() -> Rack {
        let rack = Rack::new("Lab", &RackType::new("12u-wall", 12, 100.0));
        let server = Equipment::new("srv", "Server", 2)
            .unwrap()
            .with_weight(25.0);
        PlacementEngine::default()
            .place(
                &rack,
                2,
                &server,
                &PlacementOptions::new(),
                PlacementMode::Default,
            )
            .updated_rack
            .unwrap()
    }

    #[test]
    fn test_occupancy_covers_every_unit() {
        let map = occupancy(&populated());
        assert_eq!(map.len(), 12);
        assert!(map[&1].is_none());
        let main = map[&2].as_ref().unwrap();
        assert!(main.is_main_unit);
        assert_eq!(main.span, Position::new(2, 3));
        let upper = map[&3].as_ref().unwrap();
        assert!(!upper.is_main_unit);
        assert_eq!(upper.equipment_id, main.equipment_id);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&populated(), &RackTypeRegistry::builtin()).unwrap();
        assert_eq!(summary.used_units, 2);
        assert_eq!(summary.free_units, 10);
        assert_eq!(summary.equipment_count, 1);
        assert!((summary.total_weight - 25.0).abs() < f64::EPSILON);
        assert!((summary.max_weight - 100.0).abs() < f64::EPSILON);
        assert!((summary.utilization - 2.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_unknown_type() {
        let mut rack = populated();
        rack.rack_type = "custom".to_string();
        assert!(summarize(&rack, &RackTypeRegistry::builtin()).is_err());
    }
}
