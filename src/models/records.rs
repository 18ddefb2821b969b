//! Auxiliary per-equipment records created at placement time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Equipment, MountingMethod, Position};

/// Power path topology of a placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPath {
    /// One supply, one feed
    Single,
    /// Two supplies on independent feeds
    Redundant,
}

/// Power feed assignment for a placed item.
///
/// Sources start out empty; they are populated by the power planner,
/// not by the placement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerConnection {
    /// Single or redundant feed
    pub path: PowerPath,
    /// One slot per supply (PDU outlet identifiers once connected)
    pub sources: Vec<Option<String>>,
    /// True once every source slot is assigned
    pub connected: bool,
}

impl PowerConnection {
    /// Unconnected descriptor matching the equipment's supply count.
    #[must_use]
    pub fn unconnected_for(equipment: &Equipment) -> Self {
        let (path, slots) = if equipment.dual_power {
            (PowerPath::Redundant, 2)
        } else {
            (PowerPath::Single, 1)
        };

        Self {
            path,
            sources: vec![None; slots],
            connected: false,
        }
    }
}

/// Mounting details recorded for a placed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountingOption {
    /// Mounting method of the equipment
    pub method: MountingMethod,
    /// Derived from `method`
    pub requires_rails: bool,
    /// Derived from `method`
    pub requires_cage_nuts: bool,
    /// Nut type used when cage nuts were installed for this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cage_nut_type: Option<String>,
    /// Rail kit carrying this item, when one was found under the span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail_id: Option<String>,
}

impl MountingOption {
    /// Mounting record derived from the equipment's mounting method.
    #[must_use]
    pub fn for_equipment(equipment: &Equipment) -> Self {
        Self {
            method: equipment.mounting,
            requires_rails: equipment.requires_rails(),
            requires_cage_nuts: equipment.requires_cage_nuts(),
            cage_nut_type: None,
            rail_id: None,
        }
    }
}

/// Asset label for a placed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRecord {
    /// Label text printed on the front
    pub text: String,
    /// Inventory asset tag
    pub asset_tag: String,
    /// Free-form notes
    pub notes: String,
    /// Date the item was placed
    pub install_date: NaiveDate,
}

impl LabelRecord {
    /// Blank label stamped with `install_date`.
    #[must_use]
    pub const fn blank(install_date: NaiveDate) -> Self {
        Self {
            text: String::new(),
            asset_tag: String::new(),
            notes: String::new(),
            install_date,
        }
    }
}

/// Category of a non-occupying hardware part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    /// Rail kit spanning one or more units
    RailKit,
}

/// Hardware held in the rack's part inventory (rail kits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPart {
    /// Generated part id, shared with the rail records it owns
    pub id: String,
    /// Part category
    pub kind: PartKind,
    /// Descriptor the part was placed from
    pub equipment: Equipment,
    /// First installed unit
    pub start_unit: u32,
    /// Last installed unit
    pub end_unit: u32,
}

impl InventoryPart {
    /// Span the part is installed over.
    #[must_use]
    pub const fn span(&self) -> Position {
        Position::new(self.start_unit, self.end_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_connection_single() {
        let eq = Equipment::new("sw", "Switch", 1).unwrap();
        let power = PowerConnection::unconnected_for(&eq);
        assert_eq!(power.path, PowerPath::Single);
        assert_eq!(power.sources, vec![None]);
        assert!(!power.connected);
    }

    #[test]
    fn test_power_connection_redundant() {
        let eq = Equipment::new("srv", "Server", 2).unwrap().with_dual_power();
        let power = PowerConnection::unconnected_for(&eq);
        assert_eq!(power.path, PowerPath::Redundant);
        assert_eq!(power.sources.len(), 2);
        assert!(power.sources.iter().all(Option::is_none));
    }

    #[test]
    fn test_mounting_option_mirrors_method() {
        let eq = Equipment::new("srv", "Server", 2)
            .unwrap()
            .with_mounting(MountingMethod::Rails);
        let mounting = MountingOption::for_equipment(&eq);
        assert!(mounting.requires_rails);
        assert!(!mounting.requires_cage_nuts);
        assert_eq!(mounting.method, MountingMethod::Rails);
    }
}
