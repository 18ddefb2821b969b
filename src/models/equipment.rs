//! Equipment descriptors and placed equipment records.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Position;

/// How a piece of equipment attaches to the rack posts.
///
/// This is the single canonical mounting representation; the boolean
/// helpers on [`Equipment`] are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MountingMethod {
    /// Slide or fixed rails must be installed first
    Rails,
    /// Ears bolt into cage nuts on the front posts
    CageNuts,
    /// No extra hardware (shelves, blanks, tool-less items)
    #[default]
    Direct,
}

impl MountingMethod {
    /// Returns the serialized tag (e.g. "cage-nuts").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rails => "rails",
            Self::CageNuts => "cage-nuts",
            Self::Direct => "direct",
        }
    }
}

impl fmt::Display for MountingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad equipment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentKind {
    /// Compute node
    #[default]
    Server,
    /// Network switch
    Switch,
    /// Cable termination panel
    PatchPanel,
    /// Disk array or storage server
    Storage,
    /// Power distribution unit
    Pdu,
    /// Uninterruptible power supply
    Ups,
    /// Fixed or sliding shelf that other items may rest on
    Shelf,
    /// Rail kit; never occupies the equipment map
    Rail,
    /// Cable management arm or bar
    CableManagement,
    /// Blanking panel
    Blank,
    /// Anything else
    Other,
}

/// Equipment descriptor as supplied by the host (catalog entry).
///
/// # Validation
///
/// - height must be at least 1
/// - weight must be finite and non-negative
/// - name must be non-empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Catalog identifier (e.g. "dell-r740"), not the placed instance id
    pub id: String,
    /// Display name
    pub name: String,
    /// Equipment category
    #[serde(default)]
    pub kind: EquipmentKind,
    /// Height in rack units
    pub height: u32,
    /// Mounting requirement
    #[serde(default)]
    pub mounting: MountingMethod,
    /// Weight in kilograms
    #[serde(default)]
    pub weight: f64,
    /// Has two power supplies
    #[serde(default)]
    pub dual_power: bool,
    /// Must rest on a shelf directly below
    #[serde(default)]
    pub needs_shelf: bool,
    /// Rail type tag for rail kits (e.g. "slide", "fixed")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rail_type: Option<String>,
}

impl Equipment {
    /// Creates a new equipment descriptor with direct mounting and no weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the height is zero.
    pub fn new(id: impl Into<String>, name: impl Into<String>, height: u32) -> Result<Self> {
        let equipment = Self {
            id: id.into(),
            name: name.into(),
            kind: EquipmentKind::default(),
            height,
            mounting: MountingMethod::default(),
            weight: 0.0,
            dual_power: false,
            needs_shelf: false,
            rail_type: None,
        };
        equipment.validate()?;
        Ok(equipment)
    }

    /// Validates the descriptor fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Equipment name cannot be empty");
        }
        if self.height == 0 {
            anyhow::bail!("Equipment '{}' must be at least 1U tall", self.name);
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            anyhow::bail!(
                "Equipment '{}' has an invalid weight ({})",
                self.name,
                self.weight
            );
        }
        Ok(())
    }

    /// Sets the equipment kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: EquipmentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the mounting method.
    #[must_use]
    pub const fn with_mounting(mut self, mounting: MountingMethod) -> Self {
        self.mounting = mounting;
        self
    }

    /// Sets the weight in kilograms.
    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Marks the equipment as dual-power.
    #[must_use]
    pub const fn with_dual_power(mut self) -> Self {
        self.dual_power = true;
        self
    }

    /// Marks the equipment as needing a shelf underneath.
    #[must_use]
    pub const fn with_shelf_requirement(mut self) -> Self {
        self.needs_shelf = true;
        self
    }

    /// Sets the rail type (rail kits only).
    pub fn with_rail_type(mut self, rail_type: impl Into<String>) -> Self {
        self.rail_type = Some(rail_type.into());
        self
    }

    /// True when the equipment mounts on rails.
    #[must_use]
    pub fn requires_rails(&self) -> bool {
        self.mounting == MountingMethod::Rails
    }

    /// True when the equipment mounts with cage nuts.
    #[must_use]
    pub fn requires_cage_nuts(&self) -> bool {
        self.mounting == MountingMethod::CageNuts
    }

    /// True for rail kits, which take the rail execution path.
    #[must_use]
    pub fn is_rail(&self) -> bool {
        self.kind == EquipmentKind::Rail
    }

    /// True for shelves, which satisfy shelf dependencies.
    #[must_use]
    pub fn is_shelf(&self) -> bool {
        self.kind == EquipmentKind::Shelf
    }

    /// Span this equipment would occupy when anchored at `start_unit`.
    ///
    /// A zero start unit is allowed here so that range rules can report it.
    #[must_use]
    pub const fn span_at(&self, start_unit: u32) -> Position {
        Position::new(start_unit, start_unit.saturating_add(self.height.saturating_sub(1)))
    }

    /// Rail type recorded on rail slots, falling back to the catalog id.
    #[must_use]
    pub fn rail_type_tag(&self) -> String {
        self.rail_type.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// One unit's copy of a placed piece of equipment.
///
/// A height-K item is stored as K copies sharing `instance_id` and span;
/// only the copy at `start_unit` has `is_main_unit` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedEquipment {
    /// Generated instance identifier
    pub instance_id: String,
    /// Catalog descriptor the instance was placed from
    pub equipment: Equipment,
    /// Lowest unit of the span
    pub start_unit: u32,
    /// Highest unit of the span
    pub end_unit: u32,
    /// True only on the copy stored at `start_unit`
    pub is_main_unit: bool,
}

impl PlacedEquipment {
    /// Span covered by this placement.
    #[must_use]
    pub const fn span(&self) -> Position {
        Position::new(self.start_unit, self.end_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_new_validates() {
        assert!(Equipment::new("srv", "Server", 2).is_ok());
        assert!(Equipment::new("srv", "", 2).is_err());
        assert!(Equipment::new("srv", "Server", 0).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let eq = Equipment::new("srv", "Server", 1).unwrap().with_weight(-1.0);
        assert!(eq.validate().is_err());
        let eq = eq.with_weight(f64::NAN);
        assert!(eq.validate().is_err());
    }

    #[test]
    fn test_mounting_helpers_derive_from_method() {
        let eq = Equipment::new("srv", "Server", 1)
            .unwrap()
            .with_mounting(MountingMethod::CageNuts);
        assert!(eq.requires_cage_nuts());
        assert!(!eq.requires_rails());

        let eq = eq.with_mounting(MountingMethod::Rails);
        assert!(eq.requires_rails());
        assert!(!eq.requires_cage_nuts());
    }

    #[test]
    fn test_span_at() {
        let eq = Equipment::new("srv", "Server", 3).unwrap();
        assert_eq!(eq.span_at(5), Position::new(5, 7));
        assert_eq!(eq.span_at(0), Position::new(0, 2));
    }

    #[test]
    fn test_serde_uses_kebab_tags() {
        let eq = Equipment::new("rk", "Rail kit", 2)
            .unwrap()
            .with_kind(EquipmentKind::Rail)
            .with_mounting(MountingMethod::CageNuts);
        let json = serde_json::to_value(&eq).unwrap();
        assert_eq!(json["kind"], "rail");
        assert_eq!(json["mounting"], "cage-nuts");
        assert_eq!(json["dualPower"], false);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let eq: Equipment =
            serde_json::from_str(r#"{"id":"blank","name":"Blank","height":1}"#).unwrap();
        assert_eq!(eq.mounting, MountingMethod::Direct);
        assert_eq!(eq.kind, EquipmentKind::Server);
        assert!(!eq.needs_shelf);
    }
}
