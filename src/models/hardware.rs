//! Mounting hardware records: cage nuts and rails.
//!
//! Both live in per-unit maps on the [`Rack`](crate::models::Rack) and have a
//! lifecycle independent of equipment occupancy.

use serde::{Deserialize, Serialize};

use crate::models::Position;

/// One of the four rack posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    /// Front left post
    FrontLeft,
    /// Front right post
    FrontRight,
    /// Rear left post
    RearLeft,
    /// Rear right post
    RearRight,
}

impl Corner {
    /// All corners, front posts first.
    pub const ALL: [Self; 4] = [
        Self::FrontLeft,
        Self::FrontRight,
        Self::RearLeft,
        Self::RearRight,
    ];
}

/// Cage-nut holes of one post within a single unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerNuts {
    /// Nut type in the top hole
    pub top: Option<String>,
    /// Nut type in the middle hole
    pub middle: Option<String>,
    /// Nut type in the bottom hole
    pub bottom: Option<String>,
}

impl CornerNuts {
    /// All three holes filled with `nut_type`.
    pub fn filled(nut_type: &str) -> Self {
        Self {
            top: Some(nut_type.to_string()),
            middle: Some(nut_type.to_string()),
            bottom: Some(nut_type.to_string()),
        }
    }

    /// Top and bottom holes are the mounting holes; middle is optional.
    #[must_use]
    pub const fn has_mounting_holes(&self) -> bool {
        self.top.is_some() && self.bottom.is_some()
    }

    /// True when no hole holds a nut.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none() && self.middle.is_none() && self.bottom.is_none()
    }
}

/// Cage nuts installed in a single rack unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CageNutRecord {
    /// Front left post
    pub front_left: CornerNuts,
    /// Front right post
    pub front_right: CornerNuts,
    /// Rear left post
    pub rear_left: CornerNuts,
    /// Rear right post
    pub rear_right: CornerNuts,
}

impl CageNutRecord {
    /// Record with every corner and hole set to `nut_type`.
    pub fn complete(nut_type: &str) -> Self {
        Self {
            front_left: CornerNuts::filled(nut_type),
            front_right: CornerNuts::filled(nut_type),
            rear_left: CornerNuts::filled(nut_type),
            rear_right: CornerNuts::filled(nut_type),
        }
    }

    /// Holes of one corner.
    #[must_use]
    pub const fn corner(&self, corner: Corner) -> &CornerNuts {
        match corner {
            Corner::FrontLeft => &self.front_left,
            Corner::FrontRight => &self.front_right,
            Corner::RearLeft => &self.rear_left,
            Corner::RearRight => &self.rear_right,
        }
    }

    /// A unit is complete when every corner has its top and bottom nut.
    ///
    /// The same threshold is used for advisories, strict-mode prerequisites
    /// and auto-install.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        Corner::ALL
            .iter()
            .all(|&corner| self.corner(corner).has_mounting_holes())
    }

    /// Number of holes holding a nut (0..=12).
    #[must_use]
    pub fn installed_count(&self) -> usize {
        Corner::ALL
            .iter()
            .map(|&corner| {
                let nuts = self.corner(corner);
                [&nuts.top, &nuts.middle, &nuts.bottom]
                    .iter()
                    .filter(|hole| hole.is_some())
                    .count()
            })
            .sum()
    }
}

/// One post's rail bracket within a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailSlot {
    /// Bracket present on this post
    pub installed: bool,
    /// Rail type tag of the kit
    pub rail_type: Option<String>,
    /// First unit of the kit's span
    pub start_unit: Option<u32>,
    /// Last unit of the kit's span
    pub end_unit: Option<u32>,
    /// Part inventory id of the kit
    pub rail_id: Option<String>,
}

impl RailSlot {
    /// Installed slot belonging to rail kit `rail_id` over `span`.
    pub fn for_kit(rail_id: &str, rail_type: &str, span: Position) -> Self {
        Self {
            installed: true,
            rail_type: Some(rail_type.to_string()),
            start_unit: Some(span.start_unit),
            end_unit: Some(span.end_unit),
            rail_id: Some(rail_id.to_string()),
        }
    }

    /// True when installed with a recorded span equal to `span`.
    #[must_use]
    pub fn covers_exactly(&self, span: Position) -> bool {
        self.installed
            && self.start_unit == Some(span.start_unit)
            && self.end_unit == Some(span.end_unit)
    }
}

/// Rails installed in a single rack unit, one slot per corner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailRecord {
    /// Front left post
    pub front_left: RailSlot,
    /// Front right post
    pub front_right: RailSlot,
    /// Rear left post
    pub rear_left: RailSlot,
    /// Rear right post
    pub rear_right: RailSlot,
}

impl RailRecord {
    /// All four corners installed for the same rail kit.
    pub fn full(rail_id: &str, rail_type: &str, span: Position) -> Self {
        let slot = RailSlot::for_kit(rail_id, rail_type, span);
        Self {
            front_left: slot.clone(),
            front_right: slot.clone(),
            rear_left: slot.clone(),
            rear_right: slot,
        }
    }

    /// Slot of one corner.
    #[must_use]
    pub const fn slot(&self, corner: Corner) -> &RailSlot {
        match corner {
            Corner::FrontLeft => &self.front_left,
            Corner::FrontRight => &self.front_right,
            Corner::RearLeft => &self.rear_left,
            Corner::RearRight => &self.rear_right,
        }
    }

    /// Any corner installed.
    #[must_use]
    pub fn any_installed(&self) -> bool {
        Corner::ALL.iter().any(|&corner| self.slot(corner).installed)
    }

    /// Front-left, front-right, rear-left and rear-right all installed.
    #[must_use]
    pub fn all_installed(&self) -> bool {
        Corner::ALL.iter().all(|&corner| self.slot(corner).installed)
    }

    /// Both front corners carry a rail whose span is exactly `span`.
    #[must_use]
    pub fn front_pair_matches(&self, span: Position) -> bool {
        self.front_left.covers_exactly(span) && self.front_right.covers_exactly(span)
    }

    /// True when any corner belongs to rail kit `rail_id`.
    #[must_use]
    pub fn belongs_to(&self, rail_id: &str) -> bool {
        Corner::ALL
            .iter()
            .any(|&corner| self.slot(corner).rail_id.as_deref() == Some(rail_id))
    }

    /// First rail id found on any corner.
    #[must_use]
    pub fn rail_id(&self) -> Option<&str> {
        Corner::ALL
            .iter()
            .find_map(|&corner| self.slot(corner).rail_id.as_deref())
    }
}
