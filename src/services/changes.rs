//! Change log entries produced by every mutating operation.

use serde::{Deserialize, Serialize};

use crate::models::{
    CageNutRecord, InventoryPart, LabelRecord, MountingOption, PlacedEquipment, PowerConnection,
    RailRecord,
};

/// Record family touched by a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Per-unit equipment copy
    Equipment,
    /// Cage-nut record (serialized as `cagenut`)
    CageNut,
    /// Power connection record
    Power,
    /// Mounting option record
    Mounting,
    /// Label record
    Label,
    /// Rail record or rail kit inventory entry
    Rail,
}

/// What happened to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// Record created
    Add,
    /// Record deleted
    Remove,
    /// Record replaced; `old_value` holds the previous state
    Update,
}

/// Key of the changed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeTarget {
    /// Per-unit record (equipment copy, cage nuts, rails)
    Unit(u32),
    /// Per-instance record (power, mounting, label)
    Equipment(String),
    /// Part inventory entry
    Part(String),
}

/// Snapshot of a changed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeValue {
    /// Equipment copy at one unit
    Equipment(PlacedEquipment),
    /// Cage nuts at one unit
    CageNut(CageNutRecord),
    /// Rails at one unit
    Rail(RailRecord),
    /// Power connection of an instance
    Power(PowerConnection),
    /// Mounting option of an instance
    Mounting(MountingOption),
    /// Label of an instance
    Label(LabelRecord),
    /// Part inventory entry
    Part(InventoryPart),
}

/// One entry of an operation's change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Record family
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Add, remove or update
    pub action: ChangeAction,
    /// Key of the record
    pub target: ChangeTarget,
    /// State before the change (remove, update)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<ChangeValue>,
    /// State after the change (add, update)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<ChangeValue>,
}

impl Change {
    /// A record was created.
    #[must_use]
    pub const fn add(change_type: ChangeType, target: ChangeTarget, value: ChangeValue) -> Self {
        Self {
            change_type,
            action: ChangeAction::Add,
            target,
            old_value: None,
            new_value: Some(value),
        }
    }

    /// A record was deleted.
    #[must_use]
    pub const fn remove(change_type: ChangeType, target: ChangeTarget, value: ChangeValue) -> Self {
        Self {
            change_type,
            action: ChangeAction::Remove,
            target,
            old_value: Some(value),
            new_value: None,
        }
    }

    /// A record was replaced.
    #[must_use]
    pub const fn update(
        change_type: ChangeType,
        target: ChangeTarget,
        old_value: ChangeValue,
        new_value: ChangeValue,
    ) -> Self {
        Self {
            change_type,
            action: ChangeAction::Update,
            target,
            old_value: Some(old_value),
            new_value: Some(new_value),
        }
    }
}

/// Counts entries matching `change_type` and `action`.
#[must_use]
pub fn count_changes(changes: &[Change], change_type: ChangeType, action: ChangeAction) -> usize {
    changes
        .iter()
        .filter(|change| change.change_type == change_type && change.action == action)
        .count()
}
