//! Data models for racks, equipment and mounting hardware.
//!
//! This module contains the plain value types the placement engine reads and
//! produces. Models carry no engine behavior and serialize as plain data.

pub mod equipment;
pub mod hardware;
pub mod rack;
pub mod rack_type;
pub mod records;

// Re-export all model types
pub use equipment::{Equipment, EquipmentKind, MountingMethod, PlacedEquipment};
pub use hardware::{CageNutRecord, Corner, CornerNuts, RailRecord, RailSlot};
pub use rack::{Position, Rack};
pub use rack_type::{RackType, RackTypeRegistry};
pub use records::{
    InventoryPart, LabelRecord, MountingOption, PartKind, PowerConnection, PowerPath,
};
