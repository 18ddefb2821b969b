//! Service layer for business logic.
//!
//! This module contains the placement engine, the hardware staging
//! operations, read-only rack projections and rack file I/O.

pub mod changes;
pub mod hardware;
pub mod occupancy;
pub mod placement;
pub mod racks;

// Re-export commonly used types and functions
pub use changes::{Change, ChangeAction, ChangeTarget, ChangeType, ChangeValue};
pub use hardware::{install_cage_nuts, remove_cage_nuts, remove_rails};
pub use occupancy::{occupancy, summarize, OccupancyEntry, OccupancyMap, RackSummary};
pub use placement::{PlacementEngine, PlacementOptions, PlacementResult};
pub use racks::RackService;
