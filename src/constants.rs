//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and placement defaults.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "RackPlan";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "rackplan";

/// Rack type used when none is specified.
pub const DEFAULT_RACK_TYPE: &str = "42u-standard";

/// Nut type written by automatic cage-nut installation unless configured otherwise.
pub const DEFAULT_CAGE_NUT_TYPE: &str = "m6";

/// Fraction of the maximum load above which a weight warning is raised.
pub const WEIGHT_WARNING_RATIO: f64 = 0.8;
