//! RackPlan Library
//!
//! This library provides the rack equipment placement engine: plain rack and
//! hardware models, an ordered constraint rule set with a non-short-circuiting
//! validation pipeline, the placement orchestrator with its inverse
//! operations, and the command-line front end built on top of them.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod services;
pub mod validation;
