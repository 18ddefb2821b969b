//! Pluggable observability for rule evaluation.
//!
//! The pipeline reports every rule evaluation to a [`RuleObserver`]. The
//! default observer forwards events to `tracing`; hosts can install their
//! own to collect metrics or audit trails.

use tracing::{debug, warn};

use crate::models::Position;
use crate::validation::PlacementMode;

/// One rule evaluation, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleEvaluation<'a> {
    /// Id of the rule that ran
    pub rule_id: &'static str,
    /// Catalog id of the equipment being validated
    pub equipment_id: &'a str,
    /// Requested span
    pub position: Position,
    /// Operating mode
    pub mode: PlacementMode,
    /// Errors produced (including a converted internal failure)
    pub errors: usize,
    /// Warnings produced
    pub warnings: usize,
    /// True when the rule failed internally
    pub failed: bool,
}

/// Sink invoked once per rule evaluation.
pub trait RuleObserver: Send + Sync {
    /// Called after each rule has been evaluated.
    fn rule_evaluated(&self, evaluation: &RuleEvaluation<'_>);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RuleObserver for NoopObserver {
    fn rule_evaluated(&self, _evaluation: &RuleEvaluation<'_>) {}
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RuleObserver for TracingObserver {
    fn rule_evaluated(&self, evaluation: &RuleEvaluation<'_>) {
        if evaluation.failed {
            warn!(
                rule = evaluation.rule_id,
                equipment = evaluation.equipment_id,
                start_unit = evaluation.position.start_unit,
                end_unit = evaluation.position.end_unit,
                "rule failed internally"
            );
        } else {
            debug!(
                rule = evaluation.rule_id,
                equipment = evaluation.equipment_id,
                start_unit = evaluation.position.start_unit,
                end_unit = evaluation.position.end_unit,
                mode = %evaluation.mode,
                errors = evaluation.errors,
                warnings = evaluation.warnings,
                "rule evaluated"
            );
        }
    }
}
