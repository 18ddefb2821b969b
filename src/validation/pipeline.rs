//! Generic runner over the rule registry.

use std::fmt;
use std::sync::Arc;

use crate::validation::observer::{RuleEvaluation, RuleObserver, TracingObserver};
use crate::validation::report::{ErrorCode, Severity, ValidationError, ValidationReport};
use crate::validation::rules::{RuleContext, RuleOutcome, RuleRegistry};

/// Runs every registered rule and aggregates the findings.
///
/// The pipeline never short-circuits: a rule that fails internally is
/// recorded as a `CONSTRAINT_ERROR` and the remaining rules still run.
#[derive(Clone)]
pub struct ValidationPipeline {
    registry: RuleRegistry,
    observer: Arc<dyn RuleObserver>,
}

impl fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ValidationPipeline {
    /// Pipeline over `registry`, reporting to `tracing`.
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RuleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The rules this pipeline runs.
    #[must_use]
    pub const fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluates every rule against `ctx`.
    #[must_use]
    pub fn run(&self, ctx: &RuleContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();

        for rule in self.registry.rules() {
            let (outcome, failed) = match rule.evaluate(ctx) {
                Ok(outcome) => (outcome, false),
                Err(e) => {
                    let mut outcome = RuleOutcome::pass();
                    outcome.errors.push(
                        ValidationError::new(
                            ErrorCode::ConstraintError,
                            format!("Rule '{}' could not be evaluated: {e:#}", rule.id),
                            ctx.position.units().take(ctx.rack.units as usize).collect(),
                        )
                        .with_severity(Severity::Critical),
                    );
                    (outcome, true)
                }
            };

            self.observer.rule_evaluated(&RuleEvaluation {
                rule_id: rule.id,
                equipment_id: &ctx.equipment.id,
                position: ctx.position,
                mode: ctx.mode,
                errors: outcome.errors.len(),
                warnings: outcome.warnings.len(),
                failed,
            });

            report.errors.extend(outcome.errors);
            report.warnings.extend(outcome.warnings);
        }

        report
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(RuleRegistry::standard())
    }
}
