//! Placement validation: report types, the rule registry and the pipeline.
//!
//! Rules are independent, stateless checks. The pipeline runs every rule on
//! every request and aggregates the results without short-circuiting, so a
//! host can show every problem at once.

pub mod observer;
pub mod pipeline;
pub mod report;
pub mod rules;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use observer::{NoopObserver, RuleEvaluation, RuleObserver, TracingObserver};
pub use pipeline::ValidationPipeline;
pub use report::{
    ErrorCode, Severity, ValidationError, ValidationReport, ValidationWarning, WarningCode,
};
pub use rules::{RuleContext, RuleDescriptor, RuleOutcome, RuleRegistry};

/// Operating mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Missing hardware is advisory
    #[default]
    Default,
    /// Missing hardware prerequisites are blocking errors
    Strict,
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Strict => write!(f, "strict"),
        }
    }
}
