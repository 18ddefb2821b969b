//! Validation report types shared by rules, the pipeline and operation results.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Blocking error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Start unit below 1
    InvalidStartUnit,
    /// Span ends above the top unit
    ExceedRackCapacity,
    /// Projected load above the rack type's maximum
    WeightExceeded,
    /// Span overlaps existing occupants
    UnitOccupied,
    /// Strict mode: cage nuts must be installed first
    CageNutRequired,
    /// Item must rest on a shelf directly below
    ShelfRequired,
    /// Strict mode: matching rails must be installed first
    RailRequired,
    /// A rule failed internally
    ConstraintError,
    /// No equipment at the requested unit
    EquipmentNotFound,
    /// No cage nuts at the requested unit
    CageNutNotFound,
    /// No rail at the requested unit
    RailNotFound,
}

impl ErrorCode {
    /// Wire name of the code (e.g. "UNIT_OCCUPIED").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidStartUnit => "INVALID_START_UNIT",
            Self::ExceedRackCapacity => "EXCEED_RACK_CAPACITY",
            Self::WeightExceeded => "WEIGHT_EXCEEDED",
            Self::UnitOccupied => "UNIT_OCCUPIED",
            Self::CageNutRequired => "CAGE_NUT_REQUIRED",
            Self::ShelfRequired => "SHELF_REQUIRED",
            Self::RailRequired => "RAIL_REQUIRED",
            Self::ConstraintError => "CONSTRAINT_ERROR",
            Self::EquipmentNotFound => "EQUIPMENT_NOT_FOUND",
            Self::CageNutNotFound => "CAGE_NUT_NOT_FOUND",
            Self::RailNotFound => "RAIL_NOT_FOUND",
        }
    }

    /// Structural errors can never be forced: committing them would break
    /// the rack's range and non-overlap invariants.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            Self::InvalidStartUnit | Self::ExceedRackCapacity | Self::UnitOccupied
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory warning codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Projected load above 80% of the maximum
    WeightWarning,
    /// Cage nuts incomplete on a spanned unit
    CageNutMissing,
    /// Rails not installed on all four corners across the span
    RailsRequired,
    /// Rail placed over units carrying complete cage nuts
    CageNutConflict,
    /// Cage-nut hardware placed over units carrying a rail
    RailConflict,
}

impl WarningCode {
    /// Wire name of the code (e.g. "CAGE_NUT_MISSING").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightWarning => "WEIGHT_WARNING",
            Self::CageNutMissing => "CAGE_NUT_MISSING",
            Self::RailsRequired => "RAILS_REQUIRED",
            Self::CageNutConflict => "CAGE_NUT_CONFLICT",
            Self::RailConflict => "RAIL_CONFLICT",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a blocking error is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violated placement constraint
    #[default]
    Error,
    /// The engine could not evaluate a constraint at all
    Critical,
}

/// Blocking validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// Units the error refers to
    pub affected_units: Vec<u32>,
    /// Severity for display
    pub severity: Severity,
    /// Optional suggestion for fixing the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error with `Error` severity.
    pub fn new(code: ErrorCode, message: impl Into<String>, affected_units: Vec<u32>) -> Self {
        Self {
            code,
            message: message.into(),
            affected_units,
            severity: Severity::Error,
            suggestion: None,
        }
    }

    /// Sets the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.affected_units.is_empty() {
            write!(f, " [units {}]", format_units(&self.affected_units))?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }
        Ok(())
    }
}

/// Advisory validation warning (non-blocking for validity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationWarning {
    /// Machine-readable code
    pub code: WarningCode,
    /// Human-readable description
    pub message: String,
    /// Units the warning refers to
    pub affected_units: Vec<u32>,
    /// Optional hint for resolving the warning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning
    pub fn new(code: WarningCode, message: impl Into<String>, affected_units: Vec<u32>) -> Self {
        Self {
            code,
            message: message.into(),
            affected_units,
            suggestion: None,
        }
    }

    /// Sets a suggestion for resolving the warning.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.affected_units.is_empty() {
            write!(f, " [units {}]", format_units(&self.affected_units))?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n    → {suggestion}")?;
        }
        Ok(())
    }
}

/// Aggregated errors and warnings of one validation run.
///
/// `is_valid` means "no errors"; warnings never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(into = "ReportRepr", from = "ReportRepr")]
pub struct ValidationReport {
    /// Blocking errors
    pub errors: Vec<ValidationError>,
    /// Advisory warnings
    pub warnings: Vec<ValidationWarning>,
}

/// Wire shape carrying the derived `isValid` flag.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRepr {
    is_valid: bool,
    #[serde(default)]
    errors: Vec<ValidationError>,
    #[serde(default)]
    warnings: Vec<ValidationWarning>,
}

impl From<ValidationReport> for ReportRepr {
    fn from(report: ValidationReport) -> Self {
        Self {
            is_valid: report.is_valid(),
            errors: report.errors,
            warnings: report.warnings,
        }
    }
}

impl From<ReportRepr> for ValidationReport {
    fn from(repr: ReportRepr) -> Self {
        Self {
            errors: repr.errors,
            warnings: repr.warnings,
        }
    }
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Report holding a single error.
    #[must_use]
    pub fn from_error(error: ValidationError) -> Self {
        let mut report = Self::new();
        report.add_error(error);
        report
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// True when an error with `code` is present.
    #[must_use]
    pub fn has_error(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|error| error.code == code)
    }

    /// True when a warning with `code` is present.
    #[must_use]
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|warning| warning.code == code)
    }

    /// First error with `code`.
    #[must_use]
    pub fn error(&self, code: ErrorCode) -> Option<&ValidationError> {
        self.errors.iter().find(|error| error.code == code)
    }

    /// First warning with `code`.
    #[must_use]
    pub fn warning(&self, code: WarningCode) -> Option<&ValidationWarning> {
        self.warnings.iter().find(|warning| warning.code == code)
    }

    /// True when every warning's code is in `codes` (vacuously true if none).
    #[must_use]
    pub fn warnings_all_in(&self, codes: &[WarningCode]) -> bool {
        self.warnings
            .iter()
            .all(|warning| codes.contains(&warning.code))
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("✗ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠ {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Renders a unit list compactly ("1-3, 7").
#[must_use]
pub fn format_units(units: &[u32]) -> String {
    let mut sorted = units.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut iter = sorted.into_iter().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while let Some(next) = iter.next_if(|&unit| Some(unit) == end.checked_add(1)) {
            end = next;
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
    }
    parts.join(", ")
}
