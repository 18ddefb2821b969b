//! Constraint rules and the rule registry.
//!
//! Each rule is a tagged descriptor wrapping a pure check function
//! `(context) -> Result<RuleOutcome>`. A check returns `Err` only when it
//! cannot evaluate at all (unknown rack type); the pipeline turns that into
//! a `CONSTRAINT_ERROR` entry.

use anyhow::Result;

use crate::constants::WEIGHT_WARNING_RATIO;
use crate::models::{Equipment, Position, Rack, RackTypeRegistry};
use crate::validation::report::{
    format_units, ErrorCode, ValidationError, ValidationWarning, WarningCode,
};
use crate::validation::PlacementMode;

/// Everything a rule may inspect for one placement request.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Rack snapshot being validated against
    pub rack: &'a Rack,
    /// Requested span
    pub position: Position,
    /// Equipment being placed
    pub equipment: &'a Equipment,
    /// Operating mode
    pub mode: PlacementMode,
    /// Rack type lookup for capacity limits
    pub registry: &'a RackTypeRegistry,
}

impl RuleContext<'_> {
    /// Units of the requested span that exist in the rack.
    fn units_in_rack(&self) -> impl Iterator<Item = u32> + '_ {
        let rack = self.rack;
        self.position
            .units()
            .take(rack.units as usize)
            .filter(move |&unit| rack.contains_unit(unit))
    }

    fn is_strict(&self) -> bool {
        self.mode == PlacementMode::Strict
    }
}

/// Errors and warnings produced by one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Blocking findings
    pub errors: Vec<ValidationError>,
    /// Advisory findings
    pub warnings: Vec<ValidationWarning>,
}

impl RuleOutcome {
    /// Outcome with no findings.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    fn warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// Signature of a rule's check function.
pub type RuleCheck = fn(&RuleContext<'_>) -> Result<RuleOutcome>;

/// A registered constraint rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    /// Stable identifier used in logs and observer events
    pub id: &'static str,
    /// Evaluation order, lowest first
    pub priority: u8,
    /// One-line description for listings
    pub description: &'static str,
    /// The check itself
    pub check: RuleCheck,
}

impl RuleDescriptor {
    /// Runs the check against `ctx`.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
        (self.check)(ctx)
    }
}

/// Start unit at least 1 and span inside the rack.
pub const UNIT_RANGE: RuleDescriptor = RuleDescriptor {
    id: "unit-range",
    priority: 10,
    description: "Span must lie within units 1..N",
    check: check_unit_range,
};

/// Projected load within the rack type's limit.
pub const WEIGHT_CAPACITY: RuleDescriptor = RuleDescriptor {
    id: "weight-capacity",
    priority: 20,
    description: "Total weight must stay within the rack's maximum",
    check: check_weight_capacity,
};

/// No overlap with existing occupants.
pub const OCCUPANCY: RuleDescriptor = RuleDescriptor {
    id: "occupancy",
    priority: 30,
    description: "Spanned units must be free",
    check: check_occupancy,
};

/// Strict mode: cage nuts present before cage-nut equipment.
pub const STRICT_CAGE_NUTS: RuleDescriptor = RuleDescriptor {
    id: "strict-cage-nuts",
    priority: 40,
    description: "Strict mode: cage nuts must already be installed",
    check: check_strict_cage_nuts,
};

/// Shelf directly below shelf-dependent equipment.
pub const SHELF_DEPENDENCY: RuleDescriptor = RuleDescriptor {
    id: "shelf-dependency",
    priority: 50,
    description: "Shelf-dependent equipment must sit on a shelf",
    check: check_shelf_dependency,
};

/// Strict mode: matching rails present before rail-mounted equipment.
pub const STRICT_RAILS: RuleDescriptor = RuleDescriptor {
    id: "strict-rails",
    priority: 60,
    description: "Strict mode: matching rails must already be installed",
    check: check_strict_rails,
};

/// Default mode: advisories for missing mounting hardware.
pub const MOUNTING_ADVISORY: RuleDescriptor = RuleDescriptor {
    id: "mounting-advisory",
    priority: 70,
    description: "Warn when mounting hardware is missing",
    check: check_mounting_advisory,
};

/// Rails and cage nuts competing for the same holes.
pub const HARDWARE_CONFLICT: RuleDescriptor = RuleDescriptor {
    id: "hardware-conflict",
    priority: 80,
    description: "Warn when rails and cage nuts overlap",
    check: check_hardware_conflict,
};

/// Ordered collection of rules the pipeline runs.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<RuleDescriptor>,
}

impl RuleRegistry {
    /// Registry with no rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The canonical eight-rule set.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for rule in [
            UNIT_RANGE,
            WEIGHT_CAPACITY,
            OCCUPANCY,
            STRICT_CAGE_NUTS,
            SHELF_DEPENDENCY,
            STRICT_RAILS,
            MOUNTING_ADVISORY,
            HARDWARE_CONFLICT,
        ] {
            registry.register(rule);
        }
        registry
    }

    /// Adds a rule, replacing any rule with the same id, keeping priority order.
    pub fn register(&mut self, rule: RuleDescriptor) {
        self.rules.retain(|existing| existing.id != rule.id);
        let index = self
            .rules
            .partition_point(|existing| existing.priority <= rule.priority);
        self.rules.insert(index, rule);
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleDescriptor> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_unit_range(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();
    let Position {
        start_unit,
        end_unit,
    } = ctx.position;
    let units = ctx.rack.units;

    if start_unit < 1 {
        outcome.error(
            ValidationError::new(
                ErrorCode::InvalidStartUnit,
                format!("Start unit {start_unit} is invalid; units are numbered from 1"),
                vec![start_unit],
            )
            .with_suggestion("Choose a start unit of 1 or higher"),
        );
    }

    if ctx.equipment.height > units {
        outcome.error(ValidationError::new(
            ErrorCode::ExceedRackCapacity,
            format!(
                "'{}' is {}U tall, more than the {units}U rack",
                ctx.equipment.name, ctx.equipment.height
            ),
            vec![start_unit],
        ));
    } else if start_unit > units {
        outcome.error(ValidationError::new(
            ErrorCode::ExceedRackCapacity,
            format!("Start unit {start_unit} is above the top unit {units}"),
            vec![start_unit],
        ));
    } else if end_unit > units {
        outcome.error(
            ValidationError::new(
                ErrorCode::ExceedRackCapacity,
                format!(
                    "'{}' would end at unit {end_unit}, above the top unit {units}",
                    ctx.equipment.name
                ),
                (units + 1..=end_unit).collect(),
            )
            .with_suggestion(format!(
                "Start at unit {} or lower",
                units + 1 - ctx.equipment.height
            )),
        );
    }

    // Reported alongside the range findings, never instead of them
    if let Err(e) = ctx.equipment.validate() {
        outcome.error(ValidationError::new(
            ErrorCode::ConstraintError,
            format!("Invalid equipment descriptor: {e:#}"),
            vec![start_unit],
        ));
    }

    Ok(outcome)
}

fn check_weight_capacity(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let rack_type = ctx.registry.resolve(&ctx.rack.rack_type)?;

    let mut outcome = RuleOutcome::pass();
    let current = ctx.rack.total_weight();
    let projected = current + ctx.equipment.weight;
    let max = rack_type.max_weight;
    let affected: Vec<u32> = ctx.units_in_rack().collect();

    if projected > max {
        outcome.error(
            ValidationError::new(
                ErrorCode::WeightExceeded,
                format!(
                    "Adding '{}' ({:.1} kg) brings the rack to {projected:.1} kg, over its {max:.1} kg limit",
                    ctx.equipment.name, ctx.equipment.weight
                ),
                affected,
            )
            .with_suggestion("Remove heavier equipment or use a rack type with a higher load rating"),
        );
    } else if projected > max * WEIGHT_WARNING_RATIO {
        outcome.warning(ValidationWarning::new(
            WarningCode::WeightWarning,
            format!(
                "Rack load would reach {projected:.1} kg ({:.0}% of {max:.1} kg)",
                projected / max * 100.0
            ),
            affected,
        ));
    }

    Ok(outcome)
}

fn check_occupancy(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();

    if ctx.equipment.is_rail() {
        let taken: Vec<u32> = ctx
            .units_in_rack()
            .filter(|unit| {
                ctx.rack
                    .rails
                    .get(unit)
                    .is_some_and(|rails| rails.any_installed())
            })
            .collect();
        if !taken.is_empty() {
            outcome.error(ValidationError::new(
                ErrorCode::UnitOccupied,
                format!("Rails are already installed at units {}", format_units(&taken)),
                taken,
            ));
        }
        return Ok(outcome);
    }

    let occupied = ctx.rack.occupied_units_in(ctx.position);
    if !occupied.is_empty() {
        let mut occupants: Vec<&str> = occupied
            .iter()
            .filter_map(|unit| ctx.rack.equipment_at(*unit))
            .map(|placed| placed.equipment.name.as_str())
            .collect();
        occupants.dedup();

        outcome.error(ValidationError::new(
            ErrorCode::UnitOccupied,
            format!(
                "Units {} are occupied by {}",
                format_units(&occupied),
                occupants.join(", ")
            ),
            occupied,
        ));
    }

    Ok(outcome)
}

/// Spanned units whose cage-nut record is missing or incomplete.
fn units_missing_cage_nuts(ctx: &RuleContext<'_>) -> Vec<u32> {
    ctx.units_in_rack()
        .filter(|unit| {
            !ctx.rack
                .cage_nuts
                .get(unit)
                .is_some_and(|nuts| nuts.is_complete())
        })
        .collect()
}

fn check_strict_cage_nuts(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();
    if !ctx.is_strict() || ctx.equipment.is_rail() || !ctx.equipment.requires_cage_nuts() {
        return Ok(outcome);
    }

    let missing = units_missing_cage_nuts(ctx);
    if !missing.is_empty() {
        outcome.error(
            ValidationError::new(
                ErrorCode::CageNutRequired,
                format!(
                    "Strict mode: cage nuts must be installed at units {} before placing '{}'",
                    format_units(&missing),
                    ctx.equipment.name
                ),
                missing,
            )
            .with_suggestion("Install cage nuts on all four posts first"),
        );
    }

    Ok(outcome)
}

fn check_shelf_dependency(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();
    if !ctx.equipment.needs_shelf {
        return Ok(outcome);
    }

    let start_unit = ctx.position.start_unit;
    let supported = start_unit
        .checked_sub(1)
        .and_then(|below| ctx.rack.equipment_at(below))
        .is_some_and(|placed| placed.equipment.is_shelf());

    if !supported {
        outcome.error(
            ValidationError::new(
                ErrorCode::ShelfRequired,
                format!(
                    "'{}' must rest on a shelf directly below unit {start_unit}",
                    ctx.equipment.name
                ),
                vec![start_unit],
            )
            .with_suggestion(match start_unit.checked_sub(1).filter(|&below| below >= 1) {
                Some(below) => format!("Place a shelf at unit {below}"),
                None => "Leave room for a shelf underneath".to_string(),
            }),
        );
    }

    Ok(outcome)
}

fn check_strict_rails(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();
    if !ctx.is_strict() || ctx.equipment.is_rail() || !ctx.equipment.requires_rails() {
        return Ok(outcome);
    }

    let span = ctx.position;
    let missing: Vec<u32> = ctx
        .units_in_rack()
        .filter(|unit| {
            !ctx.rack
                .rails
                .get(unit)
                .is_some_and(|rails| rails.front_pair_matches(span))
        })
        .collect();

    if !missing.is_empty() {
        outcome.error(
            ValidationError::new(
                ErrorCode::RailRequired,
                format!(
                    "Strict mode: '{}' needs a {}U rail kit installed on units {}-{}",
                    ctx.equipment.name,
                    span.height(),
                    span.start_unit,
                    span.end_unit
                ),
                missing,
            )
            .with_suggestion("Place a matching rail kit at the same start unit first"),
        );
    }

    Ok(outcome)
}

fn check_mounting_advisory(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();
    if ctx.is_strict() || ctx.equipment.is_rail() {
        return Ok(outcome);
    }

    if ctx.equipment.requires_cage_nuts() {
        let missing = units_missing_cage_nuts(ctx);
        if !missing.is_empty() {
            outcome.warning(
                ValidationWarning::new(
                    WarningCode::CageNutMissing,
                    format!("Cage nuts are incomplete at units {}", format_units(&missing)),
                    missing,
                )
                .with_suggestion("Enable automatic cage-nut installation or install them first"),
            );
        }
    }

    if ctx.equipment.requires_rails() {
        let missing: Vec<u32> = ctx
            .units_in_rack()
            .filter(|unit| {
                !ctx.rack
                    .rails
                    .get(unit)
                    .is_some_and(|rails| rails.all_installed())
            })
            .collect();
        if !missing.is_empty() {
            outcome.warning(
                ValidationWarning::new(
                    WarningCode::RailsRequired,
                    format!(
                        "'{}' is rail-mounted but rails are missing at units {}",
                        ctx.equipment.name,
                        format_units(&missing)
                    ),
                    missing,
                )
                .with_suggestion("Place a rail kit over the same units"),
            );
        }
    }

    Ok(outcome)
}

fn check_hardware_conflict(ctx: &RuleContext<'_>) -> Result<RuleOutcome> {
    let mut outcome = RuleOutcome::pass();

    if ctx.equipment.is_rail() {
        let conflicting: Vec<u32> = ctx
            .units_in_rack()
            .filter(|unit| {
                ctx.rack
                    .cage_nuts
                    .get(unit)
                    .is_some_and(|nuts| nuts.is_complete())
            })
            .collect();
        if !conflicting.is_empty() {
            outcome.warning(
                ValidationWarning::new(
                    WarningCode::CageNutConflict,
                    format!(
                        "Rails would cover cage nuts installed at units {}",
                        format_units(&conflicting)
                    ),
                    conflicting,
                )
                .with_suggestion("Remove the cage nuts before installing rails"),
            );
        }
    } else if ctx.equipment.requires_cage_nuts() {
        let conflicting: Vec<u32> = ctx
            .units_in_rack()
            .filter(|unit| {
                ctx.rack
                    .rails
                    .get(unit)
                    .is_some_and(|rails| rails.any_installed())
            })
            .collect();
        if !conflicting.is_empty() {
            outcome.warning(
                ValidationWarning::new(
                    WarningCode::RailConflict,
                    format!(
                        "Cage-nut mounting would clash with rails installed at units {}",
                        format_units(&conflicting)
                    ),
                    conflicting,
                )
                .with_suggestion("Remove the rails or choose a rail-mounted model"),
            );
        }
    }

    Ok(outcome)
}
