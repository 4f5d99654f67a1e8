//! Configuration validation and order auditing.
//!
//! [`validate_config`] checks a show configuration before scheduling and
//! reports every problem at once. Detects:
//! - Role count other than two
//! - Zero runs, empty roster, non-positive run step
//! - Duplicate object or performer IDs
//! - Eligibility lists naming unknown performers or keywords
//! - Objects nobody may handle
//! - A default object that is not configured
//!
//! [`audit_order`] re-checks a finished order against the hard rules;
//! [`attach_audit`] stores the findings on the order itself.

use std::collections::HashSet;

use crate::config::{ConfigError, ShowConfig};
use crate::models::{Eligibility, Role, ShowOrder, Violation, ViolationType};
use crate::planner::PairUsage;
use crate::pool::Pool;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two objects or two performers share an ID.
    DuplicateId,
    /// Not exactly two roles.
    RoleCount,
    /// Run count is zero.
    NoRuns,
    /// Roster has no named performer.
    EmptyRoster,
    /// An eligibility list names someone not on the roster.
    UnknownPerformer,
    /// An eligibility keyword other than `all` or `*`.
    UnknownKeyword,
    /// An object has an empty eligibility list.
    NoEligiblePerformer,
    /// The default object is not among the objects.
    UnknownDefaultObject,
    /// Run step or intermission length out of range.
    InvalidTiming,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a show configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &ShowConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.roles.len() != 2 {
        errors.push(ValidationError::new(
            ValidationErrorKind::RoleCount,
            format!("Expected exactly 2 roles, found {}", config.roles.len()),
        ));
    }

    if config.show.run_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoRuns,
            "Run count must be at least 1",
        ));
    }

    if config.show.step_minutes < 1 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTiming,
            format!(
                "Run step must be at least 1 minute, got {}",
                config.show.step_minutes
            ),
        ));
    }

    if config.show.intermission.length_minutes < 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTiming,
            format!(
                "Intermission length cannot be negative, got {}",
                config.show.intermission.length_minutes
            ),
        ));
    }

    if !config.performers.iter().any(|p| !p.is_unstaffed()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoster,
            "At least one named performer is required",
        ));
    }

    let mut performer_ids = HashSet::new();
    for p in &config.performers {
        if !performer_ids.insert(p) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate performer: {p}"),
            ));
        }
    }

    let mut object_ids = HashSet::new();
    for spec in &config.objects {
        if !object_ids.insert(spec.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate object: {}", spec.name),
            ));
        }
        if matches!(&spec.performers, Eligibility::Performers(list) if list.is_empty()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoEligiblePerformer,
                format!("Object '{}' has no eligible performers", spec.name),
            ));
        }
    }

    // Unknown keywords and performers.
    if let Err(ConfigError::Invalid(pool_errors)) = Pool::build(&config.objects, &config.performers)
    {
        errors.extend(pool_errors);
    }

    if let Some(default) = &config.default_object {
        if !object_ids.contains(default.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDefaultObject,
                format!("Default object '{default}' is not a configured object"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Re-checks a finished order against the hard rules.
///
/// Consecutive-run rules apply within a segment only. Pair balance is
/// measured over every ordered pair of `pool`'s objects.
pub fn audit_order(order: &ShowOrder, pool: &Pool) -> Vec<Violation> {
    let mut violations = Vec::new();

    for run in &order.runs {
        if run.a.object == run.b.object {
            violations.push(Violation::new(
                ViolationType::DuplicateObject,
                run.number,
                format!("Object '{}' holds both roles", run.a.object),
            ));
        }
        if !run.a.is_unstaffed() && run.a.performer == run.b.performer {
            violations.push(Violation::new(
                ViolationType::DuplicatePerformer,
                run.number,
                format!("Performer '{}' holds both roles", run.a.performer),
            ));
        }
    }

    for (prev, next) in order.consecutive_in_segment() {
        for role in Role::ALL {
            let now = next.pair(role);
            if prev.pair(role).object == now.object {
                violations.push(Violation::new(
                    ViolationType::RepeatedObject,
                    next.number,
                    format!("{role} keeps '{}' from run {}", now.object, prev.number),
                ));
            }
            let before = prev.pair(role.other());
            if before.object == now.object && before.performer != now.performer {
                violations.push(Violation::new(
                    ViolationType::PerformerDiscontinuity,
                    next.number,
                    format!(
                        "'{}' moved to {role} but changed from {} to {}",
                        now.object, before.performer, now.performer
                    ),
                ));
            }
        }
        if next.object_pair().is_reversal_of(&prev.object_pair()) {
            violations.push(Violation::new(
                ViolationType::FullReversal,
                next.number,
                format!(
                    "{} reverses {} from run {}",
                    next.object_pair(),
                    prev.object_pair(),
                    prev.number
                ),
            ));
        }
    }

    let mut usage = PairUsage::for_objects(&pool.object_ids(), order.run_count());
    for pair in order.object_pairs() {
        usage.record(&pair);
    }
    if !usage.is_balanced() {
        let (min, max) = usage.spread();
        violations.push(Violation::new(
            ViolationType::PairImbalance,
            0,
            format!(
                "Object-pair usage spans {min}..={max}; expected {}..={} with {} at the upper value",
                usage.base(),
                usage.base() + 1,
                usage.remainder()
            ),
        ));
    }

    violations
}

/// Replaces `order`'s violations with a fresh audit and returns whether it
/// came back clean.
pub fn attach_audit(order: &mut ShowOrder, pool: &Pool) -> bool {
    order.violations.clear();
    for violation in audit_order(order, pool) {
        order.add_violation(violation);
    }
    order.is_valid()
}
