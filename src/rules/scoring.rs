//! Soft rules that rank candidate runs.
//!
//! # Score Convention
//! **Higher score = better.** Each rule returns a signed contribution; the
//! [`Scorer`] sums them. With the standard weights:
//!
//! ```text
//! score = gap × 10 − role/object imbalance − intermission partner − unstaffed end run
//! ```
//!
//! Ties are broken by the caller keeping the first candidate found.

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ConstraintEngine, HistoryEntry, RunContext};
use crate::models::{Pair, Role};

/// Tunable soft-rule weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Multiplier on the averaged recency score.
    pub gap_multiplier: i64,
    /// Per-unit weight of a performer's |Role A − Role B| difference.
    pub role_imbalance: i64,
    /// Penalty for repeating the default object's partner across an intermission.
    pub intermission_partner: i64,
    /// Penalty for an unstaffed role on the first or last run.
    pub end_run_unstaffed: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            gap_multiplier: 10,
            role_imbalance: 5,
            intermission_partner: 25,
            end_run_unstaffed: 5,
        }
    }
}

/// A candidate run under evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub a: &'a Pair,
    pub b: &'a Pair,
}

impl<'a> Candidate<'a> {
    pub fn new(a: &'a Pair, b: &'a Pair) -> Self {
        Self { a, b }
    }

    /// Pair placed in `role`.
    pub fn pair(&self, role: Role) -> &'a Pair {
        match role {
            Role::A => self.a,
            Role::B => self.b,
        }
    }

    /// Whether either role is unstaffed.
    pub fn has_unstaffed(&self) -> bool {
        self.a.is_unstaffed() || self.b.is_unstaffed()
    }
}

/// A soft rule contributing to a candidate's score.
pub trait SoftRule: Send + Sync + Debug {
    /// Rule name (e.g., "gap").
    fn name(&self) -> &'static str;

    /// Signed contribution of `candidate`; higher is better.
    fn evaluate(
        &self,
        candidate: &Candidate<'_>,
        engine: &ConstraintEngine,
        context: &RunContext,
    ) -> i64;
}

/// Recency of `pair` in `role` within the segment history.
///
/// 100 if unseen or last used two or more runs before the newest entry,
/// 50 one run before it, 10 in the newest entry itself.
pub fn gap_score(pair: &Pair, role: Role, history: &[HistoryEntry]) -> i64 {
    let last = history.len().saturating_sub(1);
    match history.iter().rposition(|h| h.pair(role) == pair) {
        None => 100,
        Some(i) => match last - i {
            0 => 10,
            1 => 50,
            _ => 100,
        },
    }
}

/// Prefers pairs not seen recently in the same role.
#[derive(Debug, Clone, Copy)]
pub struct GapPreference {
    pub multiplier: i64,
}

impl SoftRule for GapPreference {
    fn name(&self) -> &'static str {
        "gap"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, engine: &ConstraintEngine, _: &RunContext) -> i64 {
        let history = engine.history();
        let a = gap_score(candidate.a, Role::A, history);
        let b = gap_score(candidate.b, Role::B, history);
        (a + b) / 2 * self.multiplier
    }
}

/// Penalizes role and object imbalance per performer, evaluated as if the
/// candidate were already committed.
#[derive(Debug, Clone, Copy)]
pub struct RoleBalance {
    pub role_weight: i64,
}

impl SoftRule for RoleBalance {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, engine: &ConstraintEngine, _: &RunContext) -> i64 {
        let extra = [(Role::A, candidate.a), (Role::B, candidate.b)];
        -engine
            .counts()
            .imbalance_penalty_with(&extra, self.role_weight)
    }
}

/// Penalizes giving the default object the same partner on both sides of
/// an intermission.
#[derive(Debug, Clone, Copy)]
pub struct IntermissionPartner {
    pub penalty: i64,
}

impl SoftRule for IntermissionPartner {
    fn name(&self) -> &'static str {
        "intermission"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _: &ConstraintEngine, context: &RunContext) -> i64 {
        if !context.after_intermission {
            return 0;
        }
        let (Some(default), Some(previous)) = (
            context.default_object.as_deref(),
            context.intermission_partner.as_ref(),
        ) else {
            return 0;
        };
        let partner = if candidate.a.object == default {
            &candidate.b.performer
        } else if candidate.b.object == default {
            &candidate.a.performer
        } else {
            return 0;
        };
        if partner == previous {
            -self.penalty
        } else {
            0
        }
    }
}

/// Penalizes an unstaffed role on the first or last run of the show.
#[derive(Debug, Clone, Copy)]
pub struct EndRunUnstaffed {
    pub penalty: i64,
}

impl SoftRule for EndRunUnstaffed {
    fn name(&self) -> &'static str {
        "end_run"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _: &ConstraintEngine, context: &RunContext) -> i64 {
        if context.is_end_run() && candidate.has_unstaffed() {
            -self.penalty
        } else {
            0
        }
    }
}

/// Sums the contributions of a set of soft rules.
#[derive(Clone, Default)]
pub struct Scorer {
    rules: Vec<Arc<dyn SoftRule>>,
}

impl Scorer {
    /// Creates a scorer with no rules (every candidate scores 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Gap, balance, intermission partner, and end-run rules with `weights`.
    pub fn standard(weights: &ScoringWeights) -> Self {
        Self::new()
            .with_rule(GapPreference {
                multiplier: weights.gap_multiplier,
            })
            .with_rule(RoleBalance {
                role_weight: weights.role_imbalance,
            })
            .with_rule(IntermissionPartner {
                penalty: weights.intermission_partner,
            })
            .with_rule(EndRunUnstaffed {
                penalty: weights.end_run_unstaffed,
            })
    }

    /// Adds a rule.
    pub fn with_rule<R: SoftRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the scorer has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total score of `candidate`.
    pub fn score(
        &self,
        candidate: &Candidate<'_>,
        engine: &ConstraintEngine,
        context: &RunContext,
    ) -> i64 {
        self.rules
            .iter()
            .map(|r| r.evaluate(candidate, engine, context))
            .sum()
    }

    /// Per-rule contributions of `candidate`.
    pub fn breakdown(
        &self,
        candidate: &Candidate<'_>,
        engine: &ConstraintEngine,
        context: &RunContext,
    ) -> Vec<(&'static str, i64)> {
        self.rules
            .iter()
            .map(|r| (r.name(), r.evaluate(candidate, engine, context)))
            .collect()
    }
}

impl Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
        f.debug_struct("Scorer").field("rules", &names).finish()
    }
}
