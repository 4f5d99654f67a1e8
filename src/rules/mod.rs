//! Constraint engine: hard rules and soft scoring for run selection.
//!
//! Hard rules are pass/fail checks against the previous run of the current
//! segment; a candidate failing any of them is discarded, never repaired.
//! Soft rules rank the survivors using rolling history and whole-show
//! fairness counts.
//!
//! # Usage
//!
//! ```
//! use run_order::models::{ObjectSpec, Pair, Performer};
//! use run_order::pool::Pool;
//! use run_order::rules::{ConstraintEngine, RunContext, ScoringWeights};
//!
//! let roster: Vec<Performer> = vec!["Moose".into(), "Luca".into()];
//! let pool = Pool::build(&[ObjectSpec::open("Shirt"), ObjectSpec::open("Hat")], &roster).unwrap();
//! let mut engine = ConstraintEngine::new(&pool, 2, &ScoringWeights::default());
//!
//! let a = Pair::new("Shirt", "Moose");
//! let b = Pair::new("Hat", "Luca");
//! let ctx = RunContext::at_run(1, 2);
//! assert!(engine.check(&a, &b, &ctx).is_ok());
//! engine.commit(a, b);
//! ```

mod context;
mod counts;
mod engine;
pub mod scoring;

pub use context::RunContext;
pub use counts::FairnessCounts;
pub use engine::{ConstraintEngine, HistoryEntry};
pub use scoring::{Candidate, Scorer, ScoringWeights, SoftRule};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Role;

/// A hard rule a committed run must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HardRule {
    /// Both roles need different performers unless one is unstaffed.
    DistinctPerformers,
    /// Both roles need different objects.
    DistinctObjects,
    /// A role may not keep its object from the previous run.
    NoRepeatInRole(Role),
    /// An object moving to this role from the other keeps its performer.
    PerformerContinuity(Role),
    /// The object pair must keep whole-show usage balanced.
    PairDistribution,
    /// Both objects may not swap roles relative to the previous run.
    NoFullReversal,
}

impl HardRule {
    /// Evaluation order used by [`ConstraintEngine::check`].
    pub const ORDER: [HardRule; 8] = [
        HardRule::DistinctPerformers,
        HardRule::DistinctObjects,
        HardRule::NoRepeatInRole(Role::A),
        HardRule::NoRepeatInRole(Role::B),
        HardRule::PerformerContinuity(Role::A),
        HardRule::PerformerContinuity(Role::B),
        HardRule::PairDistribution,
        HardRule::NoFullReversal,
    ];
}

impl fmt::Display for HardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistinctPerformers => f.write_str("same performer in both roles"),
            Self::DistinctObjects => f.write_str("same object in both roles"),
            Self::NoRepeatInRole(role) => write!(f, "{role} object same as previous run"),
            Self::PerformerContinuity(role) => write!(
                f,
                "{role} object switched from the other role with a different performer"
            ),
            Self::PairDistribution => f.write_str("object pair distribution out of bounds"),
            Self::NoFullReversal => f.write_str("full object swap across consecutive runs"),
        }
    }
}
