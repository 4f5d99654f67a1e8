//! Per-run performer selection.
//!
//! # Algorithm
//!
//! 1. At a run that prefers the default object, if the planned pair holds
//!    it and it can go unstaffed, pin that role to `(default, None)` and
//!    score only the other role's candidates.
//! 2. Otherwise, or if the pinned search yields nothing, enumerate every
//!    Role A candidate × Role B candidate.
//! 3. Drop combinations failing a hard rule; keep the strictly best score.
//!    Equal scores keep the first found, in pool order.
//!
//! # Complexity
//! O(a × b) engine checks, where a and b are the eligible performer counts.

use crate::error::{Result, ScheduleError};
use crate::models::{ObjectPair, Pair, Performer, Role};
use crate::pool::Pool;
use crate::rules::{ConstraintEngine, HardRule, RunContext};

/// Chooses the performers for one planned run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSelector;

#[derive(Default)]
struct Attempts {
    last_attempt: Option<(Pair, Pair)>,
    last_rejection: Option<HardRule>,
}

impl RunSelector {
    /// Picks the best (Role A, Role B) pairs for `planned`.
    ///
    /// Fails with [`ScheduleError::InfeasibleRun`] when no combination
    /// passes every hard rule.
    pub fn select(
        engine: &ConstraintEngine,
        pool: &Pool,
        planned: &ObjectPair,
        context: &RunContext,
        force_default: bool,
    ) -> Result<(Pair, Pair)> {
        let candidates_a = pool.candidates(&planned.a);
        let candidates_b = pool.candidates(&planned.b);
        let mut attempts = Attempts::default();

        if force_default {
            if let Some(pinned) = Self::pinned(pool, planned, context) {
                let (a, b) = match pinned {
                    (Role::A, pair) => (vec![pair], candidates_b.clone()),
                    (Role::B, pair) => (candidates_a.clone(), vec![pair]),
                };
                if let Some(best) = Self::best(engine, &a, &b, context, &mut attempts) {
                    return Ok(best);
                }
            }
        }

        Self::best(engine, &candidates_a, &candidates_b, context, &mut attempts).ok_or_else(|| {
            ScheduleError::InfeasibleRun {
                run: context.run,
                object_a: planned.a.clone(),
                object_b: planned.b.clone(),
                candidates_a,
                candidates_b,
                last_attempt: attempts.last_attempt,
                last_rejection: attempts.last_rejection,
            }
        })
    }

    /// The role holding the default object and its unstaffed pair, if the
    /// default is planned for this run and may go unstaffed.
    fn pinned(pool: &Pool, planned: &ObjectPair, context: &RunContext) -> Option<(Role, Pair)> {
        let default = context.default_object.as_deref()?;
        if !pool.object(default)?.allows_unstaffed() {
            return None;
        }
        Role::ALL
            .into_iter()
            .find(|&role| planned.object(role) == default)
            .map(|role| (role, Pair::new(default, Performer::Unstaffed)))
    }

    fn best(
        engine: &ConstraintEngine,
        candidates_a: &[Pair],
        candidates_b: &[Pair],
        context: &RunContext,
        attempts: &mut Attempts,
    ) -> Option<(Pair, Pair)> {
        let mut best: Option<(&Pair, &Pair, i64)> = None;
        for a in candidates_a {
            for b in candidates_b {
                if let Err(rule) = engine.check(a, b, context) {
                    attempts.last_attempt = Some((a.clone(), b.clone()));
                    attempts.last_rejection = Some(rule);
                    continue;
                }
                let score = engine.score(a, b, context);
                if best.map_or(true, |(_, _, s)| score > s) {
                    best = Some((a, b, score));
                }
            }
        }
        best.map(|(a, b, _)| (a.clone(), b.clone()))
    }
}
