//! Hard-rule checks, soft scoring, and committed state.

use tracing::trace;

use super::scoring::{Candidate, Scorer, ScoringWeights};
use super::{FairnessCounts, HardRule, RunContext};
use crate::models::{ObjectPair, Pair, Role};
use crate::planner::PairUsage;
use crate::pool::Pool;

/// A committed run as the engine remembers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub a: Pair,
    pub b: Pair,
}

impl HistoryEntry {
    pub fn new(a: Pair, b: Pair) -> Self {
        Self { a, b }
    }

    /// Pair placed in `role`.
    pub fn pair(&self, role: Role) -> &Pair {
        match role {
            Role::A => &self.a,
            Role::B => &self.b,
        }
    }
}

/// Validates and scores candidate runs against committed state.
///
/// History is per segment and cleared by [`reset`](Self::reset); fairness
/// counts and pair usage accumulate for the whole show.
#[derive(Debug, Clone)]
pub struct ConstraintEngine {
    history: Vec<HistoryEntry>,
    counts: FairnessCounts,
    usage: PairUsage,
    scorer: Scorer,
}

impl ConstraintEngine {
    /// Creates an engine for `run_count` runs over `pool`, scoring with the
    /// standard rules at `weights`.
    pub fn new(pool: &Pool, run_count: usize, weights: &ScoringWeights) -> Self {
        let objects = pool.object_ids();
        Self {
            history: Vec::new(),
            counts: FairnessCounts::new(pool.roster(), &objects),
            usage: PairUsage::for_objects(&objects, run_count),
            scorer: Scorer::standard(weights),
        }
    }

    /// Replaces the soft-rule scorer.
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Runs committed since the last reset, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Most recent committed run in the current segment.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// Whole-show fairness tallies.
    pub fn counts(&self) -> &FairnessCounts {
        &self.counts
    }

    /// Whole-show object-pair usage.
    pub fn usage(&self) -> &PairUsage {
        &self.usage
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Checks every hard rule in order and returns the first one violated.
    pub fn check(&self, a: &Pair, b: &Pair, context: &RunContext) -> Result<(), HardRule> {
        let result = HardRule::ORDER
            .into_iter()
            .find(|&rule| !self.satisfies(rule, a, b, context))
            .map_or(Ok(()), Err);
        if let Err(rule) = result {
            trace!(
                event = "candidate_rejected",
                run = context.run,
                a = %a,
                b = %b,
                rule = %rule
            );
        }
        result
    }

    /// Whether `a`/`b` satisfies `rule`.
    pub fn satisfies(&self, rule: HardRule, a: &Pair, b: &Pair, context: &RunContext) -> bool {
        let candidate = Candidate::new(a, b);
        match rule {
            HardRule::DistinctPerformers => {
                a.is_unstaffed() || b.is_unstaffed() || a.performer != b.performer
            }
            HardRule::DistinctObjects => a.object != b.object,
            HardRule::NoRepeatInRole(role) => match self.last() {
                Some(last) => last.pair(role).object != candidate.pair(role).object,
                None => true,
            },
            HardRule::PerformerContinuity(role) => match self.last() {
                Some(last) => {
                    let proposed = candidate.pair(role);
                    let previous = last.pair(role.other());
                    proposed.object != previous.object || proposed.performer == previous.performer
                }
                None => true,
            },
            HardRule::PairDistribution => self.usage.admits_pair(
                &ObjectPair::new(a.object.clone(), b.object.clone()),
                context.remaining_runs(),
            ),
            HardRule::NoFullReversal => match self.last() {
                Some(last) => !(a.object == last.b.object && b.object == last.a.object),
                None => true,
            },
        }
    }

    /// Soft score of `a`/`b`; higher is better.
    pub fn score(&self, a: &Pair, b: &Pair, context: &RunContext) -> i64 {
        self.scorer.score(&Candidate::new(a, b), self, context)
    }

    /// Per-rule soft score contributions of `a`/`b`.
    pub fn score_breakdown(
        &self,
        a: &Pair,
        b: &Pair,
        context: &RunContext,
    ) -> Vec<(&'static str, i64)> {
        self.scorer.breakdown(&Candidate::new(a, b), self, context)
    }

    /// Records a chosen run.
    pub fn commit(&mut self, a: Pair, b: Pair) {
        self.counts.apply(Role::A, &a);
        self.counts.apply(Role::B, &b);
        self.usage
            .record(&ObjectPair::new(a.object.clone(), b.object.clone()));
        self.history.push(HistoryEntry::new(a, b));
    }

    /// Clears the segment history at an intermission. Counts and usage persist.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObjectSpec, Performer};
    use crate::rules::scoring::EndRunUnstaffed;

    fn pool() -> Pool {
        let roster: Vec<Performer> = vec!["Moose".into(), "Luca".into(), "Ren".into()];
        Pool::build(
            &[
                ObjectSpec::open("Shirt"),
                ObjectSpec::open("Hat"),
                ObjectSpec::open("Cane"),
                ObjectSpec::restricted("Robot", ["None"]),
            ],
            &roster,
        )
        .unwrap()
    }

    fn engine() -> ConstraintEngine {
        ConstraintEngine::new(&pool(), 12, &ScoringWeights::default())
    }

    fn ctx(run: usize) -> RunContext {
        RunContext::at_run(run, 12)
    }

    #[test]
    fn test_distinct_performers() {
        let e = engine();
        let err = e.check(&Pair::new("Shirt", "Moose"), &Pair::new("Hat", "Moose"), &ctx(1));
        assert_eq!(err, Err(HardRule::DistinctPerformers));
        assert!(e
            .check(&Pair::new("Robot", "None"), &Pair::new("Hat", "Moose"), &ctx(1))
            .is_ok());
    }

    #[test]
    fn test_distinct_objects() {
        let e = engine();
        let err = e.check(&Pair::new("Hat", "Moose"), &Pair::new("Hat", "Luca"), &ctx(1));
        assert_eq!(err, Err(HardRule::DistinctObjects));
    }

    #[test]
    fn test_no_repeat_in_role() {
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        let err = e.check(&Pair::new("Shirt", "Ren"), &Pair::new("Cane", "Luca"), &ctx(2));
        assert_eq!(err, Err(HardRule::NoRepeatInRole(Role::A)));
        let err = e.check(&Pair::new("Cane", "Ren"), &Pair::new("Hat", "Moose"), &ctx(2));
        assert_eq!(err, Err(HardRule::NoRepeatInRole(Role::B)));
    }

    #[test]
    fn test_performer_continuity() {
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        // Hat moves B -> A; must stay with Luca.
        let err = e.check(&Pair::new("Hat", "Ren"), &Pair::new("Cane", "Moose"), &ctx(2));
        assert_eq!(err, Err(HardRule::PerformerContinuity(Role::A)));
        assert!(e
            .check(&Pair::new("Hat", "Luca"), &Pair::new("Cane", "Moose"), &ctx(2))
            .is_ok());
        // Shirt moves A -> B; must stay with Moose.
        let err = e.check(&Pair::new("Cane", "Luca"), &Pair::new("Shirt", "Ren"), &ctx(2));
        assert_eq!(err, Err(HardRule::PerformerContinuity(Role::B)));
    }

    #[test]
    fn test_full_reversal() {
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        let err = e.check(&Pair::new("Hat", "Luca"), &Pair::new("Shirt", "Moose"), &ctx(2));
        assert_eq!(err, Err(HardRule::NoFullReversal));
    }

    #[test]
    fn test_pair_distribution() {
        // 4 objects, 12 ordered pairs, 12 runs: each pair exactly once.
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        e.reset();
        let err = e.check(&Pair::new("Shirt", "Ren"), &Pair::new("Hat", "Moose"), &ctx(2));
        assert_eq!(err, Err(HardRule::PairDistribution));
    }

    #[test]
    fn test_reset_keeps_counts() {
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        e.reset();
        assert!(e.history().is_empty());
        assert_eq!(e.counts().role_count(&Performer::new("Moose"), Role::A), 1);
        assert_eq!(e.usage().total(), 1);
        // Previous-run rules do not reach across the reset.
        assert!(e
            .check(&Pair::new("Shirt", "Luca"), &Pair::new("Cane", "Moose"), &ctx(2))
            .is_ok());
    }

    #[test]
    fn test_score_prefers_fresh_pairs() {
        let mut e = engine();
        e.commit(Pair::new("Shirt", "Moose"), Pair::new("Hat", "Luca"));
        let c = ctx(2);
        let fresh = e.score(&Pair::new("Cane", "Ren"), &Pair::new("Shirt", "Moose"), &c);
        let stale = e.score(&Pair::new("Cane", "Ren"), &Pair::new("Hat", "Luca"), &c);
        assert!(fresh > stale);
        let parts = e.score_breakdown(&Pair::new("Cane", "Ren"), &Pair::new("Shirt", "Moose"), &c);
        assert_eq!(parts.iter().map(|(_, v)| v).sum::<i64>(), fresh);
    }

    #[test]
    fn test_custom_scorer() {
        let e = engine().with_scorer(Scorer::new().with_rule(EndRunUnstaffed { penalty: 7 }));
        assert_eq!(e.scorer().len(), 1);
        let robot = Pair::new("Robot", "None");
        let hat = Pair::new("Hat", "Moose");
        assert_eq!(e.score(&robot, &hat, &ctx(1)), -7);
        assert_eq!(e.score(&robot, &hat, &ctx(2)), 0);
        assert_eq!(e.score_breakdown(&robot, &hat, &ctx(12)), vec![("end_run", -7)]);
    }
}
