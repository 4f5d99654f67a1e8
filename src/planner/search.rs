//! Depth-first backtracking over object pairs.
//!
//! # Algorithm
//!
//! 1. For the next run, keep every pair that passes the balance check
//!    ([`PairUsage::admits`]) and, within a segment, neither keeps an object
//!    in its role nor swaps both objects relative to the previous run.
//! 2. Shuffle the survivors, then stable-sort them: default-object pairs
//!    first at preferred runs, then by ascending usage.
//! 3. Take the first candidate and descend. When a run has no candidates
//!    left, pop its frame and undo the choice that led there.
//!
//! Frames live on an explicit stack, so rollback is a pop plus one count
//! decrement and the depth is bounded by the run count, not the call stack.
//!
//! When a default preference is configured the search first runs in strict
//! mode (only default-object pairs at preferred runs) under a backtrack
//! budget, and falls back to the ordering-only preference if that fails.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace, warn};

use super::PairUsage;
use crate::error::{Result, ScheduleError};
use crate::models::ObjectPair;
use crate::scheduler::{DefaultPreference, SegmentPlan};

/// Backtracks allowed for the strict default-object pass.
pub const STRICT_BACKTRACK_BUDGET: u64 = 100_000;

/// Backtracks after which an unbudgeted pass logs a warning.
pub const SLOW_SEARCH_BACKTRACKS: u64 = 1_000_000;

/// Plans the object pair for every run.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use run_order::planner::PairPlanner;
///
/// let objects: Vec<String> = ["Shirt", "Hat", "Cape", "Robot"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let plan = PairPlanner::new(objects, 12).plan(&mut rng).unwrap();
/// assert_eq!(plan.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct PairPlanner {
    objects: Vec<String>,
    run_count: usize,
    segments: SegmentPlan,
    default_object: Option<String>,
    preference: DefaultPreference,
    strict_budget: u64,
}

struct Frame {
    candidates: Vec<usize>,
    next: usize,
}

enum Outcome {
    Found(Vec<usize>),
    Exhausted,
    BudgetSpent,
}

impl PairPlanner {
    /// Creates a planner over `objects` for `run_count` runs, one segment.
    pub fn new(objects: Vec<String>, run_count: usize) -> Self {
        Self {
            objects,
            run_count,
            segments: SegmentPlan::single(run_count),
            default_object: None,
            preference: DefaultPreference::default(),
            strict_budget: STRICT_BACKTRACK_BUDGET,
        }
    }

    /// Sets the segment layout; consecutive-run exclusions stop at seams.
    pub fn with_segments(mut self, segments: SegmentPlan) -> Self {
        self.segments = segments;
        self
    }

    /// Prefers pairs holding `object` at the runs `preference` selects.
    pub fn with_default_preference(
        mut self,
        object: impl Into<String>,
        preference: DefaultPreference,
    ) -> Self {
        self.default_object = Some(object.into());
        self.preference = preference;
        self
    }

    /// Sets the backtrack budget of the strict default-object pass.
    pub fn with_strict_budget(mut self, budget: u64) -> Self {
        self.strict_budget = budget;
        self
    }

    /// Runs the search.
    ///
    /// Returns [`ScheduleError::InfeasibleDistribution`] if no sequence
    /// satisfies the balance and consecutive-run rules.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<ObjectPair>> {
        let usage = PairUsage::for_objects(&self.objects, self.run_count);
        if self.run_count == 0 {
            return Ok(Vec::new());
        }

        info!(
            event = "plan_start",
            runs = self.run_count,
            objects = self.objects.len(),
            pairs = usage.pair_count(),
            base = usage.base(),
            remainder = usage.remainder(),
        );

        let strict = self.default_object.is_some() && self.preference.is_enabled();
        let mut backtracks = 0;

        if strict {
            match self.search(usage.clone(), true, Some(self.strict_budget), &mut backtracks, rng) {
                Outcome::Found(sequence) => return Ok(self.finish(&usage, sequence, backtracks)),
                Outcome::Exhausted | Outcome::BudgetSpent => {
                    debug!(
                        event = "strict_default_failed",
                        backtracks,
                        "no plan places the default object at every preferred run; relaxing"
                    );
                }
            }
        }

        match self.search(usage.clone(), false, None, &mut backtracks, rng) {
            Outcome::Found(sequence) => Ok(self.finish(&usage, sequence, backtracks)),
            Outcome::Exhausted | Outcome::BudgetSpent => Err(ScheduleError::InfeasibleDistribution {
                run_count: self.run_count,
                object_count: self.objects.len(),
                pair_count: usage.pair_count(),
                backtracks,
            }),
        }
    }

    fn finish(&self, usage: &PairUsage, sequence: Vec<usize>, backtracks: u64) -> Vec<ObjectPair> {
        info!(event = "plan_end", runs = sequence.len(), backtracks);
        sequence
            .into_iter()
            .map(|i| usage.pairs()[i].clone())
            .collect()
    }

    fn search<R: Rng + ?Sized>(
        &self,
        mut usage: PairUsage,
        strict: bool,
        budget: Option<u64>,
        backtracks: &mut u64,
        rng: &mut R,
    ) -> Outcome {
        let mut spent = 0;
        let mut sequence: Vec<usize> = Vec::with_capacity(self.run_count);
        let mut stack = vec![Frame {
            candidates: self.candidates(1, &usage, None, strict, rng),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&choice) = frame.candidates.get(frame.next) else {
                stack.pop();
                if let Some(undone) = sequence.pop() {
                    usage.decrement(undone);
                    *backtracks += 1;
                    spent += 1;
                    trace!(event = "backtrack", run = sequence.len() + 1, pair = %usage.pairs()[undone]);
                    if budget.is_none() && spent == SLOW_SEARCH_BACKTRACKS {
                        warn!(
                            event = "slow_search",
                            backtracks = *backtracks,
                            runs = self.run_count,
                            "pair search is still backtracking; the layout may be infeasible"
                        );
                    }
                    if budget.is_some_and(|b| spent >= b) {
                        return Outcome::BudgetSpent;
                    }
                }
                continue;
            };
            frame.next += 1;

            usage.increment(choice);
            sequence.push(choice);
            if sequence.len() == self.run_count {
                return Outcome::Found(sequence);
            }

            let run = sequence.len() + 1;
            let previous = if self.segments.is_segment_start(run) {
                None
            } else {
                Some(usage.pairs()[choice].clone())
            };
            let candidates = self.candidates(run, &usage, previous.as_ref(), strict, rng);
            stack.push(Frame {
                candidates,
                next: 0,
            });
        }

        Outcome::Exhausted
    }

    /// Ordered candidate indices for `run` (1-based).
    fn candidates<R: Rng + ?Sized>(
        &self,
        run: usize,
        usage: &PairUsage,
        previous: Option<&ObjectPair>,
        strict: bool,
        rng: &mut R,
    ) -> Vec<usize> {
        let remaining = self.run_count - run;
        let preferred = self
            .default_object
            .as_deref()
            .filter(|_| self.preference.prefers_default(run, &self.segments));

        let mut candidates: Vec<usize> = (0..usage.pair_count())
            .filter(|&i| {
                let pair = &usage.pairs()[i];
                if let Some(prev) = previous {
                    if pair.shares_position_with(prev) || pair.is_reversal_of(prev) {
                        return false;
                    }
                }
                if strict && preferred.is_some_and(|d| !pair.contains(d)) {
                    return false;
                }
                usage.admits(i, remaining)
            })
            .collect();

        candidates.shuffle(rng);
        candidates.sort_by_key(|&i| {
            let misses_default = preferred.is_some_and(|d| !usage.pairs()[i].contains(d));
            (misses_default, usage.count(i))
        });
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn objects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn assert_consecutive_rules(plan: &[ObjectPair], segments: &SegmentPlan) {
        for (i, w) in plan.windows(2).enumerate() {
            let run = i + 2;
            if segments.is_segment_start(run) {
                continue;
            }
            assert!(!w[1].shares_position_with(&w[0]), "run {run}: {} after {}", w[1], w[0]);
            assert!(!w[1].is_reversal_of(&w[0]), "run {run}: {} reverses {}", w[1], w[0]);
        }
    }

    fn assert_balanced(plan: &[ObjectPair], objs: &[String]) {
        let mut usage = PairUsage::for_objects(objs, plan.len());
        for pair in plan {
            usage.record(pair);
        }
        assert!(usage.is_balanced(), "unbalanced spread {:?}", usage.spread());
    }

    #[test]
    fn test_four_objects_each_pair_once() {
        let objs = objects(&["Shirt", "Hat", "Cape", "Robot"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = PairPlanner::new(objs.clone(), 12).plan(&mut rng).unwrap();

        assert_eq!(plan.len(), 12);
        assert_balanced(&plan, &objs);
        assert_consecutive_rules(&plan, &SegmentPlan::single(12));
        for pair in &plan {
            assert_ne!(pair.a, pair.b);
        }
    }

    #[test]
    fn test_three_objects_split_into_two_cycles() {
        // With three objects (a, b) can only be followed by (b, c) or (c, a),
        // so one segment never reaches the three pairs of the other cycle.
        let objs = objects(&["Shirt", "Hat", "Robot"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = PairPlanner::new(objs.clone(), 3).plan(&mut rng).unwrap();
        assert_consecutive_rules(&plan, &SegmentPlan::single(3));

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = PairPlanner::new(objs, 6).plan(&mut rng);
        assert!(matches!(result, Err(ScheduleError::InfeasibleDistribution { .. })));
    }

    #[test]
    fn test_exhausted_search_reports_backtracks() {
        let objs = objects(&["Shirt", "Hat", "Robot"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = PairPlanner::new(objs, 12).plan(&mut rng).unwrap_err();
        match err {
            ScheduleError::InfeasibleDistribution {
                run_count,
                pair_count,
                backtracks,
                ..
            } => {
                assert_eq!((run_count, pair_count), (12, 6));
                assert!(backtracks > 0);
                assert!(backtracks < SLOW_SEARCH_BACKTRACKS);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_balance_with_remainder_and_segments() {
        let objs = objects(&["A", "B", "C", "D"]);
        let segments = SegmentPlan::new(30, Some(5), 10);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = PairPlanner::new(objs.clone(), 30)
            .with_segments(segments.clone())
            .plan(&mut rng)
            .unwrap();

        assert_eq!(plan.len(), 30);
        assert_balanced(&plan, &objs);
        assert_consecutive_rules(&plan, &segments);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let objs = objects(&["A", "B", "C", "D"]);
        let planner = PairPlanner::new(objs, 17);
        let first = planner.plan(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let second = planner.plan(&mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_object_is_infeasible() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = PairPlanner::new(objects(&["Solo"]), 2).plan(&mut rng).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InfeasibleDistribution {
                run_count: 2,
                pair_count: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_two_objects_cannot_alternate_without_reversal() {
        // (X, Y) may only be followed by (Y, X), which is a full reversal.
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = PairPlanner::new(objects(&["X", "Y"]), 4).plan(&mut rng);
        assert!(matches!(result, Err(ScheduleError::InfeasibleDistribution { .. })));
    }

    #[test]
    fn test_two_objects_across_segments() {
        // One run per segment leaves no consecutive pairs to constrain.
        let segments = SegmentPlan::new(4, Some(1), 5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let plan = PairPlanner::new(objects(&["X", "Y"]), 4)
            .with_segments(segments)
            .plan(&mut rng)
            .unwrap();
        assert_balanced(&plan, &objects(&["X", "Y"]));
    }

    #[test]
    fn test_default_object_at_intermission_seam() {
        let objs = objects(&["Shirt", "Hat", "Robot"]);
        let segments = SegmentPlan::new(6, Some(3), 15);
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let plan = PairPlanner::new(objs.clone(), 6)
                .with_segments(segments.clone())
                .with_default_preference("Robot", DefaultPreference::both())
                .plan(&mut rng)
                .unwrap();
            assert!(plan[2].contains("Robot"), "seed {seed}: run 3 is {}", plan[2]);
            assert!(plan[3].contains("Robot"), "seed {seed}: run 4 is {}", plan[3]);
            assert_balanced(&plan, &objs);
            assert_consecutive_rules(&plan, &segments);
        }
    }

    #[test]
    fn test_zero_budget_falls_back_to_relaxed() {
        let objs = objects(&["Shirt", "Hat", "Robot"]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = PairPlanner::new(objs.clone(), 6)
            .with_segments(SegmentPlan::new(6, Some(3), 15))
            .with_default_preference("Robot", DefaultPreference::both())
            .with_strict_budget(0)
            .plan(&mut rng)
            .unwrap();
        assert_balanced(&plan, &objs);
    }

    #[test]
    fn test_zero_runs() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(PairPlanner::new(objects(&["X"]), 0).plan(&mut rng).unwrap().is_empty());
    }
}
