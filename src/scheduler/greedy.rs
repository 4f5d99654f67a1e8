//! Segment-by-segment greedy run scheduler.
//!
//! # Algorithm
//!
//! 1. Plan the object pair of every run once ([`PairPlanner`]).
//! 2. For each segment, clear the engine's history.
//! 3. For each run in the segment, pick the best performers for the planned
//!    pair ([`RunSelector`]) and commit them.
//! 4. At the last run before an intermission, remember who partnered the
//!    default object so the next segment can avoid repeating them.
//!
//! Selection is greedy per run; nothing is revisited once committed. The
//! finished order is audited and carries any violations found.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::{DefaultPreference, RunSelector, SegmentPlan};
use crate::config::ShowConfig;
use crate::error::Result;
use crate::models::{Pair, Performer, RunAssignment, ShowOrder};
use crate::planner::{PairPlanner, STRICT_BACKTRACK_BUDGET};
use crate::pool::Pool;
use crate::rules::{ConstraintEngine, RunContext, ScoringWeights};
use crate::validation::attach_audit;

/// Input container for scheduling.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Resolved objects and roster.
    pub pool: Pool,
    /// Number of runs.
    pub run_count: usize,
    /// Intermission layout.
    pub segments: SegmentPlan,
    /// Object to favour next to intermissions.
    pub default_object: Option<String>,
    /// Which sides of an intermission favour the default object.
    pub preference: DefaultPreference,
    /// Soft-score weights.
    pub weights: ScoringWeights,
    /// Planner seed; OS entropy when `None`.
    pub seed: Option<u64>,
}

impl OrderRequest {
    /// Creates a request with no intermissions and standard weights.
    pub fn new(pool: Pool, run_count: usize) -> Self {
        Self {
            pool,
            run_count,
            segments: SegmentPlan::single(run_count),
            default_object: None,
            preference: DefaultPreference::default(),
            weights: ScoringWeights::default(),
            seed: None,
        }
    }

    /// Builds a request from a validated configuration.
    pub fn from_config(config: &ShowConfig) -> Result<Self> {
        let pool = Pool::build(&config.objects, &config.performers)?;
        Ok(Self {
            pool,
            run_count: config.show.run_count,
            segments: config.segment_plan(),
            default_object: config.default_object.clone(),
            preference: config.show.intermission.preference,
            weights: config.weights,
            seed: config.show.seed,
        })
    }

    /// Sets the intermission layout.
    pub fn with_segments(mut self, segments: SegmentPlan) -> Self {
        self.segments = segments;
        self
    }

    /// Sets the default object and where it is preferred.
    pub fn with_default_object(
        mut self,
        object: impl Into<String>,
        preference: DefaultPreference,
    ) -> Self {
        self.default_object = Some(object.into());
        self.preference = preference;
        self
    }

    /// Sets the soft-score weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Fixes the planner seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Greedy run-order scheduler.
///
/// # Example
///
/// ```
/// use run_order::models::{ObjectSpec, Performer};
/// use run_order::pool::Pool;
/// use run_order::scheduler::{OrderRequest, OrderScheduler};
///
/// let roster: Vec<Performer> = vec!["Moose".into(), "Luca".into(), "Ren".into()];
/// let objects = ["Shirt", "Hat", "Cape", "Cane"].map(ObjectSpec::open);
/// let pool = Pool::build(&objects, &roster).unwrap();
///
/// let request = OrderRequest::new(pool, 12).with_seed(7);
/// let order = OrderScheduler::new().schedule(&request).unwrap();
/// assert_eq!(order.run_count(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct OrderScheduler {
    strict_budget: u64,
}

impl OrderScheduler {
    /// Creates a scheduler.
    pub fn new() -> Self {
        Self {
            strict_budget: STRICT_BACKTRACK_BUDGET,
        }
    }

    /// Sets the planner's backtrack budget for the strict default pass.
    pub fn with_strict_budget(mut self, budget: u64) -> Self {
        self.strict_budget = budget;
        self
    }

    /// Schedules every run, seeding the planner from the request.
    pub fn schedule(&self, request: &OrderRequest) -> Result<ShowOrder> {
        let mut rng = match request.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        self.schedule_with_rng(request, &mut rng)
    }

    /// Schedules every run using `rng` for the planner's shuffles.
    pub fn schedule_with_rng<R: Rng + ?Sized>(
        &self,
        request: &OrderRequest,
        rng: &mut R,
    ) -> Result<ShowOrder> {
        let run_count = request.run_count;
        // The layout must span exactly the requested runs.
        let segments = &SegmentPlan::new(
            run_count,
            request.segments.every_n_runs(),
            request.segments.intermission_minutes(),
        );

        let mut planner = PairPlanner::new(request.pool.object_ids(), run_count)
            .with_segments(segments.clone())
            .with_strict_budget(self.strict_budget);
        if let Some(default) = &request.default_object {
            planner = planner.with_default_preference(default.clone(), request.preference);
        }
        let plan = planner.plan(rng)?;

        let mut engine = ConstraintEngine::new(&request.pool, run_count, &request.weights);
        let mut order = ShowOrder::new(segments.clone());
        let mut partner: Option<Performer> = None;

        for segment in segments.segments() {
            engine.reset();
            info!(
                event = "segment_start",
                segment = segment.index,
                first_run = segment.first_run,
                last_run = segment.last_run
            );

            for run in segment.runs() {
                let context = RunContext::at_run(run, run_count)
                    .with_after_intermission(segments.follows_intermission(run))
                    .with_intermission_partner(partner.clone())
                    .with_default_object(request.default_object.clone());
                let force_default = request.default_object.is_some()
                    && request.preference.prefers_default(run, segments);

                let (a, b) = RunSelector::select(
                    &engine,
                    &request.pool,
                    &plan[run - 1],
                    &context,
                    force_default,
                )?;
                debug!(event = "run_committed", run, a = %a, b = %b);

                if segments.precedes_intermission(run) {
                    partner = request
                        .default_object
                        .as_deref()
                        .and_then(|d| default_partner(&a, &b, d));
                }

                engine.commit(a.clone(), b.clone());
                order.add_run(RunAssignment::new(run, a, b));
            }
        }

        if !attach_audit(&mut order, &request.pool) {
            warn!(
                event = "audit_failed",
                violations = order.violations.len()
            );
        }

        info!(
            event = "schedule_end",
            runs = order.run_count(),
            segments = segments.segments().len()
        );
        Ok(order)
    }
}

impl Default for OrderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// The named performer opposite `default` in this run, if any.
fn default_partner(a: &Pair, b: &Pair, default: &str) -> Option<Performer> {
    let other = if a.object == default {
        b
    } else if b.object == default {
        a
    } else {
        return None;
    };
    (!other.is_unstaffed()).then(|| other.performer.clone())
}
