//! Run-order fairness metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Role A / Role B | Runs each performer spent in each role |
//! | Runs worked | Runs a performer appears in at all |
//! | Role gap | Largest \|A − B\| over the roster |
//! | Unstaffed slots | Role slots filled by nobody |
//! | Pair usage | Least and most uses of any ordered object pair |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Performer, Role, ShowOrder};
use crate::planner::PairUsage;
use crate::pool::Pool;

/// One performer's share of the show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformerLoad {
    pub performer: Performer,
    pub role_a: usize,
    pub role_b: usize,
    /// Uses per object, by object id.
    pub objects: BTreeMap<String, usize>,
}

impl PerformerLoad {
    fn new(performer: Performer) -> Self {
        Self {
            performer,
            role_a: 0,
            role_b: 0,
            objects: BTreeMap::new(),
        }
    }

    /// Runs worked in either role.
    pub fn runs(&self) -> usize {
        self.role_a + self.role_b
    }

    /// |Role A − Role B|.
    pub fn role_gap(&self) -> usize {
        self.role_a.abs_diff(self.role_b)
    }
}

/// Fairness indicators for a finished order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderKpi {
    /// Runs in the order.
    pub run_count: usize,
    /// Per-performer loads in roster order.
    pub loads: Vec<PerformerLoad>,
    /// Role slots with no performer.
    pub unstaffed_slots: usize,
    /// Fewest uses of any ordered object pair.
    pub pair_usage_min: usize,
    /// Most uses of any ordered object pair.
    pub pair_usage_max: usize,
}

impl OrderKpi {
    /// Computes KPIs for `order` over `pool`'s roster and objects.
    pub fn calculate(order: &ShowOrder, pool: &Pool) -> Self {
        let mut loads: Vec<PerformerLoad> = pool
            .named_performers()
            .into_iter()
            .map(PerformerLoad::new)
            .collect();
        let mut unstaffed_slots = 0;
        let mut usage = PairUsage::for_objects(&pool.object_ids(), order.run_count());

        for run in &order.runs {
            usage.record(&run.object_pair());
            for role in Role::ALL {
                let pair = run.pair(role);
                if pair.is_unstaffed() {
                    unstaffed_slots += 1;
                    continue;
                }
                if let Some(load) = loads.iter_mut().find(|l| l.performer == pair.performer) {
                    match role {
                        Role::A => load.role_a += 1,
                        Role::B => load.role_b += 1,
                    }
                    *load.objects.entry(pair.object.clone()).or_insert(0) += 1;
                }
            }
        }

        let (pair_usage_min, pair_usage_max) = usage.spread();
        Self {
            run_count: order.run_count(),
            loads,
            unstaffed_slots,
            pair_usage_min,
            pair_usage_max,
        }
    }

    /// Load of `performer`, if on the roster.
    pub fn load(&self, performer: &Performer) -> Option<&PerformerLoad> {
        self.loads.iter().find(|l| &l.performer == performer)
    }

    /// Largest role gap of any performer.
    pub fn max_role_gap(&self) -> usize {
        self.loads.iter().map(PerformerLoad::role_gap).max().unwrap_or(0)
    }

    /// Difference between the busiest and idlest performer.
    pub fn workload_spread(&self) -> usize {
        let runs = self.loads.iter().map(PerformerLoad::runs);
        match (runs.clone().max(), runs.min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    /// Whether the order meets the given fairness thresholds.
    pub fn meets_thresholds(&self, max_role_gap: usize, max_workload_spread: usize) -> bool {
        self.max_role_gap() <= max_role_gap && self.workload_spread() <= max_workload_spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObjectSpec, Pair, RunAssignment};
    use crate::scheduler::SegmentPlan;

    fn pool() -> Pool {
        Pool::build(
            &[
                ObjectSpec::open("X"),
                ObjectSpec::open("Y"),
                ObjectSpec::restricted("Z", ["None"]),
            ],
            &["P1".into(), "P2".into(), "P3".into()],
        )
        .unwrap()
    }

    fn order() -> ShowOrder {
        let mut order = ShowOrder::new(SegmentPlan::single(3));
        order.add_run(RunAssignment::new(1, Pair::new("X", "P1"), Pair::new("Y", "P2")));
        order.add_run(RunAssignment::new(2, Pair::new("Y", "P2"), Pair::new("Z", "None")));
        order.add_run(RunAssignment::new(3, Pair::new("Z", "None"), Pair::new("X", "P1")));
        order
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = OrderKpi::calculate(&order(), &pool());
        assert_eq!(kpi.run_count, 3);
        assert_eq!(kpi.unstaffed_slots, 2);
        assert_eq!(kpi.loads.len(), 3);

        let p1 = kpi.load(&Performer::new("P1")).unwrap();
        assert_eq!((p1.role_a, p1.role_b), (1, 1));
        assert_eq!(p1.objects.get("X"), Some(&2));

        let p2 = kpi.load(&Performer::new("P2")).unwrap();
        assert_eq!((p2.role_a, p2.role_b), (1, 1));
        assert_eq!(p2.role_gap(), 0);

        let p3 = kpi.load(&Performer::new("P3")).unwrap();
        assert_eq!(p3.runs(), 0);
    }

    #[test]
    fn test_pair_usage_spread() {
        let kpi = OrderKpi::calculate(&order(), &pool());
        // 6 ordered pairs, 3 used once.
        assert_eq!((kpi.pair_usage_min, kpi.pair_usage_max), (0, 1));
    }

    #[test]
    fn test_thresholds() {
        let kpi = OrderKpi::calculate(&order(), &pool());
        assert_eq!(kpi.max_role_gap(), 0);
        assert_eq!(kpi.workload_spread(), 2);
        assert!(kpi.meets_thresholds(0, 2));
        assert!(!kpi.meets_thresholds(0, 1));
    }

    #[test]
    fn test_serializes() {
        let kpi = OrderKpi::calculate(&order(), &pool());
        let json = serde_json::to_value(&kpi).unwrap();
        assert_eq!(json["unstaffed_slots"], 2);
        assert_eq!(json["loads"][0]["performer"], "P1");
    }
}
