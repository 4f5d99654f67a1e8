//! Show order (solution) model.
//!
//! A show order is the committed sequence of runs, each with a Pair per
//! role, together with the segment layout it was produced under. An
//! audit may attach violations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ObjectPair, Pair, Performer, Role};
use crate::scheduler::SegmentPlan;

/// One committed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAssignment {
    /// Run number (1-based).
    pub number: usize,
    /// Role A pair.
    pub a: Pair,
    /// Role B pair.
    pub b: Pair,
}

impl RunAssignment {
    /// Creates a run record.
    pub fn new(number: usize, a: Pair, b: Pair) -> Self {
        Self { number, a, b }
    }

    /// The pair in `role`.
    pub fn pair(&self, role: Role) -> &Pair {
        match role {
            Role::A => &self.a,
            Role::B => &self.b,
        }
    }

    /// The underlying object pair.
    pub fn object_pair(&self) -> ObjectPair {
        ObjectPair::new(self.a.object.clone(), self.b.object.clone())
    }

    /// The role `performer` plays in this run, if any.
    pub fn role_of(&self, performer: &Performer) -> Option<Role> {
        if performer.is_unstaffed() {
            return None;
        }
        Role::ALL
            .into_iter()
            .find(|&role| &self.pair(role).performer == performer)
    }
}

/// A rule broken by a committed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Run the violation was found at (0 for order-wide findings).
    pub run: usize,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of order violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// One named performer holds both roles.
    DuplicatePerformer,
    /// One object holds both roles.
    DuplicateObject,
    /// A role keeps its object from the previous run.
    RepeatedObject,
    /// An object switched roles but changed performer.
    PerformerDiscontinuity,
    /// Both objects swapped roles relative to the previous run.
    FullReversal,
    /// Object-pair usage is outside the balanced band.
    PairImbalance,
}

impl Violation {
    /// Creates a violation at `run`.
    pub fn new(violation_type: ViolationType, run: usize, message: impl Into<String>) -> Self {
        let severity = match violation_type {
            ViolationType::DuplicatePerformer | ViolationType::DuplicateObject => 95,
            ViolationType::PerformerDiscontinuity => 90,
            ViolationType::RepeatedObject | ViolationType::FullReversal => 80,
            ViolationType::PairImbalance => 60,
        };
        Self {
            violation_type,
            run,
            message: message.into(),
            severity,
        }
    }
}

/// A complete run order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowOrder {
    /// Committed runs in order.
    pub runs: Vec<RunAssignment>,
    /// Segment layout the runs were scheduled under.
    pub segments: SegmentPlan,
    /// Violations found by an audit.
    pub violations: Vec<Violation>,
}

impl ShowOrder {
    /// Creates an empty order for the given segment layout.
    pub fn new(segments: SegmentPlan) -> Self {
        Self {
            runs: Vec::new(),
            segments,
            violations: Vec::new(),
        }
    }

    /// Appends a committed run.
    pub fn add_run(&mut self, run: RunAssignment) {
        self.runs.push(run);
    }

    /// Adds a violation.
    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether the order has no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of committed runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Finds a run by number.
    pub fn run(&self, number: usize) -> Option<&RunAssignment> {
        self.runs.iter().find(|r| r.number == number)
    }

    /// The object-pair sequence of the order.
    pub fn object_pairs(&self) -> Vec<ObjectPair> {
        self.runs.iter().map(RunAssignment::object_pair).collect()
    }

    /// How often each object pair occurs.
    pub fn pair_usage(&self) -> HashMap<ObjectPair, usize> {
        let mut usage = HashMap::new();
        for run in &self.runs {
            *usage.entry(run.object_pair()).or_insert(0) += 1;
        }
        usage
    }

    /// Runs `performer` works in, with the role played.
    pub fn runs_for_performer(&self, performer: &Performer) -> Vec<(&RunAssignment, Role)> {
        self.runs
            .iter()
            .filter_map(|run| run.role_of(performer).map(|role| (run, role)))
            .collect()
    }

    /// Consecutive run pairs that share a segment.
    pub fn consecutive_in_segment(&self) -> impl Iterator<Item = (&RunAssignment, &RunAssignment)> {
        self.runs
            .windows(2)
            .filter(|w| !self.segments.is_segment_start(w[1].number))
            .map(|w| (&w[0], &w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(number: usize, a: (&str, &str), b: (&str, &str)) -> RunAssignment {
        RunAssignment::new(number, Pair::new(a.0, a.1), Pair::new(b.0, b.1))
    }

    #[test]
    fn test_role_of() {
        let r = run(1, ("Shirt", "Moose"), ("Robot", "None"));
        assert_eq!(r.role_of(&Performer::new("Moose")), Some(Role::A));
        assert_eq!(r.role_of(&Performer::new("Luca")), None);
        assert_eq!(r.role_of(&Performer::Unstaffed), None);
    }

    #[test]
    fn test_pair_usage() {
        let mut order = ShowOrder::new(SegmentPlan::new(3, None, 0));
        order.add_run(run(1, ("X", "P1"), ("Y", "P2")));
        order.add_run(run(2, ("Y", "P2"), ("Z", "P1")));
        order.add_run(run(3, ("X", "P1"), ("Y", "P2")));

        let usage = order.pair_usage();
        assert_eq!(usage[&ObjectPair::new("X", "Y")], 2);
        assert_eq!(usage[&ObjectPair::new("Y", "Z")], 1);
        assert_eq!(order.runs_for_performer(&Performer::new("P1")).len(), 3);
    }

    #[test]
    fn test_consecutive_skips_segment_seams() {
        let mut order = ShowOrder::new(SegmentPlan::new(4, Some(2), 10));
        for n in 1..=4 {
            order.add_run(run(n, ("X", "P1"), ("Y", "P2")));
        }
        let seams: Vec<(usize, usize)> = order
            .consecutive_in_segment()
            .map(|(p, c)| (p.number, c.number))
            .collect();
        assert_eq!(seams, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_violation_severity() {
        let v = Violation::new(ViolationType::DuplicateObject, 3, "both roles hold X");
        assert_eq!(v.severity, 95);
        assert_eq!(v.run, 3);
    }
}
