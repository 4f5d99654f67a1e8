//! Object-pair usage counts and the balance feasibility check.
//!
//! With `P` pairs and `N` runs every pair must end up used either
//! `base = N / P` or `base + 1` times, and exactly `remainder = N % P`
//! pairs get the extra use. [`PairUsage::admits`] answers whether one more
//! use of a pair still leaves a completion that meets that band.

use std::collections::HashMap;

use crate::models::ObjectPair;

/// Cumulative usage of each ordered object pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairUsage {
    pairs: Vec<ObjectPair>,
    index: HashMap<ObjectPair, usize>,
    counts: Vec<usize>,
    base: usize,
    remainder: usize,
}

impl PairUsage {
    /// Creates zeroed counts for `pairs` over `run_count` runs.
    pub fn new(pairs: Vec<ObjectPair>, run_count: usize) -> Self {
        let (base, remainder) = if pairs.is_empty() {
            (0, 0)
        } else {
            (run_count / pairs.len(), run_count % pairs.len())
        };
        let index = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let counts = vec![0; pairs.len()];
        Self {
            pairs,
            index,
            counts,
            base,
            remainder,
        }
    }

    /// Creates counts over every ordered pair of distinct `objects`.
    pub fn for_objects(objects: &[String], run_count: usize) -> Self {
        Self::new(ObjectPair::all_ordered(objects), run_count)
    }

    /// Tracked pairs.
    pub fn pairs(&self) -> &[ObjectPair] {
        &self.pairs
    }

    /// Number of tracked pairs.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Minimum uses every pair must reach.
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of pairs that get one extra use.
    #[inline]
    pub fn remainder(&self) -> usize {
        self.remainder
    }

    /// Index of `pair`, if tracked.
    pub fn index_of(&self, pair: &ObjectPair) -> Option<usize> {
        self.index.get(pair).copied()
    }

    /// Uses of the pair at `index`.
    #[inline]
    pub fn count(&self, index: usize) -> usize {
        self.counts[index]
    }

    /// Uses of `pair` (0 if untracked).
    pub fn count_of(&self, pair: &ObjectPair) -> usize {
        self.index_of(pair).map(|i| self.counts[i]).unwrap_or(0)
    }

    /// Whether one more use of the pair at `index`, followed by
    /// `remaining_runs` further runs, can still end balanced.
    pub fn admits(&self, index: usize, remaining_runs: usize) -> bool {
        let current = self.counts[index];
        let next = current + 1;
        if next > self.base + 1 {
            return false;
        }

        let mut extra_used: usize = self
            .counts
            .iter()
            .map(|&c| c.saturating_sub(self.base))
            .sum();
        if current >= self.base {
            extra_used += 1;
        }
        if extra_used > self.remainder {
            return false;
        }

        let required_min: usize = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let c = if i == index { next } else { c };
                self.base.saturating_sub(c)
            })
            .sum();
        if required_min > remaining_runs {
            return false;
        }

        let extra_needed = self.remainder - extra_used;
        let available = remaining_runs - required_min;
        available >= extra_needed
    }

    /// [`admits`](Self::admits) by pair; untracked pairs are always admitted.
    pub fn admits_pair(&self, pair: &ObjectPair, remaining_runs: usize) -> bool {
        match self.index_of(pair) {
            Some(i) => self.admits(i, remaining_runs),
            None => true,
        }
    }

    /// Records one use of the pair at `index`.
    #[inline]
    pub fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    /// Undoes one use of the pair at `index`.
    #[inline]
    pub fn decrement(&mut self, index: usize) {
        self.counts[index] -= 1;
    }

    /// Records one use of `pair`; untracked pairs are ignored.
    pub fn record(&mut self, pair: &ObjectPair) {
        if let Some(i) = self.index_of(pair) {
            self.increment(i);
        }
    }

    /// Total recorded uses.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// (least, most) uses of any pair; `(0, 0)` when no pairs are tracked.
    pub fn spread(&self) -> (usize, usize) {
        let min = self.counts.iter().copied().min().unwrap_or(0);
        let max = self.counts.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    /// Whether the final counts sit in `[base, base + 1]` with exactly
    /// `remainder` pairs at the upper value.
    pub fn is_balanced(&self) -> bool {
        let in_band = self
            .counts
            .iter()
            .all(|&c| c >= self.base && c <= self.base + 1);
        let over = self.counts.iter().filter(|&&c| c > self.base).count();
        in_band && over == self.remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_and_remainder() {
        let usage = PairUsage::for_objects(&objects(&["X", "Y", "Z"]), 8);
        assert_eq!(usage.pair_count(), 6);
        assert_eq!(usage.base(), 1);
        assert_eq!(usage.remainder(), 2);
    }

    #[test]
    fn test_rejects_third_use_when_band_is_one_two() {
        let mut usage = PairUsage::for_objects(&objects(&["X", "Y", "Z"]), 8);
        usage.increment(0);
        usage.increment(0);
        assert!(!usage.admits(0, 5));
    }

    #[test]
    fn test_rejects_extra_beyond_remainder() {
        // 6 pairs over 7 runs: base 1, remainder 1.
        let mut usage = PairUsage::for_objects(&objects(&["X", "Y", "Z"]), 7);
        usage.increment(0);
        usage.increment(0);
        usage.increment(1);
        // Pair 1 going to 2 would be a second over-base use.
        assert!(!usage.admits(1, 3));
        assert!(usage.admits(2, 3));
    }

    #[test]
    fn test_rejects_when_minimums_cannot_be_met() {
        // 6 pairs, 6 runs: each exactly once.
        let mut usage = PairUsage::for_objects(&objects(&["X", "Y", "Z"]), 6);
        usage.increment(0);
        // Using pair 0 again is over base with remainder 0.
        assert!(!usage.admits(0, 4));
        // Using pair 1 leaves 4 pairs needing 4 runs: fine.
        assert!(usage.admits(1, 4));
        // But not if only 3 runs remain after it.
        assert!(!usage.admits(1, 3));
    }

    #[test]
    fn test_requires_slots_for_remaining_extras() {
        // 2 pairs, 5 runs: base 2, remainder 1.
        let mut usage = PairUsage::for_objects(&objects(&["X", "Y"]), 5);
        usage.increment(0);
        usage.increment(0);
        // Pair 1 at 0 needs 2 more; third use of pair 0 takes the one extra.
        assert!(usage.admits(0, 2));
        // Pair 1 cannot reach base with no runs after this one.
        assert!(!usage.admits(1, 0));
    }

    #[test]
    fn test_record_decrement_and_balance() {
        let mut usage = PairUsage::for_objects(&objects(&["X", "Y"]), 3);
        let xy = ObjectPair::new("X", "Y");
        let yx = ObjectPair::new("Y", "X");
        usage.record(&xy);
        usage.record(&yx);
        usage.record(&xy);
        assert_eq!(usage.count_of(&xy), 2);
        assert!(usage.is_balanced());
        assert_eq!(usage.spread(), (1, 2));

        let i = usage.index_of(&xy).unwrap();
        usage.decrement(i);
        usage.decrement(i);
        assert!(!usage.is_balanced());
        assert_eq!(usage.total(), 1);
    }

    #[test]
    fn test_untracked_pair_is_admitted() {
        let usage = PairUsage::for_objects(&objects(&["X"]), 2);
        assert_eq!(usage.pair_count(), 0);
        assert!(usage.admits_pair(&ObjectPair::new("X", "Q"), 1));
        assert!(usage.is_balanced());
    }
}
