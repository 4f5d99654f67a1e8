//! Whole-show fairness tallies.
//!
//! Counts how often each named performer has played Role A vs Role B and
//! how often they have handled each object. These counts run across
//! intermissions; only the rolling history is per segment.

use std::collections::HashMap;

use crate::models::{Pair, Performer, Role};

/// Cumulative role and object tallies per named performer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FairnessCounts {
    performers: Vec<Performer>,
    performer_index: HashMap<Performer, usize>,
    object_index: HashMap<String, usize>,
    roles: Vec<[usize; 2]>,
    per_object: Vec<Vec<usize>>,
}

impl FairnessCounts {
    /// Creates zeroed tallies. The unstaffed sentinel is never counted.
    pub fn new(performers: &[Performer], objects: &[String]) -> Self {
        let performers: Vec<Performer> = performers
            .iter()
            .filter(|p| !p.is_unstaffed())
            .cloned()
            .collect();
        let performer_index = performers
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let object_index = objects
            .iter()
            .enumerate()
            .map(|(i, o)| (o.clone(), i))
            .collect();
        Self {
            roles: vec![[0; 2]; performers.len()],
            per_object: vec![vec![0; objects.len()]; performers.len()],
            performers,
            performer_index,
            object_index,
        }
    }

    /// Counted performers.
    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    /// Records `pair` played in `role`. Unstaffed and unknown performers are skipped.
    pub fn apply(&mut self, role: Role, pair: &Pair) {
        let Some(&p) = self.performer_index.get(&pair.performer) else {
            return;
        };
        self.roles[p][role.index()] += 1;
        if let Some(&o) = self.object_index.get(&pair.object) {
            self.per_object[p][o] += 1;
        }
    }

    /// Times `performer` has played `role`.
    pub fn role_count(&self, performer: &Performer, role: Role) -> usize {
        self.performer_index
            .get(performer)
            .map(|&p| self.roles[p][role.index()])
            .unwrap_or(0)
    }

    /// Times `performer` has handled `object`.
    pub fn object_count(&self, performer: &Performer, object: &str) -> usize {
        match (
            self.performer_index.get(performer),
            self.object_index.get(object),
        ) {
            (Some(&p), Some(&o)) => self.per_object[p][o],
            _ => 0,
        }
    }

    /// Imbalance penalty of the current tallies.
    pub fn imbalance_penalty(&self, role_weight: i64) -> i64 {
        self.imbalance_penalty_with(&[], role_weight)
    }

    /// Imbalance penalty as if `extra` had already been applied.
    ///
    /// Per performer: `role_weight × |A − B|` plus the spread (max − min)
    /// of their per-object counts, summed over the roster.
    pub fn imbalance_penalty_with(&self, extra: &[(Role, &Pair)], role_weight: i64) -> i64 {
        let bumps: Vec<(usize, Role, Option<usize>)> = extra
            .iter()
            .filter_map(|(role, pair)| {
                let p = *self.performer_index.get(&pair.performer)?;
                Some((p, *role, self.object_index.get(&pair.object).copied()))
            })
            .collect();

        let mut penalty = 0;
        for (p, roles) in self.roles.iter().enumerate() {
            let mut roles = *roles;
            let mut objects: Option<Vec<usize>> = None;
            for &(bp, role, object) in &bumps {
                if bp != p {
                    continue;
                }
                roles[role.index()] += 1;
                if let Some(o) = object {
                    objects.get_or_insert_with(|| self.per_object[p].clone())[o] += 1;
                }
            }

            penalty += role_weight * (roles[0] as i64 - roles[1] as i64).abs();

            let counts = objects.as_ref().unwrap_or(&self.per_object[p]);
            if let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) {
                penalty += (max - min) as i64;
            }
        }
        penalty
    }
}
