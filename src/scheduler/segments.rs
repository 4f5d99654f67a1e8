//! Segment layout: runs partitioned by intermissions.
//!
//! Runs `1..=run_count` are cut into blocks of `every_n_runs`; an
//! intermission sits between consecutive blocks. The last block may be
//! shorter. Without a cadence the whole sequence is one segment.

use serde::{Deserialize, Serialize};

/// A contiguous block of runs between intermissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment index (0-based).
    pub index: usize,
    /// First run number (inclusive).
    pub first_run: usize,
    /// Last run number (inclusive).
    pub last_run: usize,
}

impl Segment {
    /// Run numbers in this segment.
    pub fn runs(&self) -> std::ops::RangeInclusive<usize> {
        self.first_run..=self.last_run
    }

    /// Number of runs in this segment.
    pub fn len(&self) -> usize {
        self.last_run + 1 - self.first_run
    }

    /// Whether the segment holds no runs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where segment boundaries fall and how long each intermission lasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPlan {
    run_count: usize,
    every_n_runs: Option<usize>,
    intermission_minutes: i64,
}

impl SegmentPlan {
    /// Creates a layout. A cadence of `None` or `Some(0)` means no intermissions.
    pub fn new(run_count: usize, every_n_runs: Option<usize>, intermission_minutes: i64) -> Self {
        Self {
            run_count,
            every_n_runs: every_n_runs.filter(|&n| n > 0),
            intermission_minutes,
        }
    }

    /// A single segment covering every run.
    pub fn single(run_count: usize) -> Self {
        Self::new(run_count, None, 0)
    }

    /// Total runs.
    #[inline]
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Intermission cadence, if any.
    #[inline]
    pub fn every_n_runs(&self) -> Option<usize> {
        self.every_n_runs
    }

    /// Wall-clock length of one intermission.
    #[inline]
    pub fn intermission_minutes(&self) -> i64 {
        self.intermission_minutes
    }

    /// All segments in run order.
    pub fn segments(&self) -> Vec<Segment> {
        if self.run_count == 0 {
            return Vec::new();
        }
        let size = self.every_n_runs.unwrap_or(self.run_count);
        (1..=self.run_count)
            .step_by(size)
            .enumerate()
            .map(|(index, first_run)| Segment {
                index,
                first_run,
                last_run: (first_run + size - 1).min(self.run_count),
            })
            .collect()
    }

    /// Index of the segment holding `run`.
    pub fn segment_of(&self, run: usize) -> usize {
        self.intermissions_before(run)
    }

    /// Whether `run` opens a segment.
    pub fn is_segment_start(&self, run: usize) -> bool {
        match self.every_n_runs {
            Some(n) => run >= 1 && (run - 1) % n == 0,
            None => run == 1,
        }
    }

    /// Whether `run` closes a segment.
    pub fn is_segment_end(&self, run: usize) -> bool {
        run == self.run_count || self.every_n_runs.is_some_and(|n| run % n == 0)
    }

    /// Whether an intermission comes right before `run`.
    pub fn follows_intermission(&self, run: usize) -> bool {
        run > 1 && run <= self.run_count && self.is_segment_start(run)
    }

    /// Whether an intermission comes right after `run`.
    pub fn precedes_intermission(&self, run: usize) -> bool {
        run >= 1 && run < self.run_count && self.is_segment_end(run)
    }

    /// Intermissions that happen before `run` starts.
    pub fn intermissions_before(&self, run: usize) -> usize {
        match self.every_n_runs {
            Some(n) if run >= 1 => (run - 1) / n,
            _ => 0,
        }
    }

    /// Runs after which an intermission falls.
    pub fn intermission_after_runs(&self) -> Vec<usize> {
        (1..self.run_count)
            .filter(|&run| self.precedes_intermission(run))
            .collect()
    }
}

/// Which sides of an intermission should show the default object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPreference {
    /// Prefer the default object in the last run before an intermission.
    #[serde(default, rename = "prefer_default_before")]
    pub before_intermission: bool,
    /// Prefer the default object in the first run after an intermission.
    #[serde(default, rename = "prefer_default_after")]
    pub after_intermission: bool,
}

impl DefaultPreference {
    /// Preference on both sides of every intermission.
    pub fn both() -> Self {
        Self {
            before_intermission: true,
            after_intermission: true,
        }
    }

    /// Whether `run` should prefer the default object.
    pub fn prefers_default(&self, run: usize, plan: &SegmentPlan) -> bool {
        (self.before_intermission && plan.precedes_intermission(run))
            || (self.after_intermission && plan.follows_intermission(run))
    }

    /// Whether any preference is enabled.
    pub fn is_enabled(&self) -> bool {
        self.before_intermission || self.after_intermission
    }
}
