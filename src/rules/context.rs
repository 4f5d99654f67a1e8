//! Per-run context passed to the constraint engine.

use crate::models::Performer;

/// Where in the show a run sits, plus what soft rules need to know about
/// the surrounding intermissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    /// Run number (1-based).
    pub run: usize,
    /// Total runs in the show.
    pub total_runs: usize,
    /// Whether an intermission comes right before this run.
    pub after_intermission: bool,
    /// Who partnered the default object in the run before that intermission.
    pub intermission_partner: Option<Performer>,
    /// The configured default object.
    pub default_object: Option<String>,
}

impl RunContext {
    /// Creates a context for `run` of `total_runs`.
    pub fn at_run(run: usize, total_runs: usize) -> Self {
        Self {
            run,
            total_runs,
            ..Default::default()
        }
    }

    /// Marks the run as the first after an intermission.
    pub fn with_after_intermission(mut self, after: bool) -> Self {
        self.after_intermission = after;
        self
    }

    /// Sets the default object's partner at the previous seam.
    pub fn with_intermission_partner(mut self, partner: Option<Performer>) -> Self {
        self.intermission_partner = partner;
        self
    }

    /// Sets the default object.
    pub fn with_default_object(mut self, object: Option<String>) -> Self {
        self.default_object = object;
        self
    }

    /// Runs still to come after this one.
    #[inline]
    pub fn remaining_runs(&self) -> usize {
        self.total_runs.saturating_sub(self.run)
    }

    /// Whether this is the first or last run of the show.
    #[inline]
    pub fn is_end_run(&self) -> bool {
        self.run == 1 || self.run == self.total_runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_runs() {
        assert!(RunContext::at_run(1, 6).is_end_run());
        assert!(RunContext::at_run(6, 6).is_end_run());
        assert!(!RunContext::at_run(3, 6).is_end_run());
    }

    #[test]
    fn test_remaining_runs() {
        assert_eq!(RunContext::at_run(2, 6).remaining_runs(), 4);
        assert_eq!(RunContext::at_run(6, 6).remaining_runs(), 0);
    }

    #[test]
    fn test_builders() {
        let ctx = RunContext::at_run(4, 6)
            .with_after_intermission(true)
            .with_intermission_partner(Some(Performer::new("Moose")))
            .with_default_object(Some("Robot".into()));
        assert!(ctx.after_intermission);
        assert_eq!(ctx.intermission_partner, Some(Performer::new("Moose")));
        assert_eq!(ctx.default_object.as_deref(), Some("Robot"));
    }
}
