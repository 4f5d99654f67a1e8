//! Error types for run-order scheduling.

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::Pair;
use crate::rules::HardRule;

/// Fatal scheduling errors. Neither kind produces partial output.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The planner exhausted every branch without completing the sequence.
    #[error(
        "no balanced object-pair sequence exists for {run_count} runs over {pair_count} \
         object pairs ({object_count} objects); search gave up after {backtracks} backtracks"
    )]
    InfeasibleDistribution {
        run_count: usize,
        object_count: usize,
        pair_count: usize,
        backtracks: u64,
    },

    /// No performer combination for a planned run passes the hard rules.
    #[error(
        "run {run}: no assignment for objects ({object_a}, {object_b}) satisfies the hard rules \
         (last attempt {}, rejected by {})",
        describe_attempt(.last_attempt),
        describe_rule(.last_rejection)
    )]
    InfeasibleRun {
        run: usize,
        object_a: String,
        object_b: String,
        candidates_a: Vec<Pair>,
        candidates_b: Vec<Pair>,
        last_attempt: Option<(Pair, Pair)>,
        last_rejection: Option<HardRule>,
    },

    /// Configuration could not be turned into a request.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn describe_attempt(attempt: &Option<(Pair, Pair)>) -> String {
    match attempt {
        Some((a, b)) => format!("{a} + {b}"),
        None => "none (a role has no eligible performer)".into(),
    }
}

fn describe_rule(rule: &Option<HardRule>) -> String {
    match rule {
        Some(rule) => rule.to_string(),
        None => "nothing".into(),
    }
}

/// Result type alias for scheduling operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
