//! Pair distribution planning.
//!
//! Fixes, before any performer is chosen, which two objects go on stage in
//! every run. The plan spreads the ordered object pairs as evenly as the
//! run count allows and never repeats an object in the same role, or swaps
//! both objects, between consecutive runs of a segment.
//!
//! # Search
//! Depth-first with an explicit frame stack. Undoing a choice is a pop and
//! a usage decrement. An infeasible layout is only reported once every
//! branch is exhausted, which grows quickly with the run count.

mod search;
mod usage;

pub use search::{PairPlanner, SLOW_SEARCH_BACKTRACKS, STRICT_BACKTRACK_BUDGET};
pub use usage::PairUsage;
