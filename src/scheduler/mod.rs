//! Run selection, segment management, and fairness KPIs.
//!
//! # Algorithm
//!
//! [`OrderScheduler`] plans the object pair of every run up front, then
//! walks the segments in order. Each segment starts from an empty rolling
//! history; within it every run is filled greedily by [`RunSelector`],
//! which keeps the highest-scoring performer combination that passes all
//! hard rules.
//!
//! # KPI
//!
//! [`OrderKpi`] reports per-performer role and object counts, unstaffed
//! slots, and object-pair usage spread.

mod greedy;
mod kpi;
mod segments;
mod selector;

pub use greedy::{OrderRequest, OrderScheduler};
pub use kpi::{OrderKpi, PerformerLoad};
pub use segments::{DefaultPreference, Segment, SegmentPlan};
pub use selector::RunSelector;
