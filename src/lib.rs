//! Rehearsal run-order scheduling.
//!
//! Assigns, for each sequential run of a scene, an object and a performer
//! to each of two on-stage roles. Object pairs are spread evenly across the
//! show by a backtracking planner; performers are then chosen run by run
//! against hard continuity rules and soft fairness scores.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Performer`, `Pair`, `ObjectPair`, `RunAssignment`,
//!   `ShowOrder`, `ClockTime`
//! - **`pool`**: Object eligibility resolved against the roster
//! - **`planner`**: Balanced object-pair sequence search
//! - **`rules`**: Hard rules, soft scoring, and the constraint engine
//! - **`scheduler`**: Segment walk, per-run selection, fairness KPIs
//! - **`timeline`**: Run clock times, master rows, call sheets
//! - **`config`**: YAML show configuration
//! - **`validation`**: Configuration checks and order audits
//!
//! # Example
//!
//! ```
//! use run_order::config::ShowConfig;
//! use run_order::scheduler::{OrderRequest, OrderScheduler};
//! use run_order::timeline::Timeline;
//!
//! let config = ShowConfig::from_yaml_str(r#"
//! show:
//!   run_count: 8
//!   seed: 3
//!   intermission: { every_n_runs: 4, length_minutes: 10 }
//! roles: [{name: Domin}, {name: Alquist}]
//! performers: [Moose, Luca, Ren]
//! objects: [{name: Shirt}, {name: Hat}, {name: Cane}, {name: Cape}]
//! "#).unwrap().validated().unwrap();
//!
//! let request = OrderRequest::from_config(&config).unwrap();
//! let order = OrderScheduler::new().schedule(&request).unwrap();
//! let rows = Timeline::from_config(&config).unwrap().rows(&order);
//! assert_eq!(rows.len(), 9);
//! ```
//!
//! # Logging
//!
//! Emits `tracing` events; the library installs no subscriber.

pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod pool;
pub mod rules;
pub mod scheduler;
pub mod timeline;
pub mod validation;
