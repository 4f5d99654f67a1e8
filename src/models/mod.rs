//! Run-order domain models.
//!
//! Provides the data types shared by the planner, the constraint engine,
//! and the scheduler.
//!
//! # Domain Mappings
//!
//! | run-order | Rehearsal floor |
//! |-----------|-----------------|
//! | Object | Prop, costume, puppet |
//! | Performer | Cast member, or nobody (`Unstaffed`) |
//! | Role | Character position on stage |
//! | RunAssignment | One pass through the scene |
//! | ShowOrder | The evening's run sheet |

mod clock;
mod object;
mod order;
mod pair;
mod performer;

pub use clock::{ClockParseError, ClockTime, TimeWindow};
pub use object::{Eligibility, ObjectDef, ObjectSpec};
pub use order::{RunAssignment, ShowOrder, Violation, ViolationType};
pub use pair::{ObjectPair, Pair, Role, RoleSpec};
pub use performer::{Performer, UNSTAFFED_LABEL};
