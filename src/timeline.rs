//! Clock times, master rows, and per-performer call sheets.
//!
//! Run `n` starts at `start + (n − 1) × step + k × intermission`, where `k`
//! is the number of intermissions before it. An intermission row sits after
//! each segment but the last, timed at the end of the preceding run's slot.
//!
//! Call-sheet entries serialise flat with the stage-management CSV column
//! names (`Run`, `RunStart`, `Character`, `CharacterInTime`,
//! `CharacterOutTime`). Master rows nest their role cells, so a CSV writer
//! should emit them through [`OrderRow::headers`] and [`OrderRow::record`].

use serde::Serialize;

use crate::config::{ConfigError, ShowConfig};
use crate::models::{ClockTime, Performer, Role, RoleSpec, ShowOrder, TimeWindow};
use crate::scheduler::SegmentPlan;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Label of the intermission sentinel row.
pub const INTERMISSION_LABEL: &str = "Intermission";

/// One role's cell in a master row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCell {
    pub object: String,
    pub performer: String,
}

impl RoleCell {
    fn empty() -> Self {
        Self {
            object: String::new(),
            performer: String::new(),
        }
    }
}

/// A row of the master run sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRow {
    /// Run number, or [`INTERMISSION_LABEL`].
    #[serde(rename = "Run")]
    pub run: String,
    #[serde(rename = "Time")]
    pub time: ClockTime,
    /// Role A then Role B.
    pub roles: [RoleCell; 2],
}

impl OrderRow {
    /// Whether this is an intermission sentinel.
    pub fn is_intermission(&self) -> bool {
        self.run == INTERMISSION_LABEL
    }

    /// Column names: `Run`, `Time`, then `<name>` and `<name>Performer` per role.
    pub fn headers(roles: &[RoleSpec; 2]) -> Vec<String> {
        let mut headers = vec!["Run".to_string(), "Time".to_string()];
        for role in roles {
            headers.push(role.name.clone());
            headers.push(format!("{}Performer", role.name));
        }
        headers
    }

    /// Cell values in [`headers`](Self::headers) order.
    pub fn record(&self) -> Vec<String> {
        let mut record = vec![self.run.clone(), self.time.to_string()];
        for cell in &self.roles {
            record.push(cell.object.clone());
            record.push(cell.performer.clone());
        }
        record
    }
}

/// One run on a performer's call sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    #[serde(rename = "Run")]
    pub run_label: String,
    #[serde(rename = "RunStart")]
    pub run_start: ClockTime,
    /// Character name of the role played.
    #[serde(rename = "Character")]
    pub role: String,
    #[serde(rename = "CharacterInTime")]
    pub entry: ClockTime,
    #[serde(rename = "CharacterOutTime")]
    pub exit: ClockTime,
}

/// A performer's full call sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSheet {
    pub performer: Performer,
    pub entries: Vec<TimelineEntry>,
}

/// Maps run numbers to wall-clock times.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    start: ClockTime,
    step_minutes: i64,
    segments: SegmentPlan,
    roles: [RoleSpec; 2],
}

impl Timeline {
    /// Creates a timeline.
    pub fn new(
        start: ClockTime,
        step_minutes: i64,
        segments: SegmentPlan,
        roles: [RoleSpec; 2],
    ) -> Self {
        Self {
            start,
            step_minutes,
            segments,
            roles,
        }
    }

    /// Builds the timeline for a configuration.
    pub fn from_config(config: &ShowConfig) -> Result<Self, ConfigError> {
        let roles: [RoleSpec; 2] = config.roles.clone().try_into().map_err(|r: Vec<RoleSpec>| {
            ConfigError::Invalid(vec![ValidationError::new(
                ValidationErrorKind::RoleCount,
                format!("Expected exactly 2 roles, found {}", r.len()),
            )])
        })?;
        Ok(Self::new(
            config.show.start_time,
            config.show.step_minutes,
            config.segment_plan(),
            roles,
        ))
    }

    /// Role display settings.
    pub fn role(&self, role: Role) -> &RoleSpec {
        &self.roles[role.index()]
    }

    pub fn roles(&self) -> &[RoleSpec; 2] {
        &self.roles
    }

    /// Start time of `run` (1-based).
    pub fn run_start(&self, run: usize) -> ClockTime {
        let slots = run.saturating_sub(1) as i64;
        let breaks = self.segments.intermissions_before(run) as i64;
        self.start
            .plus_minutes(slots * self.step_minutes + breaks * self.segments.intermission_minutes())
    }

    /// Start of the intermission following `run`.
    pub fn intermission_start(&self, run: usize) -> ClockTime {
        self.run_start(run).plus_minutes(self.step_minutes)
    }

    /// Master rows with intermission sentinels between segments.
    pub fn rows(&self, order: &ShowOrder) -> Vec<OrderRow> {
        let mut rows = Vec::with_capacity(order.runs.len() + self.segments.intermission_after_runs().len());
        for run in &order.runs {
            rows.push(OrderRow {
                run: run.number.to_string(),
                time: self.run_start(run.number),
                roles: Role::ALL.map(|role| {
                    let pair = run.pair(role);
                    RoleCell {
                        object: pair.object.clone(),
                        performer: pair.performer.label().to_string(),
                    }
                }),
            });
            if self.segments.precedes_intermission(run.number) {
                rows.push(OrderRow {
                    run: INTERMISSION_LABEL.to_string(),
                    time: self.intermission_start(run.number),
                    roles: [RoleCell::empty(), RoleCell::empty()],
                });
            }
        }
        rows
    }

    /// Call-sheet entries for `performer`, in run order.
    ///
    /// The unstaffed sentinel has no call sheet.
    pub fn entries_for(&self, order: &ShowOrder, performer: &Performer) -> Vec<TimelineEntry> {
        order
            .runs_for_performer(performer)
            .into_iter()
            .map(|(run, role)| {
                let spec = self.role(role);
                let run_start = self.run_start(run.number);
                let window =
                    TimeWindow::offset_from(run_start, spec.entry_offset_min, spec.exit_offset_min);
                TimelineEntry {
                    run_label: run.number.to_string(),
                    run_start,
                    role: spec.name.clone(),
                    entry: window.start,
                    exit: window.end,
                }
            })
            .collect()
    }

    /// Call sheets for every named performer in `roster`, including idle ones.
    pub fn call_sheets(&self, order: &ShowOrder, roster: &[Performer]) -> Vec<CallSheet> {
        roster
            .iter()
            .filter(|p| !p.is_unstaffed())
            .map(|p| CallSheet {
                performer: p.clone(),
                entries: self.entries_for(order, p),
            })
            .collect()
    }
}
