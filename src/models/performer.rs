//! Performer model.
//!
//! A performer operates or wears an object in one role of a run. Some
//! objects need nobody at all for a run; that slot is filled by the
//! [`Performer::Unstaffed`] sentinel, which show configs spell `"None"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration label of the unstaffed sentinel.
pub const UNSTAFFED_LABEL: &str = "None";

/// A human performer, or the unstaffed sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Performer {
    /// No human performer is required for the slot.
    Unstaffed,
    /// A named member of the roster.
    Named(String),
}

impl Performer {
    /// Creates a named performer (or the sentinel for `"None"`).
    pub fn new(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    /// Whether this is the unstaffed sentinel.
    #[inline]
    pub fn is_unstaffed(&self) -> bool {
        matches!(self, Self::Unstaffed)
    }

    /// The performer's name, `None` for the sentinel.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Unstaffed => None,
            Self::Named(name) => Some(name),
        }
    }

    /// The label used in configs and exported rows.
    pub fn label(&self) -> &str {
        self.name().unwrap_or(UNSTAFFED_LABEL)
    }
}

impl From<String> for Performer {
    fn from(value: String) -> Self {
        if value == UNSTAFFED_LABEL {
            Self::Unstaffed
        } else {
            Self::Named(value)
        }
    }
}

impl From<&str> for Performer {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Performer> for String {
    fn from(value: Performer) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Performer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
