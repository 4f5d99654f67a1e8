//! Pairs, object pairs, and roles.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Performer;

/// One of the two on-stage positions filled each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    A,
    B,
}

impl Role {
    /// Both roles, in row order.
    pub const ALL: [Role; 2] = [Role::A, Role::B];

    /// The opposite role.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Position in [`Role::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("Role A"),
            Self::B => f.write_str("Role B"),
        }
    }
}

/// Display name and call-sheet offsets for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Character name shown in exported rows.
    pub name: String,
    /// Minutes after run start that the performer enters.
    #[serde(default, rename = "offset_start_min")]
    pub entry_offset_min: i32,
    /// Minutes after run start that the performer exits.
    #[serde(default, rename = "offset_end_min")]
    pub exit_offset_min: i32,
}

impl RoleSpec {
    /// Creates a role with zero offsets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_offset_min: 0,
            exit_offset_min: 0,
        }
    }

    /// Sets the entry/exit offsets (minutes from run start).
    pub fn with_offsets(mut self, entry_min: i32, exit_min: i32) -> Self {
        self.entry_offset_min = entry_min;
        self.exit_offset_min = exit_min;
        self
    }
}

/// An (object, performer) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    /// Object identifier.
    pub object: String,
    /// Performer assigned to the object.
    pub performer: Performer,
}

impl Pair {
    /// Creates a pair.
    pub fn new(object: impl Into<String>, performer: impl Into<Performer>) -> Self {
        Self {
            object: object.into(),
            performer: performer.into(),
        }
    }

    /// Whether no human is assigned.
    #[inline]
    pub fn is_unstaffed(&self) -> bool {
        self.performer.is_unstaffed()
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.object, self.performer)
    }
}

/// The (Role A object, Role B object) combination for one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectPair {
    /// Role A object.
    pub a: String,
    /// Role B object.
    pub b: String,
}

impl ObjectPair {
    /// Creates an object pair.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// All ordered pairs of distinct objects, Role A major.
    pub fn all_ordered(objects: &[String]) -> Vec<Self> {
        let mut pairs = Vec::new();
        for a in objects {
            for b in objects {
                if a != b {
                    pairs.push(Self::new(a.clone(), b.clone()));
                }
            }
        }
        pairs
    }

    /// The object planned for `role`.
    pub fn object(&self, role: Role) -> &str {
        match role {
            Role::A => &self.a,
            Role::B => &self.b,
        }
    }

    /// The same objects with roles swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.b.clone(), self.a.clone())
    }

    /// Whether this pair swaps both objects of `previous`.
    pub fn is_reversal_of(&self, previous: &Self) -> bool {
        self.a == previous.b && self.b == previous.a
    }

    /// Whether either role keeps its object from `previous`.
    pub fn shares_position_with(&self, previous: &Self) -> bool {
        self.a == previous.a || self.b == previous.b
    }

    /// Whether `object` is in either role.
    pub fn contains(&self, object: &str) -> bool {
        self.a == object || self.b == object
    }
}

impl fmt::Display for ObjectPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}
