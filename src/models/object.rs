//! Object (prop/costume) model.
//!
//! An object is assigned to one of the two roles each run. Its eligible
//! performers are either listed explicitly or given as a wildcard that
//! resolves to the whole roster.

use serde::{Deserialize, Serialize};

use super::{Pair, Performer};

/// Eligible performers as written in a show config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Eligibility {
    /// A keyword; `"all"` and `"*"` mean every roster performer.
    Keyword(String),
    /// Explicit performer labels (`"None"` allowed).
    Performers(Vec<Performer>),
}

impl Eligibility {
    /// Every roster performer.
    pub fn all() -> Self {
        Self::Keyword("all".into())
    }

    /// Whether this is a recognised wildcard keyword.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Keyword(k) if k == "all" || k == "*")
    }
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::all()
    }
}

/// An object definition as written in a show config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// Object identifier.
    pub name: String,
    /// Who may be paired with this object.
    #[serde(default)]
    pub performers: Eligibility,
}

impl ObjectSpec {
    /// Creates an object open to the whole roster.
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            performers: Eligibility::all(),
        }
    }

    /// Creates an object restricted to the given performers.
    pub fn restricted<I, P>(name: impl Into<String>, performers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Performer>,
    {
        Self {
            name: name.into(),
            performers: Eligibility::Performers(performers.into_iter().map(Into::into).collect()),
        }
    }
}

/// An object with its eligibility resolved against the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDef {
    /// Object identifier.
    pub id: String,
    /// Eligible performers, in roster order for wildcards, otherwise as listed.
    pub eligible: Vec<Performer>,
}

impl ObjectDef {
    /// Creates a resolved object definition.
    pub fn new(id: impl Into<String>, eligible: Vec<Performer>) -> Self {
        Self {
            id: id.into(),
            eligible,
        }
    }

    /// Whether `performer` may be paired with this object.
    pub fn accepts(&self, performer: &Performer) -> bool {
        self.eligible.contains(performer)
    }

    /// Whether the unstaffed sentinel is eligible.
    pub fn allows_unstaffed(&self) -> bool {
        self.eligible.iter().any(Performer::is_unstaffed)
    }

    /// All (object, performer) pairs for this object.
    pub fn pairs(&self) -> Vec<Pair> {
        self.eligible
            .iter()
            .map(|p| Pair::new(self.id.clone(), p.clone()))
            .collect()
    }
}
