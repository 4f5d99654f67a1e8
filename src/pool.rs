//! Pool builder.
//!
//! Resolves object eligibility against the roster once, producing the
//! distinct object list and the universe of valid (object, performer)
//! pairs. The pool is immutable afterwards.

use std::collections::HashSet;

use crate::config::ConfigError;
use crate::models::{Eligibility, ObjectDef, ObjectSpec, Pair, Performer};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Resolved objects and roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    objects: Vec<ObjectDef>,
    roster: Vec<Performer>,
}

impl Pool {
    /// Resolves `specs` against `roster`.
    ///
    /// Wildcards expand to the roster in roster order; explicit lists keep
    /// their order with duplicates dropped. A name missing from the roster
    /// (other than `"None"`) or an unknown keyword is an error.
    pub fn build(specs: &[ObjectSpec], roster: &[Performer]) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();
        let mut objects = Vec::with_capacity(specs.len());

        for spec in specs {
            let eligible = match &spec.performers {
                e if e.is_wildcard() => dedup(roster.iter().cloned()),
                Eligibility::Keyword(keyword) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownKeyword,
                        format!("Object '{}' uses unknown eligibility keyword '{keyword}'", spec.name),
                    ));
                    continue;
                }
                Eligibility::Performers(list) => {
                    for p in list {
                        if !p.is_unstaffed() && !roster.contains(p) {
                            errors.push(ValidationError::new(
                                ValidationErrorKind::UnknownPerformer,
                                format!("Object '{}' names performer '{p}' who is not on the roster", spec.name),
                            ));
                        }
                    }
                    dedup(list.iter().cloned())
                }
            };
            objects.push(ObjectDef::new(spec.name.clone(), eligible));
        }

        if errors.is_empty() {
            Ok(Self {
                objects,
                roster: roster.to_vec(),
            })
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Resolved objects in configuration order.
    pub fn objects(&self) -> &[ObjectDef] {
        &self.objects
    }

    /// Distinct object ids in configuration order.
    pub fn object_ids(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }

    /// Looks up an object.
    pub fn object(&self, id: &str) -> Option<&ObjectDef> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Eligible performers for `object` (empty if unknown).
    pub fn eligible(&self, object: &str) -> &[Performer] {
        self.object(object).map(|o| o.eligible.as_slice()).unwrap_or(&[])
    }

    /// Candidate pairs for `object`, in eligibility order.
    pub fn candidates(&self, object: &str) -> Vec<Pair> {
        self.object(object).map(ObjectDef::pairs).unwrap_or_default()
    }

    /// Every valid (object, performer) pair.
    pub fn pairs(&self) -> Vec<Pair> {
        self.objects.iter().flat_map(ObjectDef::pairs).collect()
    }

    /// The configured roster, sentinel included if listed.
    pub fn roster(&self) -> &[Performer] {
        &self.roster
    }

    /// Roster members who are people.
    pub fn named_performers(&self) -> Vec<Performer> {
        dedup(self.roster.iter().filter(|p| !p.is_unstaffed()).cloned())
    }
}

fn dedup(performers: impl Iterator<Item = Performer>) -> Vec<Performer> {
    let mut seen = HashSet::new();
    performers.filter(|p| seen.insert(p.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Performer> {
        vec!["Moose".into(), "Luca".into(), "None".into()]
    }

    #[test]
    fn test_wildcard_resolves_to_roster() {
        let pool = Pool::build(&[ObjectSpec::open("Shirt")], &roster()).unwrap();
        assert_eq!(pool.eligible("Shirt"), roster().as_slice());
        assert_eq!(pool.candidates("Shirt").len(), 3);
    }

    #[test]
    fn test_explicit_list_keeps_order_and_dedups() {
        let spec = ObjectSpec::restricted("Hat", ["Luca", "Moose", "Luca"]);
        let pool = Pool::build(&[spec], &roster()).unwrap();
        assert_eq!(
            pool.eligible("Hat"),
            &[Performer::new("Luca"), Performer::new("Moose")]
        );
    }

    #[test]
    fn test_unstaffed_allowed_without_roster_entry() {
        let spec = ObjectSpec::restricted("Robot", ["None"]);
        let pool = Pool::build(&[spec], &[Performer::new("Moose")]).unwrap();
        assert!(pool.object("Robot").unwrap().allows_unstaffed());
    }

    #[test]
    fn test_unknown_performer_rejected() {
        let spec = ObjectSpec::restricted("Hat", ["Ghost"]);
        let err = Pool::build(&[spec], &roster()).unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert_eq!(errors[0].kind, ValidationErrorKind::UnknownPerformer);
                assert!(errors[0].message.contains("Ghost"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let spec = ObjectSpec {
            name: "Hat".into(),
            performers: Eligibility::Keyword("everyone".into()),
        };
        assert!(Pool::build(&[spec], &roster()).is_err());
    }

    #[test]
    fn test_pairs_and_ids() {
        let specs = vec![ObjectSpec::open("X"), ObjectSpec::restricted("Y", ["Moose"])];
        let pool = Pool::build(&specs, &roster()).unwrap();
        assert_eq!(pool.object_ids(), vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(pool.pairs().len(), 4);
        assert_eq!(pool.named_performers().len(), 2);
        assert!(pool.eligible("Z").is_empty());
    }
}
