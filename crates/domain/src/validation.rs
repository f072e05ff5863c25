//! Field validation — pure predicates over specs and values.
//!
//! Nothing here mutates state; every check can be repeated freely.

use std::fmt;

use serde::Serialize;

use crate::action::{
    ActionEntry, ActionList, FieldKey, FieldKind, FieldSpec, FieldValue, fields_for,
};
use crate::room::{IdentityField, Phase, RoomConfig};

/// Why a value does not satisfy its spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// A required value is empty.
    Missing,
    /// A number field holds something that is not a finite number.
    NotANumber,
}

/// Check `value` against `spec`.
///
/// # Errors
///
/// Returns the [`Problem`] that makes the value unacceptable.
pub fn check(spec: &FieldSpec, value: &FieldValue) -> Result<(), Problem> {
    match spec.kind {
        FieldKind::Text | FieldKind::Select => {
            if spec.required && value.is_blank() {
                return Err(Problem::Missing);
            }
            Ok(())
        }
        FieldKind::Number => {
            if value.is_blank() {
                return if spec.required {
                    Err(Problem::Missing)
                } else {
                    Ok(())
                };
            }
            match value.as_f64() {
                Some(number) if number.is_finite() => Ok(()),
                _ => Err(Problem::NotANumber),
            }
        }
    }
}

/// `true` when `value` satisfies `spec`.
#[must_use]
pub fn is_valid(spec: &FieldSpec, value: &FieldValue) -> bool {
    check(spec, value).is_ok()
}

fn entry_problems(entry: &ActionEntry) -> impl Iterator<Item = (FieldKey, Problem)> + '_ {
    fields_for(entry.kind()).iter().filter_map(|spec| {
        let value = entry.field(spec.key).cloned().unwrap_or_default();
        check(spec, &value).err().map(|problem| (spec.key, problem))
    })
}

/// Every field of the entry satisfies its spec.
#[must_use]
pub fn entry_is_valid(entry: &ActionEntry) -> bool {
    entry_problems(entry).next().is_none()
}

/// Every entry of the list is valid.
#[must_use]
pub fn list_is_valid(list: &ActionList) -> bool {
    list.iter().all(entry_is_valid)
}

/// Both action lists and the required identity fields are valid.
#[must_use]
pub fn config_is_valid(config: &RoomConfig) -> bool {
    validate(config).is_ok()
}

/// Where a validation problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Location {
    Identity {
        field: IdentityField,
    },
    Action {
        phase: Phase,
        index: usize,
        key: FieldKey,
    },
}

/// One problem at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub location: Location,
    pub problem: Problem,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.problem {
            Problem::Missing => "is required",
            Problem::NotANumber => "must be a number",
        };
        match self.location {
            Location::Identity { field } => write!(f, "`{field}` {what}"),
            Location::Action { phase, index, key } => {
                write!(f, "{phase} action #{}: `{key}` {what}", index + 1)
            }
        }
    }
}

/// Every problem found in a configuration, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Indices of invalid entries of `phase`, without duplicates.
    #[must_use]
    pub fn invalid_entries(&self, phase: Phase) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .issues
            .iter()
            .filter_map(|issue| match issue.location {
                Location::Action {
                    phase: issue_phase,
                    index,
                    ..
                } if issue_phase == phase => Some(index),
                _ => None,
            })
            .collect();
        indices.dedup();
        indices
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Collect every problem of `config`.
#[must_use]
pub fn validate(config: &RoomConfig) -> ValidationReport {
    let identity = IdentityField::ALL
        .into_iter()
        .filter(|field| config.identity(*field).trim().is_empty())
        .map(|field| Issue {
            location: Location::Identity { field },
            problem: Problem::Missing,
        });

    let actions = Phase::ALL.into_iter().flat_map(|phase| {
        config
            .actions(phase)
            .iter()
            .enumerate()
            .flat_map(move |(index, entry)| {
                entry_problems(entry).map(move |(key, problem)| Issue {
                    location: Location::Action { phase, index, key },
                    problem,
                })
            })
    });

    ValidationReport {
        issues: identity.chain(actions).collect(),
    }
}
