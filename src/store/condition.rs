//! # Condition Predicates
//!
//! Predicates attached to mutations and evaluated by the store against the
//! current stored record before anything is applied. All optimistic
//! concurrency and business invariants (version stamps, sufficient stock,
//! credit limits, one-way flags) are expressed through these, never through
//! in-process locks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field every versioned entity carries for optimistic concurrency.
pub const VERSION_FIELD: &str = "version";

/// A predicate over the current stored record.
///
/// Evaluation sees `None` when no record exists under the mutation's key;
/// a missing record fails every predicate except [`Condition::Absent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// The record's version stamp equals `expected`
    VersionIs { expected: u64 },

    /// The named field is present and equal to `value`
    FieldEquals { field: String, value: Value },

    /// The named field is an integer `>= min`
    FieldAtLeast { field: String, min: i64 },

    /// No record exists under the key
    Absent,

    /// At least one of the inner conditions holds
    AnyOf { conditions: Vec<Condition> },
}

impl Condition {
    /// Version-stamp equality predicate.
    pub fn version_is(expected: u64) -> Self {
        Self::VersionIs { expected }
    }

    /// Field equality predicate.
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Integer lower-bound predicate.
    pub fn field_at_least(field: impl Into<String>, min: i64) -> Self {
        Self::FieldAtLeast {
            field: field.into(),
            min,
        }
    }

    /// Disjunction of predicates.
    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Self::AnyOf { conditions }
    }

    /// Evaluate against the current stored record, if any.
    pub fn evaluate(&self, record: Option<&Value>) -> bool {
        match self {
            Self::Absent => record.is_none(),
            Self::AnyOf { conditions } => conditions.iter().any(|c| c.evaluate(record)),
            Self::VersionIs { expected } => {
                record
                    .and_then(|r| r.get(VERSION_FIELD))
                    .and_then(Value::as_u64)
                    == Some(*expected)
            }
            Self::FieldEquals { field, value } => record.and_then(|r| r.get(field)) == Some(value),
            Self::FieldAtLeast { field, min } => record
                .and_then(|r| r.get(field))
                .and_then(Value::as_i64)
                .is_some_and(|v| v >= *min),
        }
    }

    /// Human-readable form for condition-failure reasons.
    pub fn describe(&self) -> String {
        match self {
            Self::VersionIs { expected } => format!("version != {}", expected),
            Self::FieldEquals { field, value } => format!("{} != {}", field, value),
            Self::FieldAtLeast { field, min } => format!("{} < {}", field, min),
            Self::Absent => "record exists".to_string(),
            Self::AnyOf { conditions } => {
                let parts: Vec<String> = conditions.iter().map(Condition::describe).collect();
                format!("none of [{}]", parts.join(", "))
            }
        }
    }
}
