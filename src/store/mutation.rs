//! # Mutation Model
//!
//! A mutation is one proposed change to one record: a create, a conditional
//! update, or a delete. The enum shape carries the structural rules (a
//! create is the only variant with a full record, an update the only one
//! with an update expression) so malformed combinations cannot be built.
//!
//! Mutations are fully constructed by the transaction assemblers; the
//! commit layer only checks count and forwards them to the store.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::condition::{Condition, VERSION_FIELD};

/// One proposed change to one record, targeted by collection and key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Create a record; fails as a condition failure if the key exists
    Create {
        collection: String,
        key: String,
        record: Value,
    },

    /// Apply an update expression if every condition holds
    Update {
        collection: String,
        key: String,
        expr: UpdateExpr,
        conditions: Vec<Condition>,
    },

    /// Remove a record if every condition holds
    Delete {
        collection: String,
        key: String,
        conditions: Vec<Condition>,
    },
}

impl Mutation {
    /// Create-record mutation.
    pub fn create(collection: impl Into<String>, key: impl Into<String>, record: Value) -> Self {
        Self::Create {
            collection: collection.into(),
            key: key.into(),
            record,
        }
    }

    /// Conditional update mutation.
    pub fn update(
        collection: impl Into<String>,
        key: impl Into<String>,
        expr: UpdateExpr,
        conditions: Vec<Condition>,
    ) -> Self {
        Self::Update {
            collection: collection.into(),
            key: key.into(),
            expr,
            conditions,
        }
    }

    /// Version-guarded update against a versioned entity.
    ///
    /// Prepends the `version == expected_version` predicate and appends the
    /// version bump to the expression, so a caller cannot take one half of
    /// the optimistic-concurrency contract without the other.
    pub fn update_versioned(
        collection: impl Into<String>,
        key: impl Into<String>,
        expected_version: u64,
        expr: UpdateExpr,
        extra_conditions: Vec<Condition>,
    ) -> Self {
        let mut conditions = Vec::with_capacity(extra_conditions.len() + 1);
        conditions.push(Condition::version_is(expected_version));
        conditions.extend(extra_conditions);

        Self::Update {
            collection: collection.into(),
            key: key.into(),
            expr: expr.increment(VERSION_FIELD, 1),
            conditions,
        }
    }

    /// Conditional delete mutation.
    pub fn delete(
        collection: impl Into<String>,
        key: impl Into<String>,
        conditions: Vec<Condition>,
    ) -> Self {
        Self::Delete {
            collection: collection.into(),
            key: key.into(),
            conditions,
        }
    }

    /// Target collection.
    pub fn collection(&self) -> &str {
        match self {
            Self::Create { collection, .. }
            | Self::Update { collection, .. }
            | Self::Delete { collection, .. } => collection,
        }
    }

    /// Target key.
    pub fn key(&self) -> &str {
        match self {
            Self::Create { key, .. } | Self::Update { key, .. } | Self::Delete { key, .. } => key,
        }
    }

    /// Mutation kind for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Ordered field actions applied by the store inside the atomic commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExpr {
    pub actions: Vec<UpdateAction>,
}

/// One field-level action of an update expression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UpdateAction {
    /// Set a field to a literal value
    Set { field: String, value: Value },

    /// Add `by` to an integer field; a missing field counts as zero
    Increment { field: String, by: i64 },
}

impl UpdateExpr {
    /// Empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a set action.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.actions.push(UpdateAction::Set {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Append an increment action.
    pub fn increment(mut self, field: impl Into<String>, by: i64) -> Self {
        self.actions.push(UpdateAction::Increment {
            field: field.into(),
            by,
        });
        self
    }

    /// Whether the expression has no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Apply the expression to a record in place.
    ///
    /// Store-side only. Returns a description of the first action that
    /// cannot be applied (non-object record, increment of a non-integer).
    pub(crate) fn apply(&self, record: &mut Value) -> Result<(), String> {
        let Some(fields) = record.as_object_mut() else {
            return Err("record is not an object".to_string());
        };

        for action in &self.actions {
            match action {
                UpdateAction::Set { field, value } => {
                    fields.insert(field.clone(), value.clone());
                }
                UpdateAction::Increment { field, by } => {
                    let current = match fields.get(field) {
                        None => 0,
                        Some(v) => v
                            .as_i64()
                            .ok_or_else(|| format!("field {} is not an integer", field))?,
                    };
                    fields.insert(field.clone(), Value::from(current + by));
                }
            }
        }

        Ok(())
    }
}
