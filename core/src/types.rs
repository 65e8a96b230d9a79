//! Wire DTOs for the counter API.
//!
//! # Design
//! Every shape is strict: unknown fields are rejected, required fields must
//! be present with the right JSON type.
//!
//! `CounterResponse` is the answer to get and create. The service sends one
//! of three shapes that share no common tag: `exists` is `true`, `false`, or
//! missing entirely (creation results carry `already_exists` instead).
//! Deserialization tries each shape independently and accepts the payload
//! only when exactly one matches, so the result does not depend on the order
//! the candidates are tried in. The three shapes never overlap: Exists and
//! Absent need opposite `exists` values, and Created rejects any `exists`
//! field. The ambiguity check in `from_value` is a guard for future shapes.
//!
//! These types are defined independently of the mock-server crate;
//! integration tests catch schema drift between the two.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request payload for create and update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterValue {
    pub current_value: i64,
}

/// Response to get and create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterResponse {
    /// `{ exists: true, key, namespace, current_value }`
    Exists {
        key: String,
        namespace: String,
        current_value: i64,
    },
    /// `{ exists: false }`
    Absent,
    /// `{ already_exists, key, namespace, current_value }`
    Created {
        already_exists: bool,
        key: String,
        namespace: String,
        current_value: i64,
    },
}

impl CounterResponse {
    /// `Some(true)` for `Exists`, `Some(false)` for `Absent`, `None` for a
    /// creation result, which carries no `exists` field.
    pub fn exists(&self) -> Option<bool> {
        match self {
            CounterResponse::Exists { .. } => Some(true),
            CounterResponse::Absent => Some(false),
            CounterResponse::Created { .. } => None,
        }
    }

    pub fn already_exists(&self) -> Option<bool> {
        match self {
            CounterResponse::Created { already_exists, .. } => Some(*already_exists),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            CounterResponse::Exists { key, .. } | CounterResponse::Created { key, .. } => Some(key),
            CounterResponse::Absent => None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            CounterResponse::Exists { namespace, .. }
            | CounterResponse::Created { namespace, .. } => Some(namespace),
            CounterResponse::Absent => None,
        }
    }

    pub fn current_value(&self) -> Option<i64> {
        match self {
            CounterResponse::Exists { current_value, .. }
            | CounterResponse::Created { current_value, .. } => Some(*current_value),
            CounterResponse::Absent => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ExistsShape {
    exists: bool,
    key: String,
    namespace: String,
    current_value: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AbsentShape {
    exists: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CreatedShape {
    already_exists: bool,
    key: String,
    namespace: String,
    current_value: i64,
}

impl CounterResponse {
    /// Match `value` against all three shapes and return the unique match.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let mut matches = Vec::with_capacity(1);

        if let Ok(shape) = serde_json::from_value::<ExistsShape>(value.clone()) {
            if shape.exists {
                matches.push(CounterResponse::Exists {
                    key: shape.key,
                    namespace: shape.namespace,
                    current_value: shape.current_value,
                });
            }
        }
        if let Ok(shape) = serde_json::from_value::<AbsentShape>(value.clone()) {
            if !shape.exists {
                matches.push(CounterResponse::Absent);
            }
        }
        if let Ok(shape) = serde_json::from_value::<CreatedShape>(value.clone()) {
            matches.push(CounterResponse::Created {
                already_exists: shape.already_exists,
                key: shape.key,
                namespace: shape.namespace,
                current_value: shape.current_value,
            });
        }

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(format!(
                "payload matches none of the exists/absent/created shapes: {value}"
            )),
            n => Err(format!("payload is ambiguous, matches {n} shapes: {value}")),
        }
    }
}

impl<'de> Deserialize<'de> for CounterResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        CounterResponse::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Response to increment, decrement and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MutationResponse {
    pub key: String,
    pub namespace: String,
    pub current_value: i64,
    pub previous_value: i64,
    pub success: bool,
}
