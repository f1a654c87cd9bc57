//! Core types for the program engine
//!
//! This module defines the fundamental value types shared by every list engine:
//! the parameter bag attached to events and commands, the interpreter status
//! snapshot, and the error type.

use std::collections::BTreeMap;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Opaque parameter bag attached to an event or a command.
///
/// Keys are strings, values are arbitrary JSON values. The engine never
/// interprets the contents; it only compares bags for equality (event dedup)
/// and carries them through save/load verbatim.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Snapshot of the interpreter's progress.
///
/// Key: position of a running event in the event list.
/// Value: command positions executed so far within that event, in execution order.
pub type ExecutionStatus = BTreeMap<usize, Vec<usize>>;

/// Errors that can occur in the engine
///
/// User-level rejections (declined prompts, duplicate events, edits while locked,
/// missing selection) are not errors; they surface as outcomes and log lines.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A handle was looked up that is not registered. This is a broken
    /// invariant in the caller, never a user mistake.
    #[error("{kind} handle #{id} is not registered")]
    HandleNotFound {
        /// "event" or "command"
        kind: &'static str,
        /// Raw handle id
        id: u64,
    },

    #[error("Unknown {category} kind: {name}")]
    UnknownKind {
        /// "event" or "command"
        category: &'static str,
        /// The unregistered discriminant found in save data
        name: String,
    },

    #[error("Invalid save data: {0}")]
    InvalidSaveData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build a parameter bag from `(key, value)` pairs.
///
/// # Example
/// ```
/// use program_engine::types::params;
/// use serde_json::json;
///
/// let p = params([("x", json!(10)), ("y", json!(-4))]);
/// assert_eq!(p.len(), 2);
/// ```
pub fn params<K, I>(pairs: I) -> Parameters
where
    K: Into<String>,
    I: IntoIterator<Item = (K, serde_json::Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
