//! Scripted interpreter state
//!
//! Stands in for the real script interpreter during a simulated run: it
//! replays configured status snapshots, advancing one snapshot per poll.

use crate::config::SnapshotConfig;
use program_engine::{ExecutionStatus, InterpreterStatus};
use std::cell::Cell;

/// Replays a fixed list of interpreter snapshots
#[derive(Debug)]
pub struct ScriptedInterpreter {
    snapshots: Vec<ExecutionStatus>,
    /// Next snapshot to hand out. `Cell` because polling takes `&self`.
    cursor: Cell<usize>,
}

impl ScriptedInterpreter {
    pub fn new(snapshots: &[SnapshotConfig]) -> Self {
        Self {
            snapshots: snapshots.iter().map(SnapshotConfig::to_status).collect(),
            cursor: Cell::new(0),
        }
    }

    /// True once every snapshot has been polled
    pub fn is_finished(&self) -> bool {
        self.cursor.get() >= self.snapshots.len()
    }

    /// Number of snapshots polled so far
    pub fn polled(&self) -> usize {
        self.cursor.get().min(self.snapshots.len())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl InterpreterStatus for ScriptedInterpreter {
    /// Current snapshot; after the last one the interpreter reports nothing running
    fn status(&self) -> ExecutionStatus {
        let index = self.cursor.get();
        self.cursor.set(index + 1);
        self.snapshots.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunningEventConfig;

    #[test]
    fn test_replays_snapshots_in_order() {
        let snapshots = vec![
            SnapshotConfig {
                running: vec![RunningEventConfig { event: 0, commands: vec![0] }],
            },
            SnapshotConfig {
                running: vec![RunningEventConfig { event: 1, commands: vec![2, 3] }],
            },
        ];
        let interpreter = ScriptedInterpreter::new(&snapshots);
        assert_eq!(interpreter.len(), 2);
        assert!(!interpreter.is_finished());

        assert_eq!(interpreter.status().get(&0), Some(&vec![0]));
        assert_eq!(interpreter.status().get(&1), Some(&vec![2, 3]));
        assert!(interpreter.is_finished());
        assert_eq!(interpreter.polled(), 2);

        assert!(interpreter.status().is_empty());
        assert_eq!(interpreter.polled(), 2);
    }
}
