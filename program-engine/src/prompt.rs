//! Collaborator interfaces
//!
//! The engine never opens windows or talks to the interpreter directly. The
//! host hands it these small traits instead: parameter prompts, the event
//! picker, yes/no confirmation and the interpreter status query.

use crate::kinds::{CommandKind, EventKind};
use crate::types::{ExecutionStatus, Parameters};

/// Answer from a parameter prompt
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    /// The user accepted; the bag may be `None` for parameterless kinds
    Accepted(Option<Parameters>),
    /// The user cancelled the prompt
    Rejected,
}

/// Collects per-command parameters from the user
pub trait CommandPrompt {
    /// Ask for the parameters of `kind`. `current` holds the existing bag when
    /// re-editing a command, `None` for a fresh one.
    fn prompt(&mut self, kind: CommandKind, current: Option<&Parameters>) -> PromptOutcome;
}

/// An event type and its parameters as chosen in the event picker
#[derive(Debug, Clone, PartialEq)]
pub struct EventChoice {
    pub kind: EventKind,
    pub parameters: Option<Parameters>,
}

/// The event-type picker used by "Add Event" and "Change"
pub trait EventPrompt {
    /// `None` when the user dismissed the picker
    fn choose_event(&mut self) -> Option<EventChoice>;
}

/// Yes/no confirmation before destructive actions
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Polled view of the script interpreter
pub trait InterpreterStatus {
    /// Current snapshot of which events are running and which of their
    /// commands have been executed so far
    fn status(&self) -> ExecutionStatus;
}

impl<F> InterpreterStatus for F
where
    F: Fn() -> ExecutionStatus,
{
    fn status(&self) -> ExecutionStatus {
        self()
    }
}

/// Confirmation prompt with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirm(pub bool);

impl ConfirmPrompt for FixedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        log::debug!("Auto-answering confirmation '{}' with {}", message, self.0);
        self.0
    }
}
