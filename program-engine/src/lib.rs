//! Robot Program Engine
//!
//! The data and ordering engine behind a robot-automation editor's program
//! view: a list of events, each owning an ordered list of commands that may
//! nest inside start/end block pairs.
//!
//! # Architecture
//!
//! - [`registry`] maps stable handles to objects and keeps their visual order
//! - [`command_list`] owns one event's commands and their nesting depth
//! - [`event_list`] owns the events, dedup, selection, locking and save/load
//! - [`highlight`] projects the interpreter's polled status onto highlight flags
//! - [`control`] ties the above together behind the editor's buttons
//!
//! The engine does NOT:
//! - Render anything or open windows (prompts are injected traits)
//! - Execute robot actions or validate command parameters
//! - Read or write files (save data is an in-memory record list)
//! - Provide undo/redo
//!
//! Everything runs on one thread. The highlight poll is pumped from the host
//! loop through an injected [`TimerService`].
//!
//! # Example Usage
//!
//! ```
//! use program_engine::{ControlSurface, EngineConfig, EventKind, ExecutionStatus, ManualTimer};
//!
//! let interpreter = || ExecutionStatus::from([(0, vec![1])]);
//! let mut surface = ControlSurface::new(EngineConfig::new(), ManualTimer::new(), interpreter);
//!
//! surface.add_event(EventKind::Init, None);
//! let records = surface.get_save_data();
//! assert_eq!(records[0].type_gui, "InitEventGUI");
//!
//! surface.set_script_mode(true);
//! surface.timer_mut().fire();
//! assert!(surface.pump());
//! surface.set_script_mode(false);
//! assert!(surface.highlights().is_empty());
//! ```

// Public modules
pub mod command_list;
pub mod config;
pub mod control;
pub mod event_list;
pub mod highlight;
pub mod kinds;
pub mod prompt;
pub mod registry;
pub mod save;
pub mod timer;
pub mod types;

// Re-export main types for convenience
pub use command_list::{Command, CommandHandle, CommandList};
pub use config::EngineConfig;
pub use control::ControlSurface;
pub use event_list::{DeleteOutcome, Event, EventHandle, EventList, ReplaceOutcome};
pub use highlight::{HighlightProjector, HighlightState, ProjectorState};
pub use kinds::{CommandKind, EventKind};
pub use prompt::{
    CommandPrompt, ConfirmPrompt, EventChoice, EventPrompt, FixedConfirm, InterpreterStatus,
    PromptOutcome,
};
pub use registry::{Handle, Registry, RegistryStats};
pub use save::{CommandRecord, EventRecord, SaveData};
pub use timer::{IntervalTimer, ManualTimer, TimerService};
pub use types::{EngineError, ExecutionStatus, Parameters, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
