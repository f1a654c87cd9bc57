//! Execution highlight projector
//!
//! While a script runs, the interpreter's sparse "what is executing" snapshot
//! is polled at a fixed cadence and projected onto per-item highlight flags.
//! Highlights are presentation state only: they live here, keyed by handle,
//! and never touch the events or commands themselves.

use crate::command_list::CommandHandle;
use crate::event_list::{EventHandle, EventList};
use crate::prompt::InterpreterStatus;
use crate::timer::TimerService;
use crate::types::ExecutionStatus;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Highlight flags for events and their commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    events: HashSet<EventHandle>,
    commands: HashMap<EventHandle, HashSet<CommandHandle>>,
}

impl HighlightState {
    pub fn is_event_highlighted(&self, event: EventHandle) -> bool {
        self.events.contains(&event)
    }

    pub fn is_command_highlighted(&self, event: EventHandle, command: CommandHandle) -> bool {
        self.commands
            .get(&event)
            .is_some_and(|commands| commands.contains(&command))
    }

    pub fn highlighted_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn highlighted_command_count(&self) -> usize {
        self.commands.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.highlighted_event_count() == 0 && self.highlighted_command_count() == 0
    }

    fn set_event(&mut self, event: EventHandle, on: bool) {
        if on {
            self.events.insert(event);
        } else {
            self.events.remove(&event);
        }
    }

    fn set_only_command(&mut self, event: EventHandle, command: Option<CommandHandle>) {
        match command {
            Some(command) => {
                self.commands.insert(event, HashSet::from([command]));
            }
            None => {
                self.commands.remove(&event);
            }
        }
    }

    fn clear(&mut self) {
        self.events.clear();
        self.commands.clear();
    }
}

/// Projector state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectorState {
    Idle,
    Running,
}

/// Polls the interpreter through an injected timer and maintains highlights
#[derive(Debug)]
pub struct HighlightProjector<T: TimerService> {
    timer: T,
    interval: Duration,
    state: ProjectorState,
    highlights: HighlightState,
    ticks: u64,
}

impl<T: TimerService> HighlightProjector<T> {
    pub fn new(timer: T, interval: Duration) -> Self {
        Self {
            timer,
            interval,
            state: ProjectorState::Idle,
            highlights: HighlightState::default(),
            ticks: 0,
        }
    }

    /// Idle -> Running: start the poll timer
    pub fn start(&mut self) {
        if self.state == ProjectorState::Running {
            log::debug!("Highlight projector already running");
            return;
        }
        self.state = ProjectorState::Running;
        self.ticks = 0;
        self.timer.start(self.interval);
        log::info!("Highlight projector started ({:?} cadence)", self.interval);
    }

    /// Running -> Idle: stop the timer and clear every highlight.
    ///
    /// The full de-highlight pass always runs, even if already idle.
    pub fn stop(&mut self) {
        self.timer.stop();
        if self.state == ProjectorState::Running {
            log::info!("Highlight projector stopped after {} tick(s)", self.ticks);
        }
        self.state = ProjectorState::Idle;
        self.highlights.clear();
    }

    /// Run one projection if the timer has due ticks. Several due ticks are
    /// coalesced into a single snapshot read. Returns true if a projection ran.
    pub fn poll(&mut self, events: &EventList, interpreter: &dyn InterpreterStatus) -> bool {
        if self.state != ProjectorState::Running {
            return false;
        }
        let due = self.timer.take_due_ticks();
        if due == 0 {
            return false;
        }
        if due > 1 {
            log::trace!("Coalescing {} due ticks into one poll", due);
        }
        let status = interpreter.status();
        self.project(events, &status);
        true
    }

    /// Project one interpreter snapshot onto the highlight flags.
    ///
    /// Every event is highlighted iff its position is a key of `status`.
    /// Only the selected event gets command-level work: its most recently
    /// started command is highlighted and all its other commands are not.
    pub fn project(&mut self, events: &EventList, status: &ExecutionStatus) {
        self.ticks += 1;
        let selected = events.selected();

        for (index, (handle, event)) in events.iter().enumerate() {
            let running = status.get(&index);
            self.highlights.set_event(handle, running.is_some());

            if Some(handle) != selected {
                continue;
            }

            let current = running
                .and_then(|executed| executed.last())
                .and_then(|last| {
                    let command = event.commands().handle_at(*last);
                    if command.is_none() {
                        log::trace!("Event {} reports command {} beyond its list", index, last);
                    }
                    command
                });
            self.highlights.set_only_command(handle, current);
        }
        log::trace!(
            "Tick {}: {} event(s) running",
            self.ticks,
            self.highlights.highlighted_event_count()
        );
    }

    pub fn state(&self) -> ProjectorState {
        self.state
    }

    pub fn highlights(&self) -> &HighlightState {
        &self.highlights
    }

    /// Projections run since the last start
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}
