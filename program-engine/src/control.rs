//! Control surface
//!
//! The coordinating façade behind the editor's program view. It owns the
//! event list and the highlight projector, tracks which command list is on
//! display, routes the editor's buttons to the list engines and switches
//! between editing and script (locked, highlighted) mode.

use crate::command_list::{CommandHandle, CommandList};
use crate::config::EngineConfig;
use crate::event_list::{DeleteOutcome, EventHandle, EventList, ReplaceOutcome};
use crate::highlight::{HighlightProjector, HighlightState, ProjectorState};
use crate::kinds::{CommandKind, EventKind};
use crate::prompt::{CommandPrompt, ConfirmPrompt, EventPrompt, InterpreterStatus, PromptOutcome};
use crate::save::EventRecord;
use crate::timer::TimerService;
use crate::types::{Parameters, Result};
use std::collections::HashSet;

/// Top-level program view model
pub struct ControlSurface<T: TimerService, I: InterpreterStatus> {
    config: EngineConfig,
    events: EventList,
    projector: HighlightProjector<T>,
    interpreter: I,
    /// Event whose command list is currently exposed for display
    displayed: Option<EventHandle>,
    script_mode: bool,
}

impl<T: TimerService, I: InterpreterStatus> ControlSurface<T, I> {
    /// Create a surface with an empty event list.
    ///
    /// The timer drives the highlight poll; the interpreter is only ever read
    /// through its status query.
    pub fn new(config: EngineConfig, timer: T, interpreter: I) -> Self {
        let projector = HighlightProjector::new(timer, config.poll_interval());
        Self {
            config,
            events: EventList::new(),
            projector,
            interpreter,
            displayed: None,
            script_mode: false,
        }
    }

    /// Make the displayed command list follow the current selection
    pub fn refresh(&mut self) {
        self.displayed = self.events.selected();
        if self.displayed.is_none() {
            log::debug!("ControlSurface::refresh: no event selected");
        }
    }

    /// Handle of the event whose commands are on display
    pub fn displayed_event(&self) -> Option<EventHandle> {
        self.displayed
    }

    /// The command list on display, if an event is selected
    pub fn displayed_command_list(&self) -> Option<&CommandList> {
        self.displayed
            .and_then(|handle| self.events.get(handle).ok())
            .map(|event| event.commands())
    }

    fn displayed_command_list_mut(&mut self) -> Option<&mut CommandList> {
        let handle = self.displayed?;
        self.events.get_mut(handle).ok().map(|event| event.commands_mut())
    }

    pub fn event_list(&self) -> &EventList {
        &self.events
    }

    // ----- Events -----

    /// Add an event with an empty program and display it
    pub fn add_event(&mut self, kind: EventKind, parameters: Option<Parameters>) -> Option<EventHandle> {
        // An empty record list cannot name an unknown kind
        let added = self.events.add(kind, parameters, &[]).ok().flatten();
        self.refresh();
        added
    }

    /// "Add Event" button: ask the picker, then add
    pub fn prompt_add_event(&mut self, prompt: &mut dyn EventPrompt) -> Option<EventHandle> {
        match prompt.choose_event() {
            Some(choice) => self.add_event(choice.kind, choice.parameters),
            None => {
                log::info!("User rejected the event prompt");
                None
            }
        }
    }

    /// Change the selection and the displayed command list
    pub fn select_event(&mut self, handle: EventHandle) -> Result<()> {
        self.events.select(handle)?;
        self.refresh();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.events.clear_selection();
        self.refresh();
    }

    /// "Delete" button: delete the selected event, confirming if it has commands
    pub fn delete_selected_event(&mut self, confirm: &mut dyn ConfirmPrompt) -> Result<DeleteOutcome> {
        let message = self.config.delete_confirmation.clone();
        let outcome = self.events.delete_selected(confirm, &message)?;
        self.refresh();
        Ok(outcome)
    }

    /// "Change" button: ask the picker, then replace the selected event in place.
    /// Returns `None` when nothing is selected or the picker was dismissed.
    pub fn prompt_replace_selected_event(
        &mut self,
        prompt: &mut dyn EventPrompt,
    ) -> Result<Option<ReplaceOutcome>> {
        let handle = match self.events.selected() {
            Some(handle) => handle,
            None => {
                log::warn!("You need to select an event to change");
                return Ok(None);
            }
        };
        let choice = match prompt.choose_event() {
            Some(choice) => choice,
            None => {
                log::info!("User rejected the event prompt");
                return Ok(None);
            }
        };
        let outcome = self.events.replace(handle, choice.kind, choice.parameters)?;
        self.refresh();
        Ok(Some(outcome))
    }

    // ----- Commands of the displayed event -----

    /// Append a command to the displayed list after prompting for parameters
    pub fn add_command(&mut self, kind: CommandKind, prompt: &mut dyn CommandPrompt) -> Option<CommandHandle> {
        let index = self.displayed_command_list().map_or(0, CommandList::len);
        self.drop_command(kind, index, prompt)
    }

    /// Drag a command in from the palette at `index`, prompting for parameters
    pub fn drop_command(
        &mut self,
        kind: CommandKind,
        index: usize,
        prompt: &mut dyn CommandPrompt,
    ) -> Option<CommandHandle> {
        if self.displayed.is_none() {
            log::warn!("Cannot add {}: no event selected", kind.gui_name());
            return None;
        }
        if self.events.is_locked() {
            log::warn!("Cannot add {} while the script runs", kind.gui_name());
            return None;
        }
        let parameters = match prompt.prompt(kind, None) {
            PromptOutcome::Accepted(parameters) => parameters,
            PromptOutcome::Rejected => {
                log::info!("User rejected the {} prompt", kind.gui_name());
                return None;
            }
        };
        self.displayed_command_list_mut()?.insert(kind, parameters, index)
    }

    /// Re-open a command's prompt with its current parameters.
    /// Returns true if new parameters were stored.
    pub fn edit_command(&mut self, handle: CommandHandle, prompt: &mut dyn CommandPrompt) -> Result<bool> {
        let locked = self.events.is_locked();
        let list = match self.displayed_command_list_mut() {
            Some(list) => list,
            None => {
                log::warn!("Cannot edit command {}: no event selected", handle);
                return Ok(false);
            }
        };
        let command = list.get(handle)?;
        if locked {
            log::warn!("Cannot edit command {} while the script runs", handle);
            return Ok(false);
        }
        match prompt.prompt(command.kind(), command.parameters()) {
            PromptOutcome::Accepted(parameters) => list.update_parameters(handle, parameters),
            PromptOutcome::Rejected => Ok(false),
        }
    }

    /// Delete commands from the displayed list
    pub fn delete_commands(&mut self, handles: &HashSet<CommandHandle>) -> Result<usize> {
        match self.displayed_command_list_mut() {
            Some(list) => list.delete_selected(handles),
            None => {
                log::warn!("Cannot delete commands: no event selected");
                Ok(0)
            }
        }
    }

    /// Reorder a command inside the displayed list
    pub fn move_command(&mut self, handle: CommandHandle, index: usize) -> Result<bool> {
        match self.displayed_command_list_mut() {
            Some(list) => list.move_command(handle, index),
            None => {
                log::warn!("Cannot move command {}: no event selected", handle);
                Ok(false)
            }
        }
    }

    // ----- Script mode -----

    /// Enter or leave script mode.
    ///
    /// Entering locks every structural edit and starts the highlight poll.
    /// Leaving unlocks, stops the poll and clears every highlight.
    pub fn set_script_mode(&mut self, running: bool) {
        self.script_mode = running;
        self.events.set_locked(running);
        if running {
            self.projector.start();
        } else {
            self.projector.stop();
        }
        log::info!("Script mode {}", if running { "on" } else { "off" });
    }

    pub fn is_script_mode(&self) -> bool {
        self.script_mode
    }

    /// Called from the host loop. Runs at most one highlight projection when
    /// the timer has due ticks; returns true if it did.
    pub fn pump(&mut self) -> bool {
        self.projector.poll(&self.events, &self.interpreter)
    }

    pub fn highlights(&self) -> &HighlightState {
        self.projector.highlights()
    }

    pub fn projector_state(&self) -> ProjectorState {
        self.projector.state()
    }

    pub fn timer(&self) -> &T {
        self.projector.timer()
    }

    pub fn timer_mut(&mut self) -> &mut T {
        self.projector.timer_mut()
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut I {
        &mut self.interpreter
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ----- Save / load -----

    pub fn get_save_data(&self) -> Vec<EventRecord> {
        self.events.get_ordered_save()
    }

    /// Replace the whole program. Rejected (no-op) while in script mode.
    pub fn load_data(&mut self, records: &[EventRecord]) -> Result<()> {
        if self.script_mode {
            log::warn!("Cannot load a program while the script runs");
            return Ok(());
        }
        self.events.load_from(records, self.config.select_first_on_load)?;
        self.refresh();
        Ok(())
    }
}
