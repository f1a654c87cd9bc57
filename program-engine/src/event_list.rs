//! Event list engine
//!
//! Ordered events, each owning its own [`CommandList`]. Handles the
//! dedup-on-add rule, in-place replacement ("change type"), confirmation-gated
//! deletion, the single-selection model, locking and save/load.

use crate::command_list::CommandList;
use crate::kinds::EventKind;
use crate::prompt::ConfirmPrompt;
use crate::registry::{Handle, Registry};
use crate::save::{CommandRecord, EventRecord};
use crate::types::{Parameters, Result};

/// Handle to an event inside the event list
pub type EventHandle = Handle<Event>;

/// A trigger condition with its attached program
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    parameters: Option<Parameters>,
    logic_pair: String,
    commands: CommandList,
}

impl Event {
    fn new(kind: EventKind, parameters: Option<Parameters>, commands: CommandList) -> Self {
        Self {
            kind,
            parameters,
            logic_pair: kind.logic_name().to_string(),
            commands,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    /// Backend logic class implementing this event
    pub fn logic_pair(&self) -> &str {
        &self.logic_pair
    }

    pub fn commands(&self) -> &CommandList {
        &self.commands
    }

    pub fn commands_mut(&mut self) -> &mut CommandList {
        &mut self.commands
    }

    /// Would adding an event of `kind`/`parameters` duplicate this one?
    /// `None` parameters act as a wildcard matching any event of the same kind.
    fn conflicts_with(&self, kind: EventKind, parameters: Option<&Parameters>) -> bool {
        self.kind == kind && (parameters.is_none() || self.parameters.as_ref() == parameters)
    }

    fn to_record(&self) -> EventRecord {
        EventRecord {
            type_gui: self.kind.gui_name().to_string(),
            type_logic: self.logic_pair.clone(),
            parameters: self.parameters.clone(),
            command_list: self.commands.get_ordered_save(),
        }
    }
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The event and its commands were removed
    Deleted(EventHandle),
    /// Nothing is selected; nothing was removed
    NoSelection,
    /// The user declined the confirmation; nothing was removed
    Declined,
    /// The list is locked while a script runs
    Locked,
}

/// Result of a replace ("change type") request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// Another event already has this kind and parameters
    Duplicate,
    Locked,
}

/// A validated event record, ready to be added without further failure
struct PreparedEvent {
    kind: EventKind,
    parameters: Option<Parameters>,
    logic_pair: String,
    commands: CommandList,
}

impl PreparedEvent {
    fn from_record(record: &EventRecord) -> Result<Self> {
        let kind = EventKind::from_gui_name(&record.type_gui)?;
        if record.type_logic != kind.logic_name() {
            log::warn!(
                "Event {} saved with logic pair '{}' (expected '{}'), keeping saved value",
                record.type_gui,
                record.type_logic,
                kind.logic_name()
            );
        }
        Ok(Self {
            kind,
            parameters: record.parameters.clone(),
            logic_pair: record.type_logic.clone(),
            commands: CommandList::from_records(&record.command_list)?,
        })
    }
}

/// Ordered events plus the current selection
#[derive(Debug)]
pub struct EventList {
    events: Registry<Event>,
    selected: Option<EventHandle>,
    locked: bool,
}

impl EventList {
    /// Create an empty, unlocked list with no selection
    pub fn new() -> Self {
        Self {
            events: Registry::new("event"),
            selected: None,
            locked: false,
        }
    }

    fn refuse_if_locked(&self, operation: &str) -> bool {
        if self.locked {
            log::warn!("EventList::{}: list is locked while the script runs, ignoring", operation);
        }
        self.locked
    }

    /// Find an existing event that `kind`/`parameters` would duplicate,
    /// optionally ignoring one event (the one being replaced)
    pub fn find_duplicate(
        &self,
        kind: EventKind,
        parameters: Option<&Parameters>,
        excluding: Option<EventHandle>,
    ) -> Option<EventHandle> {
        self.events
            .ordered()
            .filter(|(handle, _)| Some(*handle) != excluding)
            .find(|(_, event)| event.conflicts_with(kind, parameters))
            .map(|(handle, _)| handle)
    }

    /// Add an event with a program loaded from `command_records`.
    ///
    /// Adding a duplicate (same kind and equal parameters, or `None`
    /// parameters while any event of that kind exists) is a logged no-op.
    /// On success the new event becomes the selection.
    ///
    /// Fails only if a command record names an unknown kind, before anything
    /// is added.
    pub fn add(
        &mut self,
        kind: EventKind,
        parameters: Option<Parameters>,
        command_records: &[CommandRecord],
    ) -> Result<Option<EventHandle>> {
        if self.refuse_if_locked("add") {
            return Ok(None);
        }
        let commands = CommandList::from_records(command_records)?;
        Ok(self.add_event(Event::new(kind, parameters, commands)))
    }

    fn add_event(&mut self, event: Event) -> Option<EventHandle> {
        if let Some(existing) = self.find_duplicate(event.kind, event.parameters.as_ref(), None) {
            log::info!(
                "Event {} already exists as {}, disregarding",
                event.kind.gui_name(),
                existing
            );
            return None;
        }

        let kind = event.kind;
        let handle = self.events.register(event);
        self.selected = Some(handle);
        log::info!("Added event {} {} (selected)", kind.gui_name(), handle);
        Some(handle)
    }

    /// Delete `handle`.
    ///
    /// Requires a selection to exist. If the event still owns commands the
    /// user must confirm first; declining leaves everything untouched.
    pub fn delete(&mut self, handle: EventHandle, confirm: &mut dyn ConfirmPrompt, message: &str) -> Result<DeleteOutcome> {
        if self.selected.is_none() {
            log::warn!("EventList::delete: no event selected");
            return Ok(DeleteOutcome::NoSelection);
        }
        let event = self.events.resolve(handle)?;
        if self.refuse_if_locked("delete") {
            return Ok(DeleteOutcome::Locked);
        }

        if !event.commands.is_empty() && !confirm.confirm(message) {
            log::info!("User declined deleting event {}", handle);
            return Ok(DeleteOutcome::Declined);
        }

        let event = self.events.unregister(handle)?;
        if self.selected == Some(handle) {
            self.selected = None;
        }
        log::info!(
            "Deleted event {} {} with {} command(s)",
            event.kind.gui_name(),
            handle,
            event.commands.len()
        );
        Ok(DeleteOutcome::Deleted(handle))
    }

    /// Delete the selected event (see [`EventList::delete`])
    pub fn delete_selected(&mut self, confirm: &mut dyn ConfirmPrompt, message: &str) -> Result<DeleteOutcome> {
        match self.selected {
            Some(handle) => self.delete(handle, confirm, message),
            None => {
                log::warn!("EventList::delete_selected: no event selected");
                Ok(DeleteOutcome::NoSelection)
            }
        }
    }

    /// Change the kind/parameters of `handle` in place, keeping its program.
    ///
    /// The dedup check ignores the event being replaced, so re-choosing the
    /// same kind with new parameters is allowed. The old event is discarded;
    /// its command list moves to the new one unchanged, in the same slot.
    pub fn replace(
        &mut self,
        handle: EventHandle,
        kind: EventKind,
        parameters: Option<Parameters>,
    ) -> Result<ReplaceOutcome> {
        self.events.resolve(handle)?;
        if self.refuse_if_locked("replace") {
            return Ok(ReplaceOutcome::Locked);
        }
        if let Some(existing) = self.find_duplicate(kind, parameters.as_ref(), Some(handle)) {
            log::info!(
                "Event {} already exists as {}, not replacing {}",
                kind.gui_name(),
                existing,
                handle
            );
            return Ok(ReplaceOutcome::Duplicate);
        }

        let placeholder = Event::new(kind, parameters, CommandList::new());
        let mut old = self.events.replace(handle, placeholder)?;
        let new = self.events.resolve_mut(handle)?;
        std::mem::swap(&mut new.commands, &mut old.commands);
        log::info!(
            "Replaced event {} {} with {}",
            old.kind.gui_name(),
            handle,
            kind.gui_name()
        );
        Ok(ReplaceOutcome::Replaced)
    }

    /// Select an event
    pub fn select(&mut self, handle: EventHandle) -> Result<()> {
        self.events.resolve(handle)?;
        self.selected = Some(handle);
        Ok(())
    }

    /// Select the event at a visual position. Returns false if out of range.
    pub fn select_at(&mut self, index: usize) -> bool {
        match self.events.handle_at(index) {
            Some(handle) => {
                self.selected = Some(handle);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected handle, if any
    pub fn selected(&self) -> Option<EventHandle> {
        self.selected
    }

    /// Currently selected event, if any
    pub fn selected_event(&self) -> Option<&Event> {
        self.selected.and_then(|handle| self.events.resolve(handle).ok())
    }

    /// Currently selected event, mutably
    pub fn selected_event_mut(&mut self) -> Option<&mut Event> {
        let handle = self.selected?;
        self.events.resolve_mut(handle).ok()
    }

    /// Current order mapped onto save records
    pub fn get_ordered_save(&self) -> Vec<EventRecord> {
        self.events.ordered().map(|(_, event)| event.to_record()).collect()
    }

    /// Replace the whole list with `records`.
    ///
    /// Every record (including nested commands) is validated before the
    /// current list is cleared. Records go through the normal add path, so
    /// duplicates are dropped. Optionally selects the first event afterwards.
    pub fn load_from(&mut self, records: &[EventRecord], select_first: bool) -> Result<()> {
        let prepared = records
            .iter()
            .map(PreparedEvent::from_record)
            .collect::<Result<Vec<_>>>()?;

        if self.refuse_if_locked("load_from") {
            return Ok(());
        }

        self.events.clear();
        for event in prepared {
            let mut new = Event::new(event.kind, event.parameters, event.commands);
            new.logic_pair = event.logic_pair;
            self.add_event(new);
        }

        // add_event selects each event it adds
        self.selected = if select_first { self.events.handle_at(0) } else { None };
        log::info!("Loaded {} event(s) from {} record(s)", self.events.len(), records.len());
        Ok(())
    }

    /// Lock or unlock structural edits, cascading to every command list
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        for event in self.events.values_mut() {
            event.commands.set_locked(locked);
        }
        log::debug!("Event list {}", if locked { "locked" } else { "unlocked" });
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Resolve a handle to its event
    pub fn get(&self, handle: EventHandle) -> Result<&Event> {
        self.events.resolve(handle)
    }

    /// Resolve a handle to its event, mutably
    pub fn get_mut(&mut self, handle: EventHandle) -> Result<&mut Event> {
        self.events.resolve_mut(handle)
    }

    /// Event at a visual position
    pub fn get_at(&self, index: usize) -> Option<(EventHandle, &Event)> {
        let handle = self.events.handle_at(index)?;
        self.events.resolve(handle).ok().map(|event| (handle, event))
    }

    /// Visual position of a handle
    pub fn position(&self, handle: EventHandle) -> Option<usize> {
        self.events.position(handle)
    }

    /// Events in visual order
    pub fn iter(&self) -> impl Iterator<Item = (EventHandle, &Event)> + '_ {
        self.events.ordered()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for EventList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::CommandKind;
    use crate::prompt::FixedConfirm;
    use crate::types::{params, EngineError};
    use serde_json::json;

    const MSG: &str = "delete?";

    fn key(k: &str) -> Option<Parameters> {
        Some(params([("checkKey", json!(k))]))
    }

    fn wait_records(n: usize) -> Vec<CommandRecord> {
        (0..n)
            .map(|_| CommandRecord {
                type_gui: "WaitCommandGUI".to_string(),
                type_logic: "WaitCommand".to_string(),
                parameters: None,
            })
            .collect()
    }

    #[test]
    fn test_add_selects_new_event() {
        let mut list = EventList::new();
        let init = list.add(EventKind::Init, None, &[]).unwrap().unwrap();
        assert_eq!(list.selected(), Some(init));

        let step = list.add(EventKind::Step, None, &wait_records(2)).unwrap().unwrap();
        assert_eq!(list.selected(), Some(step));
        assert_eq!(list.get(step).unwrap().commands().len(), 2);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &[]).unwrap();
        assert!(list.add(EventKind::Init, None, &[]).unwrap().is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_dedup_compares_parameters_by_value() {
        let mut list = EventList::new();
        list.add(EventKind::KeyPress, key("A"), &[]).unwrap().unwrap();

        assert!(list.add(EventKind::KeyPress, key("A"), &[]).unwrap().is_none());
        assert!(list.add(EventKind::KeyPress, key("B"), &[]).unwrap().is_some());
        assert_eq!(list.len(), 2);

        // Wildcard parameters collide with any event of the same kind
        assert!(list.add(EventKind::KeyPress, None, &[]).unwrap().is_none());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_add_with_unknown_command_kind_adds_nothing() {
        let mut list = EventList::new();
        let records = vec![CommandRecord {
            type_gui: "WarpCommandGUI".to_string(),
            type_logic: "WarpCommand".to_string(),
            parameters: None,
        }];
        let result = list.add(EventKind::Init, None, &records);
        assert!(matches!(result, Err(EngineError::UnknownKind { .. })));
        assert!(list.is_empty());
    }

    #[test]
    fn test_delete_requires_selection() {
        let mut list = EventList::new();
        let init = list.add(EventKind::Init, None, &[]).unwrap().unwrap();
        list.clear_selection();

        let outcome = list.delete(init, &mut FixedConfirm(true), MSG).unwrap();
        assert_eq!(outcome, DeleteOutcome::NoSelection);
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.delete_selected(&mut FixedConfirm(true), MSG).unwrap(),
            DeleteOutcome::NoSelection
        );
    }

    #[test]
    fn test_delete_empty_event_skips_confirmation() {
        let mut list = EventList::new();
        let init = list.add(EventKind::Init, None, &[]).unwrap().unwrap();

        // Declining would abort, but an empty event never asks
        let outcome = list.delete_selected(&mut FixedConfirm(false), MSG).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(init));
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_declined_delete_changes_nothing() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &wait_records(3)).unwrap().unwrap();

        let outcome = list.delete_selected(&mut FixedConfirm(false), MSG).unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(list.len(), 1);
        assert_eq!(list.selected_event().unwrap().commands().len(), 3);
    }

    #[test]
    fn test_replace_keeps_program_and_slot() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &[]).unwrap();
        let key_a = list.add(EventKind::KeyPress, key("A"), &wait_records(2)).unwrap().unwrap();
        list.add(EventKind::Step, None, &[]).unwrap();

        let outcome = list.replace(key_a, EventKind::Tip, None).unwrap();
        assert_eq!(outcome, ReplaceOutcome::Replaced);

        let event = list.get(key_a).unwrap();
        assert_eq!(event.kind(), EventKind::Tip);
        assert_eq!(event.logic_pair(), "TipEvent");
        assert_eq!(event.commands().len(), 2);
        assert_eq!(list.position(key_a), Some(1));
    }

    #[test]
    fn test_replace_dedup_excludes_self() {
        let mut list = EventList::new();
        let key_a = list.add(EventKind::KeyPress, key("A"), &[]).unwrap().unwrap();
        list.add(EventKind::KeyPress, key("B"), &[]).unwrap();

        // A -> C only collides with A itself, which is ignored
        assert_eq!(
            list.replace(key_a, EventKind::KeyPress, key("C")).unwrap(),
            ReplaceOutcome::Replaced
        );
        assert_eq!(
            list.replace(key_a, EventKind::KeyPress, key("B")).unwrap(),
            ReplaceOutcome::Duplicate
        );
        assert_eq!(
            list.get(key_a).unwrap().parameters(),
            key("C").as_ref()
        );
    }

    #[test]
    fn test_locked_list() {
        let mut list = EventList::new();
        let init = list.add(EventKind::Init, None, &wait_records(1)).unwrap().unwrap();
        list.set_locked(true);

        assert!(list.get(init).unwrap().commands().is_locked());
        assert!(list.add(EventKind::Step, None, &[]).unwrap().is_none());
        assert_eq!(
            list.delete_selected(&mut FixedConfirm(true), MSG).unwrap(),
            DeleteOutcome::Locked
        );
        assert_eq!(list.replace(init, EventKind::Tip, None).unwrap(), ReplaceOutcome::Locked);
        assert_eq!(list.len(), 1);

        // Selection still works while locked
        list.clear_selection();
        list.select(init).unwrap();

        list.set_locked(false);
        assert!(!list.get(init).unwrap().commands().is_locked());
    }

    #[test]
    fn test_round_trip() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &wait_records(2)).unwrap();
        list.add(EventKind::KeyPress, key("Q"), &[]).unwrap();
        {
            let commands = list.selected_event_mut().unwrap().commands_mut();
            commands.add(CommandKind::StartBlock, None);
            commands.add(CommandKind::MoveXYZ, Some(params([("z", json!(5))])));
            commands.add(CommandKind::EndBlock, None);
        }
        let saved = list.get_ordered_save();

        let mut restored = EventList::new();
        restored.load_from(&saved, true).unwrap();
        assert_eq!(restored.get_ordered_save(), saved);
        assert_eq!(restored.selected(), restored.get_at(0).map(|(h, _)| h));

        let (_, key_event) = restored.get_at(1).unwrap();
        assert_eq!(key_event.commands().indents(), vec![0, 1, 0]);
    }

    #[test]
    fn test_load_drops_duplicate_records() {
        let record = EventRecord {
            type_gui: "InitEventGUI".to_string(),
            type_logic: "InitEvent".to_string(),
            parameters: None,
            command_list: vec![],
        };
        let mut list = EventList::new();
        list.load_from(&[record.clone(), record], true).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_load_unknown_event_kind_keeps_state() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &[]).unwrap();

        let records = vec![EventRecord {
            type_gui: "EarthquakeEventGUI".to_string(),
            type_logic: "EarthquakeEvent".to_string(),
            parameters: None,
            command_list: vec![],
        }];
        assert!(list.load_from(&records, true).is_err());
        assert_eq!(list.len(), 1);
        assert_eq!(list.get_at(0).unwrap().1.kind(), EventKind::Init);
    }

    #[test]
    fn test_load_without_select_first_selects_nothing() {
        let records: Vec<EventRecord> = [EventKind::Init, EventKind::Step, EventKind::Tip]
            .iter()
            .map(|kind| EventRecord {
                type_gui: kind.gui_name().to_string(),
                type_logic: kind.logic_name().to_string(),
                parameters: None,
                command_list: vec![],
            })
            .collect();

        let mut list = EventList::new();
        list.load_from(&records, false).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.selected(), None);

        list.load_from(&records, true).unwrap();
        assert_eq!(list.selected(), list.get_at(0).map(|(h, _)| h));
    }

    #[test]
    fn test_load_empty_leaves_no_selection() {
        let mut list = EventList::new();
        list.add(EventKind::Init, None, &[]).unwrap();
        list.load_from(&[], true).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
    }
}
