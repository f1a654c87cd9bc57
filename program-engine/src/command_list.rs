//! Command list engine
//!
//! Ordered commands of a single event. Owns nesting-depth recomputation,
//! insertion at arbitrary positions (palette drag-in), internal reordering,
//! bulk deletion and the save-record mapping.

use crate::kinds::CommandKind;
use crate::registry::{Handle, Registry};
use crate::save::CommandRecord;
use crate::types::{EngineError, Parameters, Result};
use std::collections::HashSet;

/// Handle to a command inside its list
pub type CommandHandle = Handle<Command>;

/// One program step
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandKind,
    parameters: Option<Parameters>,
    logic_pair: String,
    indent: usize,
}

impl Command {
    /// Create a command with the kind's default logic pair
    pub fn new(kind: CommandKind, parameters: Option<Parameters>) -> Self {
        Self {
            kind,
            parameters,
            logic_pair: kind.logic_name().to_string(),
            indent: 0,
        }
    }

    /// Rebuild a command from a save record
    pub fn from_record(record: &CommandRecord) -> Result<Self> {
        let kind = CommandKind::from_gui_name(&record.type_gui)?;
        if record.type_logic != kind.logic_name() {
            log::warn!(
                "Command {} saved with logic pair '{}' (expected '{}'), keeping saved value",
                record.type_gui,
                record.type_logic,
                kind.logic_name()
            );
        }
        Ok(Self {
            kind,
            parameters: record.parameters.clone(),
            logic_pair: record.type_logic.clone(),
            indent: 0,
        })
    }

    /// Map this command to its save record
    pub fn to_record(&self) -> CommandRecord {
        CommandRecord {
            type_gui: self.kind.gui_name().to_string(),
            type_logic: self.logic_pair.clone(),
            parameters: self.parameters.clone(),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    /// Backend logic class performing this command
    pub fn logic_pair(&self) -> &str {
        &self.logic_pair
    }

    /// Nesting depth, derived by [`CommandList::recompute_indent`]
    pub fn indent(&self) -> usize {
        self.indent
    }
}

/// Ordered commands belonging to one event
#[derive(Debug)]
pub struct CommandList {
    commands: Registry<Command>,
    locked: bool,
}

impl CommandList {
    /// Create an empty, unlocked list
    pub fn new() -> Self {
        Self {
            commands: Registry::new("command"),
            locked: false,
        }
    }

    /// Build a list from save records. Nothing is created unless every
    /// record names a registered kind.
    pub fn from_records(records: &[CommandRecord]) -> Result<Self> {
        let mut list = Self::new();
        list.load_from(records)?;
        Ok(list)
    }

    fn refuse_if_locked(&self, operation: &str) -> bool {
        if self.locked {
            log::warn!("CommandList::{}: list is locked while the script runs, ignoring", operation);
        }
        self.locked
    }

    /// Append a command. Parameters must already have been collected by the
    /// caller; a rejected prompt never reaches this point.
    ///
    /// Returns `None` when the list is locked.
    pub fn add(&mut self, kind: CommandKind, parameters: Option<Parameters>) -> Option<CommandHandle> {
        let index = self.commands.len();
        self.insert(kind, parameters, index)
    }

    /// Insert a fresh command at `index` (drop from the palette). An index
    /// past the end appends.
    pub fn insert(
        &mut self,
        kind: CommandKind,
        parameters: Option<Parameters>,
        index: usize,
    ) -> Option<CommandHandle> {
        if self.refuse_if_locked("insert") {
            return None;
        }
        let handle = self.commands.register_at(index, Command::new(kind, parameters));
        log::debug!("Added {} command {} at position {}", kind.gui_name(), handle, index.min(self.commands.len() - 1));
        self.recompute_indent();
        Some(handle)
    }

    /// Remove every command in `handles`.
    ///
    /// All handles are validated before anything is removed; an unknown
    /// handle aborts the whole call. An empty set is a no-op.
    /// Returns the number of commands removed.
    pub fn delete_selected(&mut self, handles: &HashSet<CommandHandle>) -> Result<usize> {
        if handles.is_empty() {
            log::debug!("CommandList::delete_selected: nothing selected");
            return Ok(0);
        }
        if self.refuse_if_locked("delete_selected") {
            return Ok(0);
        }
        for handle in handles {
            self.commands.resolve(*handle)?;
        }
        for handle in handles {
            self.commands.unregister(*handle)?;
        }
        log::debug!("Deleted {} command(s)", handles.len());
        self.recompute_indent();
        Ok(handles.len())
    }

    /// Move an existing command to `index` (internal drag). Returns false
    /// when the list is locked.
    pub fn move_command(&mut self, handle: CommandHandle, index: usize) -> Result<bool> {
        self.commands.resolve(handle)?;
        if self.refuse_if_locked("move_command") {
            return Ok(false);
        }
        self.commands.move_to(handle, index)?;
        self.recompute_indent();
        Ok(true)
    }

    /// Replace the parameters of an existing command (re-edit). Returns false
    /// when the list is locked.
    pub fn update_parameters(&mut self, handle: CommandHandle, parameters: Option<Parameters>) -> Result<bool> {
        self.commands.resolve(handle)?;
        if self.refuse_if_locked("update_parameters") {
            return Ok(false);
        }
        self.commands.resolve_mut(handle)?.parameters = parameters;
        Ok(true)
    }

    /// Recompute every command's nesting depth in one forward pass.
    ///
    /// A block opener sits at the depth outside its block, then depth grows.
    /// A block closer shrinks depth first, so it lines up with its opener.
    /// Depth never goes below zero, even for unbalanced blocks.
    pub fn recompute_indent(&mut self) {
        let mut depth: usize = 0;
        self.commands.for_each_ordered_mut(|command| {
            if command.kind.closes_block() {
                depth = depth.saturating_sub(1);
            }
            command.indent = depth;
            if command.kind.opens_block() {
                depth += 1;
            }
        });
    }

    /// Current order mapped 1:1 onto save records
    pub fn get_ordered_save(&self) -> Vec<CommandRecord> {
        self.commands.ordered().map(|(_, command)| command.to_record()).collect()
    }

    /// Replace the whole list with `records`, bypassing parameter prompts.
    ///
    /// Every record is validated first: on `UnknownKind` the list is untouched.
    pub fn load_from(&mut self, records: &[CommandRecord]) -> Result<()> {
        let commands = records
            .iter()
            .map(Command::from_record)
            .collect::<Result<Vec<_>>>()?;

        if self.refuse_if_locked("load_from") {
            return Ok(());
        }

        self.commands.clear();
        for command in commands {
            self.commands.register(command);
        }
        self.recompute_indent();
        log::debug!("Loaded {} command(s)", self.commands.len());
        Ok(())
    }

    /// Lock or unlock structural edits
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Resolve a handle to its command
    pub fn get(&self, handle: CommandHandle) -> Result<&Command> {
        self.commands.resolve(handle)
    }

    /// Command at a visual position
    pub fn get_at(&self, index: usize) -> Option<(CommandHandle, &Command)> {
        let handle = self.commands.handle_at(index)?;
        self.commands.resolve(handle).ok().map(|command| (handle, command))
    }

    /// Handle at a visual position
    pub fn handle_at(&self, index: usize) -> Option<CommandHandle> {
        self.commands.handle_at(index)
    }

    /// Visual position of a handle
    pub fn position(&self, handle: CommandHandle) -> Result<usize> {
        self.commands.position(handle).ok_or(EngineError::HandleNotFound {
            kind: "command",
            id: handle.id(),
        })
    }

    /// Commands in visual order
    pub fn iter(&self) -> impl Iterator<Item = (CommandHandle, &Command)> + '_ {
        self.commands.ordered()
    }

    /// Indents in visual order
    pub fn indents(&self) -> Vec<usize> {
        self.iter().map(|(_, command)| command.indent).collect()
    }

    /// All handles in visual order
    pub fn handles(&self) -> &[CommandHandle] {
        self.commands.handles()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::params;
    use serde_json::json;

    fn list_of(kinds: &[CommandKind]) -> CommandList {
        let mut list = CommandList::new();
        for kind in kinds {
            list.add(*kind, None);
        }
        list
    }

    #[test]
    fn test_block_pair_shares_indent() {
        use CommandKind::*;
        let list = list_of(&[Wait, StartBlock, MoveXYZ, EndBlock, Speed]);
        assert_eq!(list.indents(), vec![0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_nested_blocks() {
        use CommandKind::*;
        let list = list_of(&[StartBlock, TestVariable, StartBlock, Wait, EndBlock, Else, EndBlock, Grip]);
        assert_eq!(list.indents(), vec![0, 1, 1, 2, 1, 1, 0, 0]);
    }

    #[test]
    fn test_unbalanced_blocks_clamp_at_zero() {
        use CommandKind::*;
        let list = list_of(&[EndBlock, EndBlock, Wait, StartBlock, Wait]);
        assert_eq!(list.indents(), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_insert_at_index_and_past_end() {
        use CommandKind::*;
        let mut list = list_of(&[Wait, Speed]);
        let grip = list.insert(Grip, None, 1).unwrap();
        let drop = list.insert(Drop, None, 42).unwrap();

        let kinds: Vec<_> = list.iter().map(|(_, c)| c.kind()).collect();
        assert_eq!(kinds, vec![Wait, Grip, Speed, Drop]);
        assert_eq!(list.position(grip).unwrap(), 1);
        assert_eq!(list.position(drop).unwrap(), 3);
    }

    #[test]
    fn test_insert_recomputes_indent() {
        use CommandKind::*;
        let mut list = list_of(&[Wait, Speed, Grip]);
        list.insert(StartBlock, None, 1);
        list.insert(EndBlock, None, 3);
        assert_eq!(list.indents(), vec![0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_delete_selected() {
        use CommandKind::*;
        let mut list = list_of(&[StartBlock, Wait, EndBlock]);
        let opener = list.handle_at(0).unwrap();
        let closer = list.handle_at(2).unwrap();

        let removed = list.delete_selected(&HashSet::from([opener, closer])).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.indents(), vec![0]);
    }

    #[test]
    fn test_delete_nothing_is_noop() {
        let mut list = list_of(&[CommandKind::Wait]);
        assert_eq!(list.delete_selected(&HashSet::new()).unwrap(), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_delete_with_stale_handle_is_all_or_nothing() {
        use CommandKind::*;
        let mut list = list_of(&[Wait, Speed]);
        let wait = list.handle_at(0).unwrap();
        let speed = list.handle_at(1).unwrap();
        list.delete_selected(&HashSet::from([wait])).unwrap();

        let result = list.delete_selected(&HashSet::from([wait, speed]));
        assert!(matches!(result, Err(EngineError::HandleNotFound { .. })));
        assert_eq!(list.len(), 1);
        assert!(list.get(speed).is_ok());
    }

    #[test]
    fn test_move_command() {
        use CommandKind::*;
        let mut list = list_of(&[StartBlock, Wait, EndBlock, Speed]);
        let speed = list.handle_at(3).unwrap();

        assert!(list.move_command(speed, 1).unwrap());
        let kinds: Vec<_> = list.iter().map(|(_, c)| c.kind()).collect();
        assert_eq!(kinds, vec![StartBlock, Speed, Wait, EndBlock]);
        assert_eq!(list.indents(), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_locked_list_rejects_structural_edits() {
        use CommandKind::*;
        let mut list = list_of(&[Wait]);
        let wait = list.handle_at(0).unwrap();
        list.set_locked(true);

        assert!(list.add(Speed, None).is_none());
        assert!(list.insert(Speed, None, 0).is_none());
        assert_eq!(list.delete_selected(&HashSet::from([wait])).unwrap(), 0);
        assert!(!list.move_command(wait, 0).unwrap());
        assert!(!list.update_parameters(wait, None).unwrap());
        assert_eq!(list.len(), 1);

        list.set_locked(false);
        assert!(list.add(Speed, None).is_some());
    }

    #[test]
    fn test_update_parameters() {
        let mut list = CommandList::new();
        let wait = list
            .add(CommandKind::Wait, Some(params([("time", json!(1.0))])))
            .unwrap();
        list.update_parameters(wait, Some(params([("time", json!(2.5))]))).unwrap();
        assert_eq!(
            list.get(wait).unwrap().parameters().unwrap().get("time"),
            Some(&json!(2.5))
        );
    }

    #[test]
    fn test_save_and_load() {
        use CommandKind::*;
        let mut list = CommandList::new();
        list.add(MoveXYZ, Some(params([("x", json!(10)), ("y", json!(-15))])));
        list.add(StartBlock, None);
        list.add(Buzzer, Some(params([("frequency", json!(1000))])));
        list.add(EndBlock, None);

        let saved = list.get_ordered_save();
        assert_eq!(saved[0].type_gui, "MoveXYZCommandGUI");
        assert_eq!(saved[0].type_logic, "MoveXYZCommand");

        let restored = CommandList::from_records(&saved).unwrap();
        assert_eq!(restored.get_ordered_save(), saved);
        assert_eq!(restored.indents(), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_load_keeps_saved_logic_pair() {
        let record = CommandRecord {
            type_gui: "WaitCommandGUI".to_string(),
            type_logic: "LegacyWaitCommand".to_string(),
            parameters: None,
        };
        let list = CommandList::from_records(&[record.clone()]).unwrap();
        assert_eq!(list.get_ordered_save(), vec![record]);
    }

    #[test]
    fn test_load_unknown_kind_leaves_list_untouched() {
        let mut list = list_of(&[CommandKind::Wait]);
        let records = vec![
            CommandRecord {
                type_gui: "SpeedCommandGUI".to_string(),
                type_logic: "SpeedCommand".to_string(),
                parameters: None,
            },
            CommandRecord {
                type_gui: "LaserCommandGUI".to_string(),
                type_logic: "LaserCommand".to_string(),
                parameters: None,
            },
        ];

        let result = list.load_from(&records);
        assert!(matches!(result, Err(EngineError::UnknownKind { .. })));
        assert_eq!(list.len(), 1);
        assert_eq!(list.get_at(0).unwrap().1.kind(), CommandKind::Wait);
    }
}
