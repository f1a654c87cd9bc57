//! Save record shape
//!
//! The exact structure exchanged with the persistence layer. Field names on the
//! wire are the camel-case ones the editor has always written (`typeGUI`,
//! `typeLogic`, `commandList`), so existing program files load unchanged.

use crate::types::{Parameters, Result};
use serde::{Deserialize, Serialize};

/// Ordered event records (order-significant)
pub type SaveData = Vec<EventRecord>;

/// One serialized event and its program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Presentation discriminant of the event kind
    #[serde(rename = "typeGUI")]
    pub type_gui: String,

    /// Backend logic class implementing the event
    #[serde(rename = "typeLogic")]
    pub type_logic: String,

    /// Event parameters, or null for parameterless/wildcard events
    #[serde(default)]
    pub parameters: Option<Parameters>,

    /// The event's commands (order-significant)
    #[serde(rename = "commandList", default)]
    pub command_list: Vec<CommandRecord>,
}

/// One serialized command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Presentation discriminant of the command kind
    #[serde(rename = "typeGUI")]
    pub type_gui: String,

    /// Backend logic class performing the command
    #[serde(rename = "typeLogic")]
    pub type_logic: String,

    /// Command parameters as last accepted by the user
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

/// Serialize save data to pretty-printed JSON
pub fn to_json(data: &[EventRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Parse save data from JSON
pub fn from_json(text: &str) -> Result<SaveData> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "typeGUI": "KeypressEventGUI",
            "typeLogic": "KeypressEvent",
            "parameters": {"checkKey": "A"},
            "commandList": [
                {"typeGUI": "StartBlockCommandGUI", "typeLogic": "StartBlockCommand", "parameters": {}},
                {"typeGUI": "WaitCommandGUI", "typeLogic": "WaitCommand", "parameters": {"time": 0.5}},
                {"typeGUI": "EndBlockCommandGUI", "typeLogic": "EndBlockCommand", "parameters": null}
            ]
        },
        {"typeGUI": "InitEventGUI", "typeLogic": "InitEvent", "parameters": null, "commandList": []}
    ]"#;

    #[test]
    fn test_parse_wire_names() {
        let data = from_json(SAMPLE).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].type_gui, "KeypressEventGUI");
        assert_eq!(data[0].command_list.len(), 3);
        assert_eq!(data[0].command_list[1].type_logic, "WaitCommand");
        assert!(data[0].command_list[2].parameters.is_none());
        assert!(data[1].parameters.is_none());
    }

    #[test]
    fn test_written_json_uses_wire_names() {
        let data = from_json(SAMPLE).unwrap();
        let text = to_json(&data).unwrap();
        assert!(text.contains("\"typeGUI\""));
        assert!(text.contains("\"typeLogic\""));
        assert!(text.contains("\"commandList\""));
        assert!(!text.contains("type_gui"));
        assert_eq!(from_json(&text).unwrap(), data);
    }

    #[test]
    fn test_missing_command_list_defaults_to_empty() {
        let data = from_json(r#"[{"typeGUI": "StepEventGUI", "typeLogic": "StepEvent"}]"#).unwrap();
        assert!(data[0].command_list.is_empty());
        assert!(data[0].parameters.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(from_json("{not json").is_err());
    }
}
