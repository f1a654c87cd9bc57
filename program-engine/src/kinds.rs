//! Closed registry of event and command kinds
//!
//! Save data names kinds by string: a presentation discriminant (`typeGUI`)
//! and the backend logic class that performs it (`typeLogic`). Every string
//! the engine accepts is listed here; anything else is rejected at load time.

use crate::types::{EngineError, Result};
use std::fmt;

/// All command kinds known to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveXYZ,
    MoveWrist,
    Speed,
    AttachServos,
    DetachServos,
    Grip,
    Drop,
    Buzzer,
    Wait,
    ColorTrack,
    SetVariable,
    TestVariable,
    Else,
    /// Opens a nested block; everything up to the matching `EndBlock` is indented
    StartBlock,
    /// Closes the innermost open block
    EndBlock,
    Script,
    EndEvent,
    EndProgram,
}

impl CommandKind {
    /// Every variant, in palette order
    pub const ALL: &'static [Self] = &[
        Self::MoveXYZ,
        Self::MoveWrist,
        Self::Speed,
        Self::AttachServos,
        Self::DetachServos,
        Self::Grip,
        Self::Drop,
        Self::Buzzer,
        Self::Wait,
        Self::ColorTrack,
        Self::SetVariable,
        Self::TestVariable,
        Self::Else,
        Self::StartBlock,
        Self::EndBlock,
        Self::Script,
        Self::EndEvent,
        Self::EndProgram,
    ];

    /// Presentation discriminant (`typeGUI` in save data)
    pub const fn gui_name(self) -> &'static str {
        match self {
            Self::MoveXYZ => "MoveXYZCommandGUI",
            Self::MoveWrist => "MoveWristCommandGUI",
            Self::Speed => "SpeedCommandGUI",
            Self::AttachServos => "AttachCommandGUI",
            Self::DetachServos => "DetachCommandGUI",
            Self::Grip => "GripCommandGUI",
            Self::Drop => "DropCommandGUI",
            Self::Buzzer => "BuzzerCommandGUI",
            Self::Wait => "WaitCommandGUI",
            Self::ColorTrack => "ColorTrackCommandGUI",
            Self::SetVariable => "SetVariableCommandGUI",
            Self::TestVariable => "TestVariableCommandGUI",
            Self::Else => "ElseCommandGUI",
            Self::StartBlock => "StartBlockCommandGUI",
            Self::EndBlock => "EndBlockCommandGUI",
            Self::Script => "ScriptCommandGUI",
            Self::EndEvent => "EndEventCommandGUI",
            Self::EndProgram => "EndProgramCommandGUI",
        }
    }

    /// Default backend logic class (`typeLogic` in save data)
    pub const fn logic_name(self) -> &'static str {
        match self {
            Self::MoveXYZ => "MoveXYZCommand",
            Self::MoveWrist => "MoveWristCommand",
            Self::Speed => "SpeedCommand",
            Self::AttachServos => "AttachCommand",
            Self::DetachServos => "DetachCommand",
            Self::Grip => "GripCommand",
            Self::Drop => "DropCommand",
            Self::Buzzer => "BuzzerCommand",
            Self::Wait => "WaitCommand",
            Self::ColorTrack => "ColorTrackCommand",
            Self::SetVariable => "SetVariableCommand",
            Self::TestVariable => "TestVariableCommand",
            Self::Else => "ElseCommand",
            Self::StartBlock => "StartBlockCommand",
            Self::EndBlock => "EndBlockCommand",
            Self::Script => "ScriptCommand",
            Self::EndEvent => "EndEventCommand",
            Self::EndProgram => "EndProgramCommand",
        }
    }

    /// Short human-readable title
    pub const fn title(self) -> &'static str {
        match self {
            Self::MoveXYZ => "Move XYZ",
            Self::MoveWrist => "Set Wrist Angle",
            Self::Speed => "Set Speed",
            Self::AttachServos => "Attach Servos",
            Self::DetachServos => "Detach Servos",
            Self::Grip => "Activate Gripper",
            Self::Drop => "Deactivate Gripper",
            Self::Buzzer => "Play Tone",
            Self::Wait => "Wait",
            Self::ColorTrack => "Track Color",
            Self::SetVariable => "Set Variable",
            Self::TestVariable => "Test Variable",
            Self::Else => "Else",
            Self::StartBlock => "Start Block",
            Self::EndBlock => "End Block",
            Self::Script => "Run Python Code",
            Self::EndEvent => "End Event",
            Self::EndProgram => "End Program",
        }
    }

    /// Look a kind up by its presentation discriminant
    pub fn from_gui_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.gui_name() == name)
            .ok_or_else(|| EngineError::UnknownKind {
                category: "command",
                name: name.to_string(),
            })
    }

    /// True for the kind that opens a nested block
    pub const fn opens_block(self) -> bool {
        matches!(self, Self::StartBlock)
    }

    /// True for the kind that closes a nested block
    pub const fn closes_block(self) -> bool {
        matches!(self, Self::EndBlock)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// All event (trigger) kinds known to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Runs once when the program starts
    Init,
    /// Runs once when the program stops
    Destroy,
    /// Runs on every interpreter step
    Step,
    KeyPress,
    Tip,
    Motion,
    NoMotion,
}

impl EventKind {
    /// Every variant, in picker order
    pub const ALL: &'static [Self] = &[
        Self::Init,
        Self::Destroy,
        Self::Step,
        Self::KeyPress,
        Self::Tip,
        Self::Motion,
        Self::NoMotion,
    ];

    /// Presentation discriminant (`typeGUI` in save data)
    pub const fn gui_name(self) -> &'static str {
        match self {
            Self::Init => "InitEventGUI",
            Self::Destroy => "DestroyEventGUI",
            Self::Step => "StepEventGUI",
            Self::KeyPress => "KeypressEventGUI",
            Self::Tip => "TipEventGUI",
            Self::Motion => "MotionEventGUI",
            Self::NoMotion => "NoMotionEventGUI",
        }
    }

    /// Default backend logic class (`typeLogic` in save data)
    pub const fn logic_name(self) -> &'static str {
        match self {
            Self::Init => "InitEvent",
            Self::Destroy => "DestroyEvent",
            Self::Step => "StepEvent",
            Self::KeyPress => "KeypressEvent",
            Self::Tip => "TipEvent",
            Self::Motion => "MotionEvent",
            Self::NoMotion => "NoMotionEvent",
        }
    }

    /// Short human-readable title
    pub const fn title(self) -> &'static str {
        match self {
            Self::Init => "On Start",
            Self::Destroy => "On End",
            Self::Step => "Every Step",
            Self::KeyPress => "On Key Press",
            Self::Tip => "On Tip",
            Self::Motion => "Motion Detected",
            Self::NoMotion => "No Motion Detected",
        }
    }

    /// Look a kind up by its presentation discriminant
    pub fn from_gui_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.gui_name() == name)
            .ok_or_else(|| EngineError::UnknownKind {
                category: "event",
                name: name.to_string(),
            })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}
