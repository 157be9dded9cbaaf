//! Keyboard shortcuts

use super::active::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    SelectTool(ToolKind),
    /// Leave the active tool and drop pending points
    Cancel,
    StepBackward,
    StepForward,
    ResetTrajectories,
    ToggleMagnifier,
}

impl KeyCommand {
    /// Map a `KeyboardEvent.key` value; unknown keys are ignored
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "m" | "M" => Some(KeyCommand::SelectTool(ToolKind::Measure)),
            "a" | "A" => Some(KeyCommand::SelectTool(ToolKind::Annotate)),
            "g" | "G" => Some(KeyCommand::SelectTool(ToolKind::Angle)),
            "c" | "C" => Some(KeyCommand::SelectTool(ToolKind::Calibrate)),
            "Escape" => Some(KeyCommand::Cancel),
            "ArrowLeft" => Some(KeyCommand::StepBackward),
            "ArrowRight" => Some(KeyCommand::StepForward),
            "t" | "T" => Some(KeyCommand::ResetTrajectories),
            "z" | "Z" => Some(KeyCommand::ToggleMagnifier),
            _ => None,
        }
    }
}
