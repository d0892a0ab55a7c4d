//! Per-frame report returned by the control loop.

use crate::command::Command;
use crate::types::{ControlState, Gain, Ratio};

/// What a command did to the loop state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandEffect {
    /// Control flipped to the given state.
    Toggled(ControlState),
    /// Toggle arrived inside the cooldown and was dropped.
    ToggleDebounced,
    /// Gains after a (possibly clamped) adjustment.
    GainChanged(Gain),
    /// New calibration center taken from this frame's raw sample.
    CenterSet(Ratio),
    /// No raw sample this frame, center unchanged.
    CenterSkipped,
    /// Center and gains restored to their reset presets.
    Reset,
    Quit,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Integer position handed to the pointer this frame, if any.
    pub moved_to: Option<(i32, i32)>,
    /// State after the frame's command was applied.
    pub state: ControlState,
    pub command: Option<Command>,
    pub effect: Option<CommandEffect>,
    pub terminated: bool,
}

impl FrameReport {
    pub(crate) fn terminated(state: ControlState) -> Self {
        FrameReport {
            moved_to: None,
            state,
            command: None,
            effect: None,
            terminated: true,
        }
    }
}
