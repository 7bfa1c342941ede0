//! Transitions reported by the engine

use std::fmt;

use flagfall_core::{ClockTime, Side, TimeControl};

/// What a command or tick changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum ClockEvent {
    /// `by` ended its move and was credited; `running` now counts down
    Pressed {
        by: Side,
        running: Side,
        credited: ClockTime,
        from_idle: bool,
    },
    /// `side` was running and has been stopped
    Paused { side: Side },
    /// Both sides restored to the control's starting time
    Reset { control: TimeControl },
    /// A new control was stored; remaining times untouched
    Configured { control: TimeControl },
    /// `side` ran out of time
    Flagged { side: Side },
}

impl ClockEvent {
    pub fn is_flag_fall(&self) -> bool {
        matches!(self, ClockEvent::Flagged { .. })
    }
}

impl fmt::Display for ClockEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockEvent::Pressed { by, running, .. } => {
                write!(f, "{} pressed, {} running", by, running)
            }
            ClockEvent::Paused { side } => write!(f, "paused ({} was running)", side),
            ClockEvent::Reset { control } => write!(f, "reset to {}", control),
            ClockEvent::Configured { control } => write!(f, "configured {}", control),
            ClockEvent::Flagged { side } => write!(f, "{} flagged", side),
        }
    }
}
