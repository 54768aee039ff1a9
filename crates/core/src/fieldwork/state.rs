//! Fieldwork state types
//!
//! Operating states, stop reasons and the events the driver emits for
//! telemetry.

use core::fmt;

use heapless::Vec;

/// Maximum fieldwork events emitted per call.
pub const MAX_FIELDWORK_EVENTS: usize = 8;

/// Events emitted by a single driver call
pub type FieldworkEvents = Vec<FieldworkEvent, MAX_FIELDWORK_EVENTS>;

/// Sub-phase of the fieldwork state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldworkPhase {
    /// Implements requested down, vehicle stands still until they are ready
    WaitingForLower,
    /// Working the field
    Working,
    /// Implements requested up, vehicle stands still until they are raised
    WaitingForRaise,
}

/// Operating state of an active fieldwork driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingState {
    /// Driving the alignment course onto the fieldwork course
    Alignment,
    /// On the fieldwork course
    Fieldwork(FieldworkPhase),
    /// On the unload/refill course
    UnloadOrRefill,
    /// Standing still until released
    Held,
}

impl OperatingState {
    /// State name for logging and telemetry
    pub fn as_str(self) -> &'static str {
        match self {
            OperatingState::Alignment => "ALIGNMENT",
            OperatingState::Fieldwork(FieldworkPhase::WaitingForLower) => {
                "FIELDWORK/WAITING_FOR_LOWER"
            }
            OperatingState::Fieldwork(FieldworkPhase::Working) => "FIELDWORK/WORKING",
            OperatingState::Fieldwork(FieldworkPhase::WaitingForRaise) => {
                "FIELDWORK/WAITING_FOR_RAISE"
            }
            OperatingState::UnloadOrRefill => "UNLOAD_OR_REFILL",
            OperatingState::Held => "HELD",
        }
    }

    /// Check if this is any fieldwork phase
    pub fn is_fieldwork(self) -> bool {
        matches!(self, OperatingState::Fieldwork(_))
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Host or operator asked to stop
    Requested,
    /// Active course ran out of waypoints
    EndOfCourse,
    /// Fill levels unacceptable and no unload/refill course to drive
    NeedUnloadOrRefill {
        /// Tool-supplied warning text
        warning: Option<&'static str>,
    },
}

impl StopReason {
    /// Stop reason string shown to the user
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Requested => "STOP_REQUESTED",
            StopReason::EndOfCourse => "END_POINT",
            StopReason::NeedUnloadOrRefill { .. } => "NEED_UNLOAD_OR_REFILL",
        }
    }

    /// Optional warning text shown with the stop reason
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            StopReason::NeedUnloadOrRefill { warning } => *warning,
            _ => None,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.warning() {
            Some(warning) => write!(f, "{}: {}", self.as_str(), warning),
            None => f.write_str(self.as_str()),
        }
    }
}

/// Events emitted by the fieldwork driver for telemetry coordination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldworkEvent {
    /// Operating state changed
    StateChanged(OperatingState),
    /// Lower + turn-on requested for all tools
    WorkStarted,
    /// Raise + turn-off requested for all tools
    WorkStopped,
    /// Driver became inactive
    Stopped(StopReason),
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_state_names() {
        assert_eq!(OperatingState::Alignment.as_str(), "ALIGNMENT");
        assert_eq!(
            OperatingState::Fieldwork(FieldworkPhase::WaitingForLower).as_str(),
            "FIELDWORK/WAITING_FOR_LOWER"
        );
        assert_eq!(OperatingState::Held.as_str(), "HELD");
    }

    #[test]
    fn test_is_fieldwork() {
        assert!(OperatingState::Fieldwork(FieldworkPhase::Working).is_fieldwork());
        assert!(!OperatingState::UnloadOrRefill.is_fieldwork());
    }

    #[test]
    fn test_stop_reason_display() {
        let mut text = heapless::String::<64>::new();
        write!(text, "{}", StopReason::EndOfCourse).unwrap();
        assert_eq!(text.as_str(), "END_POINT");

        text.clear();
        let reason = StopReason::NeedUnloadOrRefill {
            warning: Some("Tank empty"),
        };
        write!(text, "{}", reason).unwrap();
        assert_eq!(text.as_str(), "NEED_UNLOAD_OR_REFILL: Tank empty");
        assert_eq!(reason.warning(), Some("Tank empty"));
    }

    #[test]
    fn test_warning_absent_by_default() {
        assert_eq!(StopReason::Requested.warning(), None);
        assert_eq!(
            StopReason::NeedUnloadOrRefill { warning: None }.warning(),
            None
        );
    }
}
