//! Fieldwork driving core
//!
//! Decides what an autonomous field vehicle does while working a course:
//! work the field, drive the unload/refill course, wait for implements, or
//! hold. Path following, implement actuation and alignment course generation
//! are collaborators injected through traits.
//!
//! # Modules
//!
//! - [`state`]: Operating states, stop reasons and emitted events
//! - [`traits`]: Collaborator traits and the `DrivingCore` interface
//! - [`speed`]: Target speed selection and governor re-assertion
//! - [`driver`]: The `FieldworkDriver` state machine

pub mod driver;
pub mod speed;
pub mod state;
pub mod traits;

pub use driver::FieldworkDriver;
pub use speed::SpeedPolicy;
pub use state::{
    FieldworkEvent, FieldworkEvents, FieldworkPhase, OperatingState, StopReason,
    MAX_FIELDWORK_EVENTS,
};
pub use traits::{
    AlignmentCourseGenerator, DrivingCore, NoAlignment, PathEvent, PathFollower, SpeedGovernor,
    Vehicle,
};
