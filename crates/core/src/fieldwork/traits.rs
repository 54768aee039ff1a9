//! Collaborator traits
//!
//! The fieldwork driver is composed from these collaborators instead of
//! extending a generic driving base. Each one is owned by the driver and
//! only reached through its trait.

use super::state::{FieldworkEvents, StopReason};
use crate::course::Course;
use crate::tool::WorkTool;

/// Driving core interface
///
/// # Lifecycle
///
/// 1. `start(ix)` - Called once to enter the driver
/// 2. `drive(dt)` - Called every tick while active
/// 3. `stop(reason)` - Called to leave the driver, valid at any time
pub trait DrivingCore {
    /// Begin driving at waypoint `start_ix`
    fn start(&mut self, start_ix: usize) -> FieldworkEvents;

    /// Advance one tick
    ///
    /// # Arguments
    ///
    /// * `dt` - Delta time since last tick (seconds)
    fn drive(&mut self, dt: f32) -> FieldworkEvents;

    /// Stop driving, always raising implements first
    fn stop(&mut self, reason: StopReason) -> FieldworkEvents;

    /// Check if the driver is active
    fn is_active(&self) -> bool;

    /// Get driver name for logging and telemetry
    fn name(&self) -> &'static str;
}

/// Shared cruise-control speed register of the vehicle
///
/// Other subsystems may overwrite it between ticks, so the driver writes it
/// again on every tick.
pub trait SpeedGovernor {
    /// Set the cruise-control maximum speed
    fn set_cruise_control_max_speed(&mut self, speed: f32);
}

/// Vehicle capability queries and implement actuation requests
pub trait Vehicle: SpeedGovernor {
    /// Attached tool type
    type Tool: WorkTool;

    /// Externally reported speed limit (`None` = unbounded)
    fn speed_limit(&self) -> Option<f32> {
        None
    }

    /// Attached tools (`None` = no tool set configured)
    fn work_tools(&self) -> Option<&[Self::Tool]>;

    /// Request lowering and turning on all tools (fire-and-forget)
    fn lower_and_turn_on_all_tools(&mut self);

    /// Request raising and turning off all tools (fire-and-forget)
    fn raise_and_turn_off_all_tools(&mut self);

    /// Notification fired once when work starts
    fn on_work_start(&mut self) {}

    /// Notification fired once when work stops
    fn on_work_stop(&mut self) {}
}

/// Events reported by the path follower during a drive tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEvent {
    /// The last waypoint of the current course was passed
    EndOfCourse,
}

/// Low-level path following controller
pub trait PathFollower {
    /// Replace the course being followed
    fn set_course(&mut self, course: &Course);

    /// Restart following at waypoint `start_ix` of the current course
    fn initialize(&mut self, start_ix: usize);

    /// Steer and throttle along the course for one tick
    ///
    /// `max_speed` is an upper bound; the follower may go slower (turns,
    /// approach). Returns an event when the course end is reached.
    fn drive(&mut self, dt: f32, max_speed: f32) -> Option<PathEvent>;

    /// Base stop handling (bring the vehicle to rest)
    fn stop(&mut self, reason: StopReason);

    /// Index of the waypoint currently driven to
    fn current_waypoint_index(&self) -> usize;
}

/// Alignment course generator
pub trait AlignmentCourseGenerator {
    /// Course that brings the vehicle onto `course` at `start_ix`
    ///
    /// Returns `None` when the vehicle is already aligned.
    fn alignment_course(&mut self, course: &Course, start_ix: usize) -> Option<Course>;
}

/// Generator for vehicles that never need an alignment course
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlignment;

impl AlignmentCourseGenerator for NoAlignment {
    fn alignment_course(&mut self, _course: &Course, _start_ix: usize) -> Option<Course> {
        None
    }
}
