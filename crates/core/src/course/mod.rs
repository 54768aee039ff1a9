//! Course Types
//!
//! Pure data structures for waypoint courses.
//!
//! # Course Storage
//!
//! - Fixed-size waypoint array (max 512 waypoints)
//! - Immutable once built; derived courses copy their waypoints
//! - Always non-empty (enforced by [`Course::new`])
//!
//! # Note
//!
//! Loading waypoints from disk is not handled here. The host builds a
//! [`Course`] from whatever source it uses and hands it to the
//! [`splitter`] once, before the fieldwork driver starts.

pub mod splitter;

use core::fmt;

use heapless::Vec;

pub use splitter::{find_split_index, split_course, CourseSplit};

/// Maximum number of waypoints in a course
pub const MAX_COURSE_WAYPOINTS: usize = 512;

/// Vehicle identifier a course is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VehicleId(pub u8);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vehicle({})", self.0)
    }
}

/// Position in the local field frame (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// East axis
    pub x: f32,
    /// North axis
    pub z: f32,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Course waypoint
///
/// A position plus the "wait" marker. Upstream waypoint sources use the
/// wait marker to separate the fieldwork leg from the unload/refill leg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Waypoint {
    /// Waypoint position
    pub position: Position,
    /// Wait marker
    pub wait: bool,
}

impl Waypoint {
    /// Create a regular waypoint
    pub const fn new(x: f32, z: f32) -> Self {
        Self {
            position: Position::new(x, z),
            wait: false,
        }
    }

    /// Create a waypoint carrying the wait marker
    pub const fn wait_point(x: f32, z: f32) -> Self {
        Self {
            position: Position::new(x, z),
            wait: true,
        }
    }
}

/// Errors from building a course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseError {
    /// No waypoints were supplied
    Empty,
    /// More waypoints than a course can hold
    TooManyWaypoints {
        /// Number of waypoints supplied
        count: usize,
    },
}

impl fmt::Display for CourseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseError::Empty => write!(f, "course has no waypoints"),
            CourseError::TooManyWaypoints { count } => write!(
                f,
                "course has {} waypoints (max {})",
                count, MAX_COURSE_WAYPOINTS
            ),
        }
    }
}

impl core::error::Error for CourseError {}

/// Ordered, non-empty waypoint sequence scoped to a vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    vehicle: VehicleId,
    waypoints: Vec<Waypoint, MAX_COURSE_WAYPOINTS>,
}

impl Course {
    /// Build a course from a waypoint slice
    ///
    /// Fails for an empty slice or one longer than [`MAX_COURSE_WAYPOINTS`].
    pub fn new(vehicle: VehicleId, waypoints: &[Waypoint]) -> Result<Self, CourseError> {
        if waypoints.is_empty() {
            return Err(CourseError::Empty);
        }
        let waypoints = Vec::from_slice(waypoints).map_err(|_| CourseError::TooManyWaypoints {
            count: waypoints.len(),
        })?;
        Ok(Self { vehicle, waypoints })
    }

    /// Vehicle this course belongs to
    pub fn vehicle(&self) -> VehicleId {
        self.vehicle
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false for a constructed course
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// All waypoints in order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint at `ix` (0-indexed)
    pub fn waypoint(&self, ix: usize) -> Option<&Waypoint> {
        self.waypoints.get(ix)
    }

    /// Index of the last waypoint
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Clamp a waypoint index into this course
    pub fn clamp_index(&self, ix: usize) -> usize {
        ix.min(self.last_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_rejects_empty() {
        assert_eq!(Course::new(VehicleId(1), &[]), Err(CourseError::Empty));
    }

    #[test]
    fn test_course_rejects_oversized() {
        let waypoints = [Waypoint::new(0.0, 0.0); MAX_COURSE_WAYPOINTS + 1];
        assert_eq!(
            Course::new(VehicleId(1), &waypoints),
            Err(CourseError::TooManyWaypoints {
                count: MAX_COURSE_WAYPOINTS + 1
            })
        );
    }

    #[test]
    fn test_course_accessors() {
        let course = Course::new(
            VehicleId(3),
            &[
                Waypoint::new(0.0, 0.0),
                Waypoint::wait_point(0.0, 10.0),
                Waypoint::new(0.0, 20.0),
            ],
        )
        .unwrap();

        assert_eq!(course.vehicle(), VehicleId(3));
        assert_eq!(course.len(), 3);
        assert!(!course.is_empty());
        assert_eq!(course.last_index(), 2);
        assert!(course.waypoint(1).unwrap().wait);
        assert!(course.waypoint(3).is_none());
    }

    #[test]
    fn test_clamp_index() {
        let course = Course::new(VehicleId(1), &[Waypoint::new(0.0, 0.0); 4]).unwrap();
        assert_eq!(course.clamp_index(2), 2);
        assert_eq!(course.clamp_index(40), 3);
    }

    #[test]
    fn test_vehicle_id_display() {
        use core::fmt::Write;

        let mut text = heapless::String::<16>::new();
        write!(text, "{}", VehicleId(7)).unwrap();
        assert_eq!(text.as_str(), "Vehicle(7)");
    }
}
