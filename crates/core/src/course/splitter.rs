//! Course Splitter
//!
//! Recovers the fieldwork leg and the unload/refill leg from a single flat
//! waypoint list. The waypoint source marks section boundaries with the wait
//! marker: the second wait point closes the fieldwork leg, and everything
//! after it is the unload/refill leg.
//!
//! The heuristic misreads lists that use wait points for anything else.
//! It is kept exactly as the waypoint format expects.

use super::{Course, Waypoint};

/// Result of splitting a source course
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSplit {
    /// Fieldwork course (always present)
    pub main: Course,
    /// Unload/refill course, starting right after the main course
    pub secondary: Option<Course>,
}

impl CourseSplit {
    /// Split with no secondary course
    pub fn main_only(main: Course) -> Self {
        Self {
            main,
            secondary: None,
        }
    }

    /// Whether an unload/refill course exists
    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }
}

/// Find the split point (0-indexed) of a waypoint list
///
/// Returns the index of the second waypoint carrying the wait marker, or
/// `None` when fewer than two wait points exist.
pub fn find_split_index(waypoints: &[Waypoint]) -> Option<usize> {
    waypoints
        .iter()
        .enumerate()
        .filter(|(_, wp)| wp.wait)
        .nth(1)
        .map(|(ix, _)| ix)
}

/// Split a source course into main and optional secondary course
///
/// Waypoints up to and including the second wait point form the main
/// course. The rest forms the secondary course, which is omitted when it
/// would be empty.
pub fn split_course(source: &Course) -> CourseSplit {
    let waypoints = source.waypoints();

    let split_ix = match find_split_index(waypoints) {
        Some(ix) if ix + 1 < waypoints.len() => ix,
        Some(_) => {
            log::debug!("Split point at last waypoint, no unload/refill course");
            return CourseSplit::main_only(source.clone());
        }
        None => return CourseSplit::main_only(source.clone()),
    };

    let (head, tail) = waypoints.split_at(split_ix + 1);
    match (
        Course::new(source.vehicle(), head),
        Course::new(source.vehicle(), tail),
    ) {
        (Ok(main), Ok(secondary)) => {
            log::info!(
                "Course split: {} fieldwork waypoints, {} unload/refill waypoints",
                main.len(),
                secondary.len()
            );
            CourseSplit {
                main,
                secondary: Some(secondary),
            }
        }
        _ => CourseSplit::main_only(source.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::VehicleId;
    use heapless::Vec;

    fn course_with_waits(len: usize, waits: &[usize]) -> Course {
        let mut waypoints: Vec<Waypoint, 64> = Vec::new();
        for ix in 0..len {
            let wp = if waits.contains(&ix) {
                Waypoint::wait_point(0.0, ix as f32)
            } else {
                Waypoint::new(0.0, ix as f32)
            };
            waypoints.push(wp).unwrap();
        }
        Course::new(VehicleId(1), &waypoints).unwrap()
    }

    #[test]
    fn test_no_wait_points_is_main_only() {
        let source = course_with_waits(5, &[]);
        let split = split_course(&source);
        assert_eq!(split.main, source);
        assert!(split.secondary.is_none());
    }

    #[test]
    fn test_single_wait_point_is_main_only() {
        let source = course_with_waits(5, &[2]);
        let split = split_course(&source);
        assert_eq!(split.main, source);
        assert!(!split.has_secondary());
    }

    #[test]
    fn test_split_at_second_wait_point() {
        // Wait points at positions 3 and 8 of 10 (0-indexed 2 and 7)
        let source = course_with_waits(10, &[2, 7]);
        let split = split_course(&source);

        assert_eq!(split.main.len(), 8);
        assert_eq!(split.main.waypoints(), &source.waypoints()[..8]);

        let secondary = split.secondary.unwrap();
        assert_eq!(secondary.len(), 2);
        assert_eq!(secondary.waypoints(), &source.waypoints()[8..]);
        assert_eq!(secondary.vehicle(), VehicleId(1));
    }

    #[test]
    fn test_split_ignores_third_wait_point() {
        let source = course_with_waits(10, &[1, 4, 6]);
        let split = split_course(&source);
        assert_eq!(split.main.len(), 5);
        assert_eq!(split.secondary.unwrap().len(), 5);
    }

    #[test]
    fn test_split_at_last_waypoint_is_main_only() {
        let source = course_with_waits(6, &[1, 5]);
        let split = split_course(&source);
        assert_eq!(split.main, source);
        assert!(split.secondary.is_none());
    }

    #[test]
    fn test_adjacent_wait_points() {
        let source = course_with_waits(4, &[0, 1]);
        let split = split_course(&source);
        assert_eq!(split.main.len(), 2);
        assert_eq!(split.secondary.unwrap().len(), 2);
    }

    #[test]
    fn test_single_waypoint_course() {
        let source = course_with_waits(1, &[0]);
        let split = split_course(&source);
        assert_eq!(split.main.len(), 1);
        assert!(split.secondary.is_none());
    }

    #[test]
    fn test_find_split_index() {
        assert_eq!(find_split_index(&[]), None);
        assert_eq!(
            find_split_index(course_with_waits(10, &[2, 7]).waypoints()),
            Some(7)
        );
        assert_eq!(find_split_index(course_with_waits(10, &[9]).waypoints()), None);
    }
}
