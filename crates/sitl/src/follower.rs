//! Straight-line path follower and alignment course generator.
//!
//! The follower moves the vehicle point-wise from waypoint to waypoint.
//! Speeds handed in by the driver are km/h; positions are meters.

use fieldwork_core::course::{Course, Position, Waypoint};
use fieldwork_core::fieldwork::{AlignmentCourseGenerator, PathEvent, PathFollower, StopReason};

const KMH_TO_MS: f32 = 1.0 / 3.6;

/// Distance between two positions in meters.
pub fn distance(a: Position, b: Position) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Straight-line path follower with an acceleration limit.
#[derive(Debug, Clone)]
pub struct SimPathFollower {
    waypoints: Vec<Waypoint>,
    target_ix: usize,
    position: Position,
    /// Current speed in m/s.
    speed_ms: f32,
    acceleration: f32,
    /// Distance covered by the last `drive` call.
    last_distance_m: f32,
    odometer_m: f32,
    finished: bool,
    stop_reason: Option<StopReason>,
}

impl SimPathFollower {
    /// Create a follower standing at `position`.
    pub fn new(position: Position, acceleration: f32) -> Self {
        Self {
            waypoints: Vec::new(),
            target_ix: 0,
            position,
            speed_ms: 0.0,
            acceleration,
            last_distance_m: 0.0,
            odometer_m: 0.0,
            finished: false,
            stop_reason: None,
        }
    }

    /// Current vehicle position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current speed in km/h.
    pub fn speed_kmh(&self) -> f32 {
        self.speed_ms / KMH_TO_MS
    }

    /// Distance covered by the last tick in meters.
    pub fn last_distance(&self) -> f32 {
        self.last_distance_m
    }

    /// Total distance covered in meters.
    pub fn odometer(&self) -> f32 {
        self.odometer_m
    }

    /// Reason passed to the last `stop`, if any.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    fn approach_speed(&mut self, dt: f32, max_speed_ms: f32) {
        let step = self.acceleration * dt;
        self.speed_ms = if self.speed_ms < max_speed_ms {
            (self.speed_ms + step).min(max_speed_ms)
        } else {
            (self.speed_ms - step).max(max_speed_ms)
        };
    }
}

impl PathFollower for SimPathFollower {
    fn set_course(&mut self, course: &Course) {
        self.waypoints = course.waypoints().to_vec();
        self.target_ix = 0;
        self.finished = false;
    }

    fn initialize(&mut self, start_ix: usize) {
        self.target_ix = start_ix.min(self.waypoints.len().saturating_sub(1));
        self.finished = false;
        self.stop_reason = None;
    }

    fn drive(&mut self, dt: f32, max_speed: f32) -> Option<PathEvent> {
        self.last_distance_m = 0.0;
        if self.finished || self.waypoints.is_empty() {
            return None;
        }

        self.approach_speed(dt, max_speed.max(0.0) * KMH_TO_MS);
        let mut remaining = self.speed_ms * dt;

        while remaining > 0.0 {
            let target = self.waypoints[self.target_ix].position;
            let to_target = distance(self.position, target);

            if to_target <= remaining {
                self.position = target;
                remaining -= to_target;
                self.last_distance_m += to_target;

                if self.target_ix + 1 >= self.waypoints.len() {
                    self.finished = true;
                    self.odometer_m += self.last_distance_m;
                    return Some(PathEvent::EndOfCourse);
                }
                self.target_ix += 1;
            } else {
                let ratio = remaining / to_target;
                self.position = Position::new(
                    self.position.x + (target.x - self.position.x) * ratio,
                    self.position.z + (target.z - self.position.z) * ratio,
                );
                self.last_distance_m += remaining;
                remaining = 0.0;
            }
        }

        self.odometer_m += self.last_distance_m;
        None
    }

    fn stop(&mut self, reason: StopReason) {
        self.speed_ms = 0.0;
        self.finished = true;
        self.stop_reason = Some(reason);
    }

    fn current_waypoint_index(&self) -> usize {
        self.target_ix
    }
}

/// Alignment generator driving straight from the vehicle's position to the
/// start waypoint when it is too far away.
#[derive(Debug, Clone, Copy)]
pub struct DirectAlignment {
    from: Position,
    min_distance_m: f32,
}

impl DirectAlignment {
    /// Create a generator for a vehicle standing at `from`.
    pub fn new(from: Position, min_distance_m: f32) -> Self {
        Self {
            from,
            min_distance_m,
        }
    }
}

impl AlignmentCourseGenerator for DirectAlignment {
    fn alignment_course(&mut self, course: &Course, start_ix: usize) -> Option<Course> {
        let target = course.waypoint(start_ix)?.position;
        if distance(self.from, target) < self.min_distance_m {
            return None;
        }
        let waypoints = [
            Waypoint::new(self.from.x, self.from.z),
            Waypoint::new(target.x, target.z),
        ];
        match Course::new(course.vehicle(), &waypoints) {
            Ok(alignment) => Some(alignment),
            Err(e) => {
                log::warn!("Alignment course rejected: {}", e);
                None
            }
        }
    }
}
