//! Speed policy
//!
//! Holds the configured speeds and the current target speed. The target is
//! written to the vehicle's speed governor every time it is read.

use super::traits::SpeedGovernor;
use crate::parameters::FieldworkParams;

/// Target speed computation for the fieldwork driver
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedPolicy {
    field_speed: f32,
    road_speed: f32,
    default_speed: f32,
    /// Target for the current tick (`None` until first set)
    target: Option<f32>,
}

impl SpeedPolicy {
    /// Create a speed policy from fieldwork parameters
    pub fn new(params: &FieldworkParams) -> Self {
        Self {
            field_speed: params.field_speed,
            road_speed: params.road_speed,
            default_speed: params.default_speed,
            target: None,
        }
    }

    /// Field speed clamped by the vehicle speed limit
    pub fn field_speed(&self, speed_limit: Option<f32>) -> f32 {
        match speed_limit {
            Some(limit) => self.field_speed.min(limit),
            None => self.field_speed,
        }
    }

    /// Configured road/transport speed
    pub fn road_speed(&self) -> f32 {
        self.road_speed
    }

    /// Current target, if any was set
    pub fn target(&self) -> Option<f32> {
        self.target
    }

    /// Set the target for this tick
    pub fn set_target(&mut self, speed: f32) {
        self.target = Some(speed);
    }

    /// Forget the target (next read reports the default speed)
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Current target speed, re-asserted to the governor
    pub fn speed<G: SpeedGovernor + ?Sized>(&self, governor: &mut G) -> f32 {
        let speed = self.target.unwrap_or(self.default_speed);
        governor.set_cruise_control_max_speed(speed);
        speed
    }
}

impl Default for SpeedPolicy {
    fn default() -> Self {
        Self::new(&FieldworkParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Default)]
    struct RecordingGovernor {
        writes: Vec<f32, 8>,
    }

    impl SpeedGovernor for RecordingGovernor {
        fn set_cruise_control_max_speed(&mut self, speed: f32) {
            let _ = self.writes.push(speed);
        }
    }

    fn policy_with_field_speed(field_speed: f32) -> SpeedPolicy {
        SpeedPolicy::new(&FieldworkParams {
            field_speed,
            ..FieldworkParams::default()
        })
    }

    #[test]
    fn test_field_speed_clamped_by_limit() {
        let policy = policy_with_field_speed(8.0);
        assert!((policy.field_speed(Some(5.0)) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_field_speed_without_limit() {
        let policy = policy_with_field_speed(8.0);
        assert!((policy.field_speed(None) - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_field_speed_limit_above_configured() {
        let policy = policy_with_field_speed(8.0);
        assert!((policy.field_speed(Some(30.0)) - 8.0).abs() < 0.001);
    }

    #[test]
    fn test_speed_default_reasserted() {
        let policy = SpeedPolicy::default();
        let mut governor = RecordingGovernor::default();

        assert!((policy.speed(&mut governor) - 10.0).abs() < 0.001);
        assert_eq!(governor.writes.as_slice(), &[10.0]);
    }

    #[test]
    fn test_speed_reasserted_every_call() {
        let mut policy = SpeedPolicy::default();
        let mut governor = RecordingGovernor::default();

        policy.set_target(4.0);
        policy.speed(&mut governor);
        policy.speed(&mut governor);
        assert_eq!(governor.writes.as_slice(), &[4.0, 4.0]);

        policy.clear_target();
        assert_eq!(policy.target(), None);
        assert!((policy.speed(&mut governor) - 10.0).abs() < 0.001);
    }
}
