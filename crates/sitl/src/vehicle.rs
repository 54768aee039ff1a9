//! Simulated vehicle with timed implements and fill units.
//!
//! Lower and raise requests start a motion that completes after the tool's
//! configured time. While a tool is down (and turned on, if it needs to be)
//! its fill unit fills or drains with the distance worked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fieldwork_core::fieldwork::{SpeedGovernor, Vehicle};
use fieldwork_core::tool::{FillUnit, ToolCapabilities, ToolCategory, WorkTool};

use crate::scenario::ToolConfig;

/// Tool motion in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ToolMotion {
    /// Seconds until the tool is down.
    Lowering(f32),
    /// Seconds until the tool is up.
    Raising(f32),
}

/// Simulated implement.
#[derive(Debug, Clone)]
pub struct SimTool {
    config: ToolConfig,
    category: ToolCategory,
    lowered: bool,
    turned_on: bool,
    motion: Option<ToolMotion>,
    fill_units: Vec<FillUnit>,
}

impl SimTool {
    /// Create a raised, turned-off tool.
    pub fn new(config: ToolConfig) -> Self {
        let fill_units = config
            .capacity
            .map(|capacity| FillUnit::new(config.initial_level.clamp(0.0, capacity), capacity))
            .into_iter()
            .collect();
        Self {
            category: config.kind.into(),
            config,
            lowered: false,
            turned_on: false,
            motion: None,
            fill_units,
        }
    }

    /// Start lowering. The tool turns on once it is down.
    pub fn request_lower(&mut self, duration_s: f32) {
        if self.lowered && self.motion.is_none() {
            self.turned_on = self.config.requires_turn_on;
            return;
        }
        self.motion = Some(ToolMotion::Lowering(duration_s));
    }

    /// Turn off and start raising.
    pub fn request_raise(&mut self, duration_s: f32) {
        self.turned_on = false;
        if !self.lowered && self.motion.is_none() {
            return;
        }
        self.motion = Some(ToolMotion::Raising(duration_s));
    }

    /// Check if a lower or raise motion is in progress.
    fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    /// Check if the tool is down and working.
    pub fn is_working(&self) -> bool {
        self.lowered && !self.is_moving() && (self.turned_on || !self.config.requires_turn_on)
    }

    /// Advance motions by `dt` and apply `distance_m` of work to the fill unit.
    pub fn update(&mut self, dt: f32, distance_m: f32) {
        self.motion = match self.motion {
            Some(ToolMotion::Lowering(remaining)) if remaining <= dt => {
                self.lowered = true;
                self.turned_on = self.config.requires_turn_on;
                log::debug!("{} lowered", self.config.name);
                None
            }
            Some(ToolMotion::Raising(remaining)) if remaining <= dt => {
                self.lowered = false;
                log::debug!("{} raised", self.config.name);
                None
            }
            Some(ToolMotion::Lowering(remaining)) => Some(ToolMotion::Lowering(remaining - dt)),
            Some(ToolMotion::Raising(remaining)) => Some(ToolMotion::Raising(remaining - dt)),
            None => None,
        };

        if !self.is_working() || distance_m <= 0.0 {
            return;
        }
        let delta = self.config.rate_per_m * distance_m;
        let filling = self.category == ToolCategory::Harvester;
        for unit in &mut self.fill_units {
            let level = if filling {
                unit.level + delta
            } else {
                unit.level - delta
            };
            unit.level = level.clamp(0.0, unit.capacity);
        }
    }

    /// Empty harvester units, refill sprayer and seeder units.
    pub fn service(&mut self) {
        let empty = self.category == ToolCategory::Harvester;
        for unit in &mut self.fill_units {
            unit.level = if empty { 0.0 } else { unit.capacity };
        }
    }
}

impl WorkTool for SimTool {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> ToolCapabilities {
        let mut caps = ToolCapabilities::empty();
        if !self.fill_units.is_empty() {
            caps |= ToolCapabilities::FILL_UNITS;
        }
        if self.config.requires_turn_on {
            caps |= ToolCapabilities::TURN_ON;
        }
        caps
    }

    fn category(&self) -> ToolCategory {
        self.category
    }

    fn fill_units(&self) -> &[FillUnit] {
        &self.fill_units
    }

    fn fill_level_warning(&self) -> Option<&'static str> {
        match self.category {
            ToolCategory::Harvester => Some("Harvester is full"),
            ToolCategory::Sprayer => Some("Sprayer tank is empty"),
            ToolCategory::Seeder => Some("Seeder hopper is empty"),
            ToolCategory::Generic => None,
        }
    }

    fn is_turned_on(&self) -> bool {
        self.turned_on
    }

    fn is_lowered(&self) -> bool {
        self.lowered
    }
}

/// Simulated vehicle: tool set, speed limit and cruise control register.
pub struct SimVehicle {
    tools: Option<Vec<SimTool>>,
    speed_limit: Option<f32>,
    cruise_speed: f32,
    motion_jitter: f32,
    rng: StdRng,
    lower_requests: u32,
    raise_requests: u32,
}

impl SimVehicle {
    /// Create a vehicle with the given tool set.
    pub fn new(tools: Option<Vec<ToolConfig>>, speed_limit: Option<f32>) -> Self {
        Self {
            tools: tools.map(|configs| configs.into_iter().map(SimTool::new).collect()),
            speed_limit,
            cruise_speed: 0.0,
            motion_jitter: 0.0,
            rng: StdRng::from_entropy(),
            lower_requests: 0,
            raise_requests: 0,
        }
    }

    /// Vary tool motion times by up to `jitter` (relative), seeded for
    /// deterministic runs.
    pub fn with_motion_jitter(mut self, jitter: f32, seed: Option<u64>) -> Self {
        self.motion_jitter = jitter;
        self.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self
    }

    /// Advance all tools.
    pub fn update(&mut self, dt: f32, distance_m: f32) {
        if let Some(tools) = &mut self.tools {
            for tool in tools.iter_mut() {
                tool.update(dt, distance_m);
            }
        }
    }

    /// Service every tool's fill units.
    pub fn service_tools(&mut self) {
        if let Some(tools) = &mut self.tools {
            tools.iter_mut().for_each(SimTool::service);
        }
    }

    /// Last cruise-control maximum speed written.
    pub fn cruise_speed(&self) -> f32 {
        self.cruise_speed
    }

    /// Number of lower-and-turn-on requests received.
    pub fn lower_requests(&self) -> u32 {
        self.lower_requests
    }

    /// Number of raise-and-turn-off requests received.
    pub fn raise_requests(&self) -> u32 {
        self.raise_requests
    }
}

/// Nominal motion time varied by up to `jitter` (relative).
fn jittered(rng: &mut StdRng, jitter: f32, nominal_s: f32) -> f32 {
    if jitter <= 0.0 {
        return nominal_s;
    }
    nominal_s * (1.0 + rng.gen_range(-jitter..=jitter))
}

impl SpeedGovernor for SimVehicle {
    fn set_cruise_control_max_speed(&mut self, speed: f32) {
        self.cruise_speed = speed;
    }
}

impl Vehicle for SimVehicle {
    type Tool = SimTool;

    fn speed_limit(&self) -> Option<f32> {
        self.speed_limit
    }

    fn work_tools(&self) -> Option<&[SimTool]> {
        self.tools.as_deref()
    }

    fn lower_and_turn_on_all_tools(&mut self) {
        self.lower_requests += 1;
        let Some(tools) = &mut self.tools else {
            return;
        };
        for tool in tools.iter_mut() {
            let duration = jittered(&mut self.rng, self.motion_jitter, tool.config.lower_time_s);
            tool.request_lower(duration);
        }
    }

    fn raise_and_turn_off_all_tools(&mut self) {
        self.raise_requests += 1;
        let Some(tools) = &mut self.tools else {
            return;
        };
        for tool in tools.iter_mut() {
            let duration = jittered(&mut self.rng, self.motion_jitter, tool.config.raise_time_s);
            tool.request_raise(duration);
        }
    }

    fn on_work_start(&mut self) {
        log::debug!("Work started");
    }

    fn on_work_stop(&mut self) {
        log::debug!("Work stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ToolKind;
    use fieldwork_core::tool::{
        all_fill_levels_ok, are_all_work_tools_raised, are_all_work_tools_ready,
    };

    fn harvester() -> ToolConfig {
        ToolConfig {
            name: "Harvester".to_string(),
            kind: ToolKind::Harvester,
            lower_time_s: 1.0,
            raise_time_s: 0.5,
            requires_turn_on: true,
            capacity: Some(10.0),
            initial_level: 0.0,
            rate_per_m: 1.0,
        }
    }

    #[test]
    fn test_tool_lowers_after_configured_time() {
        let mut tool = SimTool::new(harvester());
        tool.request_lower(1.0);

        tool.update(0.6, 0.0);
        assert!(!tool.is_lowered());
        assert!(tool.is_moving());

        tool.update(0.6, 0.0);
        assert!(tool.is_lowered());
        assert!(tool.is_turned_on());
        assert!(tool.is_working());
    }

    #[test]
    fn test_raise_turns_off_immediately() {
        let mut tool = SimTool::new(harvester());
        tool.request_lower(0.0);
        tool.update(0.1, 0.0);

        tool.request_raise(0.5);
        assert!(!tool.is_turned_on());
        assert!(tool.is_lowered());

        tool.update(0.5, 0.0);
        assert!(!tool.is_lowered());
    }

    #[test]
    fn test_harvester_fills_while_working() {
        let mut tool = SimTool::new(harvester());
        tool.update(0.1, 5.0);
        assert_eq!(tool.fill_units()[0].level, 0.0);

        tool.request_lower(0.0);
        tool.update(0.1, 4.0);
        assert!((tool.fill_units()[0].level - 4.0).abs() < 0.001);

        tool.update(0.1, 20.0);
        assert!(tool.fill_units()[0].is_full());

        tool.service();
        assert_eq!(tool.fill_units()[0].level, 0.0);
    }

    #[test]
    fn test_sprayer_drains_while_working() {
        let mut tool = SimTool::new(ToolConfig {
            kind: ToolKind::Sprayer,
            capacity: Some(10.0),
            initial_level: 10.0,
            rate_per_m: 2.0,
            ..ToolConfig::default()
        });
        tool.request_lower(0.0);
        tool.update(0.1, 3.0);
        assert!((tool.fill_units()[0].level - 4.0).abs() < 0.001);
        assert_eq!(tool.fill_level_warning(), Some("Sprayer tank is empty"));

        tool.service();
        assert!((tool.fill_units()[0].level - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_capabilities_follow_config() {
        let tool = SimTool::new(harvester());
        assert!(tool.capabilities().contains(ToolCapabilities::FILL_UNITS));
        assert!(tool.capabilities().contains(ToolCapabilities::TURN_ON));

        let plain = SimTool::new(ToolConfig::default());
        assert!(plain.capabilities().is_empty());
    }

    #[test]
    fn test_vehicle_requests_reach_all_tools() {
        let mut vehicle = SimVehicle::new(Some(vec![harvester(), ToolConfig::default()]), None);
        vehicle.lower_and_turn_on_all_tools();
        assert!(!are_all_work_tools_ready(vehicle.work_tools()));

        vehicle.update(1.1, 0.0);
        assert!(are_all_work_tools_ready(vehicle.work_tools()));
        assert_eq!(vehicle.lower_requests(), 1);

        vehicle.raise_and_turn_off_all_tools();
        vehicle.update(1.1, 0.0);
        assert!(are_all_work_tools_raised(vehicle.work_tools()));
        assert_eq!(vehicle.raise_requests(), 1);
    }

    #[test]
    fn test_vehicle_without_tool_set() {
        let mut vehicle = SimVehicle::new(None, Some(12.0));
        vehicle.lower_and_turn_on_all_tools();
        assert!(vehicle.work_tools().is_none());
        assert!(!all_fill_levels_ok(vehicle.work_tools()));
        assert_eq!(vehicle.speed_limit(), Some(12.0));
    }

    #[test]
    fn test_motion_jitter_is_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let t = jittered(&mut rng, 0.2, 1.0);
            assert!((0.8..=1.2).contains(&t));
        }
        assert_eq!(jittered(&mut rng, 0.0, 1.5), 1.5);
    }
}
