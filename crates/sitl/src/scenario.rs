//! Scenario description for a simulation run.
//!
//! Scenarios are plain JSON documents. Every field has a default, so an
//! empty object `{}` describes the built-in harvester demo.

use serde::{Deserialize, Serialize};

use fieldwork_core::course::{split_course, Course, CourseSplit, VehicleId, Waypoint};
use fieldwork_core::parameters::{FieldworkParams, ParamValue, ParameterStore};
use fieldwork_core::tool::ToolCategory;

use crate::error::SimulatorError;

/// Tool category as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Generic,
    Harvester,
    Sprayer,
    Seeder,
}

impl From<ToolKind> for ToolCategory {
    fn from(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Generic => ToolCategory::Generic,
            ToolKind::Harvester => ToolCategory::Harvester,
            ToolKind::Sprayer => ToolCategory::Sprayer,
            ToolKind::Seeder => ToolCategory::Seeder,
        }
    }
}

/// Configuration of one simulated tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Display name.
    pub name: String,
    /// Tool category.
    pub kind: ToolKind,
    /// Seconds from lower request until the tool is down.
    pub lower_time_s: f32,
    /// Seconds from raise request until the tool is up.
    pub raise_time_s: f32,
    /// Whether the tool has to be turned on to work.
    pub requires_turn_on: bool,
    /// Fill unit capacity. None = tool has no fill unit.
    pub capacity: Option<f32>,
    /// Initial fill level.
    pub initial_level: f32,
    /// Fill level change per meter worked.
    pub rate_per_m: f32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: "Implement".to_string(),
            kind: ToolKind::Generic,
            lower_time_s: 1.0,
            raise_time_s: 1.0,
            requires_turn_on: false,
            capacity: None,
            initial_level: 0.0,
            rate_per_m: 0.0,
        }
    }
}

/// Scenario for a single simulated vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Scenario name for reporting.
    pub name: String,
    /// Waypoints as `[x, z, wait]` triples in meters.
    pub course: Vec<(f32, f32, bool)>,
    /// Main course index to start at.
    pub start_index: usize,
    /// Vehicle start position. None = on the start waypoint.
    pub start_position: Option<(f32, f32)>,
    /// Minimum distance to the start waypoint that needs an alignment course.
    pub alignment_distance_m: f32,
    /// Attached tools. None = vehicle has no tool set.
    pub tools: Option<Vec<ToolConfig>>,
    /// Field speed in km/h (`FW_SPEED`).
    pub field_speed: f32,
    /// Road speed in km/h (`FW_ROAD_SPEED`).
    pub road_speed: f32,
    /// Stop when fill levels run out without an unload course (`FW_STOP_FILL`).
    pub stop_on_fill_level: bool,
    /// Externally reported speed limit in km/h.
    pub speed_limit: Option<f32>,
    /// Acceleration of the simulated vehicle in m/s².
    pub acceleration: f32,
    /// Service the tools and return to fieldwork at the end of the unload course.
    pub resume_after_unload: bool,
    /// Relative random variation of tool lower/raise times (0.0 = exact).
    pub motion_jitter: f32,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
    /// Simulation step size in seconds.
    pub step_s: f32,
    /// Step limit before the run is aborted.
    pub max_steps: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "harvester-demo".to_string(),
            course: demo_course(),
            start_index: 0,
            start_position: None,
            alignment_distance_m: 5.0,
            tools: Some(vec![ToolConfig {
                name: "Harvester".to_string(),
                kind: ToolKind::Harvester,
                lower_time_s: 2.0,
                raise_time_s: 2.0,
                requires_turn_on: true,
                capacity: Some(100.0),
                initial_level: 0.0,
                rate_per_m: 0.6,
            }]),
            field_speed: 10.0,
            road_speed: 20.0,
            stop_on_fill_level: true,
            speed_limit: None,
            acceleration: 1.5,
            resume_after_unload: false,
            motion_jitter: 0.0,
            seed: Some(1),
            step_s: 0.1,
            max_steps: 100_000,
        }
    }
}

/// Two 100 m rows joined by a headland, then a short road leg to the unload
/// point. The second wait point splits the road leg off as secondary course.
fn demo_course() -> Vec<(f32, f32, bool)> {
    vec![
        (0.0, 0.0, true),
        (0.0, 50.0, false),
        (0.0, 100.0, false),
        (6.0, 100.0, false),
        (6.0, 50.0, false),
        (6.0, 0.0, true),
        (20.0, -10.0, false),
        (40.0, -10.0, false),
    ]
}

impl Scenario {
    /// Parse a scenario from JSON.
    pub fn from_json(json: &str) -> Result<Self, SimulatorError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self, SimulatorError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if !(self.step_s > 0.0) {
            return Err(SimulatorError::InvalidScenario(format!(
                "step_s must be positive, got {}",
                self.step_s
            )));
        }
        if !(self.acceleration > 0.0) {
            return Err(SimulatorError::InvalidScenario(format!(
                "acceleration must be positive, got {}",
                self.acceleration
            )));
        }
        if !(0.0..1.0).contains(&self.motion_jitter) {
            return Err(SimulatorError::InvalidScenario(format!(
                "motion_jitter must be in [0, 1), got {}",
                self.motion_jitter
            )));
        }
        if let Some(tools) = &self.tools {
            for tool in tools {
                if tool.capacity.is_some_and(|c| c <= 0.0) {
                    return Err(SimulatorError::InvalidScenario(format!(
                        "tool '{}' has non-positive capacity",
                        tool.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the fieldwork course and split it.
    pub fn courses(&self) -> Result<CourseSplit, SimulatorError> {
        let waypoints: Vec<Waypoint> = self
            .course
            .iter()
            .map(|&(x, z, wait)| {
                if wait {
                    Waypoint::wait_point(x, z)
                } else {
                    Waypoint::new(x, z)
                }
            })
            .collect();
        let course = Course::new(VehicleId(1), &waypoints)?;
        Ok(split_course(&course))
    }

    /// Fieldwork parameters, passed through the parameter store so the
    /// same clamping applies as on the vehicle.
    pub fn params(&self) -> Result<FieldworkParams, SimulatorError> {
        let mut store = ParameterStore::new();
        FieldworkParams::register_defaults(&mut store)?;
        store.set("FW_SPEED", ParamValue::Float(self.field_speed))?;
        store.set("FW_ROAD_SPEED", ParamValue::Float(self.road_speed))?;
        store.set("FW_STOP_FILL", ParamValue::Bool(self.stop_on_fill_level))?;

        let params = FieldworkParams::from_store(&store);
        if !params.is_valid() {
            return Err(SimulatorError::InvalidScenario(format!(
                "speeds out of range: field {}, road {}",
                self.field_speed, self.road_speed
            )));
        }
        Ok(params)
    }
}
