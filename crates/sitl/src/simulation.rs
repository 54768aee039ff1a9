//! Simulation runner.
//!
//! Steps a `FieldworkDriver` wired to the simulated vehicle, path follower
//! and alignment generator, and records every event with its sim time.

use log::info;

use fieldwork_core::course::Position;
use fieldwork_core::fieldwork::{
    DrivingCore, FieldworkDriver, FieldworkEvent, FieldworkEvents, OperatingState, StopReason,
};

use crate::error::SimulatorError;
use crate::follower::{DirectAlignment, SimPathFollower};
use crate::scenario::Scenario;
use crate::vehicle::SimVehicle;

/// Driver type used by the simulation.
pub type SimDriver = FieldworkDriver<SimVehicle, SimPathFollower, DirectAlignment>;

/// Event stamped with the simulation time it was emitted at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEvent {
    /// Simulation time in seconds.
    pub time_s: f32,
    /// Emitted event.
    pub event: FieldworkEvent,
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Scenario name.
    pub scenario: String,
    /// Steps simulated.
    pub steps: u64,
    /// Simulated time in seconds.
    pub time_s: f32,
    /// Distance driven in meters.
    pub distance_m: f32,
    /// Why the driver stopped.
    pub stop_reason: Option<StopReason>,
    /// Number of completed unload/refill trips.
    pub unload_trips: u32,
    /// Lower-and-turn-on requests seen by the vehicle.
    pub lower_requests: u32,
    /// Raise-and-turn-off requests seen by the vehicle.
    pub raise_requests: u32,
    /// All events in emission order.
    pub events: Vec<TimedEvent>,
}

impl SimulationReport {
    /// States entered, in order.
    pub fn states(&self) -> Vec<OperatingState> {
        self.events
            .iter()
            .filter_map(|e| match e.event {
                FieldworkEvent::StateChanged(state) => Some(state),
                _ => None,
            })
            .collect()
    }
}

/// Single-vehicle fieldwork simulation.
pub struct Simulation {
    driver: SimDriver,
    name: String,
    start_ix: usize,
    step_s: f32,
    max_steps: u64,
    resume_after_unload: bool,
    started: bool,
    steps: u64,
    time_s: f32,
    stop_reason: Option<StopReason>,
    unload_trips: u32,
    events: Vec<TimedEvent>,
}

impl Simulation {
    /// Build a simulation from a scenario.
    pub fn new(scenario: &Scenario) -> Result<Self, SimulatorError> {
        scenario.validate()?;
        let courses = scenario.courses()?;
        let params = scenario.params()?;

        let start_ix = courses.main.clamp_index(scenario.start_index);
        let start = match scenario.start_position {
            Some((x, z)) => Position::new(x, z),
            None => courses
                .main
                .waypoint(start_ix)
                .map(|wp| wp.position)
                .unwrap_or_default(),
        };

        let vehicle = SimVehicle::new(scenario.tools.clone(), scenario.speed_limit)
            .with_motion_jitter(scenario.motion_jitter, scenario.seed);
        let follower = SimPathFollower::new(start, scenario.acceleration);
        let aligner = DirectAlignment::new(start, scenario.alignment_distance_m);

        info!(
            "Scenario '{}': main course {} waypoints, unload course {}",
            scenario.name,
            courses.main.len(),
            courses.secondary.as_ref().map_or(0, |c| c.len())
        );

        Ok(Self {
            driver: FieldworkDriver::new(vehicle, follower, aligner, courses, params),
            name: scenario.name.clone(),
            start_ix,
            step_s: scenario.step_s,
            max_steps: scenario.max_steps,
            resume_after_unload: scenario.resume_after_unload,
            started: false,
            steps: 0,
            time_s: 0.0,
            stop_reason: None,
            unload_trips: 0,
            events: Vec::new(),
        })
    }

    /// Fieldwork driver under test.
    pub fn driver(&self) -> &SimDriver {
        &self.driver
    }

    /// Fieldwork driver under test (mutable).
    pub fn driver_mut(&mut self) -> &mut SimDriver {
        &mut self.driver
    }

    /// Start the driver at the scenario's start index.
    pub fn start(&mut self) {
        self.started = true;
        let events = self.driver.start(self.start_ix);
        self.record(events);
    }

    /// Advance one step.
    pub fn step(&mut self) {
        let dt = self.step_s;
        let before = self.driver.state();

        let events = self.driver.drive(dt);
        let distance = self.driver.follower().last_distance();
        self.driver.vehicle_mut().update(dt, distance);

        self.steps += 1;
        self.time_s += dt;

        let unload_done = before == Some(OperatingState::UnloadOrRefill)
            && events.contains(&FieldworkEvent::Stopped(StopReason::EndOfCourse));
        self.record(events);

        if unload_done && self.resume_after_unload {
            info!("Unload/refill done at {:.1}s, resuming fieldwork", self.time_s);
            self.driver.vehicle_mut().service_tools();
            self.unload_trips += 1;
            self.stop_reason = None;
            let events = self.driver.change_to_fieldwork();
            self.record(events);
        }
    }

    /// Run until the driver stops.
    pub fn run(&mut self) -> Result<SimulationReport, SimulatorError> {
        if !self.started {
            self.start();
        }
        while self.driver.is_active() {
            if self.steps >= self.max_steps {
                return Err(SimulatorError::StepLimit(self.steps));
            }
            self.step();
        }
        Ok(self.report())
    }

    /// Snapshot of the run so far.
    pub fn report(&self) -> SimulationReport {
        let vehicle = self.driver.vehicle();
        SimulationReport {
            scenario: self.name.clone(),
            steps: self.steps,
            time_s: self.time_s,
            distance_m: self.driver.follower().odometer(),
            stop_reason: self.stop_reason,
            unload_trips: self.unload_trips,
            lower_requests: vehicle.lower_requests(),
            raise_requests: vehicle.raise_requests(),
            events: self.events.clone(),
        }
    }

    fn record(&mut self, events: FieldworkEvents) {
        for event in events {
            info!("[{:8.1}s] {:?}", self.time_s, event);
            if let FieldworkEvent::Stopped(reason) = event {
                self.stop_reason = Some(reason);
            }
            self.events.push(TimedEvent {
                time_s: self.time_s,
                event,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwork_core::fieldwork::FieldworkPhase;

    #[test]
    fn test_start_records_events() {
        let mut sim = Simulation::new(&Scenario::default()).unwrap();
        sim.start();
        assert_eq!(
            sim.driver().state(),
            Some(OperatingState::Fieldwork(FieldworkPhase::WaitingForLower))
        );
        assert!(sim
            .report()
            .events
            .iter()
            .any(|e| e.event == FieldworkEvent::WorkStarted));
    }

    #[test]
    fn test_step_advances_time() {
        let mut sim = Simulation::new(&Scenario::default()).unwrap();
        sim.start();
        sim.step();
        sim.step();
        assert!((sim.report().time_s - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_step_limit() {
        let scenario = Scenario {
            max_steps: 5,
            ..Scenario::default()
        };
        let mut sim = Simulation::new(&scenario).unwrap();
        assert!(matches!(sim.run(), Err(SimulatorError::StepLimit(5))));
    }

    #[test]
    fn test_invalid_scenario_rejected() {
        let scenario = Scenario {
            acceleration: 0.0,
            ..Scenario::default()
        };
        assert!(Simulation::new(&scenario).is_err());
    }
}
