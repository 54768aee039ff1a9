pub mod error;
pub mod follower;
pub mod scenario;
pub mod simulation;
pub mod vehicle;

pub use error::SimulatorError;
pub use follower::{DirectAlignment, SimPathFollower};
pub use scenario::{Scenario, ToolConfig, ToolKind};
pub use simulation::{SimDriver, Simulation, SimulationReport, TimedEvent};
pub use vehicle::{SimTool, SimVehicle};
