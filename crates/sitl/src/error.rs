use fieldwork_core::course::CourseError;
use fieldwork_core::parameters::ParameterError;

/// Errors that can occur while setting up or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Invalid course: {0}")]
    Course(#[from] CourseError),

    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Scenario parse error: {0}")]
    ScenarioParse(#[from] serde_json::Error),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Step limit reached after {0} steps")]
    StepLimit(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
