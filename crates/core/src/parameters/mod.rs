//! Runtime configuration
//!
//! A bounded name/value parameter store plus the fieldwork parameter block
//! read from it. Loading parameters from a file or a ground station is the
//! host's business; this module only holds and validates values.

pub mod error;
pub mod fieldwork;
pub mod storage;

pub use error::ParameterError;
pub use fieldwork::FieldworkParams;
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
