//! Fieldwork Parameter Definitions
//!
//! # Parameters
//!
//! - `FW_SPEED` - Field work speed, before the vehicle speed limit
//! - `FW_ROAD_SPEED` - Road speed used on the unload/refill course
//! - `FW_DEF_SPEED` - Speed reported before any target speed is set
//! - `FW_STOP_FILL` - Stop (1) or keep working (0) when fill levels are
//!   unacceptable and there is no unload/refill course

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};

const DEFAULT_FIELD_SPEED: f32 = 10.0;
const DEFAULT_ROAD_SPEED: f32 = 20.0;
const DEFAULT_SPEED: f32 = 10.0;
const DEFAULT_STOP_ON_FILL_LEVEL: bool = true;

const MIN_SPEED: f32 = 0.5;
const MAX_FIELD_SPEED: f32 = 50.0;
const MAX_ROAD_SPEED: f32 = 80.0;

/// Fieldwork parameters loaded from parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct FieldworkParams {
    /// Configured field work speed
    pub field_speed: f32,
    /// Road/transport speed
    pub road_speed: f32,
    /// Speed reported before any target speed is set
    pub default_speed: f32,
    /// Stop when fill levels are unacceptable and no unload/refill course exists
    pub stop_on_fill_level: bool,
}

impl Default for FieldworkParams {
    fn default() -> Self {
        Self {
            field_speed: DEFAULT_FIELD_SPEED,
            road_speed: DEFAULT_ROAD_SPEED,
            default_speed: DEFAULT_SPEED,
            stop_on_fill_level: DEFAULT_STOP_ON_FILL_LEVEL,
        }
    }
}

impl FieldworkParams {
    /// Register fieldwork parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "FW_SPEED",
            ParamValue::Float(DEFAULT_FIELD_SPEED),
            ParamFlags::empty(),
        )?;
        store.register(
            "FW_ROAD_SPEED",
            ParamValue::Float(DEFAULT_ROAD_SPEED),
            ParamFlags::empty(),
        )?;
        store.register(
            "FW_DEF_SPEED",
            ParamValue::Float(DEFAULT_SPEED),
            ParamFlags::empty(),
        )?;
        store.register(
            "FW_STOP_FILL",
            ParamValue::Int(DEFAULT_STOP_ON_FILL_LEVEL as i32),
            ParamFlags::empty(),
        )?;
        Ok(())
    }

    /// Load fieldwork parameters from parameter store
    ///
    /// Missing or mistyped entries fall back to defaults; speeds are clamped
    /// into their valid ranges.
    pub fn from_store(store: &ParameterStore) -> Self {
        let speed = |name: &str, default: f32, max: f32| {
            store
                .get(name)
                .and_then(ParamValue::as_f32)
                .map_or(default, |v| v.clamp(MIN_SPEED, max))
        };

        Self {
            field_speed: speed("FW_SPEED", DEFAULT_FIELD_SPEED, MAX_FIELD_SPEED),
            road_speed: speed("FW_ROAD_SPEED", DEFAULT_ROAD_SPEED, MAX_ROAD_SPEED),
            default_speed: speed("FW_DEF_SPEED", DEFAULT_SPEED, MAX_ROAD_SPEED),
            stop_on_fill_level: store
                .get("FW_STOP_FILL")
                .and_then(ParamValue::as_bool)
                .unwrap_or(DEFAULT_STOP_ON_FILL_LEVEL),
        }
    }

    /// Validate fieldwork parameters
    pub fn is_valid(&self) -> bool {
        (MIN_SPEED..=MAX_FIELD_SPEED).contains(&self.field_speed)
            && (MIN_SPEED..=MAX_ROAD_SPEED).contains(&self.road_speed)
            && (MIN_SPEED..=MAX_ROAD_SPEED).contains(&self.default_speed)
    }
}
