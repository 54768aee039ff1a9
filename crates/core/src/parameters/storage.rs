//! Parameter Storage
//!
//! Fixed-capacity name/value store. Each entry carries its value and flags
//! together; registration is idempotent so parameter blocks can register
//! their defaults in any order without clobbering values set by the host.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two, required by the index map)
pub const MAX_PARAMS: usize = 16;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Parameter cannot be changed through `set`
        const READ_ONLY = 0b0000_0001;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Read the value as a float, converting integers
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int(v) => Some(v as f32),
            ParamValue::Bool(_) => None,
        }
    }

    /// Read the value as a flag (non-zero numbers are true)
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(v) => Some(v),
            ParamValue::Int(v) => Some(v != 0),
            ParamValue::Float(v) => Some(v != 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ParamEntry {
    value: ParamValue,
    flags: ParamFlags,
}

type ParamName = String<PARAM_NAME_LEN>;

fn param_name(name: &str) -> Option<ParamName> {
    let mut key = ParamName::new();
    key.push_str(name).ok()?;
    Some(key)
}

/// Parameter store
pub struct ParameterStore {
    entries: FnvIndexMap<ParamName, ParamEntry, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = param_name(name)?;
        self.entries.get(&key).map(|entry| &entry.value)
    }

    /// Set the value of a registered parameter
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = param_name(name).ok_or(ParameterError::UnknownParameter)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(ParameterError::UnknownParameter)?;

        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }

        entry.value = value;
        Ok(())
    }

    /// Register a parameter with its default value
    ///
    /// Registering an existing name keeps the current value.
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = param_name(name).ok_or(ParameterError::UnknownParameter)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }

        self.entries
            .insert(
                key,
                ParamEntry {
                    value: default_value,
                    flags,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = ParameterStore::new();
        assert_eq!(store.get("FW_SPEED"), None);
    }

    #[test]
    fn test_register_and_get() {
        let mut store = ParameterStore::new();
        store
            .register("FW_SPEED", ParamValue::Float(8.0), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("FW_SPEED"), Some(&ParamValue::Float(8.0)));
        assert_eq!(store.get("MISSING"), None);
    }

    #[test]
    fn test_set_replaces_value() {
        let mut store = ParameterStore::new();
        store
            .register("FW_SPEED", ParamValue::Float(8.0), ParamFlags::empty())
            .unwrap();

        store.set("FW_SPEED", ParamValue::Float(12.0)).unwrap();
        assert_eq!(store.get("FW_SPEED"), Some(&ParamValue::Float(12.0)));
    }

    #[test]
    fn test_set_unknown_fails() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.set("UNKNOWN", ParamValue::Int(1)),
            Err(ParameterError::UnknownParameter)
        );
        assert_eq!(
            store.set("NAME_LONGER_THAN_SIXTEEN", ParamValue::Int(1)),
            Err(ParameterError::UnknownParameter)
        );
    }

    #[test]
    fn test_register_keeps_existing_value() {
        let mut store = ParameterStore::new();
        store
            .register("FW_SPEED", ParamValue::Float(8.0), ParamFlags::empty())
            .unwrap();
        store.set("FW_SPEED", ParamValue::Float(6.0)).unwrap();
        store
            .register("FW_SPEED", ParamValue::Float(8.0), ParamFlags::empty())
            .unwrap();
        assert_eq!(store.get("FW_SPEED"), Some(&ParamValue::Float(6.0)));
    }

    #[test]
    fn test_read_only() {
        let mut store = ParameterStore::new();
        store
            .register("FW_LOCKED", ParamValue::Int(1), ParamFlags::READ_ONLY)
            .unwrap();
        assert_eq!(
            store.set("FW_LOCKED", ParamValue::Int(0)),
            Err(ParameterError::ReadOnly)
        );
    }

    #[test]
    fn test_store_full() {
        let mut store = ParameterStore::new();
        let names = [
            "P0", "P1", "P2", "P3", "P4", "P5", "P6", "P7", "P8", "P9", "P10", "P11", "P12",
            "P13", "P14", "P15",
        ];
        for name in names {
            store
                .register(name, ParamValue::Int(0), ParamFlags::empty())
                .unwrap();
        }
        assert_eq!(
            store.register("P16", ParamValue::Int(0), ParamFlags::empty()),
            Err(ParameterError::StoreFull)
        );
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(ParamValue::Int(3).as_f32(), Some(3.0));
        assert_eq!(ParamValue::Float(2.5).as_f32(), Some(2.5));
        assert_eq!(ParamValue::Bool(true).as_f32(), None);
        assert_eq!(ParamValue::Int(0).as_bool(), Some(false));
        assert_eq!(ParamValue::Float(1.0).as_bool(), Some(true));
    }
}
