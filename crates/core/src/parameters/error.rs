//! Parameter error types

use core::fmt;

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name is too long or was never registered
    UnknownParameter,
    /// Store has no room for another parameter
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
        }
    }
}

impl core::error::Error for ParameterError {}
