//! Error types for control operations.

use dz_core::DzError;
use thiserror::Error;

use crate::mode::HvacMode;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
///
/// None of these are fatal: an event that fails with one of them is simply
/// not applied, and the controllers stay evaluable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Event addressed to a zone that is not configured.
    #[error("Unknown zone: {id}")]
    UnknownZone { id: String },

    /// Mode string that does not name any HVAC mode.
    #[error("Unknown HVAC mode: {value}")]
    UnknownMode { value: String },

    /// Mode that exists but is not enabled in this configuration.
    #[error("HVAC mode {mode} is not enabled")]
    ModeNotEnabled { mode: HvacMode },

    /// Fan mode not in the configured fan mode list.
    #[error("Unknown fan mode: {value}")]
    UnknownFanMode { value: String },

    /// Rejected numeric input (non-finite, out of bounds).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DzError),

    /// Persistence collaborator failed to store a snapshot.
    #[error("Persistence error: {what}")]
    Persistence { what: String },
}
