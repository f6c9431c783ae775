//! Error types for simulation operations.

use pf_core::error::CoreError;
use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<CoreError> for SimError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => SimError::NonPhysical { what },
            CoreError::InvalidArg { what } => SimError::InvalidArg { what },
        }
    }
}
