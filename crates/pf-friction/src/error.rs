//! Error types for friction-factor and flow-condition calculations.

use pf_core::error::CoreError;
use thiserror::Error;

/// Errors that can occur while evaluating pipe friction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrictionError {
    #[error("Domain error: {what}")]
    Domain { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type FrictionResult<T> = Result<T, FrictionError>;

impl From<CoreError> for FrictionError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => FrictionError::NonPhysical { what },
            CoreError::InvalidArg { what } => FrictionError::Domain { what },
        }
    }
}
