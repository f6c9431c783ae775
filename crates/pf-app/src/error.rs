//! Error types for the pf-app service layer.

/// Application error type that wraps errors from the backend crates
/// and gives the CLI a single error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Friction error: {0}")]
    Friction(#[from] pf_friction::FrictionError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] pf_sim::SimError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pf-app operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_convert() {
        let friction: AppError = pf_friction::FrictionError::Domain {
            what: "relative roughness",
        }
        .into();
        assert!(matches!(friction, AppError::Friction(_)));
        assert!(friction.to_string().starts_with("Friction error"));

        let sim: AppError = pf_sim::SimError::InvalidArg { what: "t_end" }.into();
        assert!(matches!(sim, AppError::Simulation(_)));
    }
}
