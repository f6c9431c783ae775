//! Common checks shared by the friction calculations.

use crate::error::{FrictionError, FrictionResult};
use pf_core::numeric::ensure_finite;

/// Ensure a value is finite, returning FrictionError if not.
pub fn check_finite(value: f64, what: &'static str) -> FrictionResult<()> {
    ensure_finite(value, what).map_err(|_| FrictionError::NonPhysical { what })?;
    Ok(())
}

/// Reject non-finite or non-positive Reynolds numbers.
pub fn check_reynolds(reynolds: f64) -> FrictionResult<()> {
    if !reynolds.is_finite() || reynolds <= 0.0 {
        return Err(FrictionError::Domain {
            what: "Reynolds number must be positive and finite",
        });
    }
    Ok(())
}

/// Reject non-finite or negative relative roughness.
pub fn check_relative_roughness(rr: f64) -> FrictionResult<()> {
    if !rr.is_finite() || rr < 0.0 {
        return Err(FrictionError::Domain {
            what: "relative roughness must be non-negative and finite",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_reynolds() {
        assert!(check_reynolds(2500.0).is_ok());
        assert!(check_reynolds(0.0).is_err());
        assert!(check_reynolds(-10.0).is_err());
        assert!(check_reynolds(f64::NAN).is_err());
    }

    #[test]
    fn test_check_relative_roughness() {
        assert!(check_relative_roughness(0.0).is_ok());
        assert!(check_relative_roughness(0.2).is_ok());
        assert!(check_relative_roughness(-1e-6).is_err());
    }
}
