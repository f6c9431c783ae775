use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced points over `[start, end]`, both endpoints included.
pub fn linspace(start: Real, end: Real, n: usize) -> Result<Vec<Real>, CoreError> {
    if n < 2 {
        return Err(CoreError::InvalidArg {
            what: "linspace needs at least two points",
        });
    }
    ensure_finite(start, "linspace start")?;
    ensure_finite(end, "linspace end")?;

    let step = (end - start) / (n - 1) as Real;
    let mut out: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
    // Pin the last point so callers can compare against `end` exactly.
    out[n - 1] = end;
    Ok(out)
}

/// `n` logarithmically spaced points over `[start, end]` (both positive).
pub fn logspace(start: Real, end: Real, n: usize) -> Result<Vec<Real>, CoreError> {
    if start <= 0.0 || end <= 0.0 {
        return Err(CoreError::InvalidArg {
            what: "logspace bounds must be positive",
        });
    }
    let exps = linspace(start.log10(), end.log10(), n)?;
    let mut out: Vec<Real> = exps.into_iter().map(|e| 10.0_f64.powf(e)).collect();
    out[0] = start;
    out[n - 1] = end;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn linspace_includes_endpoints() {
        let pts = linspace(0.0, 0.02, 200).unwrap();
        assert_eq!(pts.len(), 200);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[199], 0.02);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_rejects_single_point() {
        assert!(linspace(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn logspace_matches_decades() {
        let pts = logspace(1.0, 1000.0, 4).unwrap();
        let tol = Tolerances::default();
        assert!(nearly_equal(pts[1], 10.0, tol));
        assert!(nearly_equal(pts[2], 100.0, tol));
        assert_eq!(pts[3], 1000.0);
    }

    #[test]
    fn logspace_rejects_zero_bound() {
        assert!(logspace(0.0, 10.0, 5).is_err());
    }
}
