//! Embedded Runge-Kutta integrators with local error estimates.
//!
//! Each method is described by a Butcher tableau whose last stage is evaluated
//! at the new point (first-same-as-last), so an accepted step hands its final
//! derivative to the next one.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Local error tolerances. Fixed for every run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorTolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Default for ErrorTolerance {
    fn default() -> Self {
        Self {
            atol: 1e-6,
            rtol: 1e-3,
        }
    }
}

/// Scaled RMS norm over matching component slices.
///
/// Helper for [`TransientModel::error_norm`] implementations.
pub fn scaled_rms(err: &[f64], x: &[f64], x_new: &[f64], tol: ErrorTolerance) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(x.iter().zip(x_new))
        .map(|(e, (a, b))| {
            let sc = tol.atol + tol.rtol * a.abs().max(b.abs());
            (e / sc).powi(2)
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

/// Coefficients of an explicit embedded Runge-Kutta pair.
#[derive(Debug)]
pub struct ButcherTableau {
    pub name: &'static str,
    pub c: &'static [f64],
    /// Lower-triangular stage matrix, row `i` holds `a[i][0..i]`.
    pub a: &'static [&'static [f64]],
    pub b: &'static [f64],
    /// Error weights for the stages plus the derivative at the new point.
    pub e: &'static [f64],
    /// Order of the embedded error estimate.
    pub error_order: u32,
}

/// Dormand-Prince 5(4).
pub static DORMAND_PRINCE_45: ButcherTableau = ButcherTableau {
    name: "dormand-prince 5(4)",
    c: &[0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0],
    a: &[
        &[],
        &[1.0 / 5.0],
        &[3.0 / 40.0, 9.0 / 40.0],
        &[44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0],
        &[
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
        ],
        &[
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
        ],
    ],
    b: &[
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
    e: &[
        -71.0 / 57600.0,
        0.0,
        71.0 / 16695.0,
        -71.0 / 1920.0,
        17253.0 / 339200.0,
        -22.0 / 525.0,
        1.0 / 40.0,
    ],
    error_order: 4,
};

/// Bogacki-Shampine 3(2).
pub static BOGACKI_SHAMPINE_23: ButcherTableau = ButcherTableau {
    name: "bogacki-shampine 3(2)",
    c: &[0.0, 1.0 / 2.0, 3.0 / 4.0],
    a: &[&[], &[1.0 / 2.0], &[0.0, 3.0 / 4.0]],
    b: &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    e: &[5.0 / 72.0, -1.0 / 12.0, -1.0 / 9.0, 1.0 / 8.0],
    error_order: 2,
};

/// Result of one attempted step.
#[derive(Clone, Debug)]
pub struct TrialStep<S> {
    /// Candidate state at `t + h`.
    pub x: S,
    /// Derivative at the candidate state.
    pub dxdt: S,
    /// Scaled local error; the step is acceptable when this is at most one.
    pub error_norm: f64,
}

/// Trait for adaptive time integrators.
pub trait Integrator {
    /// Order of the error estimate, used to scale step-size changes.
    fn error_order(&self) -> u32;

    /// Attempt one step of size `h` from `(t, x)` with derivative `dxdt`.
    fn try_step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dxdt: &M::State,
        h: f64,
        tol: ErrorTolerance,
    ) -> SimResult<TrialStep<M::State>>;
}

/// Explicit embedded Runge-Kutta method driven by a [`ButcherTableau`].
#[derive(Clone, Copy, Debug)]
pub struct EmbeddedRungeKutta {
    tableau: &'static ButcherTableau,
}

impl EmbeddedRungeKutta {
    pub fn new(tableau: &'static ButcherTableau) -> Self {
        Self { tableau }
    }

    pub fn dormand_prince() -> Self {
        Self::new(&DORMAND_PRINCE_45)
    }

    pub fn bogacki_shampine() -> Self {
        Self::new(&BOGACKI_SHAMPINE_23)
    }

    pub fn name(&self) -> &'static str {
        self.tableau.name
    }

    /// Derivative evaluations per attempted step, including the one at the
    /// new point.
    pub fn rhs_per_step(&self) -> usize {
        self.tableau.c.len()
    }
}

impl Integrator for EmbeddedRungeKutta {
    fn error_order(&self) -> u32 {
        self.tableau.error_order
    }

    fn try_step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dxdt: &M::State,
        h: f64,
        tol: ErrorTolerance,
    ) -> SimResult<TrialStep<M::State>> {
        let tab = self.tableau;
        let mut k: Vec<M::State> = Vec::with_capacity(tab.c.len() + 1);
        k.push(dxdt.clone());

        for (i, row) in tab.a.iter().enumerate().skip(1) {
            let xi = combine(model, x, &k, row, h);
            k.push(model.rhs(t + tab.c[i] * h, &xi)?);
        }

        let x_new = combine(model, x, &k, tab.b, h);
        let dxdt_new = model.rhs(t + h, &x_new)?;
        k.push(dxdt_new.clone());

        let zero = model.scale(x, 0.0);
        let err = combine(model, &zero, &k, tab.e, h);
        let error_norm = model.error_norm(&err, x, &x_new, tol);

        Ok(TrialStep {
            x: x_new,
            dxdt: dxdt_new,
            error_norm,
        })
    }
}

/// `base + h * Σ w_j k_j`, skipping zero weights.
fn combine<M: TransientModel>(
    model: &M,
    base: &M::State,
    k: &[M::State],
    weights: &[f64],
    h: f64,
) -> M::State {
    weights
        .iter()
        .zip(k)
        .filter(|(w, _)| **w != 0.0)
        .fold(base.clone(), |acc, (w, kj)| {
            model.add(&acc, &model.scale(kj, h * w))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_consistency(tab: &ButcherTableau) {
        // Row sums of A equal c, weights sum to one, error weights sum to zero.
        for (row, c) in tab.a.iter().zip(tab.c) {
            let sum: f64 = row.iter().sum();
            assert!((sum - c).abs() < 1e-14, "{}: row sum {} != c {}", tab.name, sum, c);
        }
        let b_sum: f64 = tab.b.iter().sum();
        assert!((b_sum - 1.0).abs() < 1e-14);
        let e_sum: f64 = tab.e.iter().sum();
        assert!(e_sum.abs() < 1e-14);
        assert_eq!(tab.e.len(), tab.c.len() + 1);
    }

    #[test]
    fn tableaus_are_consistent() {
        check_consistency(&DORMAND_PRINCE_45);
        check_consistency(&BOGACKI_SHAMPINE_23);
    }

    #[test]
    fn scaled_rms_uses_mixed_tolerance() {
        let tol = ErrorTolerance {
            atol: 1.0,
            rtol: 0.0,
        };
        assert_eq!(scaled_rms(&[1.0, 1.0], &[5.0, 5.0], &[5.0, 5.0], tol), 1.0);

        let tol = ErrorTolerance {
            atol: 0.0,
            rtol: 0.1,
        };
        // Scale uses the larger magnitude of old and new values.
        assert!((scaled_rms(&[1.0], &[1.0], &[10.0], tol) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scaled_rms_of_empty_is_zero() {
        assert_eq!(scaled_rms(&[], &[], &[], ErrorTolerance::default()), 0.0);
    }
}
