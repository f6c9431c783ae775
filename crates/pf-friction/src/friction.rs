//! Darcy friction factor for pipe flow.
//!
//! Two entry points with different behavior in the transition band:
//! - [`friction_factor`] is deterministic and is what the Moody diagram is
//!   built from. Without the Colebrook flag it returns the laminar law for the
//!   whole band up to Re = 4000.
//! - [`friction_factor_for_point`] classifies a single operating point and, in
//!   the transition band, returns a random draw centred between the laminar
//!   and Colebrook predictions.

use crate::common::{check_finite, check_reynolds, check_relative_roughness};
use crate::error::{FrictionError, FrictionResult};
use crate::regime::{FlowRegime, LAMINAR_LIMIT, TURBULENT_LIMIT};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Largest relative roughness drawn on the diagram.
pub const MAX_DIAGRAM_ROUGHNESS: f64 = 0.05;

/// Initial guess handed to the Colebrook root-finder.
pub const COLEBROOK_SEED: f64 = 0.01;

/// Standard deviation of the transitional draw as a fraction of its mean.
pub const TRANSITION_SPREAD: f64 = 0.2;

const COLEBROOK_MAX_ITER: usize = 100;
const COLEBROOK_REL_TOL: f64 = 1e-12;
const COLEBROOK_RESIDUAL_TOL: f64 = 1e-8;

/// Friction factor for a single operating point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrictionFactorResult {
    pub regime: FlowRegime,
    pub friction_factor: f64,
}

/// Outcome of a Colebrook solve.
#[derive(Clone, Copy, Debug)]
pub struct ColebrookSolution {
    pub friction_factor: f64,
    pub iterations: usize,
    /// Colebrook residual evaluated at the returned friction factor.
    pub residual: f64,
}

/// Laminar (Hagen-Poiseuille) friction factor, `64 / Re`.
pub fn laminar_friction_factor(reynolds: f64) -> FrictionResult<f64> {
    check_reynolds(reynolds)?;
    Ok(64.0 / reynolds)
}

/// Colebrook residual `1/√f + 2·log10(rr/3.7 + 2.51/(Re·√f))`.
pub fn colebrook_residual(f: f64, reynolds: f64, rr: f64) -> f64 {
    let sqrt_f = f.sqrt();
    1.0 / sqrt_f + 2.0 * (rr / 3.7 + 2.51 / (reynolds * sqrt_f)).log10()
}

/// Solve the Colebrook equation for the Darcy friction factor.
///
/// Newton iteration on `x = 1/√f`, started from `f = 0.01`. In `x` the
/// residual is increasing and concave, so once an iterate falls left of the
/// root the sequence climbs monotonically onto it. A step that would make
/// `x` non-positive is replaced by halving; a halving step never counts as
/// convergence.
///
/// For `rr ≥ 3.7` the residual is positive for every `x > 0` and there is no
/// root, which is a [`FrictionError::Domain`] error. A converged step whose
/// residual is not near zero is reported as
/// [`FrictionError::ConvergenceFailed`].
pub fn solve_colebrook(reynolds: f64, rr: f64) -> FrictionResult<ColebrookSolution> {
    check_reynolds(reynolds)?;
    check_relative_roughness(rr)?;

    let a = rr / 3.7;
    if a >= 1.0 {
        return Err(FrictionError::Domain {
            what: "relative roughness of 3.7 or more has no Colebrook solution",
        });
    }
    let b = 2.51 / reynolds;
    let mut x = 1.0 / COLEBROOK_SEED.sqrt();

    for iter in 1..=COLEBROOK_MAX_ITER {
        let arg = a + b * x;
        let g = x + 2.0 * arg.log10();
        let dg = 1.0 + 2.0 * b / (arg * std::f64::consts::LN_10);
        let dx = -g / dg;

        let newton = x + dx;
        let halved = newton <= 0.0;
        let x_new = if halved { 0.5 * x } else { newton };
        check_finite(x_new, "Colebrook iterate")?;
        trace!(iter, x = x_new, residual = g, halved, "colebrook step");

        let small_step = (x_new - x).abs() <= COLEBROOK_REL_TOL * x_new.abs().max(1.0);
        x = x_new;
        if halved || !small_step {
            continue;
        }

        let f = 1.0 / (x * x);
        let residual = colebrook_residual(f, reynolds, rr);
        if !residual.is_finite() || residual.abs() > COLEBROOK_RESIDUAL_TOL {
            return Err(FrictionError::ConvergenceFailed {
                what: format!(
                    "Colebrook stalled with residual {:.3e} (Re = {}, rr = {})",
                    residual, reynolds, rr
                ),
            });
        }
        debug!(reynolds, rr, f, iterations = iter, "colebrook converged");
        return Ok(ColebrookSolution {
            friction_factor: f,
            iterations: iter,
            residual,
        });
    }

    Err(FrictionError::ConvergenceFailed {
        what: format!(
            "Colebrook did not converge in {} iterations (Re = {}, rr = {})",
            COLEBROOK_MAX_ITER, reynolds, rr
        ),
    })
}

/// Deterministic friction factor.
///
/// With `use_colebrook` the implicit Colebrook relation is solved. Otherwise
/// the laminar law is used for every Re up to and including 4000; above that
/// the turbulent relation is the only meaningful answer and is used instead.
pub fn friction_factor(reynolds: f64, rr: f64, use_colebrook: bool) -> FrictionResult<f64> {
    check_reynolds(reynolds)?;
    check_relative_roughness(rr)?;
    if rr > MAX_DIAGRAM_ROUGHNESS {
        debug!(rr, "relative roughness outside the diagram range");
    }

    if use_colebrook || reynolds > TURBULENT_LIMIT {
        return Ok(solve_colebrook(reynolds, rr)?.friction_factor);
    }
    laminar_friction_factor(reynolds)
}

/// Normal distribution used for a point strictly inside the transition band.
///
/// Mean is the average of the laminar and Colebrook predictions, standard
/// deviation is 20 % of that mean.
pub fn transition_distribution(reynolds: f64, rr: f64) -> FrictionResult<Normal<f64>> {
    let laminar = laminar_friction_factor(reynolds)?;
    let turbulent = solve_colebrook(reynolds, rr)?.friction_factor;
    let mean = 0.5 * (laminar + turbulent);
    Normal::new(mean, TRANSITION_SPREAD * mean).map_err(|_| FrictionError::NonPhysical {
        what: "transition distribution parameters",
    })
}

/// Regime-aware friction factor for a single operating point.
///
/// Re ≥ 4000 uses Colebrook, Re ≤ 2000 the laminar law. In between the result
/// is one draw from [`transition_distribution`], so repeated calls with the
/// same inputs give different values unless the generator is reseeded.
pub fn friction_factor_for_point<R: Rng + ?Sized>(
    reynolds: f64,
    rr: f64,
    rng: &mut R,
) -> FrictionResult<FrictionFactorResult> {
    check_reynolds(reynolds)?;
    check_relative_roughness(rr)?;
    let regime = FlowRegime::classify(reynolds);

    let f = if reynolds >= TURBULENT_LIMIT {
        solve_colebrook(reynolds, rr)?.friction_factor
    } else if reynolds <= LAMINAR_LIMIT {
        laminar_friction_factor(reynolds)?
    } else {
        let draw = transition_distribution(reynolds, rr)?.sample(rng);
        debug!(reynolds, rr, draw, "transitional friction factor drawn");
        draw
    };

    Ok(FrictionFactorResult {
        regime,
        friction_factor: f,
    })
}
