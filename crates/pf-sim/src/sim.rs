//! Simulation runner and result recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{EmbeddedRungeKutta, ErrorTolerance, Integrator};
use crate::model::TransientModel;
use pf_core::numeric::linspace;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Dormand-Prince 5(4) (default, 6 rhs calls per step).
    #[default]
    DormandPrince45,
    /// Bogacki-Shampine 3(2) (cheaper, 3 rhs calls per step).
    BogackiShampine23,
}

impl IntegratorType {
    fn build(self) -> EmbeddedRungeKutta {
        match self {
            IntegratorType::DormandPrince45 => EmbeddedRungeKutta::dormand_prince(),
            IntegratorType::BogackiShampine23 => EmbeddedRungeKutta::bogacki_shampine(),
        }
    }
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Start time (seconds)
    pub t_start: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Number of equally spaced output samples, both ends included
    pub sample_count: usize,
    /// Maximum number of attempted steps (accepted + rejected)
    pub max_steps: usize,
    /// Integrator type (default: Dormand-Prince 5(4))
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_start: 0.0,
            t_end: 1.0,
            sample_count: 100,
            max_steps: 100_000,
            integrator: IntegratorType::default(),
        }
    }
}

/// Step counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStats {
    pub accepted: usize,
    pub rejected: usize,
    pub rhs_evals: usize,
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Sample times (seconds)
    pub t: Vec<f64>,
    /// State snapshots at the sample times
    pub x: Vec<S>,
    pub stats: StepStats,
}

/// Run a transient simulation with adaptive step-size control.
///
/// Steps are clipped so every sample time is reached exactly. A run fails
/// when the step budget is exhausted, the step size underflows, or the state
/// stops being finite.
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    if !opts.t_start.is_finite() || !opts.t_end.is_finite() {
        return Err(SimError::InvalidArg {
            what: "time span must be finite",
        });
    }
    if opts.t_end <= opts.t_start {
        return Err(SimError::InvalidArg {
            what: "t_end must be greater than t_start",
        });
    }
    if opts.sample_count < 2 {
        return Err(SimError::InvalidArg {
            what: "sample_count must be at least 2",
        });
    }
    if opts.max_steps == 0 {
        return Err(SimError::InvalidArg {
            what: "max_steps must be positive",
        });
    }

    let integrator = opts.integrator.build();
    let tol = ErrorTolerance::default();
    let samples = linspace(opts.t_start, opts.t_end, opts.sample_count)?;
    let exponent = -1.0 / (integrator.error_order() as f64 + 1.0);
    let span = opts.t_end - opts.t_start;

    let mut stats = StepStats::default();
    let mut t = opts.t_start;
    let mut x = model.initial_state();
    if !model.is_finite(&x) {
        return Err(SimError::NonPhysical {
            what: "initial state is not finite",
        });
    }
    let mut dxdt = model.rhs(t, &x)?;
    stats.rhs_evals += 1;
    if !model.is_finite(&dxdt) {
        return Err(SimError::NonPhysical {
            what: "initial derivative is not finite",
        });
    }

    let mut h = initial_step(model, t, &x, &dxdt, span, integrator.error_order(), tol)?;
    stats.rhs_evals += 1;
    let stages = integrator.rhs_per_step();

    let mut t_record = Vec::with_capacity(samples.len());
    let mut x_record = Vec::with_capacity(samples.len());
    t_record.push(t);
    x_record.push(x.clone());

    for &t_target in &samples[1..] {
        while t < t_target {
            if stats.accepted + stats.rejected >= opts.max_steps {
                return Err(SimError::ConvergenceFailed {
                    what: format!(
                        "step budget of {} exhausted at t = {:.6e} s",
                        opts.max_steps, t
                    ),
                });
            }

            let remaining = t_target - t;
            let clipped = h >= remaining;
            let h_try = if clipped { remaining } else { h };
            let min_step = 10.0 * f64::EPSILON * t.abs().max(opts.t_end.abs());
            if !clipped && h_try < min_step {
                return Err(SimError::ConvergenceFailed {
                    what: format!("step size underflow ({:.3e} s) at t = {:.6e} s", h_try, t),
                });
            }

            let trial = integrator.try_step(model, t, &x, &dxdt, h_try, tol)?;
            stats.rhs_evals += stages;
            let err = trial.error_norm;

            if err.is_finite() && err <= 1.0 {
                if !model.is_finite(&trial.x) {
                    return Err(SimError::NonPhysical {
                        what: "state became non-finite",
                    });
                }
                t = if clipped { t_target } else { t + h_try };
                x = trial.x;
                dxdt = trial.dxdt;
                stats.accepted += 1;

                let factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * err.powf(exponent)).min(MAX_FACTOR)
                };
                let h_next = h_try * factor;
                h = if clipped { h.max(h_next) } else { h_next };
            } else {
                let factor = if err.is_finite() {
                    (SAFETY * err.powf(exponent)).max(MIN_FACTOR)
                } else {
                    MIN_FACTOR
                };
                h = h_try * factor;
                stats.rejected += 1;
                trace!(t, h_try, err, "step rejected");
            }
        }

        t_record.push(t_target);
        x_record.push(x.clone());
    }

    debug!(
        integrator = integrator.name(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        rhs_evals = stats.rhs_evals,
        "simulation finished"
    );

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        stats,
    })
}

/// Starting step size from the size of the state and its first two
/// derivatives (Hairer, Nørsett & Wanner, algorithm II.4.1).
fn initial_step<M: TransientModel>(
    model: &mut M,
    t0: f64,
    x0: &M::State,
    f0: &M::State,
    span: f64,
    error_order: u32,
    tol: ErrorTolerance,
) -> SimResult<f64> {
    let d0 = model.error_norm(x0, x0, x0, tol);
    let d1 = model.error_norm(f0, x0, x0, tol);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(span);

    let x1 = model.add(x0, &model.scale(f0, h0));
    let f1 = model.rhs(t0 + h0, &x1)?;
    let df = model.add(&f1, &model.scale(f0, -1.0));
    let d2 = model.error_norm(&df, x0, x0, tol) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (error_order as f64 + 1.0))
    };

    Ok((100.0 * h0).min(h1).min(span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::scaled_rms;
    use proptest::prelude::*;

    /// dx/dt = -x, x(0) = 1.
    struct Decay;

    impl TransientModel for Decay {
        type State = f64;

        fn initial_state(&self) -> f64 {
            1.0
        }

        fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
            Ok(-x)
        }

        fn add(&self, a: &f64, b: &f64) -> f64 {
            a + b
        }

        fn scale(&self, a: &f64, scale: f64) -> f64 {
            a * scale
        }

        fn error_norm(&self, err: &f64, x: &f64, x_new: &f64, tol: ErrorTolerance) -> f64 {
            scaled_rms(&[*err], &[*x], &[*x_new], tol)
        }

        fn is_finite(&self, x: &f64) -> bool {
            x.is_finite()
        }
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.t_start, 0.0);
        assert_eq!(opts.t_end, 1.0);
        assert_eq!(opts.sample_count, 100);
        assert_eq!(opts.max_steps, 100_000);
        assert_eq!(opts.integrator, IntegratorType::DormandPrince45);
    }

    #[test]
    fn sim_options_invalid() {
        let mut model = Decay;
        let bad_span = SimOptions {
            t_end: 0.0,
            ..SimOptions::default()
        };
        assert!(matches!(
            run_sim(&mut model, &bad_span),
            Err(SimError::InvalidArg { .. })
        ));

        let bad_samples = SimOptions {
            sample_count: 1,
            ..SimOptions::default()
        };
        assert!(matches!(
            run_sim(&mut model, &bad_samples),
            Err(SimError::InvalidArg { .. })
        ));
    }

    #[test]
    fn records_every_sample_time() {
        let mut model = Decay;
        let opts = SimOptions {
            sample_count: 11,
            ..SimOptions::default()
        };
        let record = run_sim(&mut model, &opts).unwrap();
        assert_eq!(record.t.len(), 11);
        assert_eq!(record.x.len(), 11);
        assert_eq!(record.t[0], 0.0);
        assert_eq!(record.t[10], 1.0);
        assert_eq!(record.x[0], 1.0);
    }

    #[test]
    fn decay_matches_exponential() {
        for integrator in [
            IntegratorType::DormandPrince45,
            IntegratorType::BogackiShampine23,
        ] {
            let mut model = Decay;
            let opts = SimOptions {
                sample_count: 21,
                integrator,
                ..SimOptions::default()
            };
            let record = run_sim(&mut model, &opts).unwrap();
            for (t, x) in record.t.iter().zip(&record.x) {
                let exact = (-t).exp();
                assert!(
                    (x - exact).abs() < 5e-3 * exact,
                    "{integrator:?}: x({t}) = {x}, expected {exact}"
                );
            }
        }
    }

    #[test]
    fn step_budget_is_enforced() {
        let mut model = Decay;
        let opts = SimOptions {
            sample_count: 50,
            max_steps: 5,
            ..SimOptions::default()
        };
        assert!(matches!(
            run_sim(&mut model, &opts),
            Err(SimError::ConvergenceFailed { .. })
        ));
    }

    proptest! {
        #[test]
        fn returns_every_requested_sample(
            t_start in -5.0_f64..5.0,
            length in 0.01_f64..10.0,
            sample_count in 2usize..200,
        ) {
            let opts = SimOptions {
                t_start,
                t_end: t_start + length,
                sample_count,
                ..SimOptions::default()
            };
            let record = run_sim(&mut Decay, &opts).unwrap();
            prop_assert_eq!(record.t.len(), sample_count);
            prop_assert_eq!(record.x.len(), sample_count);
            prop_assert_eq!(record.t[0], t_start);
            prop_assert_eq!(record.t[sample_count - 1], t_start + length);
            prop_assert!(record.t.windows(2).all(|w| w[1] > w[0]));
        }
    }
}
