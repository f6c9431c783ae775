//! Adaptive integration of an undamped oscillator against its exact solution.

use nalgebra::Vector2;
use pf_sim::{
    ErrorTolerance, IntegratorType, SimOptions, SimResult, TransientModel, run_sim, scaled_rms,
};

/// x'' = -ω² x, x(0) = 1, x'(0) = 0.
struct Oscillator {
    omega: f64,
    rhs_calls: usize,
}

impl TransientModel for Oscillator {
    type State = Vector2<f64>;

    fn initial_state(&self) -> Self::State {
        Vector2::new(1.0, 0.0)
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        self.rhs_calls += 1;
        Ok(Vector2::new(x[1], -self.omega * self.omega * x[0]))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }

    fn error_norm(
        &self,
        err: &Self::State,
        x: &Self::State,
        x_new: &Self::State,
        tol: ErrorTolerance,
    ) -> f64 {
        scaled_rms(err.as_slice(), x.as_slice(), x_new.as_slice(), tol)
    }

    fn is_finite(&self, x: &Self::State) -> bool {
        x.iter().all(|c| c.is_finite())
    }
}

#[test]
fn oscillator_tracks_cosine_over_two_periods() {
    let omega = 2.0 * std::f64::consts::PI;
    for integrator in [
        IntegratorType::DormandPrince45,
        IntegratorType::BogackiShampine23,
    ] {
        let mut model = Oscillator {
            omega,
            rhs_calls: 0,
        };
        let opts = SimOptions {
            t_end: 2.0,
            sample_count: 81,
            integrator,
            ..SimOptions::default()
        };
        let record = run_sim(&mut model, &opts).unwrap();

        for (t, x) in record.t.iter().zip(&record.x) {
            let exact = (omega * t).cos();
            assert!(
                (x[0] - exact).abs() < 5e-2,
                "{integrator:?}: x({t}) = {}, expected {exact}",
                x[0]
            );
        }
        assert_eq!(record.stats.rhs_evals, model.rhs_calls);
    }
}
