//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use crate::integrator::ErrorTolerance;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Vector arithmetic for integration: add states, scale by scalar
/// - A scaled error norm so the integrator can control local error
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Return the initial state at the start of the run.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self so models may cache intermediate results between calls.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Root-mean-square of `err`, each component divided by
    /// `atol + rtol * max(|x|, |x_new|)`. A value at or below one passes.
    fn error_norm(
        &self,
        err: &Self::State,
        x: &Self::State,
        x_new: &Self::State,
        tol: ErrorTolerance,
    ) -> f64;

    /// True when every component of the state is finite.
    fn is_finite(&self, x: &Self::State) -> bool;
}
