//! pf-friction: Darcy friction factor and Moody diagram data.
//!
//! Provides:
//! - Flow regime classification by Reynolds number
//! - Laminar law, Colebrook root-find and the stochastic transition blend
//! - Conversion of US customary pipe data into Re and relative roughness
//! - The fixed curve set of a Moody diagram
//!
//! # Example
//!
//! ```
//! use pf_friction::{compute_re_and_roughness_ratio, friction_factor};
//!
//! let sample = compute_re_and_roughness_ratio(1.0, 50.0, 10.0).unwrap();
//! let f = friction_factor(sample.reynolds, sample.relative_roughness, true).unwrap();
//! assert!(f > 0.008 && f < 0.10);
//! ```

pub mod common;
pub mod conditions;
pub mod error;
pub mod friction;
pub mod moody;
pub mod regime;

// Re-exports
pub use conditions::{
    PipeFlowSample, compute_re_and_roughness_ratio, compute_re_and_roughness_ratio_with_viscosity,
};
pub use error::{FrictionError, FrictionResult};
pub use friction::{
    ColebrookSolution, FrictionFactorResult, colebrook_residual, friction_factor,
    friction_factor_for_point, laminar_friction_factor, solve_colebrook, transition_distribution,
};
pub use moody::{DiagramBounds, MoodyCurve, MoodyCurveSet, ROUGHNESS_VALUES, turbulent_reynolds_grid};
pub use regime::FlowRegime;
