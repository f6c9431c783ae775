//! Transient simulation for lumped-parameter hydraulic systems.
//!
//! Provides:
//! - `TransientModel` trait for pluggable ODE systems
//! - Embedded Runge-Kutta integrators (Dormand-Prince 5(4), Bogacki-Shampine 3(2))
//! - Sampled runs with local error control and a step budget
//! - Piston-valve model and its `simulate` entry point

pub mod error;
pub mod integrator;
pub mod model;
pub mod piston;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{EmbeddedRungeKutta, ErrorTolerance, Integrator, scaled_rms};
pub use model::TransientModel;
pub use piston::{
    DEFAULT_SAMPLE_COUNT, DEFAULT_T_END, PistonValveModel, PistonValveParams, PistonValveState,
    Trajectory, simulate, simulate_default, simulate_with_options,
};
pub use sim::{IntegratorType, SimOptions, SimRecord, StepStats, run_sim};
