//! Lumped-parameter hydraulic piston driven through a valve.
//!
//! State is `[x, ẋ, p1, p2]`: piston position, velocity, and the pressures
//! of the supply-side and return-side chambers. The valve meters flow from
//! the supply into chamber 1 and from chamber 2 to ambient; piston motion
//! compresses or expands the fluid in both chambers.

use crate::error::{SimError, SimResult};
use crate::integrator::{ErrorTolerance, scaled_rms};
use crate::model::TransientModel;
use crate::sim::{IntegratorType, SimOptions, StepStats, run_sim};
use nalgebra::Vector4;
use pf_core::units::{Area, Density, Mass, Pressure, Volume, kg, kg_per_m3, m2, m3, pa};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// End of the default simulation window (seconds).
pub const DEFAULT_T_END: f64 = 0.02;
/// Number of output samples in the default run.
pub const DEFAULT_SAMPLE_COUNT: usize = 200;

/// Physical parameters of the piston-valve system.
#[derive(Clone, Debug, PartialEq)]
pub struct PistonValveParams {
    /// Piston area A
    pub piston_area: Area,
    /// Valve discharge coefficient Cd. Already lumped into `valve_gain`;
    /// carried so a parameter set describes the whole valve.
    pub discharge_coefficient: f64,
    /// Supply pressure ps
    pub supply_pressure: Pressure,
    /// Ambient (return) pressure pa
    pub ambient_pressure: Pressure,
    /// Volume of each chamber V
    pub chamber_volume: Volume,
    /// Fluid bulk modulus β
    pub bulk_modulus: Pressure,
    /// Fluid density ρ
    pub density: Density,
    /// Valve flow gain Kvalve (mass flow per unit opening per Pa)
    pub valve_gain: f64,
    /// Moving mass m
    pub mass: Mass,
    /// Valve opening fraction y
    pub valve_opening: f64,
}

impl Default for PistonValveParams {
    fn default() -> Self {
        Self {
            piston_area: m2(4.909e-4),
            discharge_coefficient: 0.6,
            supply_pressure: pa(1.4e7),
            ambient_pressure: pa(1.0e5),
            chamber_volume: m3(1.473e-4),
            bulk_modulus: pa(2.0e9),
            density: kg_per_m3(850.0),
            valve_gain: 2.0e-5,
            mass: kg(30.0),
            valve_opening: 0.002,
        }
    }
}

impl PistonValveParams {
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            (self.piston_area.value, "piston area must be positive"),
            (self.chamber_volume.value, "chamber volume must be positive"),
            (self.bulk_modulus.value, "bulk modulus must be positive"),
            (self.density.value, "density must be positive"),
            (self.mass.value, "mass must be positive"),
        ];
        for (value, what) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimError::InvalidArg { what });
            }
        }

        let non_negative = [
            (self.valve_gain, "valve gain must be non-negative"),
            (self.valve_opening, "valve opening must be non-negative"),
            (
                self.discharge_coefficient,
                "discharge coefficient must be non-negative",
            ),
            (self.ambient_pressure.value, "ambient pressure must be non-negative"),
            (self.supply_pressure.value, "supply pressure must be non-negative"),
        ];
        for (value, what) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidArg { what });
            }
        }
        Ok(())
    }

    /// Pressure rate per unit volumetric imbalance, β / (V·ρ).
    fn pressure_gain(&self) -> f64 {
        self.bulk_modulus.value / (self.chamber_volume.value * self.density.value)
    }
}

/// Snapshot of the piston-valve state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PistonValveState {
    /// Piston position (m)
    pub position: f64,
    /// Piston velocity (m/s)
    pub velocity: f64,
    /// Chamber 1 pressure (Pa)
    pub p1: f64,
    /// Chamber 2 pressure (Pa)
    pub p2: f64,
}

impl PistonValveState {
    /// Piston at rest with both chambers at ambient pressure.
    pub fn at_rest(ambient: Pressure) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            p1: ambient.value,
            p2: ambient.value,
        }
    }

    pub fn to_vector(&self) -> Vector4<f64> {
        Vector4::new(self.position, self.velocity, self.p1, self.p2)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self {
            position: v[0],
            velocity: v[1],
            p1: v[2],
            p2: v[3],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_vector().iter().all(|c| c.is_finite())
    }
}

/// Piston-valve system as a transient model.
#[derive(Clone, Debug)]
pub struct PistonValveModel {
    params: PistonValveParams,
    initial: PistonValveState,
}

impl PistonValveModel {
    pub fn new(params: PistonValveParams, initial: PistonValveState) -> SimResult<Self> {
        params.validate()?;
        if !initial.is_finite() {
            return Err(SimError::InvalidArg {
                what: "initial state must be finite",
            });
        }
        Ok(Self { params, initial })
    }

    pub fn params(&self) -> &PistonValveParams {
        &self.params
    }

    /// Time derivative of `[x, ẋ, p1, p2]`.
    pub fn derivative(&self, x: &Vector4<f64>) -> Vector4<f64> {
        let p = &self.params;
        let area = p.piston_area.value;
        let rho = p.density.value;
        let valve = p.valve_opening * p.valve_gain;
        let gain = p.pressure_gain();

        let xdot = x[1];
        let (p1, p2) = (x[2], x[3]);
        let displacement = rho * area * xdot;

        let xddot = area * (p1 - p2) / p.mass.value;
        let p1dot = (valve * (p.supply_pressure.value - p1) - displacement) * gain;
        let p2dot = (valve * (p2 - p.ambient_pressure.value) - displacement) * gain;

        Vector4::new(xdot, xddot, p1dot, p2dot)
    }
}

impl TransientModel for PistonValveModel {
    type State = Vector4<f64>;

    fn initial_state(&self) -> Self::State {
        self.initial.to_vector()
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.derivative(x))
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

/// Sampled piston-valve trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub states: Vec<PistonValveState>,
    pub stats: StepStats,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn positions(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.position).collect()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.velocity).collect()
    }

    pub fn p1(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.p1).collect()
    }

    pub fn p2(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.p2).collect()
    }
}

/// Integrate the piston-valve system over `time_span` and sample it at
/// `sample_count` equally spaced times.
pub fn simulate(
    params: &PistonValveParams,
    initial_state: PistonValveState,
    time_span: (f64, f64),
    sample_count: usize,
) -> SimResult<Trajectory> {
    let opts = SimOptions {
        t_start: time_span.0,
        t_end: time_span.1,
        sample_count,
        ..SimOptions::default()
    };
    simulate_with_options(params, initial_state, &opts)
}

/// Default run: documented parameters, at rest at ambient pressure,
/// `[0, 0.02] s` with 200 samples.
pub fn simulate_default(integrator: IntegratorType) -> SimResult<Trajectory> {
    let params = PistonValveParams::default();
    let initial = PistonValveState::at_rest(params.ambient_pressure);
    let opts = SimOptions {
        t_start: 0.0,
        t_end: DEFAULT_T_END,
        sample_count: DEFAULT_SAMPLE_COUNT,
        integrator,
        ..SimOptions::default()
    };
    simulate_with_options(&params, initial, &opts)
}

pub fn simulate_with_options(
    params: &PistonValveParams,
    initial_state: PistonValveState,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let mut model = PistonValveModel::new(params.clone(), initial_state)?;
    let record = run_sim(&mut model, opts)?;

    let states: Vec<PistonValveState> = record.x.iter().map(PistonValveState::from_vector).collect();
    if let Some(last) = states.last() {
        debug!(
            samples = states.len(),
            x_end = last.position,
            p1_end = last.p1,
            p2_end = last.p2,
            "piston-valve run complete"
        );
    }

    Ok(Trajectory {
        times: record.t,
        states,
        stats: record.stats,
    })
}
