//! Moody diagram curve data.
//!
//! The set is rebuilt on every request from fixed grids and is only ever
//! evaluated through the deterministic [`friction_factor`] routine; the
//! transitional draw never appears on it.

use crate::common::check_finite;
use crate::error::FrictionResult;
use crate::friction::friction_factor;
use crate::regime::{LAMINAR_LIMIT, TURBULENT_LIMIT};
use pf_core::numeric::logspace;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative roughness values drawn as turbulent curves.
pub const ROUGHNESS_VALUES: [f64; 20] = [
    0.0, 1e-6, 5e-6, 1e-5, 5e-5, 1e-4, 2e-4, 4e-4, 6e-4, 8e-4, 1e-3, 2e-3, 4e-3, 6e-3, 8e-3,
    1.5e-2, 2e-2, 3e-2, 4e-2, 5e-2,
];

pub const LAMINAR_RE_START: f64 = 600.0;
pub const LAMINAR_POINTS: usize = 20;
pub const TRANSITION_POINTS: usize = 20;
pub const TURBULENT_RE_END: f64 = 1e8;
pub const TURBULENT_POINTS: usize = 100;

/// Plot window of the diagram.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagramBounds {
    pub re_min: f64,
    pub re_max: f64,
    pub f_min: f64,
    pub f_max: f64,
}

impl Default for DiagramBounds {
    fn default() -> Self {
        Self {
            re_min: LAMINAR_RE_START,
            re_max: TURBULENT_RE_END,
            f_min: 0.008,
            f_max: 0.10,
        }
    }
}

impl DiagramBounds {
    pub fn contains(&self, reynolds: f64, f: f64) -> bool {
        (self.re_min..=self.re_max).contains(&reynolds) && (self.f_min..=self.f_max).contains(&f)
    }
}

/// One curve of the diagram: friction factor against Reynolds number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodyCurve {
    /// Relative roughness of a turbulent curve; `None` for the laminar and
    /// transition lines, which do not depend on it.
    pub relative_roughness: Option<f64>,
    pub reynolds: Vec<f64>,
    pub friction_factor: Vec<f64>,
}

impl MoodyCurve {
    pub fn len(&self) -> usize {
        self.reynolds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reynolds.is_empty()
    }

    /// `(Re, f)` pairs in increasing Reynolds number.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.reynolds
            .iter()
            .copied()
            .zip(self.friction_factor.iter().copied())
    }
}

/// All curves needed to draw a Moody diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodyCurveSet {
    pub laminar: MoodyCurve,
    pub transition: MoodyCurve,
    pub turbulent: Vec<MoodyCurve>,
    pub bounds: DiagramBounds,
}

impl MoodyCurveSet {
    pub fn compute() -> FrictionResult<Self> {
        let laminar = deterministic_curve(
            None,
            logspace(LAMINAR_RE_START, LAMINAR_LIMIT, LAMINAR_POINTS)?,
            false,
        )?;
        let transition = deterministic_curve(
            None,
            logspace(LAMINAR_LIMIT, TURBULENT_LIMIT, TRANSITION_POINTS)?,
            false,
        )?;

        let re_turbulent = turbulent_reynolds_grid()?;
        let turbulent = ROUGHNESS_VALUES
            .iter()
            .map(|&rr| deterministic_curve(Some(rr), re_turbulent.clone(), true))
            .collect::<FrictionResult<Vec<_>>>()?;

        debug!(
            curves = turbulent.len(),
            points = TURBULENT_POINTS,
            "moody curve set computed"
        );

        Ok(Self {
            laminar,
            transition,
            turbulent,
            bounds: DiagramBounds::default(),
        })
    }

    /// Turbulent curve for a given relative roughness, if it is on the chart.
    pub fn turbulent_curve(&self, rr: f64) -> Option<&MoodyCurve> {
        self.turbulent
            .iter()
            .find(|c| c.relative_roughness == Some(rr))
    }
}

/// Reynolds grid shared by all turbulent curves.
pub fn turbulent_reynolds_grid() -> FrictionResult<Vec<f64>> {
    Ok(logspace(TURBULENT_LIMIT, TURBULENT_RE_END, TURBULENT_POINTS)?)
}

fn deterministic_curve(
    relative_roughness: Option<f64>,
    reynolds: Vec<f64>,
    use_colebrook: bool,
) -> FrictionResult<MoodyCurve> {
    let rr = relative_roughness.unwrap_or(0.0);
    let friction_factor = reynolds
        .iter()
        .map(|&re| {
            let f = friction_factor(re, rr, use_colebrook)?;
            check_finite(f, "Moody curve friction factor")?;
            Ok(f)
        })
        .collect::<FrictionResult<Vec<_>>>()?;

    Ok(MoodyCurve {
        relative_roughness,
        reynolds,
        friction_factor,
    })
}
