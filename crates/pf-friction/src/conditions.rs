//! Conversion of pipe geometry and flow rate into Reynolds number and
//! relative roughness.

use crate::common::check_finite;
use crate::error::{FrictionError, FrictionResult};
use crate::regime::FlowRegime;
use pf_core::units::us_customary::{
    WATER_KINEMATIC_VISCOSITY_FT2PS, gpm_to_ft3ps, inches_to_feet, microinches_to_feet,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dimensionless description of a pipe operating point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipeFlowSample {
    pub reynolds: f64,
    pub relative_roughness: f64,
}

impl PipeFlowSample {
    pub fn regime(&self) -> FlowRegime {
        FlowRegime::classify(self.reynolds)
    }
}

/// Reynolds number and relative roughness for water at ~20 °C.
///
/// Inputs are pipe diameter in inches, wall roughness in microinches and
/// volumetric flow in US gallons per minute.
pub fn compute_re_and_roughness_ratio(
    diameter_in: f64,
    roughness_uin: f64,
    flow_gpm: f64,
) -> FrictionResult<PipeFlowSample> {
    compute_re_and_roughness_ratio_with_viscosity(
        diameter_in,
        roughness_uin,
        flow_gpm,
        WATER_KINEMATIC_VISCOSITY_FT2PS,
    )
}

/// Same as [`compute_re_and_roughness_ratio`] with an explicit kinematic
/// viscosity in ft²/s.
///
/// A zero diameter has no flow area; the sample `(0, 0)` is returned rather
/// than dividing by zero.
pub fn compute_re_and_roughness_ratio_with_viscosity(
    diameter_in: f64,
    roughness_uin: f64,
    flow_gpm: f64,
    nu_ft2ps: f64,
) -> FrictionResult<PipeFlowSample> {
    check_input(diameter_in, "diameter must be non-negative and finite")?;
    check_input(roughness_uin, "roughness must be non-negative and finite")?;
    check_input(flow_gpm, "flow rate must be non-negative and finite")?;
    if !nu_ft2ps.is_finite() || nu_ft2ps <= 0.0 {
        return Err(FrictionError::Domain {
            what: "kinematic viscosity must be positive and finite",
        });
    }

    let d_ft = inches_to_feet(diameter_in);
    let e_ft = microinches_to_feet(roughness_uin);
    let q_ft3ps = gpm_to_ft3ps(flow_gpm);

    let area = std::f64::consts::PI * (d_ft / 2.0).powi(2);
    if area == 0.0 {
        warn!(diameter_in, "zero pipe diameter, returning zero Reynolds number");
        return Ok(PipeFlowSample {
            reynolds: 0.0,
            relative_roughness: 0.0,
        });
    }

    let velocity = q_ft3ps / area;
    let reynolds = velocity * d_ft / nu_ft2ps;
    let relative_roughness = e_ft / d_ft;

    check_finite(reynolds, "Reynolds number")?;
    check_finite(relative_roughness, "relative roughness")?;

    Ok(PipeFlowSample {
        reynolds,
        relative_roughness,
    })
}

fn check_input(value: f64, what: &'static str) -> FrictionResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FrictionError::Domain { what });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::{Tolerances, nearly_equal};

    #[test]
    fn zero_diameter_degenerates_to_zero() {
        let sample = compute_re_and_roughness_ratio(0.0, 50.0, 10.0).unwrap();
        assert_eq!(sample.reynolds, 0.0);
        assert_eq!(sample.relative_roughness, 0.0);
    }

    #[test]
    fn one_inch_pipe_ten_gpm() {
        let sample = compute_re_and_roughness_ratio(1.0, 50.0, 10.0).unwrap();

        // Q = 10 * 0.133681 / 60 ft³/s, D = 1/12 ft
        let d = 1.0 / 12.0;
        let q = 10.0 * 0.133681 / 60.0;
        let v = q / (std::f64::consts::PI * (d / 2.0) * (d / 2.0));
        let re = v * d / 1.217e-5;
        let tol = Tolerances::default();
        assert!(nearly_equal(sample.reynolds, re, tol));
        assert!(nearly_equal(sample.relative_roughness, 50.0e-6, tol));
        assert_eq!(sample.regime(), FlowRegime::Turbulent);
    }

    #[test]
    fn relative_roughness_is_independent_of_flow() {
        let a = compute_re_and_roughness_ratio(2.0, 100.0, 1.0).unwrap();
        let b = compute_re_and_roughness_ratio(2.0, 100.0, 50.0).unwrap();
        assert_eq!(a.relative_roughness, b.relative_roughness);
        assert!(b.reynolds > a.reynolds);
    }

    #[test]
    fn zero_flow_gives_zero_reynolds() {
        let sample = compute_re_and_roughness_ratio(1.0, 50.0, 0.0).unwrap();
        assert_eq!(sample.reynolds, 0.0);
        assert!(sample.relative_roughness > 0.0);
    }

    #[test]
    fn negative_inputs_are_domain_errors() {
        assert!(matches!(
            compute_re_and_roughness_ratio(-1.0, 50.0, 10.0),
            Err(FrictionError::Domain { .. })
        ));
        assert!(matches!(
            compute_re_and_roughness_ratio(1.0, 50.0, -10.0),
            Err(FrictionError::Domain { .. })
        ));
        assert!(matches!(
            compute_re_and_roughness_ratio(1.0, f64::NAN, 10.0),
            Err(FrictionError::Domain { .. })
        ));
    }

    #[test]
    fn viscosity_must_be_positive() {
        assert!(compute_re_and_roughness_ratio_with_viscosity(1.0, 50.0, 10.0, 0.0).is_err());
    }
}
