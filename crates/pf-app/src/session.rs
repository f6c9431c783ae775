//! User points overlaid on the Moody diagram.

use pf_friction::{
    DiagramBounds, FlowRegime, FrictionFactorResult, PipeFlowSample,
    compute_re_and_roughness_ratio, friction_factor_for_point,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppResult;
use crate::input::PipeInputs;

/// Plot marker for a user point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    /// Transitional band, where the friction factor is a random estimate.
    Triangle,
}

impl Marker {
    pub fn for_regime(regime: FlowRegime) -> Self {
        match regime {
            FlowRegime::Transitional => Marker::Triangle,
            FlowRegime::Laminar | FlowRegime::Turbulent => Marker::Circle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Marker::Circle => "circle",
            Marker::Triangle => "triangle",
        }
    }
}

/// One evaluated operating point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagramPoint {
    pub inputs: PipeInputs,
    pub sample: PipeFlowSample,
    pub result: FrictionFactorResult,
    pub marker: Marker,
    /// Whether the point lies inside the plotted window.
    pub in_bounds: bool,
}

/// Convert pipe data and evaluate the friction factor at that point.
pub fn evaluate_point<R: Rng + ?Sized>(
    inputs: PipeInputs,
    bounds: &DiagramBounds,
    rng: &mut R,
) -> AppResult<DiagramPoint> {
    let sample =
        compute_re_and_roughness_ratio(inputs.diameter_in, inputs.roughness_uin, inputs.flow_gpm)?;
    let result = friction_factor_for_point(sample.reynolds, sample.relative_roughness, rng)?;

    Ok(DiagramPoint {
        inputs,
        sample,
        result,
        marker: Marker::for_regime(result.regime),
        in_bounds: bounds.contains(sample.reynolds, result.friction_factor),
    })
}

/// Append-only list of user points for one interactive session.
#[derive(Clone, Debug, Default)]
pub struct MoodySession {
    bounds: DiagramBounds,
    points: Vec<DiagramPoint>,
}

impl MoodySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: DiagramBounds) -> Self {
        Self {
            bounds,
            points: Vec::new(),
        }
    }

    /// Evaluate a point and append it. Nothing is appended on error.
    pub fn add_point<R: Rng + ?Sized>(
        &mut self,
        inputs: PipeInputs,
        rng: &mut R,
    ) -> AppResult<&DiagramPoint> {
        let point = evaluate_point(inputs, &self.bounds, rng)?;
        debug!(
            index = self.points.len(),
            reynolds = point.sample.reynolds,
            friction_factor = point.result.friction_factor,
            regime = point.result.regime.label(),
            "point added"
        );
        self.points.push(point);
        Ok(&self.points[self.points.len() - 1])
    }

    pub fn points(&self) -> &[DiagramPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> &DiagramBounds {
        &self.bounds
    }
}
