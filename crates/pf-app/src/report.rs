//! Table exports for the diagram, user points and piston runs.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use pf_friction::{MoodyCurve, MoodyCurveSet};
use pf_sim::Trajectory;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::session::DiagramPoint;

/// Output format of an exported table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(AppError::InvalidInput(format!(
                "unknown format '{other}' (expected csv or json)"
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Pretty-printed JSON of any serializable report.
pub fn write_json<T: Serialize, W: Write>(value: &T, out: &mut W) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_curve_rows<W: Write>(out: &mut W, name: &str, curve: &MoodyCurve) -> AppResult<()> {
    let rr = curve
        .relative_roughness
        .map(|rr| rr.to_string())
        .unwrap_or_default();
    for (re, f) in curve.points() {
        writeln!(out, "{name},{rr},{re},{f}")?;
    }
    Ok(())
}

/// One row per curve point; `relative_roughness` is empty for the laminar
/// and transition lines.
pub fn write_curve_set_csv<W: Write>(set: &MoodyCurveSet, out: &mut W) -> AppResult<()> {
    writeln!(out, "curve,relative_roughness,reynolds,friction_factor")?;
    write_curve_rows(out, "laminar", &set.laminar)?;
    write_curve_rows(out, "transition", &set.transition)?;
    for curve in &set.turbulent {
        write_curve_rows(out, "turbulent", curve)?;
    }
    Ok(())
}

pub fn write_curve_set<W: Write>(
    set: &MoodyCurveSet,
    format: ReportFormat,
    out: &mut W,
) -> AppResult<()> {
    match format {
        ReportFormat::Csv => write_curve_set_csv(set, out),
        ReportFormat::Json => write_json(set, out),
    }
}

pub fn write_points_csv<W: Write>(points: &[DiagramPoint], out: &mut W) -> AppResult<()> {
    writeln!(
        out,
        "index,diameter_in,roughness_uin,flow_gpm,reynolds,relative_roughness,regime,friction_factor,marker,in_bounds"
    )?;
    for (i, p) in points.iter().enumerate() {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{}",
            i,
            p.inputs.diameter_in,
            p.inputs.roughness_uin,
            p.inputs.flow_gpm,
            p.sample.reynolds,
            p.sample.relative_roughness,
            p.result.regime.label(),
            p.result.friction_factor,
            p.marker.label(),
            p.in_bounds
        )?;
    }
    Ok(())
}

pub fn write_points<W: Write>(
    points: &[DiagramPoint],
    format: ReportFormat,
    out: &mut W,
) -> AppResult<()> {
    match format {
        ReportFormat::Csv => write_points_csv(points, out),
        ReportFormat::Json => write_json(&points, out),
    }
}

pub fn write_trajectory_csv<W: Write>(traj: &Trajectory, out: &mut W) -> AppResult<()> {
    writeln!(out, "time_s,position_m,velocity_mps,p1_pa,p2_pa")?;
    for (t, s) in traj.times.iter().zip(&traj.states) {
        writeln!(out, "{},{},{},{},{}", t, s.position, s.velocity, s.p1, s.p2)?;
    }
    Ok(())
}

pub fn write_trajectory<W: Write>(
    traj: &Trajectory,
    format: ReportFormat,
    out: &mut W,
) -> AppResult<()> {
    match format {
        ReportFormat::Csv => write_trajectory_csv(traj, out),
        ReportFormat::Json => write_json(traj, out),
    }
}

/// Fixed-width table of session points for the terminal.
pub fn render_point_table(points: &[DiagramPoint]) -> String {
    let mut table = format!(
        "{:>3}  {:>8}  {:>9}  {:>8}  {:>12}  {:>10}  {:<12}  {:>8}  {:<8}\n",
        "#", "D [in]", "e [µin]", "Q [GPM]", "Re", "e/D", "regime", "f", "marker"
    );
    for (i, p) in points.iter().enumerate() {
        let f = if p.in_bounds {
            format!("{:.5}", p.result.friction_factor)
        } else {
            format!("{:.5}*", p.result.friction_factor)
        };
        table.push_str(&format!(
            "{:>3}  {:>8.3}  {:>9.1}  {:>8.3}  {:>12.1}  {:>10.3e}  {:<12}  {:>8}  {:<8}\n",
            i + 1,
            p.inputs.diameter_in,
            p.inputs.roughness_uin,
            p.inputs.flow_gpm,
            p.sample.reynolds,
            p.sample.relative_roughness,
            p.result.regime.label(),
            f,
            p.marker.label()
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }

    #[test]
    fn empty_point_table_has_header_only() {
        let table = render_point_table(&[]);
        assert_eq!(table.lines().count(), 1);
        assert!(table.contains("regime"));
    }

    #[test]
    fn empty_points_csv_has_header_only() {
        let mut out = Vec::new();
        write_points_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("index,diameter_in"));
        assert_eq!(text.lines().count(), 1);
    }
}
