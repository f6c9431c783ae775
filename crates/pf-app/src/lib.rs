//! Shared application service layer for pipeflow.
//!
//! Sits between the CLI and the computational crates: prompt parsing,
//! the interactive point session, and table exports.

pub mod error;
pub mod input;
pub mod report;
pub mod session;

pub use error::{AppError, AppResult};
pub use input::{PipeInputs, parse_number, prompt_number, prompt_pipe_inputs};
pub use report::{
    ReportFormat, render_point_table, write_curve_set, write_curve_set_csv, write_json,
    write_points, write_points_csv, write_trajectory, write_trajectory_csv,
};
pub use session::{DiagramPoint, Marker, MoodySession, evaluate_point};
