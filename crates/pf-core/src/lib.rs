//! pf-core: shared foundation for pipeflow.
//!
//! Contains:
//! - units (uom SI types, constructors, US customary conversion factors)
//! - numeric (Real + tolerances + float helpers + grids)
//! - error (shared error type)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
