//! ps-core: shared foundation for the pump selection workspace.
//!
//! Contains:
//! - units (uom SI types, constructors, hydraulic power)
//! - numeric (Real + tolerances + float helpers + piecewise-linear lookup)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{PsError, PsResult};
pub use numeric::*;
pub use units::*;
