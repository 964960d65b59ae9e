//! Error types for the selection engine.
//!
//! Only contract violations are errors. A pump that cannot meet a duty is a
//! normal outcome described by [`crate::ExclusionReason`]s.

use crate::interpolate::InterpolationError;
use ps_catalog::CatalogError;
use ps_core::PsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid duty point: {what} must be finite and positive (got {value})")]
    InvalidDuty { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Pump not found: {0}")]
    UnknownPump(String),

    #[error("Pump {pump_code} has no curve {index} (it has {len})")]
    CurveIndex {
        pump_code: String,
        index: usize,
        len: usize,
    },

    #[error("Interpolation failed: {0}")]
    Interpolation(#[from] InterpolationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Core(#[from] PsError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Reasons a solution cannot be scored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Delivered head is {margin_pct:.1}% below the duty; the solution should have been excluded")]
    HeadNotMet { margin_pct: f64 },

    #[error("Non-finite {what} in scoring")]
    NonFinite { what: &'static str },

    #[error("Pump has no best efficiency point")]
    NoBep,
}
