//! ps-engine: pump feasibility, scoring and ranking.
//!
//! Pipeline per pump, leaves first:
//! - interpolate: evaluate one curve at a flow
//! - affinity: trim and speed solvers, scaled curves, configuration check
//! - feasibility: best candidate across curves and methods
//! - validate: physical feasibility gate
//! - bep / scoring: BEP proximity and the 0-100 suitability score
//! - rank: catalog-wide evaluation, tiers and near misses

pub mod affinity;
pub mod bep;
pub mod config;
pub mod duty;
pub mod error;
pub mod exclusion;
pub mod feasibility;
pub mod interpolate;
pub mod near_miss;
pub mod rank;
pub mod scoring;
pub mod solution;
pub mod validate;

pub use affinity::{
    CurveRef, Rejection, apply_configuration, scale_curve_by_diameter, scale_curve_by_speed,
    solve_speed, solve_trim, try_speed, try_trim,
};
pub use bep::{BepAnalysis, BepPoint, OperatingZone, Tier, analyze_solution, best_efficiency_point, distance};
pub use config::{
    EngineConfig, InterpolationLimits, NearMissThresholds, SpeedLimits, TrimLimits, ValidationLimits,
};
pub use duty::{DutyPoint, SelectionRequest};
pub use error::{EngineError, EngineResult, ScoringError};
pub use exclusion::ExclusionReason;
pub use feasibility::{SolveOutcome, pre_score, solve, solve_detailed};
pub use interpolate::{CurveInterpolator, InterpolationError, OperatingValues, interpolate};
pub use near_miss::{NearMiss, NearMissCriterion};
pub use rank::{
    Evaluation, SelectionReport, Tiers, evaluate, evaluate_code, evaluate_configuration, rank,
};
pub use scoring::{ScoreBreakdown, score};
pub use solution::{Method, Modification, Solution, SpeedAdjustment, TrimAdjustment};
pub use validate::{Validation, validate};
