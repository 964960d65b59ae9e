//! Suitability score of a feasible solution.
//!
//! Positive components are capped; the oversizing penalty is not, so a
//! heavily oversized pump can score below zero and still be ranked.

use crate::bep::distance;
use crate::duty::DutyPoint;
use crate::error::ScoringError;
use crate::solution::Solution;
use ps_catalog::PumpModel;
use serde::Serialize;
use std::collections::BTreeMap;

pub const BEP_MAX: f64 = 40.0;
pub const EFFICIENCY_MAX: f64 = 30.0;
pub const HEAD_MARGIN_MAX: f64 = 15.0;
pub const NPSH_MAX: f64 = 15.0;
pub const SPEED_PENALTY_MAX: f64 = 15.0;

/// Auditable parts of a score. Penalties are stored as positive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub bep_proximity: f64,
    pub efficiency: f64,
    pub head_margin: f64,
    pub npsh: f64,
    pub speed_penalty: f64,
    pub trim_penalty: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    fn new(
        bep_proximity: f64,
        efficiency: f64,
        head_margin: f64,
        npsh: f64,
        speed_penalty: f64,
        trim_penalty: f64,
    ) -> Self {
        let total = bep_proximity + efficiency + head_margin + npsh - speed_penalty - trim_penalty;
        Self {
            bep_proximity,
            efficiency,
            head_margin,
            npsh,
            speed_penalty,
            trim_penalty,
            total,
        }
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("bep_proximity", self.bep_proximity),
            ("efficiency", self.efficiency),
            ("head_margin", self.head_margin),
            ("npsh", self.npsh),
            ("speed_penalty", self.speed_penalty),
            ("trim_penalty", self.trim_penalty),
            ("total", self.total),
        ])
    }
}

/// `40 * max(0, 1 - ((ratio - 1) / 0.5)^2)`.
pub fn bep_proximity_points(flow_ratio: f64) -> f64 {
    let x = (flow_ratio - 1.0) / 0.5;
    BEP_MAX * (1.0 - x * x).max(0.0)
}

/// `(efficiency / 100)^2 * 30`.
pub fn efficiency_points(efficiency_pct: f64) -> f64 {
    let e = efficiency_pct / 100.0;
    e * e * EFFICIENCY_MAX
}

/// Head margin points for a margin in percent of the duty head.
///
/// 15 on `[-2, 5]`, falling linearly to 7.5 at 20 and to 0 at 50, then
/// losing 0.25 per percent without limit.
///
/// # Errors
/// Margins below -2 % mean the head is not met.
pub fn head_margin_points(margin_pct: f64) -> Result<f64, ScoringError> {
    let m = margin_pct;
    if !m.is_finite() {
        return Err(ScoringError::NonFinite { what: "head margin" });
    }
    if m < -2.0 - ps_core::BOUND_EPS {
        return Err(ScoringError::HeadNotMet { margin_pct: m });
    }
    let points = if m <= 5.0 {
        HEAD_MARGIN_MAX
    } else if m <= 20.0 {
        HEAD_MARGIN_MAX - 7.5 * (m - 5.0) / 15.0
    } else if m <= 50.0 {
        7.5 - 7.5 * (m - 20.0) / 30.0
    } else {
        -0.25 * (m - 50.0)
    };
    Ok(points)
}

/// 15 at NPSHr <= 2 m, 0 at >= 8 m, linear between. Unknown NPSHr earns
/// nothing.
pub fn npsh_points(npshr_m: Option<f64>) -> f64 {
    match npshr_m {
        Some(n) if n.is_finite() => {
            if n <= 2.0 {
                NPSH_MAX
            } else if n >= 8.0 {
                0.0
            } else {
                NPSH_MAX * (8.0 - n) / 6.0
            }
        }
        _ => 0.0,
    }
}

/// `min(15, 1.5 * |variation|)`.
pub fn speed_penalty(speed_variation_pct: Option<f64>) -> f64 {
    speed_variation_pct.map_or(0.0, |v| (1.5 * v.abs()).min(SPEED_PENALTY_MAX))
}

/// `0.5 * (100 - trim_percent)`.
pub fn trim_penalty(trim_percent: Option<f64>) -> f64 {
    trim_percent.map_or(0.0, |t| 0.5 * (100.0 - t).max(0.0))
}

/// Score `solution` for `pump` at `duty`.
///
/// # Errors
/// A head shortfall beyond tolerance, non-finite solution values, or a pump
/// without a best efficiency point.
pub fn score(pump: &PumpModel, solution: &Solution, duty: &DutyPoint) -> Result<ScoreBreakdown, ScoringError> {
    for (what, v) in [
        ("efficiency", solution.efficiency_pct),
        ("head", solution.achieved_head_m),
        ("power", solution.power_kw),
    ] {
        if !v.is_finite() {
            return Err(ScoringError::NonFinite { what });
        }
    }
    let bep = distance(pump, duty).ok_or(ScoringError::NoBep)?;

    let breakdown = ScoreBreakdown::new(
        bep_proximity_points(bep.flow_ratio),
        efficiency_points(solution.efficiency_pct),
        head_margin_points(duty.head_margin_pct(solution.achieved_head_m))?,
        npsh_points(solution.npshr_m),
        speed_penalty(solution.speed_variation_pct()),
        trim_penalty(solution.trim_percent()),
    );
    if !breakdown.total.is_finite() {
        return Err(ScoringError::NonFinite { what: "total" });
    }
    Ok(breakdown)
}
