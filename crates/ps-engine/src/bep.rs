//! Best efficiency point analysis.

use crate::duty::DutyPoint;
use crate::solution::Solution;
use ps_catalog::{PerformanceCurve, PumpModel};
use serde::Serialize;

/// Band of the duty flow relative to BEP flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingZone {
    /// 0.95 to 1.05
    AtBep,
    GoodLeft,
    GoodRight,
    AcceptableLeft,
    AcceptableRight,
    MarginalLeft,
    MarginalRight,
    LowFlow,
    Overload,
    OutsideEnvelope,
}

/// Presentation tier derived from the operating zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Preferred,
    Allowable,
    Acceptable,
    Marginal,
}

/// Right-of-BEP bonus for the 1.05..=1.15 window.
const RIGHT_OF_BEP_BONUS: f64 = 3.0;

impl OperatingZone {
    pub fn classify(flow_ratio: f64) -> Self {
        let r = flow_ratio;
        if !r.is_finite() {
            return Self::OutsideEnvelope;
        }
        if (0.95..=1.05).contains(&r) {
            Self::AtBep
        } else if (0.90..0.95).contains(&r) {
            Self::GoodLeft
        } else if r > 1.05 && r <= 1.10 {
            Self::GoodRight
        } else if (0.85..0.90).contains(&r) {
            Self::AcceptableLeft
        } else if r > 1.10 && r <= 1.15 {
            Self::AcceptableRight
        } else if (0.80..0.85).contains(&r) {
            Self::MarginalLeft
        } else if r > 1.15 && r <= 1.25 {
            Self::MarginalRight
        } else if (0.70..0.80).contains(&r) {
            Self::LowFlow
        } else if r > 1.25 && r <= 1.35 {
            Self::Overload
        } else {
            Self::OutsideEnvelope
        }
    }

    /// Fixed point value of the band.
    pub fn points(self) -> f64 {
        match self {
            Self::AtBep => 30.0,
            Self::GoodLeft => 25.0,
            Self::GoodRight => 25.0 + RIGHT_OF_BEP_BONUS,
            Self::AcceptableLeft => 20.0,
            Self::AcceptableRight => 20.0 + RIGHT_OF_BEP_BONUS,
            Self::MarginalLeft | Self::MarginalRight => 12.0,
            Self::LowFlow | Self::Overload => 5.0,
            Self::OutsideEnvelope => 0.0,
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            Self::AtBep | Self::GoodLeft | Self::GoodRight => Tier::Preferred,
            Self::AcceptableLeft | Self::AcceptableRight => Tier::Allowable,
            Self::MarginalLeft | Self::MarginalRight => Tier::Acceptable,
            Self::LowFlow | Self::Overload | Self::OutsideEnvelope => Tier::Marginal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtBep => "at_bep",
            Self::GoodLeft => "good_left",
            Self::GoodRight => "good_right",
            Self::AcceptableLeft => "acceptable_left",
            Self::AcceptableRight => "acceptable_right",
            Self::MarginalLeft => "marginal_left",
            Self::MarginalRight => "marginal_right",
            Self::LowFlow => "low_flow",
            Self::Overload => "overload",
            Self::OutsideEnvelope => "outside_envelope",
        }
    }
}

/// Maximum-efficiency point of a pump's curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BepPoint {
    pub curve_index: usize,
    pub flow_m3hr: f64,
    pub head_m: f64,
    pub efficiency_pct: f64,
}

/// Where a duty sits relative to a BEP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BepAnalysis {
    pub bep: BepPoint,
    /// `duty flow / bep flow`.
    pub flow_ratio: f64,
    pub zone: OperatingZone,
    pub zone_points: f64,
}

impl BepAnalysis {
    fn new(bep: BepPoint, flow_m3hr: f64) -> Option<Self> {
        if bep.flow_m3hr.is_nan() || bep.flow_m3hr <= 0.0 {
            return None;
        }
        let flow_ratio = flow_m3hr / bep.flow_m3hr;
        let zone = OperatingZone::classify(flow_ratio);
        Some(Self {
            bep,
            flow_ratio,
            zone,
            zone_points: zone.points(),
        })
    }

    pub fn tier(&self) -> Tier {
        self.zone.tier()
    }
}

fn curve_bep(index: usize, curve: &PerformanceCurve) -> BepPoint {
    let p = curve.max_efficiency_point();
    BepPoint {
        curve_index: index,
        flow_m3hr: p.flow_m3hr,
        head_m: p.head_m,
        efficiency_pct: p.efficiency_pct,
    }
}

/// Highest-efficiency point across every curve of `pump`. Ties keep the
/// first point found.
pub fn best_efficiency_point(pump: &PumpModel) -> Option<BepPoint> {
    pump.curves
        .iter()
        .enumerate()
        .map(|(i, c)| curve_bep(i, c))
        .fold(None, |best: Option<BepPoint>, p| match best {
            Some(b) if b.efficiency_pct >= p.efficiency_pct => Some(b),
            _ => Some(p),
        })
}

/// BEP proximity of the raw duty against the pump's best curve.
pub fn distance(pump: &PumpModel, duty: &DutyPoint) -> Option<BepAnalysis> {
    BepAnalysis::new(best_efficiency_point(pump)?, duty.flow_m3hr())
}

/// BEP proximity of a solution: the BEP of the solution's own curve,
/// moved along the affinity laws by the solution's modification.
pub fn analyze_solution(pump: &PumpModel, solution: &Solution, duty: &DutyPoint) -> Option<BepAnalysis> {
    let curve = solution.curve(pump)?;
    let r = solution.modification_ratio();
    let base = curve_bep(solution.curve_index, curve);
    let bep = BepPoint {
        flow_m3hr: base.flow_m3hr * r,
        head_m: base.head_m * r * r,
        ..base
    };
    BepAnalysis::new(bep, duty.flow_m3hr())
}
