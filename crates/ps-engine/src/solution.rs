//! Candidate solutions: how a pump meets a duty point.

use ps_catalog::{PerformanceCurve, PumpModel};
use serde::Serialize;

/// Modification method of a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Direct,
    Trim,
    Speed,
    /// Trim and speed change together; only produced by an explicit
    /// configuration check.
    Combined,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Trim => "trim",
            Self::Speed => "speed",
            Self::Combined => "combined",
        }
    }
}

/// Impeller diameter reduction at fixed speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimAdjustment {
    pub base_diameter_mm: f64,
    pub trimmed_diameter_mm: f64,
    /// `trimmed / base * 100`.
    pub trim_percent: f64,
}

impl TrimAdjustment {
    pub fn from_ratio(base_diameter_mm: f64, ratio: f64) -> Self {
        Self {
            base_diameter_mm,
            trimmed_diameter_mm: base_diameter_mm * ratio,
            trim_percent: ratio * 100.0,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.trim_percent / 100.0
    }
}

/// Rotational speed change at fixed diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedAdjustment {
    pub test_speed_rpm: f64,
    pub required_speed_rpm: f64,
    /// `(required / test - 1) * 100`; negative for a slow-down.
    pub speed_variation_pct: f64,
}

impl SpeedAdjustment {
    pub fn from_ratio(test_speed_rpm: f64, ratio: f64) -> Self {
        Self {
            test_speed_rpm,
            required_speed_rpm: test_speed_rpm * ratio,
            speed_variation_pct: (ratio - 1.0) * 100.0,
        }
    }

    pub fn from_speed(test_speed_rpm: f64, required_speed_rpm: f64) -> Self {
        Self {
            test_speed_rpm,
            required_speed_rpm,
            speed_variation_pct: (required_speed_rpm / test_speed_rpm - 1.0) * 100.0,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.required_speed_rpm / self.test_speed_rpm
    }
}

/// What was changed on the pump to meet the duty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Modification {
    Direct,
    Trim(TrimAdjustment),
    Speed(SpeedAdjustment),
    Combined {
        trim: TrimAdjustment,
        speed: SpeedAdjustment,
    },
}

/// One way a pump meets a duty point.
///
/// Built fresh for every evaluation; the catalog curve it refers to is never
/// modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Solution {
    pub modification: Modification,
    /// Index into [`PumpModel::curves`].
    pub curve_index: usize,
    pub curve_diameter_mm: f64,
    pub achieved_flow_m3hr: f64,
    pub achieved_head_m: f64,
    pub efficiency_pct: f64,
    pub power_kw: f64,
    pub npshr_m: Option<f64>,
}

impl Solution {
    pub fn method(&self) -> Method {
        match self.modification {
            Modification::Direct => Method::Direct,
            Modification::Trim(_) => Method::Trim,
            Modification::Speed(_) => Method::Speed,
            Modification::Combined { .. } => Method::Combined,
        }
    }

    pub fn trim(&self) -> Option<&TrimAdjustment> {
        match &self.modification {
            Modification::Trim(t) | Modification::Combined { trim: t, .. } => Some(t),
            _ => None,
        }
    }

    pub fn speed(&self) -> Option<&SpeedAdjustment> {
        match &self.modification {
            Modification::Speed(s) | Modification::Combined { speed: s, .. } => Some(s),
            _ => None,
        }
    }

    pub fn trim_percent(&self) -> Option<f64> {
        self.trim().map(|t| t.trim_percent)
    }

    pub fn speed_variation_pct(&self) -> Option<f64> {
        self.speed().map(|s| s.speed_variation_pct)
    }

    /// Impeller diameter actually fitted.
    pub fn impeller_diameter_mm(&self) -> f64 {
        self.trim()
            .map_or(self.curve_diameter_mm, |t| t.trimmed_diameter_mm)
    }

    /// Factor the affinity laws apply to flow: diameter ratio times speed
    /// ratio. 1.0 for a direct match.
    pub fn modification_ratio(&self) -> f64 {
        let d = self.trim().map_or(1.0, TrimAdjustment::ratio);
        let n = self.speed().map_or(1.0, SpeedAdjustment::ratio);
        d * n
    }

    /// The catalog curve this solution was derived from.
    pub fn curve<'a>(&self, pump: &'a PumpModel) -> Option<&'a PerformanceCurve> {
        pump.curves.get(self.curve_index)
    }
}
