//! Engine configuration.
//!
//! Every threshold the engine applies lives here. The defaults reproduce the
//! production constants; a partial YAML file can override individual keys:
//!
//! ```yaml
//! trim:
//!   min_trim_percent: 75
//! validation:
//!   min_efficiency_pct: 45
//! ```

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub interpolation: InterpolationLimits,
    pub trim: TrimLimits,
    pub speed: SpeedLimits,
    pub validation: ValidationLimits,
    pub near_miss: NearMissThresholds,
    /// Largest head surplus (percent of duty head) still treated as a direct
    /// match. Beyond it the solver prefers trimming or speed reduction.
    pub direct_head_window_pct: f64,
    /// Specific gravity of the pumped liquid (water = 1.0).
    pub specific_gravity: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationLimits::default(),
            trim: TrimLimits::default(),
            speed: SpeedLimits::default(),
            validation: ValidationLimits::default(),
            near_miss: NearMissThresholds::default(),
            direct_head_window_pct: 5.0,
            specific_gravity: 1.0,
        }
    }
}

/// Permitted extrapolation past a curve's measured flow range, as a fraction
/// of the curve's flow span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationLimits {
    /// Used for direct matching and trim lookups.
    pub direct_extrapolation: f64,
    /// Used for fallback lookups (speed refinement, near-miss diagnostics).
    pub legacy_extrapolation: f64,
}

impl Default for InterpolationLimits {
    fn default() -> Self {
        Self {
            direct_extrapolation: 0.10,
            legacy_extrapolation: 0.20,
        }
    }
}

/// Impeller trim limits, in percent of the curve's impeller diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimLimits {
    pub min_trim_percent: f64,
    pub max_trim_percent: f64,
    /// Efficiency points lost per percent of diameter removed.
    pub efficiency_penalty_per_pct: f64,
}

impl TrimLimits {
    /// Floor used by the extended selection mode (75 %). The default floor
    /// is 85 %; which one production should use is still undecided, so both
    /// are expressed through this single field.
    pub fn extended() -> Self {
        Self {
            min_trim_percent: 75.0,
            ..Self::default()
        }
    }
}

impl Default for TrimLimits {
    fn default() -> Self {
        Self {
            min_trim_percent: 85.0,
            max_trim_percent: 100.0,
            efficiency_penalty_per_pct: 0.3,
        }
    }
}

/// Variable-speed limits, in percent of the test speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLimits {
    /// Variation beyond this is rejected.
    pub hard_limit_pct: f64,
    /// Variation beyond this is allowed but flagged.
    pub preferred_limit_pct: f64,
    /// Weight of relative flow deviation in the curve point search.
    pub flow_deviation_weight: f64,
    /// Weight of relative speed change in the curve point search.
    pub speed_change_weight: f64,
    /// Bisection iterations used to refine the speed ratio.
    pub refine_iterations: usize,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            hard_limit_pct: 20.0,
            preferred_limit_pct: 10.0,
            flow_deviation_weight: 1.0,
            speed_change_weight: 0.5,
            refine_iterations: 60,
        }
    }
}

/// Thresholds of the physical feasibility gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Allowed head shortfall, percent of duty head.
    pub head_tolerance_pct: f64,
    pub min_efficiency_pct: f64,
    /// Trim floor when trim and speed change are applied together.
    pub combined_min_trim_percent: f64,
    /// Speed variation ceiling when trim and speed change are applied together.
    pub combined_max_speed_variation_pct: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            head_tolerance_pct: 2.0,
            min_efficiency_pct: 40.0,
            combined_min_trim_percent: 85.0,
            combined_max_speed_variation_pct: 30.0,
        }
    }
}

/// How close an excluded pump must come to be reported as a near miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearMissThresholds {
    /// Head shortfall, percent of duty head.
    pub head_pct: f64,
    /// Efficiency points below the efficiency floor.
    pub efficiency_points: f64,
    /// NPSH shortfall in metres.
    pub npsh_margin_m: f64,
}

impl Default for NearMissThresholds {
    fn default() -> Self {
        Self {
            head_pct: 5.0,
            efficiency_points: 5.0,
            npsh_margin_m: 1.0,
        }
    }
}

impl EngineConfig {
    /// Default configuration with the trim floor overridden.
    pub fn with_trim_floor(mut self, min_trim_percent: f64) -> Self {
        self.trim.min_trim_percent = min_trim_percent;
        self
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> EngineResult<()> {
        let i = &self.interpolation;
        non_negative("interpolation.direct_extrapolation", i.direct_extrapolation)?;
        non_negative("interpolation.legacy_extrapolation", i.legacy_extrapolation)?;

        let t = &self.trim;
        positive("trim.min_trim_percent", t.min_trim_percent)?;
        if t.min_trim_percent > t.max_trim_percent || t.max_trim_percent > 100.0 {
            return Err(invalid(format!(
                "trim limits must satisfy 0 < min ({}) <= max ({}) <= 100",
                t.min_trim_percent, t.max_trim_percent
            )));
        }
        non_negative("trim.efficiency_penalty_per_pct", t.efficiency_penalty_per_pct)?;

        let s = &self.speed;
        positive("speed.hard_limit_pct", s.hard_limit_pct)?;
        non_negative("speed.preferred_limit_pct", s.preferred_limit_pct)?;
        if s.preferred_limit_pct > s.hard_limit_pct {
            return Err(invalid(format!(
                "speed.preferred_limit_pct ({}) exceeds speed.hard_limit_pct ({})",
                s.preferred_limit_pct, s.hard_limit_pct
            )));
        }
        if s.hard_limit_pct >= 100.0 {
            return Err(invalid("speed.hard_limit_pct must be below 100".to_string()));
        }
        non_negative("speed.flow_deviation_weight", s.flow_deviation_weight)?;
        non_negative("speed.speed_change_weight", s.speed_change_weight)?;

        let v = &self.validation;
        non_negative("validation.head_tolerance_pct", v.head_tolerance_pct)?;
        non_negative("validation.min_efficiency_pct", v.min_efficiency_pct)?;
        positive("validation.combined_min_trim_percent", v.combined_min_trim_percent)?;
        positive(
            "validation.combined_max_speed_variation_pct",
            v.combined_max_speed_variation_pct,
        )?;

        let n = &self.near_miss;
        non_negative("near_miss.head_pct", n.head_pct)?;
        non_negative("near_miss.efficiency_points", n.efficiency_points)?;
        non_negative("near_miss.npsh_margin_m", n.npsh_margin_m)?;

        non_negative("direct_head_window_pct", self.direct_head_window_pct)?;
        positive("specific_gravity", self.specific_gravity)?;
        Ok(())
    }
}

fn invalid(what: String) -> EngineError {
    EngineError::InvalidConfig { what }
}

fn positive(what: &str, v: f64) -> EngineResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{what} must be positive (got {v})")))
    }
}

fn non_negative(what: &str, v: f64) -> EngineResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{what} must be non-negative (got {v})")))
    }
}
