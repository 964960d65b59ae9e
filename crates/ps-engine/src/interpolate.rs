//! Curve interpolation.
//!
//! Evaluates a single curve at an arbitrary flow. Head, efficiency, tabulated
//! power and NPSHr are piecewise linear in flow. Extrapolation past the
//! measured range is limited to a fraction of the curve's flow span; beyond
//! it the lookup fails rather than returning a clamped value.

use crate::config::EngineConfig;
use ps_catalog::PerformanceCurve;
use ps_core::{PsError, piecewise_linear, shaft_power_kw};
use serde::Serialize;
use thiserror::Error;

/// Curve values at one flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingValues {
    pub flow_m3hr: f64,
    pub head_m: f64,
    pub efficiency_pct: f64,
    pub power_kw: f64,
    /// `None` when the curve has no complete NPSH data.
    pub npshr_m: Option<f64>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolationError {
    #[error("flow {flow} m3/h is outside the curve envelope [{min:.1}, {max:.1}]")]
    OutOfEnvelope { flow: f64, min: f64, max: f64 },

    #[error("interpolated {what} is not physical ({value})")]
    NonPhysical { what: &'static str, value: f64 },

    #[error("degenerate curve data: {0}")]
    Degenerate(PsError),
}

impl From<PsError> for InterpolationError {
    fn from(err: PsError) -> Self {
        match err {
            PsError::OutOfRange { value, min, max, .. } => Self::OutOfEnvelope {
                flow: value,
                min,
                max,
            },
            other => Self::Degenerate(other),
        }
    }
}

/// Interpolator with a fixed extrapolation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveInterpolator {
    /// Extrapolation allowance as a fraction of the curve's flow span.
    pub window: f64,
    pub specific_gravity: f64,
}

impl CurveInterpolator {
    pub fn new(window: f64, specific_gravity: f64) -> Self {
        Self {
            window,
            specific_gravity,
        }
    }

    /// Window used for direct matching and trim (±10 % by default).
    pub fn direct(config: &EngineConfig) -> Self {
        Self::new(
            config.interpolation.direct_extrapolation,
            config.specific_gravity,
        )
    }

    /// Wider window used for fallback lookups (±20 % by default).
    pub fn legacy(config: &EngineConfig) -> Self {
        Self::new(
            config.interpolation.legacy_extrapolation,
            config.specific_gravity,
        )
    }

    /// Flow range this interpolator accepts for `curve`.
    pub fn envelope(&self, curve: &PerformanceCurve) -> (f64, f64) {
        let (lo, hi) = curve.flow_range();
        let pad = curve.flow_span() * self.window;
        (lo - pad, hi + pad)
    }

    pub fn covers(&self, curve: &PerformanceCurve, flow_m3hr: f64) -> bool {
        let (lo, hi) = self.envelope(curve);
        ps_core::at_least(flow_m3hr, lo) && ps_core::at_most(flow_m3hr, hi)
    }

    /// Evaluate `curve` at `flow_m3hr`.
    ///
    /// Power comes from the curve when every point tabulates it, otherwise
    /// from the hydraulic relation with the interpolated head and efficiency.
    ///
    /// # Errors
    /// The flow lies outside the window, the data are degenerate, or the
    /// result is not physical (non-positive head, negative power).
    pub fn at(
        &self,
        curve: &PerformanceCurve,
        flow_m3hr: f64,
    ) -> Result<OperatingValues, InterpolationError> {
        let flows = curve.flows();
        let head_m = piecewise_linear(flows, curve.heads(), flow_m3hr, self.window)?;
        if head_m <= 0.0 {
            return Err(InterpolationError::NonPhysical {
                what: "head",
                value: head_m,
            });
        }

        // Extrapolated efficiency can leave [0, 100]; a value <= 0 yields zero power.
        let efficiency_pct =
            piecewise_linear(flows, curve.efficiencies(), flow_m3hr, self.window)?.clamp(0.0, 100.0);

        let power_kw = match curve.tabulated_power() {
            Some(powers) => piecewise_linear(flows, powers, flow_m3hr, self.window)?,
            None => shaft_power_kw(flow_m3hr, head_m, self.specific_gravity, efficiency_pct),
        };
        if !power_kw.is_finite() || power_kw < 0.0 {
            return Err(InterpolationError::NonPhysical {
                what: "power",
                value: power_kw,
            });
        }

        let npshr_m = match curve.npshr() {
            Some(npshr) => {
                Some(piecewise_linear(flows, npshr, flow_m3hr, self.window)?).filter(|v| *v > 0.0)
            }
            None => None,
        };

        Ok(OperatingValues {
            flow_m3hr,
            head_m,
            efficiency_pct,
            power_kw,
            npshr_m,
        })
    }
}

/// [`CurveInterpolator::at`] with the direct-match window of `config`.
pub fn interpolate(
    curve: &PerformanceCurve,
    flow_m3hr: f64,
    config: &EngineConfig,
) -> Result<OperatingValues, InterpolationError> {
    CurveInterpolator::direct(config).at(curve, flow_m3hr)
}
