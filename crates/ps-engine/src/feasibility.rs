//! Per-pump search for the best way to meet a duty point.
//!
//! Every curve is tried with each method in priority order: direct match,
//! impeller trim, speed variation. All accepted candidates are collected and
//! the best one is picked by a light pre-score; the full score is computed
//! later, and only for that one.

use crate::affinity::{CurveRef, lookup_reason, try_speed, try_trim};
use crate::config::EngineConfig;
use crate::duty::DutyPoint;
use crate::exclusion::ExclusionReason;
use crate::interpolate::{CurveInterpolator, OperatingValues};
use crate::solution::{Modification, Solution};
use ps_catalog::PumpModel;
use ps_core::{at_least, at_most};
use std::collections::BTreeSet;
use tracing::debug;

/// Everything learned while solving one pump.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub best: Option<Solution>,
    /// Number of accepted candidates across curves and methods.
    pub candidates: usize,
    /// Why individual attempts were rejected.
    pub rejections: BTreeSet<ExclusionReason>,
    /// Highest head any curve delivers at the duty flow (wide window), for
    /// near-miss reporting.
    pub closest: Option<OperatingValues>,
}

impl SolveOutcome {
    /// Reasons to report when no candidate was accepted. Never empty.
    pub fn exclusion_reasons(&self, pump: &PumpModel) -> BTreeSet<ExclusionReason> {
        if pump.curves.is_empty() {
            return BTreeSet::from([ExclusionReason::NoPerformanceData]);
        }
        if self.rejections.is_empty() {
            return BTreeSet::from([ExclusionReason::EnvelopeExceeded]);
        }
        self.rejections.clone()
    }
}

/// Priority of a candidate before full scoring. Higher is better.
///
/// Direct matches inside the head window rank first, then trims, then speed
/// changes, then oversized ("throttled") direct matches; within a rank,
/// higher efficiency wins.
pub fn pre_score(solution: &Solution, duty: &DutyPoint, config: &EngineConfig) -> f64 {
    let rank = match solution.modification {
        Modification::Direct => {
            if at_most(duty.head_margin_pct(solution.achieved_head_m), config.direct_head_window_pct) {
                3.0
            } else {
                0.0
            }
        }
        Modification::Trim(_) => 2.0,
        Modification::Speed(_) => 1.0,
        Modification::Combined { .. } => 0.0,
    };
    rank * 1000.0 + solution.efficiency_pct
}

/// Best solution for `pump` at `duty`, if any.
pub fn solve(pump: &PumpModel, duty: &DutyPoint, config: &EngineConfig) -> Option<Solution> {
    solve_detailed(pump, duty, config).best
}

/// [`solve`] plus the rejection diagnostics of every attempt.
pub fn solve_detailed(pump: &PumpModel, duty: &DutyPoint, config: &EngineConfig) -> SolveOutcome {
    let direct = CurveInterpolator::direct(config);
    let legacy = CurveInterpolator::legacy(config);
    let min_head = duty.head_m() * (1.0 - config.validation.head_tolerance_pct / 100.0);

    let mut rejections = BTreeSet::new();
    let mut accepted: Vec<Solution> = Vec::new();
    let mut throttled: Vec<Solution> = Vec::new();
    let mut closest: Option<OperatingValues> = None;

    for cref in CurveRef::all(pump) {
        if let Ok(at) = legacy.at(cref.curve, duty.flow_m3hr()) {
            if closest.is_none_or(|c| at.head_m > c.head_m) {
                closest = Some(at);
            }
        }

        let mut oversized = None;
        match direct.at(cref.curve, duty.flow_m3hr()) {
            Ok(at) if at_least(at.head_m, min_head) => {
                let solution = Solution {
                    modification: Modification::Direct,
                    curve_index: cref.index,
                    curve_diameter_mm: cref.curve.impeller_diameter_mm(),
                    achieved_flow_m3hr: duty.flow_m3hr(),
                    achieved_head_m: at.head_m,
                    efficiency_pct: at.efficiency_pct,
                    power_kw: at.power_kw,
                    npshr_m: at.npshr_m,
                };
                if at_most(duty.head_margin_pct(at.head_m), config.direct_head_window_pct) {
                    accepted.push(solution);
                } else {
                    oversized = Some(solution);
                }
            }
            Ok(_) => {
                rejections.insert(ExclusionReason::HeadNotMet);
            }
            Err(err) => {
                rejections.insert(lookup_reason(&err));
            }
        }

        let mut modified = false;
        for attempt in [try_trim(cref, duty, config), try_speed(cref, duty, config)] {
            match attempt {
                Ok(solution) => {
                    modified = true;
                    accepted.push(solution);
                }
                Err(rejection) => {
                    if let Some(reason) = rejection.reason {
                        rejections.insert(reason);
                    }
                }
            }
        }

        if let Some(solution) = oversized {
            if modified {
                accepted.push(solution);
            } else {
                throttled.push(solution);
            }
        }
    }

    // Oversized direct matches only count once nothing else worked.
    if accepted.is_empty() {
        accepted = throttled;
    }

    let candidates = accepted.len();
    let mut best: Option<(f64, Solution)> = None;
    for solution in accepted {
        let s = pre_score(&solution, duty, config);
        if best.as_ref().is_none_or(|(b, _)| s > *b) {
            best = Some((s, solution));
        }
    }
    let best = best.map(|(_, s)| s);

    match &best {
        Some(s) => debug!(
            pump_code = %pump.pump_code,
            method = s.method().as_str(),
            curve = s.curve_index,
            efficiency_pct = s.efficiency_pct,
            candidates,
            "selected candidate"
        ),
        None => debug!(
            pump_code = %pump.pump_code,
            rejections = ?rejections,
            "no acceptable candidate"
        ),
    }

    SolveOutcome {
        best,
        candidates,
        rejections,
        closest,
    }
}
