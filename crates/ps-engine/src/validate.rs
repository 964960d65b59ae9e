//! Physical feasibility gate, applied to the chosen solution before scoring.
//!
//! Every check runs; reasons accumulate.

use crate::config::EngineConfig;
use crate::duty::DutyPoint;
use crate::exclusion::ExclusionReason;
use crate::solution::{Modification, Solution};
use ps_catalog::PumpModel;
use ps_core::{at_least, at_most};
use serde::Serialize;
use std::collections::BTreeSet;

/// Outcome of [`validate`]. Feasible iff `reasons` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Validation {
    pub feasible: bool,
    pub reasons: BTreeSet<ExclusionReason>,
}

impl Validation {
    fn from_reasons(reasons: BTreeSet<ExclusionReason>) -> Self {
        Self {
            feasible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Check `solution` against the physical limits of `pump`.
///
/// `npsh_available_m` enables the NPSH rule; an unknown NPSHr never fails it.
/// The hard speed ceiling applies to pure speed changes; a combined trim and
/// speed change is held to the combined limits instead.
pub fn validate(
    pump: &PumpModel,
    solution: &Solution,
    duty: &DutyPoint,
    npsh_available_m: Option<f64>,
    config: &EngineConfig,
) -> Validation {
    let mut reasons = BTreeSet::new();
    let specs = &pump.specifications;

    if let Some(trim) = solution.trim() {
        if !at_least(trim.trim_percent, config.trim.min_trim_percent)
            || specs
                .min_impeller_mm
                .is_some_and(|min| !at_least(trim.trimmed_diameter_mm, min))
        {
            reasons.insert(ExclusionReason::Undertrim);
        }
        if !at_most(trim.trim_percent, config.trim.max_trim_percent)
            || specs
                .max_impeller_mm
                .is_some_and(|max| !at_most(trim.trimmed_diameter_mm, max))
        {
            reasons.insert(ExclusionReason::Overtrim);
        }
    }

    if let Some(speed) = solution.speed() {
        if specs
            .min_speed_rpm
            .is_some_and(|min| !at_least(speed.required_speed_rpm, min))
        {
            reasons.insert(ExclusionReason::Underspeed);
        }
        if specs
            .max_speed_rpm
            .is_some_and(|max| !at_most(speed.required_speed_rpm, max))
        {
            reasons.insert(ExclusionReason::Overspeed);
        }
        if let Modification::Speed(_) = solution.modification {
            let hard = config.speed.hard_limit_pct;
            if !at_most(speed.speed_variation_pct, hard) {
                reasons.insert(ExclusionReason::Overspeed);
            }
            if !at_least(speed.speed_variation_pct, -hard) {
                reasons.insert(ExclusionReason::Underspeed);
            }
        }
    }

    if let Modification::Combined { trim, speed } = solution.modification {
        let v = &config.validation;
        if !at_least(trim.trim_percent, v.combined_min_trim_percent)
            || !at_most(speed.speed_variation_pct.abs(), v.combined_max_speed_variation_pct)
        {
            reasons.insert(ExclusionReason::CombinedLimitsExceeded);
        }
    }

    let head = solution.achieved_head_m;
    let eff = solution.efficiency_pct;
    if !head.is_finite() || !eff.is_finite() || head == 0.0 || eff == 0.0 {
        reasons.insert(ExclusionReason::NoPerformanceData);
    }
    let min_head = duty.head_m() * (1.0 - config.validation.head_tolerance_pct / 100.0);
    if head.is_finite() && !at_least(head, min_head) {
        reasons.insert(ExclusionReason::HeadNotMet);
    }
    if eff.is_finite() && !at_least(eff, config.validation.min_efficiency_pct) {
        reasons.insert(ExclusionReason::EfficiencyTooLow);
    }

    if let (Some(npsha), Some(npshr)) = (npsh_available_m, solution.npshr_m) {
        if npshr >= npsha {
            reasons.insert(ExclusionReason::NpshInsufficient);
        }
    }

    Validation::from_reasons(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{SpeedAdjustment, TrimAdjustment};
    use ps_catalog::PumpSpecifications;

    fn pump() -> PumpModel {
        PumpModel::new("P", vec![])
    }

    fn duty() -> DutyPoint {
        DutyPoint::new(200.0, 35.0).unwrap()
    }

    fn solution(modification: Modification) -> Solution {
        Solution {
            modification,
            curve_index: 0,
            curve_diameter_mm: 250.0,
            achieved_flow_m3hr: 200.0,
            achieved_head_m: 35.0,
            efficiency_pct: 78.0,
            power_kw: 24.45,
            npshr_m: Some(3.0),
        }
    }

    fn trimmed(pct: f64) -> Solution {
        solution(Modification::Trim(TrimAdjustment::from_ratio(250.0, pct / 100.0)))
    }

    #[test]
    fn plain_direct_match_passes() {
        let v = validate(&pump(), &solution(Modification::Direct), &duty(), None, &EngineConfig::default());
        assert!(v.feasible);
        assert!(v.reasons.is_empty());
    }

    #[test]
    fn trim_floor_is_inclusive() {
        let cfg = EngineConfig::default();
        assert!(validate(&pump(), &trimmed(85.0), &duty(), None, &cfg).feasible);
        let v = validate(&pump(), &trimmed(84.9), &duty(), None, &cfg);
        assert_eq!(v.reasons, BTreeSet::from([ExclusionReason::Undertrim]));
    }

    #[test]
    fn trim_respects_declared_impeller_range() {
        let cfg = EngineConfig::default();
        let p = pump().with_specifications(PumpSpecifications::default().with_impeller_range(220.0, 240.0));
        let v = validate(&p, &trimmed(86.0), &duty(), None, &cfg);
        assert!(v.reasons.contains(&ExclusionReason::Undertrim));
        let v = validate(&p, &trimmed(100.0), &duty(), None, &cfg);
        assert!(v.reasons.contains(&ExclusionReason::Overtrim));
    }

    #[test]
    fn reasons_accumulate() {
        let cfg = EngineConfig::default();
        let mut s = trimmed(80.0);
        s.achieved_head_m = 30.0;
        s.efficiency_pct = 38.0;
        let v = validate(&pump(), &s, &duty(), None, &cfg);
        assert!(!v.feasible);
        assert_eq!(
            v.reasons,
            BTreeSet::from([
                ExclusionReason::Undertrim,
                ExclusionReason::HeadNotMet,
                ExclusionReason::EfficiencyTooLow,
            ])
        );
    }

    #[test]
    fn head_tolerance_is_two_percent() {
        let cfg = EngineConfig::default();
        let mut s = solution(Modification::Direct);
        s.achieved_head_m = 34.3;
        assert!(validate(&pump(), &s, &duty(), None, &cfg).feasible);
        s.achieved_head_m = 34.2;
        assert!(!validate(&pump(), &s, &duty(), None, &cfg).feasible);
    }

    #[test]
    fn zero_efficiency_is_no_data() {
        let mut s = solution(Modification::Direct);
        s.efficiency_pct = 0.0;
        let v = validate(&pump(), &s, &duty(), None, &EngineConfig::default());
        assert!(v.reasons.contains(&ExclusionReason::NoPerformanceData));
    }

    #[test]
    fn speed_range_is_inclusive() {
        let cfg = EngineConfig::default();
        let p = pump().with_specifications(
            PumpSpecifications::default()
                .with_test_speed(1450.0)
                .with_speed_range(1200.0, 1600.0),
        );
        let at_max = solution(Modification::Speed(SpeedAdjustment::from_speed(1450.0, 1600.0)));
        assert!(validate(&p, &at_max, &duty(), None, &cfg).feasible);
        let above = solution(Modification::Speed(SpeedAdjustment::from_speed(1450.0, 1601.0)));
        let v = validate(&p, &above, &duty(), None, &cfg);
        assert_eq!(v.reasons, BTreeSet::from([ExclusionReason::Overspeed]));
    }

    #[test]
    fn speed_hard_limit() {
        let cfg = EngineConfig::default();
        let s = solution(Modification::Speed(SpeedAdjustment::from_speed(1450.0, 1100.0)));
        let v = validate(&pump(), &s, &duty(), None, &cfg);
        assert!(v.reasons.contains(&ExclusionReason::Underspeed));
    }

    #[test]
    fn combined_limits() {
        let cfg = EngineConfig::default();
        let ok = solution(Modification::Combined {
            trim: TrimAdjustment::from_ratio(250.0, 0.9),
            speed: SpeedAdjustment::from_speed(1450.0, 1740.0),
        });
        assert!(validate(&pump(), &ok, &duty(), None, &cfg).feasible);

        let too_fast = solution(Modification::Combined {
            trim: TrimAdjustment::from_ratio(250.0, 0.9),
            speed: SpeedAdjustment::from_speed(1450.0, 1900.0),
        });
        let v = validate(&pump(), &too_fast, &duty(), None, &cfg);
        assert_eq!(v.reasons, BTreeSet::from([ExclusionReason::CombinedLimitsExceeded]));
    }

    #[test]
    fn combined_trim_floor_holds_with_extended_limits() {
        let cfg = EngineConfig::default().with_trim_floor(75.0);
        let s = solution(Modification::Combined {
            trim: TrimAdjustment::from_ratio(250.0, 0.8),
            speed: SpeedAdjustment::from_speed(1450.0, 1500.0),
        });
        let v = validate(&pump(), &s, &duty(), None, &cfg);
        assert_eq!(v.reasons, BTreeSet::from([ExclusionReason::CombinedLimitsExceeded]));
    }

    #[test]
    fn npsh_rule() {
        let cfg = EngineConfig::default();
        let s = solution(Modification::Direct);
        assert!(validate(&pump(), &s, &duty(), Some(3.5), &cfg).feasible);
        let v = validate(&pump(), &s, &duty(), Some(3.0), &cfg);
        assert_eq!(v.reasons, BTreeSet::from([ExclusionReason::NpshInsufficient]));

        let mut unknown = s;
        unknown.npshr_m = None;
        assert!(validate(&pump(), &unknown, &duty(), Some(0.5), &cfg).feasible);
    }
}
