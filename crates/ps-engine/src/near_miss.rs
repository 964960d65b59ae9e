//! Excluded pumps that came close, with engineering guidance.

use crate::config::EngineConfig;
use crate::duty::DutyPoint;
use crate::interpolate::OperatingValues;
use crate::solution::Solution;
use serde::Serialize;

/// Threshold a near-miss pump came close to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearMissCriterion {
    Head,
    Efficiency,
    Npsh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearMiss {
    pub pump_code: String,
    pub criteria: Vec<NearMissCriterion>,
    /// One line per criterion, same order.
    pub guidance: Vec<String>,
}

/// Head, efficiency and NPSHr an excluded pump actually reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observed {
    pub head_m: f64,
    pub efficiency_pct: f64,
    pub npshr_m: Option<f64>,
}

impl From<&Solution> for Observed {
    fn from(s: &Solution) -> Self {
        Self {
            head_m: s.achieved_head_m,
            efficiency_pct: s.efficiency_pct,
            npshr_m: s.npshr_m,
        }
    }
}

impl From<&OperatingValues> for Observed {
    fn from(v: &OperatingValues) -> Self {
        Self {
            head_m: v.head_m,
            efficiency_pct: v.efficiency_pct,
            npshr_m: v.npshr_m,
        }
    }
}

/// Near-miss report for an excluded pump, or `None` if it was not close on
/// any criterion.
///
/// - head: short of the duty by at most `near_miss.head_pct` percent
/// - efficiency: below the floor by at most `near_miss.efficiency_points`
/// - NPSH: NPSHr at or above NPSHa by at most `near_miss.npsh_margin_m`
pub fn detect(
    pump_code: &str,
    duty: &DutyPoint,
    observed: Observed,
    npsh_available_m: Option<f64>,
    config: &EngineConfig,
) -> Option<NearMiss> {
    let t = &config.near_miss;
    let mut criteria = Vec::new();
    let mut guidance = Vec::new();

    let shortfall_pct = -duty.head_margin_pct(observed.head_m);
    if shortfall_pct > 0.0 && shortfall_pct <= t.head_pct {
        criteria.push(NearMissCriterion::Head);
        guidance.push(format!(
            "delivers {:.1} m against {:.1} m required ({:.1}% short); a larger impeller or a slightly higher speed would close the gap",
            observed.head_m,
            duty.head_m(),
            shortfall_pct
        ));
    }

    let floor = config.validation.min_efficiency_pct;
    let deficit = floor - observed.efficiency_pct;
    if deficit > 0.0 && deficit <= t.efficiency_points {
        criteria.push(NearMissCriterion::Efficiency);
        guidance.push(format!(
            "efficiency {:.1}% is {:.1} points under the {:.0}% floor; acceptable if energy cost is secondary",
            observed.efficiency_pct, deficit, floor
        ));
    }

    if let (Some(npsha), Some(npshr)) = (npsh_available_m, observed.npshr_m) {
        let excess = npshr - npsha;
        if excess >= 0.0 && excess <= t.npsh_margin_m {
            criteria.push(NearMissCriterion::Npsh);
            guidance.push(format!(
                "NPSHr {:.2} m vs NPSHa {:.2} m; raising suction head by more than {:.2} m removes the cavitation risk",
                npshr, npsha, excess
            ));
        }
    }

    if criteria.is_empty() {
        None
    } else {
        Some(NearMiss {
            pump_code: pump_code.to_owned(),
            criteria,
            guidance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(head_m: f64, efficiency_pct: f64, npshr_m: Option<f64>) -> Observed {
        Observed {
            head_m,
            efficiency_pct,
            npshr_m,
        }
    }

    fn duty() -> DutyPoint {
        DutyPoint::new(200.0, 40.0).unwrap()
    }

    #[test]
    fn head_within_five_percent() {
        let cfg = EngineConfig::default();
        let nm = detect("P", &duty(), observed(38.6, 70.0, None), None, &cfg).unwrap();
        assert_eq!(nm.criteria, vec![NearMissCriterion::Head]);
        assert_eq!(nm.guidance.len(), 1);
        assert!(nm.guidance[0].contains("3.5% short"));

        assert!(detect("P", &duty(), observed(37.9, 70.0, None), None, &cfg).is_none());
        assert!(detect("P", &duty(), observed(41.0, 70.0, None), None, &cfg).is_none());
    }

    #[test]
    fn efficiency_within_five_points() {
        let cfg = EngineConfig::default();
        let nm = detect("P", &duty(), observed(45.0, 36.0, None), None, &cfg).unwrap();
        assert_eq!(nm.criteria, vec![NearMissCriterion::Efficiency]);
        assert!(detect("P", &duty(), observed(45.0, 34.0, None), None, &cfg).is_none());
    }

    #[test]
    fn npsh_within_one_metre() {
        let cfg = EngineConfig::default();
        let nm = detect("P", &duty(), observed(45.0, 70.0, Some(4.5)), Some(4.0), &cfg).unwrap();
        assert_eq!(nm.criteria, vec![NearMissCriterion::Npsh]);
        assert!(detect("P", &duty(), observed(45.0, 70.0, Some(5.5)), Some(4.0), &cfg).is_none());
        assert!(detect("P", &duty(), observed(45.0, 70.0, Some(4.5)), None, &cfg).is_none());
    }

    #[test]
    fn several_criteria() {
        let cfg = EngineConfig::default();
        let nm = detect("P", &duty(), observed(39.0, 38.0, Some(3.2)), Some(3.0), &cfg).unwrap();
        assert_eq!(
            nm.criteria,
            vec![
                NearMissCriterion::Head,
                NearMissCriterion::Efficiency,
                NearMissCriterion::Npsh
            ]
        );
        assert_eq!(nm.guidance.len(), 3);
    }
}
