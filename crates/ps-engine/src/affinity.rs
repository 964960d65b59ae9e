//! Affinity-law scaling: impeller trim and speed variation.
//!
//! ```text
//! Q2 = Q1 * r      H2 = H1 * r^2      P2 = P1 * r^3
//! ```
//!
//! with `r = D2/D1` for trimming at fixed speed and `r = N2/N1` for speed
//! variation at fixed diameter. Nothing here mutates a catalog curve: every
//! function returns a new [`Solution`] or [`PerformanceCurve`].

use crate::config::EngineConfig;
use crate::duty::DutyPoint;
use crate::error::{EngineError, EngineResult};
use crate::exclusion::ExclusionReason;
use crate::interpolate::{CurveInterpolator, InterpolationError};
use crate::solution::{Method, Modification, Solution, SpeedAdjustment, TrimAdjustment};
use ps_catalog::{PerformanceCurve, PerformancePoint, PumpModel};
use ps_core::{at_least, at_most, shaft_power_kw};
use tracing::trace;

/// A curve together with the pump that owns it.
#[derive(Debug, Clone, Copy)]
pub struct CurveRef<'a> {
    pub pump: &'a PumpModel,
    pub index: usize,
    pub curve: &'a PerformanceCurve,
}

impl<'a> CurveRef<'a> {
    pub fn new(pump: &'a PumpModel, index: usize) -> Option<Self> {
        pump.curves
            .get(index)
            .map(|curve| Self { pump, index, curve })
    }

    /// Every curve of `pump`, in catalog order.
    pub fn all(pump: &'a PumpModel) -> impl Iterator<Item = CurveRef<'a>> + 'a {
        pump.curves
            .iter()
            .enumerate()
            .map(move |(index, curve)| Self { pump, index, curve })
    }
}

/// Why a modification method could not produce a solution.
///
/// `reason` is `None` when the method simply does not apply (a pump with no
/// declared test speed cannot be evaluated for speed variation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub method: Method,
    pub reason: Option<ExclusionReason>,
}

impl Rejection {
    fn new(method: Method, reason: ExclusionReason) -> Self {
        Self {
            method,
            reason: Some(reason),
        }
    }

    fn not_applicable(method: Method) -> Self {
        Self {
            method,
            reason: None,
        }
    }
}

/// Map a failed lookup at the duty flow onto an exclusion reason.
pub(crate) fn lookup_reason(err: &InterpolationError) -> ExclusionReason {
    match err {
        InterpolationError::OutOfEnvelope { .. } => ExclusionReason::FlowOutOfRange,
        InterpolationError::NonPhysical { .. } | InterpolationError::Degenerate(_) => {
            ExclusionReason::NoPerformanceData
        }
    }
}

fn check_ratio(ratio: f64, what: &str) -> EngineResult<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidArg {
            what: format!("{what} ratio must be finite and positive (got {ratio})"),
        })
    }
}

fn scale_points(curve: &PerformanceCurve, r: f64) -> Vec<PerformancePoint> {
    curve
        .points()
        .iter()
        .map(|p| PerformancePoint {
            flow_m3hr: p.flow_m3hr * r,
            head_m: p.head_m * r * r,
            efficiency_pct: p.efficiency_pct,
            power_kw: p.power_kw.map(|v| v * r * r * r),
            npshr_m: p.npshr_m.map(|v| v * r * r),
        })
        .collect()
}

/// Curve of the same impeller trimmed to `ratio` of its diameter.
pub fn scale_curve_by_diameter(curve: &PerformanceCurve, ratio: f64) -> EngineResult<PerformanceCurve> {
    check_ratio(ratio, "diameter")?;
    let points = scale_points(curve, ratio);
    Ok(PerformanceCurve::new(
        curve.impeller_diameter_mm() * ratio,
        points,
    )?)
}

/// Curve of the same impeller run at `ratio` times the test speed.
pub fn scale_curve_by_speed(curve: &PerformanceCurve, ratio: f64) -> EngineResult<PerformanceCurve> {
    check_ratio(ratio, "speed")?;
    let points = scale_points(curve, ratio);
    Ok(PerformanceCurve::new(curve.impeller_diameter_mm(), points)?)
}

/// Trim the impeller so the curve passes through the duty point.
///
/// Uses the head `H1` at the duty flow: trimming can only lower head, so
/// `H1 < duty head` is rejected. Otherwise `D2 = D1 * sqrt(H / H1)`, and
/// efficiency loses `efficiency_penalty_per_pct` points per percent removed.
/// The returned flow and head are exactly the duty values.
pub fn try_trim(
    cref: CurveRef<'_>,
    duty: &DutyPoint,
    config: &EngineConfig,
) -> Result<Solution, Rejection> {
    let limits = &config.trim;
    let at = CurveInterpolator::direct(config)
        .at(cref.curve, duty.flow_m3hr())
        .map_err(|e| Rejection::new(Method::Trim, lookup_reason(&e)))?;

    if at.head_m < duty.head_m() {
        return Err(Rejection::new(Method::Trim, ExclusionReason::HeadNotMet));
    }

    let ratio = (duty.head_m() / at.head_m).sqrt();
    let trim = TrimAdjustment::from_ratio(cref.curve.impeller_diameter_mm(), ratio);

    if !at_least(trim.trim_percent, limits.min_trim_percent) {
        return Err(Rejection::new(Method::Trim, ExclusionReason::Undertrim));
    }
    if !at_most(trim.trim_percent, limits.max_trim_percent) {
        return Err(Rejection::new(Method::Trim, ExclusionReason::Overtrim));
    }
    let specs = &cref.pump.specifications;
    if specs
        .min_impeller_mm
        .is_some_and(|min| !at_least(trim.trimmed_diameter_mm, min))
    {
        return Err(Rejection::new(Method::Trim, ExclusionReason::Undertrim));
    }

    let efficiency_pct = (at.efficiency_pct
        - limits.efficiency_penalty_per_pct * (100.0 - trim.trim_percent))
        .max(0.0);
    let power_kw = shaft_power_kw(
        duty.flow_m3hr(),
        duty.head_m(),
        config.specific_gravity,
        efficiency_pct,
    );

    trace!(
        pump_code = %cref.pump.pump_code,
        curve = cref.index,
        trim_percent = trim.trim_percent,
        "trim solution"
    );

    Ok(Solution {
        modification: Modification::Trim(trim),
        curve_index: cref.index,
        curve_diameter_mm: cref.curve.impeller_diameter_mm(),
        achieved_flow_m3hr: duty.flow_m3hr(),
        achieved_head_m: duty.head_m(),
        efficiency_pct,
        power_kw,
        npshr_m: at.npshr_m,
    })
}

/// [`try_trim`] without the rejection detail.
pub fn solve_trim(cref: CurveRef<'_>, duty: &DutyPoint, config: &EngineConfig) -> Option<Solution> {
    try_trim(cref, duty, config).ok()
}

/// Curve point whose affinity projection best reaches the duty.
///
/// Each point is projected along its affinity parabola to the duty head; the
/// cost weighs the resulting flow deviation against the size of the speed
/// change. Returns the point index and its speed ratio.
fn seed_speed_ratio(curve: &PerformanceCurve, duty: &DutyPoint, config: &EngineConfig) -> Option<(usize, f64)> {
    let limits = &config.speed;
    let mut best: Option<(usize, f64, f64)> = None;

    for (i, p) in curve.points().iter().enumerate() {
        if p.head_m <= 0.0 || p.flow_m3hr <= 0.0 {
            continue;
        }
        let n = (duty.head_m() / p.head_m).sqrt();
        let flow_dev = (p.flow_m3hr * n - duty.flow_m3hr()).abs() / duty.flow_m3hr();
        let cost = limits.flow_deviation_weight * flow_dev + limits.speed_change_weight * (n - 1.0).abs();
        if !cost.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, _, c)| cost < c) {
            best = Some((i, n, cost));
        }
    }

    best.map(|(i, n, _)| (i, n))
}

/// Speed ratio `n` with `n^2 * H(Q/n) = H`, found by bisection.
///
/// The bracket spans twice the hard speed limit so a required speed beyond
/// the limit is still located (and then rejected with the right reason).
/// When several roots exist, the one nearest `seed` wins.
fn refine_speed_ratio(
    curve: &PerformanceCurve,
    duty: &DutyPoint,
    seed: f64,
    interp: &CurveInterpolator,
    config: &EngineConfig,
) -> Option<f64> {
    const GRID: usize = 80;

    let span = 2.0 * config.speed.hard_limit_pct / 100.0;
    let lo = (1.0 - span).max(0.05);
    let hi = 1.0 + span;

    let residual = |n: f64| {
        interp
            .at(curve, duty.flow_m3hr() / n)
            .ok()
            .map(|at| n * n * at.head_m - duty.head_m())
    };

    let step = (hi - lo) / GRID as f64;
    let mut bracket: Option<(f64, f64, f64)> = None;
    let mut prev: Option<(f64, f64)> = None;

    for k in 0..=GRID {
        let n = lo + step * k as f64;
        let Some(r) = residual(n) else {
            prev = None;
            continue;
        };
        if r == 0.0 {
            return Some(n);
        }
        if let Some((n0, r0)) = prev {
            if r0.signum() != r.signum() {
                let mid = 0.5 * (n0 + n);
                if bracket.is_none_or(|(a, b, _)| (mid - seed).abs() < (0.5 * (a + b) - seed).abs()) {
                    bracket = Some((n0, n, r0));
                }
            }
        }
        prev = Some((n, r));
    }

    let (mut a, mut b, mut ra) = bracket?;
    for _ in 0..config.speed.refine_iterations {
        let m = 0.5 * (a + b);
        let rm = residual(m)?;
        if rm == 0.0 {
            return Some(m);
        }
        if rm.signum() == ra.signum() {
            a = m;
            ra = rm;
        } else {
            b = m;
        }
    }
    Some(0.5 * (a + b))
}

/// Run the impeller at a different speed so its curve passes through the
/// duty point.
///
/// A point search over the curve seeds the speed ratio; bisection on the
/// affinity-scaled curve then refines it so flow and head match the duty.
/// If refinement finds no root, the seed point's own projection is used.
/// Required speed is rejected outside the declared speed range and when the
/// relative change exceeds the hard limit.
pub fn try_speed(
    cref: CurveRef<'_>,
    duty: &DutyPoint,
    config: &EngineConfig,
) -> Result<Solution, Rejection> {
    let specs = &cref.pump.specifications;
    let Some(test_speed_rpm) = specs.test_speed_rpm.filter(|s| s.is_finite() && *s > 0.0) else {
        return Err(Rejection::not_applicable(Method::Speed));
    };

    let curve = cref.curve;
    let Some((seed_index, seed_ratio)) = seed_speed_ratio(curve, duty, config) else {
        return Err(Rejection::new(Method::Speed, ExclusionReason::NoPerformanceData));
    };

    let interp = CurveInterpolator::legacy(config);
    let (ratio, flow_m3hr, head_m, efficiency_pct, power_kw, npshr_m) =
        match refine_speed_ratio(curve, duty, seed_ratio, &interp, config) {
            Some(n) => {
                let at = interp
                    .at(curve, duty.flow_m3hr() / n)
                    .map_err(|e| Rejection::new(Method::Speed, lookup_reason(&e)))?;
                (
                    n,
                    duty.flow_m3hr(),
                    duty.head_m(),
                    at.efficiency_pct,
                    at.power_kw * n * n * n,
                    at.npshr_m.map(|v| v * n * n),
                )
            }
            None => {
                let n = seed_ratio;
                let p = &curve.points()[seed_index];
                let base_power = p.power().unwrap_or_else(|| {
                    shaft_power_kw(p.flow_m3hr, p.head_m, config.specific_gravity, p.efficiency_pct)
                });
                let npshr = curve.npshr().map(|col| col[seed_index] * n * n);
                (
                    n,
                    p.flow_m3hr * n,
                    p.head_m * n * n,
                    p.efficiency_pct,
                    base_power * n * n * n,
                    npshr,
                )
            }
        };

    let speed = SpeedAdjustment::from_ratio(test_speed_rpm, ratio);

    if specs
        .min_speed_rpm
        .is_some_and(|min| !at_least(speed.required_speed_rpm, min))
    {
        return Err(Rejection::new(Method::Speed, ExclusionReason::Underspeed));
    }
    if specs
        .max_speed_rpm
        .is_some_and(|max| !at_most(speed.required_speed_rpm, max))
    {
        return Err(Rejection::new(Method::Speed, ExclusionReason::Overspeed));
    }
    let hard = config.speed.hard_limit_pct;
    if !at_most(speed.speed_variation_pct, hard) {
        return Err(Rejection::new(Method::Speed, ExclusionReason::Overspeed));
    }
    if !at_least(speed.speed_variation_pct, -hard) {
        return Err(Rejection::new(Method::Speed, ExclusionReason::Underspeed));
    }

    trace!(
        pump_code = %cref.pump.pump_code,
        curve = cref.index,
        required_speed_rpm = speed.required_speed_rpm,
        "speed solution"
    );

    Ok(Solution {
        modification: Modification::Speed(speed),
        curve_index: cref.index,
        curve_diameter_mm: curve.impeller_diameter_mm(),
        achieved_flow_m3hr: flow_m3hr,
        achieved_head_m: head_m,
        efficiency_pct,
        power_kw,
        npshr_m,
    })
}

/// [`try_speed`] without the rejection detail.
pub fn solve_speed(cref: CurveRef<'_>, duty: &DutyPoint, config: &EngineConfig) -> Option<Solution> {
    try_speed(cref, duty, config).ok()
}

/// Operating point of a pump run with an explicitly chosen trim and/or speed.
///
/// Unlike the solvers, nothing is driven to the duty: the head reported is
/// what the modified curve delivers at the duty flow, so the result can fail
/// validation. This is the only source of combined trim-and-speed solutions.
///
/// # Errors
/// Unknown curve, non-positive trim or speed, a speed without a declared test
/// speed, or a duty flow outside the modified curve.
pub fn apply_configuration(
    pump: &PumpModel,
    curve_index: usize,
    duty: &DutyPoint,
    trim_percent: Option<f64>,
    speed_rpm: Option<f64>,
    config: &EngineConfig,
) -> EngineResult<Solution> {
    let cref = CurveRef::new(pump, curve_index).ok_or_else(|| EngineError::CurveIndex {
        pump_code: pump.pump_code.clone(),
        index: curve_index,
        len: pump.curves.len(),
    })?;
    let curve = cref.curve;

    let trim = match trim_percent {
        Some(pct) => {
            check_ratio(pct / 100.0, "trim")?;
            Some(TrimAdjustment::from_ratio(curve.impeller_diameter_mm(), pct / 100.0))
        }
        None => None,
    };
    let speed = match speed_rpm {
        Some(rpm) => {
            let test = pump
                .specifications
                .test_speed_rpm
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| EngineError::InvalidArg {
                    what: format!("pump {} declares no test speed", pump.pump_code),
                })?;
            check_ratio(rpm / test, "speed")?;
            Some(SpeedAdjustment::from_speed(test, rpm))
        }
        None => None,
    };

    let d = trim.as_ref().map_or(1.0, TrimAdjustment::ratio);
    let n = speed.as_ref().map_or(1.0, SpeedAdjustment::ratio);
    let r = d * n;

    let at = CurveInterpolator::legacy(config).at(curve, duty.flow_m3hr() / r)?;
    let head_m = at.head_m * r * r;
    let efficiency_pct = match &trim {
        Some(t) => (at.efficiency_pct
            - config.trim.efficiency_penalty_per_pct * (100.0 - t.trim_percent).max(0.0))
        .max(0.0),
        None => at.efficiency_pct,
    };
    let power_kw = shaft_power_kw(
        duty.flow_m3hr(),
        head_m,
        config.specific_gravity,
        efficiency_pct,
    );

    let modification = match (trim, speed) {
        (None, None) => Modification::Direct,
        (Some(t), None) => Modification::Trim(t),
        (None, Some(s)) => Modification::Speed(s),
        (Some(trim), Some(speed)) => Modification::Combined { trim, speed },
    };

    Ok(Solution {
        modification,
        curve_index,
        curve_diameter_mm: curve.impeller_diameter_mm(),
        achieved_flow_m3hr: duty.flow_m3hr(),
        achieved_head_m: head_m,
        efficiency_pct,
        power_kw,
        npshr_m: at.npshr_m.map(|v| v * n * n),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_catalog::PumpSpecifications;

    fn scenario_pump(specs: PumpSpecifications) -> PumpModel {
        let curve = PerformanceCurve::new(
            250.0,
            vec![
                PerformancePoint::new(100.0, 40.0, 70.0),
                PerformancePoint::new(200.0, 35.0, 78.0),
                PerformancePoint::new(300.0, 28.0, 74.0),
            ],
        )
        .unwrap();
        PumpModel::new("ES-250", vec![curve]).with_specifications(specs)
    }

    fn duty(q: f64, h: f64) -> DutyPoint {
        DutyPoint::new(q, h).unwrap()
    }

    #[test]
    fn trim_hits_duty_exactly() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default());
        let cref = CurveRef::new(&pump, 0).unwrap();
        let sol = try_trim(cref, &duty(200.0, 30.0), &cfg).unwrap();

        let expected_ratio = (30.0_f64 / 35.0).sqrt();
        let trim = sol.trim().unwrap();
        assert!((trim.trim_percent - expected_ratio * 100.0).abs() < 1e-9);
        assert!((trim.trimmed_diameter_mm - 250.0 * expected_ratio).abs() < 1e-9);
        assert_eq!(sol.achieved_flow_m3hr, 200.0);
        assert_eq!(sol.achieved_head_m, 30.0);
        let expected_eff = 78.0 - 0.3 * (100.0 - expected_ratio * 100.0);
        assert!((sol.efficiency_pct - expected_eff).abs() < 1e-9);
        assert!((sol.power_kw - shaft_power_kw(200.0, 30.0, 1.0, expected_eff)).abs() < 1e-12);
    }

    #[test]
    fn trim_cannot_raise_head() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default());
        let err = try_trim(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 45.0), &cfg).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::HeadNotMet));
    }

    #[test]
    fn trim_floor_is_configurable() {
        // 35 m * 0.8^2 = 22.4 m needs an 80 % impeller
        let pump = scenario_pump(PumpSpecifications::default());
        let cref = CurveRef::new(&pump, 0).unwrap();
        let d = duty(200.0, 22.4);

        let legacy = EngineConfig::default();
        let err = try_trim(cref, &d, &legacy).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::Undertrim));

        let extended = EngineConfig::default().with_trim_floor(75.0);
        let sol = try_trim(cref, &d, &extended).unwrap();
        assert!((sol.trim_percent().unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn trim_respects_declared_min_impeller() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default().with_impeller_range(230.0, 250.0));
        // needs ~0.926 * 250 = 231.5 mm: fine
        assert!(try_trim(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 30.0), &cfg).is_ok());
        // needs ~0.894 * 250 = 223.6 mm: below 230 mm
        let err = try_trim(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 28.0), &cfg).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::Undertrim));
    }

    #[test]
    fn trim_outside_envelope_is_flow_out_of_range() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default());
        let err = try_trim(CurveRef::new(&pump, 0).unwrap(), &duty(500.0, 10.0), &cfg).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::FlowOutOfRange));
    }

    #[test]
    fn speed_up_meets_higher_head() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default().with_test_speed(1450.0));
        let sol = try_speed(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 45.0), &cfg).unwrap();
        let speed = sol.speed().unwrap();
        assert!(speed.speed_variation_pct > 10.0 && speed.speed_variation_pct < 13.0);
        assert_eq!(sol.achieved_flow_m3hr, 200.0);
        assert_eq!(sol.achieved_head_m, 45.0);

        // the refined ratio satisfies the affinity relation on the base curve
        let n = speed.ratio();
        let at = CurveInterpolator::legacy(&cfg)
            .at(&pump.curves[0], 200.0 / n)
            .unwrap();
        assert!((n * n * at.head_m - 45.0).abs() < 1e-6);
    }

    #[test]
    fn speed_needs_test_speed() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default());
        let err = try_speed(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 45.0), &cfg).unwrap_err();
        assert_eq!(err.reason, None);
    }

    #[test]
    fn speed_respects_declared_range() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(
            PumpSpecifications::default()
                .with_test_speed(1450.0)
                .with_speed_range(1200.0, 1550.0),
        );
        let err = try_speed(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 45.0), &cfg).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::Overspeed));
    }

    #[test]
    fn speed_beyond_hard_limit_is_rejected() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default().with_test_speed(1450.0));
        // needs roughly +27 %
        let err = try_speed(CurveRef::new(&pump, 0).unwrap(), &duty(200.0, 58.0), &cfg).unwrap_err();
        assert_eq!(err.reason, Some(ExclusionReason::Overspeed));
    }

    #[test]
    fn scaled_curve_follows_affinity_laws() {
        let pump = scenario_pump(PumpSpecifications::default());
        let base = &pump.curves[0];
        let trimmed = scale_curve_by_diameter(base, 0.9).unwrap();
        assert!((trimmed.impeller_diameter_mm() - 225.0).abs() < 1e-9);
        for (a, b) in base.points().iter().zip(trimmed.points()) {
            assert!((b.flow_m3hr - a.flow_m3hr * 0.9).abs() < 1e-9);
            assert!((b.head_m - a.head_m * 0.81).abs() < 1e-9);
            assert_eq!(b.efficiency_pct, a.efficiency_pct);
        }
        // source curve untouched
        assert_eq!(base.heads(), &[40.0, 35.0, 28.0]);

        let faster = scale_curve_by_speed(base, 1.1).unwrap();
        assert_eq!(faster.impeller_diameter_mm(), 250.0);
        assert!((faster.heads()[0] - 40.0 * 1.21).abs() < 1e-9);

        assert!(scale_curve_by_diameter(base, 0.0).is_err());
        assert!(scale_curve_by_speed(base, f64::NAN).is_err());
    }

    #[test]
    fn configuration_check_builds_combined_solution() {
        let cfg = EngineConfig::default();
        let pump = scenario_pump(PumpSpecifications::default().with_test_speed(1450.0));
        let d = duty(200.0, 35.0);

        let plain = apply_configuration(&pump, 0, &d, None, None, &cfg).unwrap();
        assert_eq!(plain.method(), Method::Direct);
        assert_eq!(plain.achieved_head_m, 35.0);

        let combined = apply_configuration(&pump, 0, &d, Some(90.0), Some(1595.0), &cfg).unwrap();
        assert_eq!(combined.method(), Method::Combined);
        // r = 0.9 * 1.1 = 0.99; base lookup at 200 / 0.99
        let at = CurveInterpolator::legacy(&cfg)
            .at(&pump.curves[0], 200.0 / 0.99)
            .unwrap();
        assert!((combined.achieved_head_m - at.head_m * 0.99 * 0.99).abs() < 1e-6);

        assert!(apply_configuration(&pump, 3, &d, None, None, &cfg).is_err());
        assert!(apply_configuration(&pump, 0, &d, Some(0.0), None, &cfg).is_err());
        let no_speed = scenario_pump(PumpSpecifications::default());
        assert!(apply_configuration(&no_speed, 0, &d, None, Some(1600.0), &cfg).is_err());
    }
}
