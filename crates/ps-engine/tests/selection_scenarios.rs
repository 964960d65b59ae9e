//! End-to-end selection scenarios.

use ps_catalog::{
    Catalog, PerformanceCurve, PerformancePoint, PumpModel, PumpSpecifications, load_yaml,
};
use ps_engine::{
    CurveRef, DutyPoint, EngineConfig, ExclusionReason, Method, OperatingZone, SelectionRequest,
    distance, evaluate, evaluate_configuration, rank, solve, solve_detailed, try_speed, try_trim,
};
use std::path::PathBuf;

fn scenario_curve() -> PerformanceCurve {
    PerformanceCurve::new(
        250.0,
        vec![
            PerformancePoint::new(100.0, 40.0, 70.0),
            PerformancePoint::new(200.0, 35.0, 78.0),
            PerformancePoint::new(300.0, 28.0, 74.0),
        ],
    )
    .unwrap()
}

fn scenario_pump() -> PumpModel {
    PumpModel::new("ES-100-250", vec![scenario_curve()]).with_type("End Suction")
}

fn duty(q: f64, h: f64) -> DutyPoint {
    DutyPoint::new(q, h).unwrap()
}

#[test]
fn direct_match_at_bep() {
    let cfg = EngineConfig::default();
    let pump = scenario_pump();
    let eval = evaluate(&pump, &SelectionRequest::new(duty(200.0, 35.0)), &cfg);

    assert!(eval.feasible);
    let sol = eval.solution.unwrap();
    assert_eq!(sol.method(), Method::Direct);
    assert_eq!(sol.efficiency_pct, 78.0);
    assert!((sol.power_kw - 24.45).abs() < 0.01);

    let bep = distance(&pump, &duty(200.0, 35.0)).unwrap();
    assert_eq!(bep.bep.flow_m3hr, 200.0);
    assert_eq!(bep.flow_ratio, 1.0);
    assert_eq!(bep.zone, OperatingZone::AtBep);
    assert_eq!(bep.zone_points, 30.0);
    assert_eq!(eval.bep, Some(bep));
}

#[test]
fn higher_head_needs_speed_data() {
    let cfg = EngineConfig::default();
    let request = SelectionRequest::new(duty(200.0, 45.0));

    let eval = evaluate(&scenario_pump(), &request, &cfg);
    assert!(!eval.feasible);
    assert!(eval.exclusion_reasons.contains(&ExclusionReason::HeadNotMet));

    let variable = scenario_pump()
        .with_specifications(PumpSpecifications::default().with_test_speed(1450.0));
    let eval = evaluate(&variable, &request, &cfg);
    assert!(eval.feasible, "reasons: {:?}", eval.exclusion_reasons);
    let sol = eval.solution.unwrap();
    assert_eq!(sol.method(), Method::Speed);
    assert!((sol.achieved_head_m - 45.0).abs() < 1e-6);
    assert!(eval.score_breakdown.unwrap().speed_penalty > 0.0);
}

#[test]
fn trim_floor_boundary() {
    let cfg = EngineConfig::default();
    let pump = scenario_pump();
    let cref = CurveRef::new(&pump, 0).unwrap();

    let at_floor = try_trim(cref, &duty(200.0, 35.0 * 0.85 * 0.85), &cfg).unwrap();
    assert!((at_floor.trim_percent().unwrap() - 85.0).abs() < 1e-9);

    let below = try_trim(cref, &duty(200.0, 35.0 * 0.849 * 0.849), &cfg).unwrap_err();
    assert_eq!(below.reason, Some(ExclusionReason::Undertrim));

    let extended = cfg.clone().with_trim_floor(75.0);
    assert!(try_trim(cref, &duty(200.0, 35.0 * 0.849 * 0.849), &extended).is_ok());
}

#[test]
fn max_speed_boundary() {
    let cfg = EngineConfig::default();
    let open = scenario_pump()
        .with_specifications(PumpSpecifications::default().with_test_speed(1450.0));
    let required = try_speed(CurveRef::new(&open, 0).unwrap(), &duty(200.0, 40.0), &cfg)
        .unwrap()
        .speed()
        .unwrap()
        .required_speed_rpm;

    let at_max = scenario_pump().with_specifications(
        PumpSpecifications::default()
            .with_test_speed(1450.0)
            .with_speed_range(1200.0, required),
    );
    assert!(try_speed(CurveRef::new(&at_max, 0).unwrap(), &duty(200.0, 40.0), &cfg).is_ok());

    let one_below = scenario_pump().with_specifications(
        PumpSpecifications::default()
            .with_test_speed(1450.0)
            .with_speed_range(1200.0, required - 1.0),
    );
    let err = try_speed(CurveRef::new(&one_below, 0).unwrap(), &duty(200.0, 40.0), &cfg).unwrap_err();
    assert_eq!(err.reason, Some(ExclusionReason::Overspeed));
}

#[test]
fn failures_accumulate_every_reason() {
    let cfg = EngineConfig::default();
    let pump = scenario_pump();
    let eval = evaluate_configuration(
        &pump,
        &SelectionRequest::new(duty(200.0, 35.0)),
        0,
        Some(80.0),
        None,
        &cfg,
    )
    .unwrap();
    assert!(!eval.feasible);
    assert!(eval.exclusion_reasons.contains(&ExclusionReason::Undertrim));
    assert!(eval.exclusion_reasons.contains(&ExclusionReason::HeadNotMet));
}

#[test]
fn solver_reports_rejections_per_curve() {
    let cfg = EngineConfig::default();
    let small = PerformanceCurve::new(
        200.0,
        vec![
            PerformancePoint::new(100.0, 30.0, 65.0),
            PerformancePoint::new(200.0, 27.0, 72.0),
            PerformancePoint::new(300.0, 22.0, 68.0),
        ],
    )
    .unwrap();
    let pump = PumpModel::new("TWO", vec![small, scenario_curve()]);
    let outcome = solve_detailed(&pump, &duty(200.0, 18.0), &cfg);

    assert!(outcome.rejections.contains(&ExclusionReason::Undertrim));
    // Both curves are oversized; only throttling remains.
    assert_eq!(outcome.best.unwrap().method(), Method::Direct);
}

#[test]
fn evaluation_is_idempotent() {
    let cfg = EngineConfig::default();
    let pump = scenario_pump()
        .with_specifications(PumpSpecifications::default().with_test_speed(1450.0));
    let request = SelectionRequest::new(duty(210.0, 38.0));
    let a = evaluate(&pump, &request, &cfg);
    let b = evaluate(&pump, &request, &cfg);
    assert_eq!(a, b);
    assert_eq!(
        a.score.map(f64::to_bits),
        b.score.map(f64::to_bits)
    );
    assert_eq!(solve(&pump, &request.duty, &cfg), solve(&pump, &request.duty, &cfg));
}

fn demo_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("demos");
    path.push("pumps.yaml");
    load_yaml(&path).expect("demo catalog").catalog
}

#[test]
fn demo_catalog_ranking() {
    let cfg = EngineConfig::default();
    let catalog = demo_catalog();
    let request = SelectionRequest::new(duty(200.0, 35.0));
    let report = rank(&catalog, &request, &cfg).unwrap();

    assert_eq!(report.evaluated, catalog.len());
    assert_eq!(report.ranked.len() + report.excluded.len(), report.evaluated);
    assert!(report.ranked.iter().any(|e| e.pump_code == "ES-100-250"));
    for pair in report.ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for e in &report.ranked {
        assert!(e.exclusion_reasons.is_empty());
    }

    let empty = report
        .excluded
        .iter()
        .find(|e| e.pump_code == "ES-65-160")
        .unwrap();
    assert_eq!(
        empty.exclusion_reasons.iter().copied().collect::<Vec<_>>(),
        vec![ExclusionReason::NoPerformanceData]
    );

    let tiered = report.tiers.preferred.len()
        + report.tiers.allowable.len()
        + report.tiers.acceptable.len()
        + report.tiers.marginal.len();
    assert_eq!(tiered, report.ranked.len());

    let again = rank(&catalog, &request, &cfg).unwrap();
    assert_eq!(report, again);
}

#[test]
fn demo_catalog_type_filter_and_limit() {
    let cfg = EngineConfig::default();
    let catalog = demo_catalog();
    let request = SelectionRequest::new(duty(200.0, 35.0))
        .with_pump_type("end suction")
        .with_max_results(1);
    let report = rank(&catalog, &request, &cfg).unwrap();
    assert_eq!(report.evaluated, 4);
    assert!(report.ranked.len() <= 1);
    assert!(report
        .excluded
        .iter()
        .all(|e| e.pump_type.as_deref() == Some("End Suction")));
}
