//! Catalog-wide evaluation and ranking.

use crate::affinity::apply_configuration;
use crate::bep::{BepAnalysis, Tier, analyze_solution, distance};
use crate::config::EngineConfig;
use crate::duty::{DutyPoint, SelectionRequest};
use crate::error::{EngineError, EngineResult, ScoringError};
use crate::exclusion::ExclusionReason;
use crate::feasibility::solve_detailed;
use crate::near_miss::{NearMiss, Observed, detect};
use crate::scoring::{ScoreBreakdown, score};
use crate::solution::Solution;
use crate::validate::validate;
use ps_catalog::{Catalog, PumpModel};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Result of evaluating one pump. `exclusion_reasons` is empty iff
/// `feasible`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub pump_code: String,
    pub pump_type: Option<String>,
    pub feasible: bool,
    pub solution: Option<Solution>,
    pub score: Option<f64>,
    pub score_breakdown: Option<ScoreBreakdown>,
    /// Duty against the pump's overall BEP. Drives scoring and tiers.
    pub bep: Option<BepAnalysis>,
    /// Duty against the BEP of the modified curve actually used.
    pub solution_bep: Option<BepAnalysis>,
    pub exclusion_reasons: BTreeSet<ExclusionReason>,
    pub near_miss: Option<NearMiss>,
}

impl Evaluation {
    fn excluded(pump: &PumpModel, duty: &DutyPoint, reasons: BTreeSet<ExclusionReason>) -> Self {
        Self {
            pump_code: pump.pump_code.clone(),
            pump_type: pump.pump_type.clone(),
            feasible: false,
            solution: None,
            score: None,
            score_breakdown: None,
            bep: distance(pump, duty),
            solution_bep: None,
            exclusion_reasons: reasons,
            near_miss: None,
        }
    }

    pub fn tier(&self) -> Option<Tier> {
        if self.feasible {
            Some(self.bep.map_or(Tier::Marginal, |b| b.tier()))
        } else {
            None
        }
    }
}

/// Gate, score and annotate one solution.
fn finish(
    pump: &PumpModel,
    request: &SelectionRequest,
    solution: Solution,
    config: &EngineConfig,
) -> Evaluation {
    let duty = &request.duty;
    let npsha = request.npsh_available_m();
    let mut eval = Evaluation::excluded(pump, duty, BTreeSet::new());
    eval.solution = Some(solution);
    eval.solution_bep = analyze_solution(pump, &solution, duty);

    let validation = validate(pump, &solution, duty, npsha, config);
    eval.exclusion_reasons = validation.reasons;

    if eval.exclusion_reasons.is_empty() {
        match score(pump, &solution, duty) {
            Ok(breakdown) => {
                eval.feasible = true;
                eval.score = Some(breakdown.total);
                eval.score_breakdown = Some(breakdown);
            }
            Err(ScoringError::HeadNotMet { .. }) => {
                eval.exclusion_reasons.insert(ExclusionReason::HeadNotMet);
            }
            Err(err) => {
                debug!(pump_code = %pump.pump_code, error = %err, "solution could not be scored");
                eval.exclusion_reasons.insert(ExclusionReason::NoPerformanceData);
            }
        }
    }

    if !eval.feasible {
        eval.near_miss = detect(&pump.pump_code, duty, Observed::from(&solution), npsha, config);
    }
    eval
}

/// Evaluate one pump: solve, validate, score.
pub fn evaluate(pump: &PumpModel, request: &SelectionRequest, config: &EngineConfig) -> Evaluation {
    let outcome = solve_detailed(pump, &request.duty, config);
    match outcome.best {
        Some(solution) => finish(pump, request, solution, config),
        None => {
            let mut eval = Evaluation::excluded(pump, &request.duty, outcome.exclusion_reasons(pump));
            eval.near_miss = outcome.closest.as_ref().and_then(|c| {
                detect(
                    &pump.pump_code,
                    &request.duty,
                    Observed::from(c),
                    request.npsh_available_m(),
                    config,
                )
            });
            eval
        }
    }
}

/// Evaluate one pump run with an explicit trim and/or speed instead of the
/// solver's choice.
///
/// # Errors
/// See [`apply_configuration`].
pub fn evaluate_configuration(
    pump: &PumpModel,
    request: &SelectionRequest,
    curve_index: usize,
    trim_percent: Option<f64>,
    speed_rpm: Option<f64>,
    config: &EngineConfig,
) -> EngineResult<Evaluation> {
    config.validate()?;
    let solution = apply_configuration(pump, curve_index, &request.duty, trim_percent, speed_rpm, config)?;
    Ok(finish(pump, request, solution, config))
}

/// Evaluate the pump with `pump_code`.
///
/// # Errors
/// [`EngineError::UnknownPump`] or an invalid configuration.
pub fn evaluate_code(
    catalog: &Catalog,
    pump_code: &str,
    request: &SelectionRequest,
    config: &EngineConfig,
) -> EngineResult<Evaluation> {
    config.validate()?;
    let pump = catalog
        .get(pump_code)
        .ok_or_else(|| EngineError::UnknownPump(pump_code.to_owned()))?;
    Ok(evaluate(pump, request, config))
}

/// Pump codes of the ranked list, bucketed by operating zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tiers {
    pub preferred: Vec<String>,
    pub allowable: Vec<String>,
    pub acceptable: Vec<String>,
    pub marginal: Vec<String>,
}

impl Tiers {
    fn from_ranked(ranked: &[Evaluation]) -> Self {
        let mut tiers = Self::default();
        for eval in ranked {
            let bucket = match eval.tier() {
                Some(Tier::Preferred) => &mut tiers.preferred,
                Some(Tier::Allowable) => &mut tiers.allowable,
                Some(Tier::Acceptable) => &mut tiers.acceptable,
                Some(Tier::Marginal) | None => &mut tiers.marginal,
            };
            bucket.push(eval.pump_code.clone());
        }
        tiers
    }
}

/// Outcome of a catalog-wide selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub duty: DutyPoint,
    /// Feasible pumps, best score first.
    pub ranked: Vec<Evaluation>,
    /// Infeasible pumps, by pump code.
    pub excluded: Vec<Evaluation>,
    pub near_misses: Vec<NearMiss>,
    pub tiers: Tiers,
    /// Pumps evaluated after the type filter.
    pub evaluated: usize,
}

fn by_score(a: &Evaluation, b: &Evaluation) -> Ordering {
    let sa = a.score.unwrap_or(f64::NEG_INFINITY);
    let sb = b.score.unwrap_or(f64::NEG_INFINITY);
    sb.total_cmp(&sa).then_with(|| a.pump_code.cmp(&b.pump_code))
}

/// Evaluate every catalog pump matching the request and rank the feasible
/// ones.
///
/// Pumps are evaluated in parallel; the result does not depend on the
/// evaluation order.
///
/// # Errors
/// An invalid configuration.
pub fn rank(catalog: &Catalog, request: &SelectionRequest, config: &EngineConfig) -> EngineResult<SelectionReport> {
    config.validate()?;

    let pumps: Vec<&PumpModel> = catalog
        .iter()
        .filter(|p| request.pump_type.as_deref().is_none_or(|t| p.is_type(t)))
        .collect();

    let evaluations: Vec<Evaluation> = pumps
        .par_iter()
        .map(|pump| evaluate(pump, request, config))
        .collect();
    let evaluated = evaluations.len();

    let (mut ranked, mut excluded): (Vec<_>, Vec<_>) =
        evaluations.into_iter().partition(|e| e.feasible);
    ranked.sort_by(by_score);
    excluded.sort_by(|a, b| a.pump_code.cmp(&b.pump_code));

    let feasible = ranked.len();
    if let Some(max) = request.max_results {
        ranked.truncate(max);
    }

    let near_misses = excluded
        .iter()
        .filter_map(|e| e.near_miss.clone())
        .collect();
    let tiers = Tiers::from_ranked(&ranked);

    info!(
        flow_m3hr = request.duty.flow_m3hr(),
        head_m = request.duty.head_m(),
        evaluated,
        feasible,
        excluded = excluded.len(),
        "selection complete"
    );

    Ok(SelectionReport {
        duty: request.duty,
        ranked,
        excluded,
        near_misses,
        tiers,
        evaluated,
    })
}
