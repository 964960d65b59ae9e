use clap::{Args, Parser, Subcommand};
use ps_catalog::{Catalog, CatalogError, load_path};
use ps_engine::{
    DutyPoint, EngineConfig, EngineError, Evaluation, SelectionReport, SelectionRequest,
    evaluate_code, evaluate_configuration, rank,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(about = "Pump selection - rank catalog pumps against a duty point", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a catalog and report what was usable
    Validate {
        /// Path to the catalog file (.yaml, .yml or .json)
        catalog_path: PathBuf,
    },
    /// Rank every catalog pump against a duty point
    Select {
        /// Path to the catalog file
        catalog_path: PathBuf,
        #[command(flatten)]
        duty: DutyArgs,
        /// Only evaluate pumps of this type
        #[arg(long)]
        pump_type: Option<String>,
        /// Keep at most this many ranked pumps
        #[arg(long)]
        max_results: Option<usize>,
        /// Also list excluded pumps and near misses
        #[arg(long)]
        show_excluded: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a single pump in detail
    Evaluate {
        /// Path to the catalog file
        catalog_path: PathBuf,
        /// Pump code to evaluate
        pump_code: String,
        #[command(flatten)]
        duty: DutyArgs,
        /// Fixed trim in percent of the curve diameter (skips the solver)
        #[arg(long)]
        trim: Option<f64>,
        /// Fixed speed in rpm (skips the solver)
        #[arg(long)]
        speed: Option<f64>,
        /// Curve used with --trim/--speed
        #[arg(long, default_value_t = 0)]
        curve: usize,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct DutyArgs {
    /// Duty flow in m3/h
    #[arg(long)]
    flow: f64,
    /// Duty head in m
    #[arg(long)]
    head: f64,
    /// NPSH available in m
    #[arg(long)]
    npsha: Option<f64>,
    /// Engine configuration YAML (partial files override defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Minimum trim percent, overriding the configuration
    #[arg(long)]
    trim_floor: Option<f64>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { catalog_path } => cmd_validate(&catalog_path),
        Commands::Select {
            catalog_path,
            duty,
            pump_type,
            max_results,
            show_excluded,
            json,
        } => cmd_select(&catalog_path, &duty, pump_type, max_results, show_excluded, json),
        Commands::Evaluate {
            catalog_path,
            pump_code,
            duty,
            trim,
            speed,
            curve,
            json,
        } => cmd_evaluate(&catalog_path, &pump_code, &duty, trim, speed, curve, json),
    }
}

fn load_catalog(path: &Path) -> CliResult<Catalog> {
    let load = load_path(path)?;
    for s in &load.skipped {
        warn!(pump_code = %s.pump_code, curve = s.curve_index, reason = %s.reason, "curve skipped");
    }
    Ok(load.catalog)
}

fn load_config(args: &DutyArgs) -> CliResult<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
                path: path.clone(),
                source,
            })?;
            serde_yaml::from_str(&content).map_err(|source| CliError::ConfigParse {
                path: path.clone(),
                source,
            })?
        }
        None => EngineConfig::default(),
    };
    if let Some(floor) = args.trim_floor {
        config = config.with_trim_floor(floor);
    }
    config.validate()?;
    debug!(?config, "engine configuration");
    Ok(config)
}

fn build_request(args: &DutyArgs) -> CliResult<SelectionRequest> {
    let mut request = SelectionRequest::new(DutyPoint::new(args.flow, args.head)?);
    if let Some(npsha) = args.npsha {
        request = request.with_npsh_available(npsha)?;
    }
    Ok(request)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_validate(catalog_path: &Path) -> CliResult<()> {
    println!("Validating catalog: {}", catalog_path.display());
    let load = load_path(catalog_path)?;
    let catalog = &load.catalog;
    println!(
        "✓ {} pumps, {} usable curves",
        catalog.len(),
        catalog.curve_count()
    );
    let types: Vec<_> = catalog.pump_types().into_iter().collect();
    if !types.is_empty() {
        println!("  Types: {}", types.join(", "));
    }
    if !load.skipped.is_empty() {
        println!("  Skipped curves:");
        for s in &load.skipped {
            println!("    {} curve {}: {}", s.pump_code, s.curve_index, s.reason);
        }
    }
    for pump in catalog.iter().filter(|p| p.curves.is_empty()) {
        println!("  ! {} has no usable curves", pump.pump_code);
    }
    Ok(())
}

fn cmd_select(
    catalog_path: &Path,
    duty: &DutyArgs,
    pump_type: Option<String>,
    max_results: Option<usize>,
    show_excluded: bool,
    json: bool,
) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;
    let config = load_config(duty)?;
    let mut request = build_request(duty)?;
    if let Some(t) = pump_type {
        request = request.with_pump_type(t);
    }
    if let Some(n) = max_results {
        request = request.with_max_results(n);
    }

    let report = rank(&catalog, &request, &config)?;
    if json {
        return print_json(&report);
    }
    print_report(&report, show_excluded);
    Ok(())
}

fn print_report(report: &SelectionReport, show_excluded: bool) {
    println!(
        "Duty: {:.1} m3/h at {:.1} m  ({} pumps evaluated)",
        report.duty.flow_m3hr(),
        report.duty.head_m(),
        report.evaluated
    );

    if report.ranked.is_empty() {
        println!("No feasible pumps");
    } else {
        println!(
            "  {:<4} {:<16} {:>7} {:<8} {:>7} {:>9} {:>6}  {}",
            "#", "pump", "score", "method", "eff %", "power kW", "Q/Qbep", "zone"
        );
        for (i, e) in report.ranked.iter().enumerate() {
            let Some(sol) = &e.solution else { continue };
            println!(
                "  {:<4} {:<16} {:>7.1} {:<8} {:>7.1} {:>9.2} {:>6}  {}",
                i + 1,
                e.pump_code,
                e.score.unwrap_or(0.0),
                sol.method().as_str(),
                sol.efficiency_pct,
                sol.power_kw,
                e.bep.map_or("-".to_string(), |b| format!("{:.2}", b.flow_ratio)),
                e.bep.map_or("-", |b| b.zone.as_str()),
            );
        }
    }

    let t = &report.tiers;
    println!(
        "  Tiers: preferred {}, allowable {}, acceptable {}, marginal {}",
        t.preferred.len(),
        t.allowable.len(),
        t.acceptable.len(),
        t.marginal.len()
    );

    if show_excluded {
        if !report.excluded.is_empty() {
            println!("Excluded:");
            for e in &report.excluded {
                let reasons: Vec<_> = e.exclusion_reasons.iter().map(|r| r.code()).collect();
                println!("  {:<16} {}", e.pump_code, reasons.join(", "));
            }
        }
        if !report.near_misses.is_empty() {
            println!("Near misses:");
            for nm in &report.near_misses {
                for line in &nm.guidance {
                    println!("  {:<16} {}", nm.pump_code, line);
                }
            }
        }
    }
}

fn cmd_evaluate(
    catalog_path: &Path,
    pump_code: &str,
    duty: &DutyArgs,
    trim: Option<f64>,
    speed: Option<f64>,
    curve: usize,
    json: bool,
) -> CliResult<()> {
    let catalog = load_catalog(catalog_path)?;
    let config = load_config(duty)?;
    let request = build_request(duty)?;

    let eval = if trim.is_some() || speed.is_some() {
        let pump = catalog
            .get(pump_code)
            .ok_or_else(|| EngineError::UnknownPump(pump_code.to_string()))?;
        evaluate_configuration(pump, &request, curve, trim, speed, &config)?
    } else {
        evaluate_code(&catalog, pump_code, &request, &config)?
    };

    if json {
        return print_json(&eval);
    }
    print_evaluation(&eval);
    Ok(())
}

fn print_evaluation(e: &Evaluation) {
    let mark = if e.feasible { "✓" } else { "✗" };
    println!("{} {}", mark, e.pump_code);

    if let Some(sol) = &e.solution {
        println!(
            "  Method: {} (curve {}, impeller {:.1} mm)",
            sol.method().as_str(),
            sol.curve_index,
            sol.impeller_diameter_mm()
        );
        if let Some(t) = sol.trim() {
            println!("  Trim: {:.1}%", t.trim_percent);
        }
        if let Some(s) = sol.speed() {
            println!(
                "  Speed: {:.0} rpm ({:+.1}% of {:.0} rpm)",
                s.required_speed_rpm, s.speed_variation_pct, s.test_speed_rpm
            );
        }
        println!(
            "  Operating point: {:.1} m3/h at {:.2} m, {:.1}% efficiency, {:.2} kW",
            sol.achieved_flow_m3hr, sol.achieved_head_m, sol.efficiency_pct, sol.power_kw
        );
        if let Some(npshr) = sol.npshr_m {
            println!("  NPSHr: {:.2} m", npshr);
        }
    }

    if let Some(bep) = &e.bep {
        println!(
            "  BEP: {:.1} m3/h at {:.1} m, {:.1}% (Q/Qbep {:.2}, {})",
            bep.bep.flow_m3hr,
            bep.bep.head_m,
            bep.bep.efficiency_pct,
            bep.flow_ratio,
            bep.zone.as_str()
        );
    }

    if let Some(b) = &e.score_breakdown {
        println!("  Score: {:.1}", b.total);
        for (name, value) in b.to_map() {
            if name != "total" {
                println!("    {:<14} {:>7.2}", name, value);
            }
        }
    }

    for reason in &e.exclusion_reasons {
        println!("  - {}: {}", reason.code(), reason.description());
    }
    if let Some(nm) = &e.near_miss {
        for line in &nm.guidance {
            println!("  Near miss: {}", line);
        }
    }
}
