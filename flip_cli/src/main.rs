//! `flipcounter`: drive the flip-counter engine from a terminal.

mod cli;
mod error_fmt;
mod run;
mod terminal;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;
use flip_config::Config;
use flip_core::error::{CounterError, Result};
use flip_core::util::{as_ms, secs_to_duration};
use flip_core::{DigitEdit, PlanSource, SmartRampPlan, diff, solve};
use serde_json::json;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::{Outcome, run_auto, run_ramp, run_script, stop_reason_name};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    // color-eyre only affects panics/report hooks; our own formatting is below
    let _ = color_eyre::install();

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = match cli.config.as_deref() {
        Some(path) => flip_config::load_file(path)?,
        None => Config::default(),
    };
    cfg.validate()?;
    init_logging(cli.json, &cli.log_level, &cfg)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }
    let echo = !cli.json;

    match cli.cmd {
        Commands::Run {
            seconds,
            value,
            increment,
            pace,
            virtual_time,
        } => {
            let out = run_auto(
                &cfg,
                seconds,
                value,
                increment,
                pace,
                virtual_time,
                &shutdown,
                echo,
            )?;
            print_outcome(&out, cli.json);
        }
        Commands::Ramp {
            to,
            from,
            seconds,
            pace,
            virtual_time,
        } => {
            let out = run_ramp(&cfg, to, from, seconds, pace, virtual_time, &shutdown, echo)?;
            print_outcome(&out, cli.json);
        }
        Commands::Plan {
            diff: distance,
            seconds,
            pace,
        } => {
            let budget = secs_to_duration(seconds).ok_or_else(|| {
                CounterError::Config("--seconds must be a finite, non-negative number".into())
            })?;
            let plan = solve(distance, as_ms(budget), pace);
            print_plan(distance, plan, cli.json);
        }
        Commands::Diff { old, new } => print_diff(&diff(old, new), cli.json),
        Commands::Script { file, trace } => {
            let out = run_script(&cfg, &file, trace.as_deref(), echo)?;
            print_outcome(&out, cli.json);
        }
    }
    Ok(())
}

fn init_logging(json: bool, level: &str, cfg: &Config) -> Result<()> {
    // RUST_LOG wins over --log-level
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid --log-level {level:?}"))?,
    };
    let console = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let file = match cfg.logging.file.as_deref() {
        Some(path) => {
            let path = std::path::Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {path:?} has no file name"))?;
            let appender = match cfg.logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let file_level = cfg.logging.level.as_deref().unwrap_or("info");
            let file_filter = EnvFilter::try_new(file_level)
                .wrap_err_with(|| format!("invalid logging.level {file_level:?}"))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("install tracing subscriber")
}

fn print_outcome(out: &Outcome, json_mode: bool) {
    if json_mode {
        let plan = out.plan.map(plan_json);
        println!(
            "{}",
            json!({
                "value": out.value,
                "display": out.display,
                "reason": stop_reason_name(out.reason),
                "elapsed_ms": out.elapsed_ms,
                "changes": out.stats.changes,
                "flips": out.stats.flips,
                "frames_painted": out.stats.frames_painted,
                "render_faults": out.stats.render_faults,
                "reported": out.reported,
                "plan": plan,
            })
        );
        return;
    }
    if let Some(plan) = out.plan {
        println!("plan: {}", plan_text(&plan));
    }
    println!(
        "final {} (value {}) after {} ms: {} changes, {} flips",
        out.display, out.value, out.elapsed_ms, out.stats.changes, out.stats.flips
    );
}

fn plan_text(plan: &SmartRampPlan) -> String {
    let source = match plan.source {
        PlanSource::Exact { iterations } => format!("exact after {iterations} retries"),
        PlanSource::BestEffort { score } => format!("best effort, score {score}"),
        PlanSource::SingleJump => "single jump".to_string(),
    };
    format!(
        "increment {} every {} ms for {} cycles ({source})",
        plan.increment, plan.pace_ms, plan.cycles
    )
}

fn plan_json(plan: SmartRampPlan) -> serde_json::Value {
    let (source, extra) = match plan.source {
        PlanSource::Exact { iterations } => ("exact", json!({ "iterations": iterations })),
        PlanSource::BestEffort { score } => ("best_effort", json!({ "score": score })),
        PlanSource::SingleJump => ("single_jump", json!({})),
    };
    json!({
        "increment": plan.increment,
        "pace_ms": plan.pace_ms,
        "cycles": plan.cycles,
        "source": source,
        "details": extra,
    })
}

fn print_plan(distance: u64, plan: Option<SmartRampPlan>, json_mode: bool) {
    match (plan, json_mode) {
        (Some(p), true) => println!("{}", json!({ "diff": distance, "plan": plan_json(p) })),
        (None, true) => println!("{}", json!({ "diff": distance, "plan": null })),
        (Some(p), false) => println!("{}", plan_text(&p)),
        (None, false) => println!("nothing to ramp"),
    }
}

fn print_diff(edits: &[DigitEdit], json_mode: bool) {
    if json_mode {
        let items: Vec<serde_json::Value> = edits
            .iter()
            .map(|e| match *e {
                DigitEdit::Insert {
                    position,
                    digit,
                    separator,
                } => json!({ "op": "insert", "position": position, "digit": digit, "separator": separator }),
                DigitEdit::Remove {
                    position,
                    separator,
                } => json!({ "op": "remove", "position": position, "separator": separator }),
                DigitEdit::Flip { position, from, to } => {
                    json!({ "op": "flip", "position": position, "from": from, "to": to })
                }
            })
            .collect();
        println!("{}", serde_json::Value::Array(items));
        return;
    }
    if edits.is_empty() {
        println!("no change");
    }
    for e in edits {
        match *e {
            DigitEdit::Insert {
                position,
                digit,
                separator,
            } => println!("insert position={position} digit={digit} separator={separator}"),
            DigitEdit::Remove {
                position,
                separator,
            } => println!("remove position={position} separator={separator}"),
            DigitEdit::Flip { position, from, to } => {
                println!("flip   position={position} from={from} to={to}");
            }
        }
    }
}
