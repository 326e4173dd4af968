//! Counter sessions for the CLI: config mapping, clock choice, and execution.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use eyre::WrapErr;
use flip_config::{Config, Timing};
use flip_core::error::{CounterError, Result};
use flip_core::util::{as_ms, secs_to_duration};
use flip_core::{
    Command, Counter, CounterCfg, CounterStats, FrameRecord, SmartRampPlan, SpriteGeometry, StopReason,
    build_counter, parse_script, run_for_with, run_until_idle_with,
};
use flip_traits::{Clock, ManualClock, MonotonicClock};

use crate::terminal::TerminalRenderer;

/// Enough for the slowest flip (six 80 ms steps) to finish.
const SETTLE: Duration = Duration::from_secs(1);

/// What a session ended with.
#[derive(Debug)]
pub struct Outcome {
    pub value: u64,
    pub display: String,
    pub stats: CounterStats,
    pub reason: StopReason,
    pub elapsed_ms: u64,
    pub plan: Option<SmartRampPlan>,
    /// Values reported by `value` commands, in order.
    pub reported: Vec<u64>,
}

impl Outcome {
    fn from_counter(
        counter: &Counter<TerminalRenderer>,
        reason: StopReason,
        reported: Vec<u64>,
    ) -> Self {
        Self {
            value: counter.value(),
            display: counter.renderer().display(),
            stats: counter.stats(),
            reason,
            elapsed_ms: as_ms(counter.now()),
            plan: counter.last_plan(),
            reported,
        }
    }
}

pub fn stop_reason_name(r: StopReason) -> &'static str {
    match r {
        StopReason::WindowElapsed => "WindowElapsed",
        StopReason::Idle => "Idle",
        StopReason::Shutdown => "Shutdown",
    }
}

fn make_clock(cfg: &Config, virtual_time: bool) -> Box<dyn Clock> {
    if virtual_time || cfg.runner.timing == Timing::Virtual {
        Box::new(ManualClock::new())
    } else {
        Box::new(MonotonicClock::new())
    }
}

fn seconds_arg(flag: &str, secs: f64) -> Result<Duration> {
    secs_to_duration(secs).ok_or_else(|| {
        CounterError::Config(format!("{flag} must be a finite, non-negative number of seconds"))
            .into()
    })
}

fn build(
    cfg: &Config,
    counter: CounterCfg,
    echo: bool,
    trace: bool,
) -> Result<Counter<TerminalRenderer>> {
    let geometry = SpriteGeometry::from(&cfg.sprite);
    let mut counter = build_counter(TerminalRenderer::new(echo), counter, Some(geometry), trace)?;
    counter.renderer_mut().flush();
    Ok(counter)
}

fn flush(counter: &mut Counter<TerminalRenderer>) {
    counter.renderer_mut().flush();
}

/// Auto-count for `seconds`, then let the last flips land.
#[allow(clippy::too_many_arguments)]
pub fn run_auto(
    cfg: &Config,
    seconds: f64,
    value: Option<u64>,
    increment: Option<u64>,
    pace: Option<u64>,
    virtual_time: bool,
    shutdown: &AtomicBool,
    echo: bool,
) -> Result<Outcome> {
    let window = seconds_arg("--seconds", seconds)?;
    let mut ccfg = CounterCfg::from(&cfg.counter);
    ccfg.value = value.unwrap_or(ccfg.value);
    ccfg.increment = increment.unwrap_or(ccfg.increment);
    ccfg.pace_ms = pace.unwrap_or(ccfg.pace_ms);
    ccfg.auto = true;

    let mut counter = build(cfg, ccfg, echo, false)?;
    let clock = make_clock(cfg, virtual_time);
    tracing::info!(
        value = ccfg.value,
        increment = ccfg.increment,
        pace_ms = ccfg.pace_ms,
        window_ms = as_ms(window),
        "run start"
    );
    let reason = run_for_with(&mut counter, clock.as_ref(), window, Some(shutdown), flush);
    counter.stop();
    if reason != StopReason::Shutdown {
        run_until_idle_with(&mut counter, clock.as_ref(), SETTLE, Some(shutdown), flush)?;
    }
    tracing::info!(value = counter.value(), reason = stop_reason_name(reason), "run end");
    Ok(Outcome::from_counter(&counter, reason, Vec::new()))
}

/// Ramp from the configured (or given) value to `to`; returns once auto mode turns off.
#[allow(clippy::too_many_arguments)]
pub fn run_ramp(
    cfg: &Config,
    to: u64,
    from: Option<u64>,
    seconds: Option<f64>,
    pace: Option<u64>,
    virtual_time: bool,
    shutdown: &AtomicBool,
    echo: bool,
) -> Result<Outcome> {
    let duration = seconds.map(|s| seconds_arg("--seconds", s)).transpose()?;
    let mut ccfg = CounterCfg::from(&cfg.counter);
    ccfg.value = from.unwrap_or(ccfg.value);
    ccfg.auto = false;
    if duration.is_none()
        && let Some(p) = pace
    {
        ccfg.pace_ms = p;
    }

    let mut counter = build(cfg, ccfg, echo, false)?;
    let clock = make_clock(cfg, virtual_time);
    counter.increment_to(to, duration, pace);
    let max = Duration::from_millis(cfg.runner.max_wall_ms);
    flush(&mut counter);
    let reason = run_until_idle_with(&mut counter, clock.as_ref(), max, Some(shutdown), flush)
        .wrap_err_with(|| format!("ramp to {to} did not finish"))?;
    Ok(Outcome::from_counter(&counter, reason, Vec::new()))
}

/// Execute a command script on simulated time.
///
/// Scripts start with auto mode off. When the script ends, any pending cycle
/// is cancelled and in-flight flips are allowed to land. A `wait` that would
/// carry the counter past `runner.max_wall_ms` fails with a timeout before
/// any of it runs.
pub fn run_script(
    cfg: &Config,
    file: &Path,
    trace: Option<&Path>,
    echo: bool,
) -> Result<Outcome> {
    let text = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("read script {}", file.display()))?;
    let commands = parse_script(&text)?;
    let mut ccfg = CounterCfg::from(&cfg.counter);
    ccfg.auto = false;

    let mut counter = build(cfg, ccfg, echo, trace.is_some())?;
    let budget = Duration::from_millis(cfg.runner.max_wall_ms);
    let mut reported = Vec::new();
    for cmd in &commands {
        if let Command::Wait(d) = cmd
            && counter.now().saturating_add(*d) > budget
        {
            tracing::warn!(
                now_ms = as_ms(counter.now()),
                wait_ms = as_ms(*d),
                max_wall_ms = cfg.runner.max_wall_ms,
                "script wait exceeds run limit"
            );
            return Err(CounterError::Timeout(cfg.runner.max_wall_ms).into());
        }
        if let Some(v) = cmd.apply(&mut counter) {
            if echo {
                println!("value {v}");
            }
            reported.push(v);
        }
        flush(&mut counter);
    }
    counter.stop();
    counter.advance_by(SETTLE);
    flush(&mut counter);

    if let Some(path) = trace {
        let records = counter.take_trace();
        write_trace(path, &records, counter.geometry())
            .wrap_err_with(|| format!("write trace {}", path.display()))?;
        tracing::info!(frames = records.len(), path = %path.display(), "trace written");
    }
    Ok(Outcome::from_counter(&counter, StopReason::Idle, reported))
}

/// CSV with one row per painted frame.
pub fn write_trace(path: &Path, records: &[FrameRecord], geometry: &SpriteGeometry) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["at_ms", "position", "half", "column", "digit", "css"])?;
    for r in records {
        w.write_record([
            as_ms(r.at).to_string(),
            r.position.to_string(),
            r.frame.half.as_str().to_string(),
            r.frame.column.to_string(),
            r.frame.digit.to_string(),
            geometry.css(r.frame),
        ])?;
    }
    w.flush()?;
    Ok(())
}
