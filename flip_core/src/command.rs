//! Textual commands for driving a counter from scripts or a prompt.
//!
//! Numbers follow a lenient rule: any token that parses as a finite number is
//! valid and is truncated toward zero. What happens on an invalid number
//! depends on the command:
//!
//! - `set`, `add`, `subtract`: ignored
//! - `increment`, `pace`: reset to the default
//! - `to`: an invalid target only cancels the pending cycle; an invalid
//!   duration falls back to 10 s; an invalid pace keeps the current pace

use std::time::Duration;

use flip_traits::SlotRenderer;

use crate::config::{DEFAULT_INCREMENT, DEFAULT_PACE_MS, DEFAULT_RAMP_MS};
use crate::counter::Counter;
use crate::error::{CounterError, Result};
use crate::util::secs_to_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set(Option<u64>),
    /// Negative amounts subtract.
    Add(Option<i64>),
    /// Negative amounts add.
    Subtract(Option<i64>),
    Increment(Option<u64>),
    Pace(Option<u64>),
    Auto(bool),
    Step,
    To {
        target: Option<u64>,
        duration: Option<Duration>,
        pace: Option<u64>,
    },
    Stop,
    /// Let counter time pass.
    Wait(Duration),
    /// Report the current value.
    Value,
}

/// Finite number, truncated toward zero.
pub fn parse_number(token: &str) -> Option<i64> {
    let n: f64 = token.trim().parse().ok()?;
    n.is_finite().then(|| n.trunc() as i64)
}

/// Like [`parse_number`] but rejects negatives.
pub fn parse_unsigned(token: &str) -> Option<u64> {
    parse_number(token).and_then(|n| u64::try_from(n).ok())
}

/// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let line = line.split('#').next().unwrap_or("").trim();
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let bad = |msg: String| eyre::Report::new(CounterError::Command { line: line_no, msg });

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "set" => Command::Set(arg.and_then(parse_unsigned)),
        "add" => Command::Add(arg.and_then(parse_number)),
        "subtract" | "sub" => Command::Subtract(arg.and_then(parse_number)),
        "increment" | "inc" => Command::Increment(arg.and_then(parse_unsigned)),
        "pace" => Command::Pace(arg.and_then(parse_unsigned)),
        "auto" => match arg.map(str::to_ascii_lowercase).as_deref() {
            Some("on" | "true" | "1") => Command::Auto(true),
            Some("off" | "false" | "0") => Command::Auto(false),
            other => return Err(bad(format!("auto expects on|off, got {other:?}"))),
        },
        "step" => Command::Step,
        "to" => Command::To {
            target: arg.and_then(parse_unsigned),
            duration: words.next().map(|t| {
                t.trim()
                    .parse::<f64>()
                    .ok()
                    .and_then(secs_to_duration)
                    .unwrap_or(Duration::from_millis(DEFAULT_RAMP_MS))
            }),
            pace: words.next().and_then(parse_unsigned),
        },
        "stop" => Command::Stop,
        "wait" => {
            let t = arg.ok_or_else(|| bad("wait needs a duration".into()))?;
            let ms = flip_config::parse_pace(t).map_err(bad)?;
            Command::Wait(Duration::from_millis(ms))
        }
        "value" => Command::Value,
        other => return Err(bad(format!("unknown command {other:?}"))),
    };
    Ok(Some(cmd))
}

/// Parse a whole script, one command per line.
pub fn parse_script(text: &str) -> Result<Vec<Command>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(cmd) = parse_line(idx + 1, line)? {
            out.push(cmd);
        }
    }
    Ok(out)
}

impl Command {
    /// Apply to `counter`. Returns the current value for [`Command::Value`].
    pub fn apply<R: SlotRenderer>(&self, counter: &mut Counter<R>) -> Option<u64> {
        match *self {
            Command::Set(Some(n)) => {
                counter.set_value(n);
            }
            Command::Add(Some(n)) if n >= 0 => {
                counter.add(n.unsigned_abs());
            }
            Command::Add(Some(n)) => {
                counter.subtract(n.unsigned_abs());
            }
            Command::Subtract(Some(n)) if n >= 0 => {
                counter.subtract(n.unsigned_abs());
            }
            Command::Subtract(Some(n)) => {
                counter.add(n.unsigned_abs());
            }
            Command::Set(None) | Command::Add(None) | Command::Subtract(None) => {
                tracing::debug!(?self, "ignoring command with invalid number");
            }
            Command::Increment(n) => {
                counter.set_increment(n.unwrap_or(DEFAULT_INCREMENT));
            }
            Command::Pace(n) => {
                counter.set_pace(n.unwrap_or(DEFAULT_PACE_MS));
            }
            Command::Auto(on) => {
                counter.set_auto(on);
            }
            Command::Step => {
                counter.step();
            }
            Command::To {
                target: Some(target),
                duration,
                pace,
            } => {
                counter.increment_to(target, duration, pace);
            }
            Command::To { target: None, .. } | Command::Stop => {
                counter.stop();
            }
            Command::Wait(d) => counter.advance_by(d),
            Command::Value => return Some(counter.value()),
        }
        None
    }
}
