#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the flip counter.
//!
//! - `Config` and its tables are deserialized from TOML; every table is optional.
//! - `Config::validate` rejects values the engine cannot run with.
use serde::Deserialize;
use serde::de::Deserializer;

/// Upper bound for a single pace (one hour).
pub const MAX_PACE_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CounterCfg {
    /// Initial counter value.
    pub value: u64,
    /// Amount added per cycle.
    pub increment: u64,
    /// Delay between cycles. Accepts an integer (ms) or a string such as "250ms" or "1.5s".
    #[serde(alias = "pace", deserialize_with = "de_pace")]
    pub pace_ms: u64,
    /// Start counting on its own right after construction.
    pub auto: bool,
}

impl Default for CounterCfg {
    fn default() -> Self {
        Self {
            value: 0,
            increment: 1,
            pace_ms: 1000,
            auto: true,
        }
    }
}

/// Sprite geometry, in pixels. Only renderers consume it.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpriteCfg {
    pub top_frame_height: u32,
    pub bottom_frame_height: u32,
    pub frame_width: u32,
    pub bottom_offset: u32,
}

impl Default for SpriteCfg {
    fn default() -> Self {
        Self {
            top_frame_height: 20,
            bottom_frame_height: 40,
            frame_width: 29,
            bottom_offset: 200,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    /// Sleep on the wall clock between scheduled tasks.
    #[default]
    Real,
    /// Advance a simulated clock; runs finish instantly.
    Virtual,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerCfg {
    pub timing: Timing,
    /// Hard cap on how long one CLI run may take, in ms of counter time.
    pub max_wall_ms: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            timing: Timing::Real,
            max_wall_ms: 10 * 60 * 1000,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub counter: CounterCfg,
    pub sprite: SpriteCfg,
    pub logging: Logging,
    pub runner: RunnerCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaceToml {
    Millis(u64),
    Text(String),
}

fn de_pace<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match PaceToml::deserialize(deserializer)? {
        PaceToml::Millis(ms) => Ok(ms),
        PaceToml::Text(s) => parse_pace(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse "250", "250ms", "1.5s" into milliseconds.
pub fn parse_pace(s: &str) -> Result<u64, String> {
    let t = s.trim();
    let (num, scale) = if let Some(v) = t.strip_suffix("ms") {
        (v, 1.0)
    } else if let Some(v) = t.strip_suffix('s') {
        (v, 1000.0)
    } else {
        (t, 1.0)
    };
    let n: f64 = num
        .trim()
        .parse()
        .map_err(|_| format!("invalid pace {s:?}"))?;
    if !n.is_finite() || n < 0.0 {
        return Err(format!("invalid pace {s:?}"));
    }
    Ok((n * scale).round() as u64)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Counter
        if self.counter.pace_ms == 0 {
            eyre::bail!("counter.pace_ms must be >= 1");
        }
        if self.counter.pace_ms > MAX_PACE_MS {
            eyre::bail!("counter.pace_ms is unreasonably large (>1h)");
        }

        // Sprite
        if self.sprite.top_frame_height == 0 {
            eyre::bail!("sprite.top_frame_height must be > 0");
        }
        if self.sprite.bottom_frame_height == 0 {
            eyre::bail!("sprite.bottom_frame_height must be > 0");
        }
        if self.sprite.frame_width == 0 {
            eyre::bail!("sprite.frame_width must be > 0");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r:?}");
        }

        // Runner
        if self.runner.max_wall_ms == 0 {
            eyre::bail!("runner.max_wall_ms must be >= 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pace_units() {
        assert_eq!(parse_pace("250"), Ok(250));
        assert_eq!(parse_pace("250ms"), Ok(250));
        assert_eq!(parse_pace("1.5s"), Ok(1500));
        assert!(parse_pace("fast").is_err());
        assert!(parse_pace("-3s").is_err());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = load_toml("").expect("empty TOML parses");
        assert_eq!(cfg.counter.value, 0);
        assert_eq!(cfg.counter.increment, 1);
        assert_eq!(cfg.counter.pace_ms, 1000);
        assert!(cfg.counter.auto);
        assert_eq!(cfg.sprite.frame_width, 29);
        assert_eq!(cfg.runner.timing, Timing::Real);
        cfg.validate().expect("defaults are valid");
    }
}
