//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use flip_core::error::{BuildError, CounterError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingRenderer => {
                "What happened: No renderer was provided to the counter.\nLikely causes: The builder was used without with_renderer(...).\nHow to fix: Pass a SlotRenderer to the builder before build().".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Check [counter] and [sprite] in the config and the --pace flag, then rerun."
            ),
        };
    }

    if let Some(ce) = err.chain().find_map(|e| e.downcast_ref::<CounterError>()) {
        return match ce {
            CounterError::Command { line, msg } => format!(
                "What happened: The script could not be parsed (line {line}: {msg}).\nLikely causes: Unknown command or missing argument.\nHow to fix: Use set, add, subtract, increment, pace, auto on|off, step, to, stop, wait or value."
            ),
            CounterError::Timeout(ms) => format!(
                "What happened: The counter was still busy after {ms} ms.\nLikely causes: Ramp target too far for the pace, increment 0, or a script wait longer than the run limit.\nHow to fix: Pass --seconds for a timed ramp, shorten the waits, or raise runner.max_wall_ms."
            ),
            CounterError::Config(msg) => format!(
                "What happened: {msg}.\nLikely causes: A flag value could not be used.\nHow to fix: Check the command-line arguments (see --help)."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Check the path and rerun. Original: {msg}"
        );
    }

    if lower.contains("parse config") || lower.contains("invalid pace") {
        return format!(
            "What happened: The config file is not valid TOML for this tool.\nLikely causes: Typo in a key, or a pace such as \"fast\" instead of \"250ms\".\nHow to fix: Fix the file and try again. Original: {msg}"
        );
    }

    if ["counter.", "sprite.", "runner.", "logging."]
        .iter()
        .any(|table| lower.starts_with(table))
    {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Zero or out-of-range values.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for script errors, 4 for timeouts, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use flip_core::error::CounterError;
    match err.chain().find_map(|e| e.downcast_ref::<CounterError>()) {
        Some(CounterError::Command { .. }) => 3,
        Some(CounterError::Timeout(_)) => 4,
        _ => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use flip_core::error::{BuildError, CounterError};
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    match err.chain().find_map(|e| e.downcast_ref::<CounterError>()) {
        Some(CounterError::Command { .. }) => "Script",
        Some(CounterError::Timeout(_)) => "Timeout",
        Some(CounterError::Config(_)) => "InvalidArgument",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use flip_core::error::CounterError;
    use serde_json::json;

    let reason = reason_name(err);
    let msg = humanize(err);
    let details = match err.chain().find_map(|e| e.downcast_ref::<CounterError>()) {
        Some(CounterError::Command { line, .. }) => Some(json!({ "line": line })),
        Some(CounterError::Timeout(ms)) => Some(json!({ "max_wall_ms": ms })),
        _ => None,
    };
    let obj = match details {
        Some(d) => json!({ "reason": reason, "details": d, "message": msg }),
        None => json!({ "reason": reason, "message": msg }),
    };
    obj.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flip_core::error::{BuildError, CounterError};

    #[test]
    fn timeout_maps_to_exit_code_and_json() {
        let err = eyre::Report::new(CounterError::Timeout(500)).wrap_err("ramp to 9 did not finish");
        assert_eq!(exit_code_for_error(&err), 4);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Timeout");
        assert_eq!(v["details"]["max_wall_ms"], 500);
    }

    #[test]
    fn build_errors_are_explained() {
        let err = eyre::Report::new(BuildError::InvalidConfig("pace_ms must be >= 1"));
        assert!(humanize(&err).contains("pace_ms must be >= 1"));
        assert_eq!(exit_code_for_error(&err), 1);
    }

    #[test]
    fn config_validation_messages_are_recognised() {
        let err = eyre::eyre!("counter.pace_ms must be >= 1");
        assert!(humanize(&err).starts_with("What happened: Configuration is invalid"));
    }

    #[test]
    fn every_counter_error_has_its_own_reason() {
        let cases = [
            (CounterError::Config("--seconds".into()), "InvalidArgument", 1),
            (CounterError::Command { line: 2, msg: "unknown command".into() }, "Script", 3),
            (CounterError::Timeout(1000), "Timeout", 4),
        ];
        for (e, reason, code) in cases {
            let err = eyre::Report::new(e);
            assert_eq!(reason_name(&err), reason);
            assert_eq!(exit_code_for_error(&err), code);
            assert!(humanize(&err).starts_with("What happened:"));
        }
    }
}
