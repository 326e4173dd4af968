#![no_main]
use libfuzzer_sys::fuzz_target;

use flip_core::mocks::RecordingRenderer;
use flip_core::{Command, CounterCfg, build_counter, parse_script};

fuzz_target!(|data: &str| {
    let Ok(commands) = parse_script(data) else {
        return;
    };
    let cfg = CounterCfg {
        auto: false,
        ..CounterCfg::default()
    };
    let Ok(mut counter) = build_counter(RecordingRenderer::new(), cfg, None, false) else {
        return;
    };
    // Waits are capped so a fuzzed "wait 1e12" cannot spin for hours.
    for cmd in commands.iter().take(64) {
        match cmd {
            Command::Wait(d) => counter.advance_by((*d).min(std::time::Duration::from_secs(5))),
            other => {
                other.apply(&mut counter);
            }
        }
    }
});
