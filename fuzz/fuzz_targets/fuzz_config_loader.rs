#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are fine; panics are not.
    if let Ok(cfg) = flip_config::load_toml(data) {
        let _ = cfg.validate();
    }
    let _ = flip_config::parse_pace(data);
});
