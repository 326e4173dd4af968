use flip_config::{Timing, load_file, load_toml};
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

#[rstest]
#[case("[counter]\npace_ms = 0\n", "pace_ms must be >= 1")]
#[case("[counter]\npace_ms = 7200000\n", "unreasonably large")]
#[case("[sprite]\nframe_width = 0\n", "frame_width must be > 0")]
#[case("[sprite]\ntop_frame_height = 0\n", "top_frame_height must be > 0")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
#[case("[runner]\nmax_wall_ms = 0\n", "max_wall_ms must be >= 1")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[test]
fn accepts_full_config() {
    let toml = r#"
[counter]
value = 1234
increment = 5
pace_ms = 250
auto = false

[sprite]
top_frame_height = 39
bottom_frame_height = 64
frame_width = 53
bottom_offset = 390

[logging]
level = "debug"
rotation = "daily"

[runner]
timing = "virtual"
max_wall_ms = 60000
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.counter.value, 1234);
    assert_eq!(cfg.counter.increment, 5);
    assert_eq!(cfg.counter.pace_ms, 250);
    assert!(!cfg.counter.auto);
    assert_eq!(cfg.sprite.bottom_offset, 390);
    assert_eq!(cfg.runner.timing, Timing::Virtual);
}

#[rstest]
#[case("pace_ms = 300", 300)]
#[case("pace_ms = \"300ms\"", 300)]
#[case("pace = \"2s\"", 2000)]
fn pace_accepts_units(#[case] line: &str, #[case] expected: u64) {
    let cfg = load_toml(&format!("[counter]\n{line}\n")).expect("parse TOML");
    assert_eq!(cfg.counter.pace_ms, expected);
}

#[test]
fn rejects_garbage_pace_at_parse_time() {
    assert!(load_toml("[counter]\npace_ms = \"soon\"\n").is_err());
}

#[test]
fn load_file_reports_missing_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let err = load_file(&path).expect_err("missing file");
    assert!(format!("{err}").contains("read config"));

    let ok = dir.path().join("cfg.toml");
    fs::write(&ok, "[counter]\nvalue = 9\n").unwrap();
    assert_eq!(load_file(&ok).unwrap().counter.value, 9);
}
