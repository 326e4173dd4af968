use std::time::Duration;

use flip_core::mocks::{FailingRenderer, RecordingRenderer};
use flip_core::{CounterCfg, FrameRecord, build_counter, frame_at};
use flip_traits::Half;

fn times_ms(trace: &[FrameRecord]) -> Vec<u64> {
    trace.iter().map(|r| r.at.as_millis() as u64).collect()
}

#[test]
fn manual_flip_uses_capped_delay_and_merged_midpoint() {
    let rec = RecordingRenderer::new();
    let cfg = CounterCfg {
        auto: false,
        ..CounterCfg::default()
    };
    let mut c = build_counter(rec, cfg, None, true).unwrap();
    // initial layout paints both halves of slot 0
    assert_eq!(c.take_trace().len(), 2);

    c.set_value(1);
    c.advance_by(Duration::from_secs(1));
    let trace = c.take_trace();
    assert_eq!(times_ms(&trace), vec![0, 80, 160, 160, 240, 320, 400]);
    let frames: Vec<_> = trace.iter().map(|r| r.frame).collect();
    let expected: Vec<_> = (0..7).map(|s| frame_at(s, 0, 1)).collect();
    assert_eq!(frames, expected);
    assert!(trace.iter().all(|r| r.position == 0));
}

#[test]
fn fast_auto_pace_shortens_low_positions() {
    let rec = RecordingRenderer::new();
    let cfg = CounterCfg {
        value: 0,
        increment: 1,
        pace_ms: 120,
        auto: true,
    };
    let mut c = build_counter(rec.clone(), cfg, None, true).unwrap();
    c.take_trace();

    c.advance_to(Duration::from_millis(230));
    assert_eq!(c.value(), 1);
    assert_eq!(
        times_ms(&c.take_trace()),
        vec![120, 140, 160, 160, 180, 200, 220]
    );
    assert!(rec.board().is_settled());
}

#[test]
fn concurrent_flips_all_settle() {
    let rec = RecordingRenderer::new();
    let cfg = CounterCfg {
        value: 1999,
        auto: false,
        ..CounterCfg::default()
    };
    let mut c = build_counter(rec.clone(), cfg, None, false).unwrap();
    c.add(1);
    assert_eq!(c.stats().flips, 4);
    c.advance_by(Duration::from_millis(400));
    assert_eq!(rec.display(), "2,000");
    assert!(rec.board().is_settled());
    assert_eq!(c.stats().frames_painted, 8 + 4 * 7);
}

#[test]
fn lower_half_lags_upper_mid_flip() {
    let rec = RecordingRenderer::new();
    let cfg = CounterCfg {
        value: 3,
        auto: false,
        ..CounterCfg::default()
    };
    let mut c = build_counter(rec.clone(), cfg, None, false).unwrap();
    c.set_value(4);
    c.advance_by(Duration::from_millis(100));
    let slot = *rec.board().slot(0).unwrap();
    assert_eq!(slot.upper.half, Half::Upper);
    assert_eq!((slot.upper.column, slot.upper.digit), (2, 3));
    assert_eq!((slot.lower.column, slot.lower.digit), (0, 3));
}

#[test]
fn renderer_failures_do_not_stop_the_counter() {
    let cfg = CounterCfg {
        value: 12,
        auto: false,
        ..CounterCfg::default()
    };
    let mut c = build_counter(FailingRenderer, cfg, None, false).unwrap();
    c.set_value(1234);
    c.advance_by(Duration::from_secs(1));
    c.set_value(5);
    c.advance_by(Duration::from_secs(1));
    assert_eq!(c.value(), 5);
    let stats = c.stats();
    assert_eq!(stats.frames_painted, 0);
    assert!(stats.render_faults >= 4);
    assert!(stats.frames_skipped > 0);
    assert!(c.is_idle());
}
