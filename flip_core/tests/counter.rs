use std::time::Duration;

use flip_core::mocks::RecordingRenderer;
use flip_core::{Activity, Counter, CounterCfg, DigitEdit, build_counter};
use rstest::rstest;

fn counter(value: u64, auto: bool) -> (Counter<RecordingRenderer>, RecordingRenderer) {
    let rec = RecordingRenderer::new();
    let cfg = CounterCfg {
        value,
        increment: 1,
        pace_ms: 1000,
        auto,
    };
    let c = build_counter(rec.clone(), cfg, None, false).expect("valid config");
    (c, rec)
}

fn settle<R: flip_traits::SlotRenderer>(c: &mut Counter<R>) {
    c.advance_by(Duration::from_secs(1));
}

#[test]
fn initial_layout_shows_value_with_separators() {
    let (c, rec) = counter(1_234_567, false);
    assert_eq!(rec.display(), "1,234,567");
    assert_eq!(rec.board().separator_count(), 2);
    assert!(rec.board().is_settled());
    assert!(!c.has_pending_cycle());
}

#[test]
fn growing_inserts_slots_and_flips_the_rest() {
    let (mut c, rec) = counter(0, false);
    c.set_value(1234);
    assert_eq!(
        c.last_edits(),
        &[
            DigitEdit::Insert {
                position: 3,
                digit: 1,
                separator: true
            },
            DigitEdit::Insert {
                position: 2,
                digit: 2,
                separator: false
            },
            DigitEdit::Insert {
                position: 1,
                digit: 3,
                separator: false
            },
            DigitEdit::Flip {
                position: 0,
                from: 0,
                to: 4
            },
        ]
    );
    settle(&mut c);
    assert_eq!(rec.display(), "1,234");
    assert_eq!(rec.board().separator_count(), 1);
    assert!(rec.board().is_settled());
}

#[test]
fn shrinking_removes_slots_and_separator() {
    let (mut c, rec) = counter(1000, false);
    c.set_value(999);
    assert_eq!(
        c.last_edits()[0],
        DigitEdit::Remove {
            position: 3,
            separator: true
        }
    );
    settle(&mut c);
    assert_eq!(rec.display(), "999");
    assert_eq!(rec.board().separator_count(), 0);
}

#[test]
fn setting_same_value_is_silent() {
    let (mut c, rec) = counter(42, false);
    rec.clear_events();
    c.set_value(42);
    settle(&mut c);
    assert!(c.last_edits().is_empty());
    assert!(rec.events().is_empty());
}

#[test]
fn enabling_auto_runs_one_cycle_immediately() {
    let (mut c, rec) = counter(15, false);
    c.set_auto(true);
    assert_eq!(c.value(), 16);
    assert_eq!(
        c.last_edits(),
        &[DigitEdit::Flip {
            position: 0,
            from: 5,
            to: 6
        }]
    );
    assert_eq!(c.activity(), Activity::Counting);

    c.advance_by(Duration::from_millis(999));
    assert_eq!(c.value(), 16);
    c.advance_by(Duration::from_millis(1));
    assert_eq!(c.value(), 17);

    c.set_auto(false);
    assert_eq!(c.activity(), Activity::Idle);
    c.advance_by(Duration::from_secs(5));
    assert_eq!(c.value(), 17);
    assert_eq!(rec.display(), "17");
}

#[test]
fn auto_from_construction_waits_one_pace() {
    let (mut c, _rec) = counter(0, true);
    assert_eq!(c.value(), 0);
    assert!(c.has_pending_cycle());
    c.advance_by(Duration::from_millis(3000));
    assert_eq!(c.value(), 3);
}

#[test]
fn repeated_auto_on_keeps_one_cycle() {
    let (mut c, _rec) = counter(0, true);
    c.set_auto(true).set_auto(true);
    c.advance_by(Duration::from_millis(1000));
    assert_eq!(c.value(), 1);
}

#[test]
fn step_is_ignored_in_auto_mode() {
    let (mut c, _rec) = counter(7, true);
    c.step();
    assert_eq!(c.value(), 7);
    c.stop().step().step();
    assert_eq!(c.value(), 9);
}

#[rstest]
#[case(5, 9, 0)]
#[case(10, 3, 7)]
#[case(0, 0, 0)]
fn subtract_clamps_at_zero(#[case] start: u64, #[case] by: u64, #[case] expected: u64) {
    let (mut c, rec) = counter(start, false);
    c.subtract(by);
    settle(&mut c);
    assert_eq!(c.value(), expected);
    assert_eq!(rec.display(), expected.to_string());
}

#[test]
fn plain_ramp_takes_one_step_per_pace() {
    let (mut c, rec) = counter(90, false);
    c.increment_to(100, None, None);
    assert_eq!(c.value(), 91);
    assert!(c.is_auto());
    assert_eq!(c.activity(), Activity::Ramping { target: 100 });

    c.advance_by(Duration::from_millis(9000));
    assert_eq!(c.value(), 100);
    assert_eq!(c.stats().changes, 10);
    assert!(c.is_auto());

    c.advance_by(Duration::from_millis(1000));
    assert!(!c.is_auto());
    assert!(!c.has_pending_cycle());
    assert_eq!(c.stats().changes, 10);

    c.advance_by(Duration::from_secs(1));
    assert!(c.is_idle());
    assert_eq!(rec.display(), "100");
}

#[test]
fn plain_ramp_never_overshoots() {
    let (mut c, _rec) = counter(0, false);
    c.set_increment(4).increment_to(10, None, None);
    c.advance_by(Duration::from_secs(10));
    assert_eq!(c.value(), 10);
    assert!(!c.is_auto());
    assert_eq!(c.stats().changes, 3);
}

#[test]
fn timed_ramp_lands_on_target_in_budget() {
    let (mut c, rec) = counter(0, false);
    c.increment_to(37, Some(Duration::from_secs(10)), Some(1000));
    let plan = c.last_plan().expect("plan adopted");
    assert_eq!((plan.increment, plan.pace_ms, plan.cycles), (3, 1000, 10));
    assert_eq!(c.increment(), 3);
    assert_eq!(c.value(), 3);

    c.advance_by(Duration::from_millis(8000));
    assert_eq!(c.value(), 27);
    c.advance_by(Duration::from_millis(1000));
    assert_eq!(c.value(), 37);
    assert_eq!(c.stats().changes, 10);

    c.advance_by(Duration::from_millis(1000));
    assert!(!c.is_auto());
    c.advance_by(Duration::from_secs(1));
    assert_eq!(rec.display(), "37");
    assert!(rec.board().is_settled());
}

#[test]
fn timed_ramp_to_current_or_lower_turns_auto_off() {
    let (mut c, _rec) = counter(50, true);
    c.increment_to(40, Some(Duration::from_secs(5)), None);
    assert_eq!(c.value(), 50);
    assert!(!c.is_auto());
    assert!(!c.has_pending_cycle());
    assert_eq!(c.last_plan(), None);
}

#[test]
fn new_ramp_replaces_pending_cycle() {
    let (mut c, _rec) = counter(0, true);
    c.increment_to(3, None, None);
    c.increment_to(2, None, None);
    c.advance_by(Duration::from_secs(10));
    assert_eq!(c.value(), 2);
    assert!(!c.is_auto());
}

#[test]
fn stop_cancels_cycle_but_flips_finish() {
    let (mut c, rec) = counter(9, true);
    c.advance_by(Duration::from_millis(1000));
    assert_eq!(c.value(), 10);
    c.stop();
    assert!(!c.has_pending_cycle());
    assert!(!c.is_auto());
    assert!(!c.is_idle(), "flip still in flight");
    c.advance_by(Duration::from_secs(2));
    assert!(c.is_idle());
    assert_eq!(c.value(), 10);
    assert_eq!(rec.display(), "10");
    c.stop();
    assert!(c.is_idle());
}

#[test]
fn add_saturates() {
    let (mut c, _rec) = counter(u64::MAX - 1, false);
    c.add(5);
    assert_eq!(c.value(), u64::MAX);
}

#[test]
fn pace_change_applies_to_next_scheduled_cycle() {
    let (mut c, _rec) = counter(0, true);
    c.set_pace(200);
    c.advance_by(Duration::from_millis(1000));
    assert_eq!(c.value(), 1);
    c.advance_by(Duration::from_millis(200));
    assert_eq!(c.value(), 2);
    c.set_pace(0);
    assert_eq!(c.pace_ms(), 1000);
}
