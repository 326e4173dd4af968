//! Seven-frame mechanical flip for one digit slot.
//!
//! Frames 0..=2 drive the upper card (old, old, new); frames 3..=6 drive the
//! lower card (old, new, new, new). Frames are spaced by a per-position delay,
//! except 2 -> 3 which happens in the same tick so the swap looks instant.

use std::time::Duration;

use flip_traits::{Frame, Half};

use crate::util::MICROS_PER_MILLI;

/// Number of frames in one flip.
pub const FRAME_COUNT: u8 = 7;
/// Slowest a single frame step may be.
pub const MAX_FRAME_DELAY: Duration = Duration::from_millis(80);
/// Paces at or below this use position-scaled frame delays in auto mode.
pub const FAST_PACE_MS: u64 = 300;

/// Inputs to the frame-delay rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedContext {
    pub auto: bool,
    pub pace_ms: u64,
}

/// Delay between frames for a digit at `position`.
///
/// In auto mode with a fast pace, low positions flip quicker so they finish
/// inside one cycle: pace/6, /5, /4, /3 for positions 0..=3, and pace/1.5
/// beyond. Otherwise 80 ms. Never more than [`MAX_FRAME_DELAY`].
pub fn frame_delay(position: usize, ctx: SpeedContext) -> Duration {
    if !(ctx.auto && ctx.pace_ms <= FAST_PACE_MS) {
        return MAX_FRAME_DELAY;
    }
    let pace_us = ctx.pace_ms * MICROS_PER_MILLI;
    let us = match position {
        0 => pace_us / 6,
        1 => pace_us / 5,
        2 => pace_us / 4,
        3 => pace_us / 3,
        _ => pace_us * 2 / 3,
    };
    Duration::from_micros(us).min(MAX_FRAME_DELAY)
}

/// Frame `step` of a flip from `from` to `to`.
pub fn frame_at(step: u8, from: u8, to: u8) -> Frame {
    let (half, column, digit) = match step {
        0 => (Half::Upper, 1, from),
        1 => (Half::Upper, 2, from),
        2 => (Half::Upper, 0, to),
        3 => (Half::Lower, 1, from),
        4 => (Half::Lower, 2, to),
        5 => (Half::Lower, 3, to),
        _ => (Half::Lower, 0, to),
    };
    Frame {
        half,
        column,
        digit,
    }
}

/// In-flight flip of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipAnimation {
    position: usize,
    from: u8,
    to: u8,
    delay: Duration,
    next_step: u8,
}

impl FlipAnimation {
    pub fn new(position: usize, from: u8, to: u8, ctx: SpeedContext) -> Self {
        Self {
            position,
            from,
            to,
            delay: frame_delay(position, ctx),
            next_step: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_finished(&self) -> bool {
        self.next_step >= FRAME_COUNT
    }

    /// Emit the frame(s) due now and return the wait before the next tick,
    /// or `None` once the last frame has been emitted.
    pub fn tick(&mut self, mut emit: impl FnMut(Frame)) -> Option<Duration> {
        if self.is_finished() {
            return None;
        }
        emit(frame_at(self.next_step, self.from, self.to));
        self.next_step += 1;
        // midpoint: lower card starts without waiting
        if self.next_step == 3 {
            emit(frame_at(self.next_step, self.from, self.to));
            self.next_step += 1;
        }
        (!self.is_finished()).then_some(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANUAL: SpeedContext = SpeedContext {
        auto: false,
        pace_ms: 100,
    };

    #[test]
    fn manual_and_slow_paces_use_cap() {
        assert_eq!(frame_delay(0, MANUAL), MAX_FRAME_DELAY);
        let slow = SpeedContext {
            auto: true,
            pace_ms: 301,
        };
        for p in 0..6 {
            assert_eq!(frame_delay(p, slow), MAX_FRAME_DELAY);
        }
    }

    #[test]
    fn fast_auto_scales_by_position() {
        let ctx = SpeedContext {
            auto: true,
            pace_ms: 120,
        };
        assert_eq!(frame_delay(0, ctx), Duration::from_millis(20));
        assert_eq!(frame_delay(1, ctx), Duration::from_millis(24));
        assert_eq!(frame_delay(2, ctx), Duration::from_millis(30));
        assert_eq!(frame_delay(3, ctx), Duration::from_millis(40));
        assert_eq!(frame_delay(4, ctx), Duration::from_millis(80));
        assert_eq!(frame_delay(9, ctx), Duration::from_millis(80));
    }

    #[test]
    fn fast_auto_is_capped() {
        let ctx = SpeedContext {
            auto: true,
            pace_ms: 300,
        };
        assert_eq!(frame_delay(0, ctx), Duration::from_millis(50));
        assert_eq!(frame_delay(3, ctx), MAX_FRAME_DELAY);
        assert_eq!(frame_delay(4, ctx), MAX_FRAME_DELAY);
    }

    #[test]
    fn tick_sequence_merges_midpoint() {
        let mut anim = FlipAnimation::new(0, 3, 4, MANUAL);
        let mut ticks = Vec::new();
        loop {
            let mut frames = Vec::new();
            let next = anim.tick(|f| frames.push(f));
            ticks.push(frames);
            if next.is_none() {
                break;
            }
            assert_eq!(next, Some(MAX_FRAME_DELAY));
        }
        let sizes: Vec<usize> = ticks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 2, 1, 1, 1]);
        assert_eq!(ticks[2][0], frame_at(2, 3, 4));
        assert_eq!(ticks[2][1], frame_at(3, 3, 4));
        assert!(anim.is_finished());
        assert_eq!(anim.tick(|_| panic!("no frames after finish")), None);
    }

    #[test]
    fn frames_end_resting_on_new_digit() {
        assert_eq!(frame_at(2, 1, 2), Frame::resting(Half::Upper, 2));
        assert_eq!(frame_at(6, 1, 2), Frame::resting(Half::Lower, 2));
        assert_eq!(frame_at(3, 1, 2).digit, 1);
    }
}
