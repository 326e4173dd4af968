//! Drive a counter's virtual timeline against a `Clock`.
//!
//! Virtual time is anchored to a wall-clock epoch taken at the start of the
//! run, so late wakeups never accumulate drift: each wakeup fires everything
//! the epoch says is due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use flip_traits::{Clock, SlotRenderer};

use crate::counter::Counter;
use crate::error::{CounterError, Result};
use crate::util::as_ms;

/// Longest single sleep, so a shutdown request is noticed promptly.
pub const MAX_SLEEP_SLICE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested window of time has passed.
    WindowElapsed,
    /// Nothing left to fire.
    Idle,
    /// The shutdown flag was raised.
    Shutdown,
}

fn shutdown_requested(flag: Option<&AtomicBool>) -> bool {
    flag.is_some_and(|f| f.load(Ordering::Relaxed))
}

/// Run for `window` of wall time (as reported by `clock`), firing tasks as they come due.
pub fn run_for<R: SlotRenderer, C: Clock + ?Sized>(
    counter: &mut Counter<R>,
    clock: &C,
    window: Duration,
    shutdown: Option<&AtomicBool>,
) -> StopReason {
    run_for_with(counter, clock, window, shutdown, |_| {})
}

/// [`run_for`], calling `on_wake` after each batch of due tasks has fired.
pub fn run_for_with<R: SlotRenderer, C: Clock + ?Sized>(
    counter: &mut Counter<R>,
    clock: &C,
    window: Duration,
    shutdown: Option<&AtomicBool>,
    mut on_wake: impl FnMut(&mut Counter<R>),
) -> StopReason {
    let epoch = clock.now();
    let start = counter.now();
    let end = start.saturating_add(window);
    loop {
        if shutdown_requested(shutdown) {
            return StopReason::Shutdown;
        }
        let wall = start.saturating_add(clock.now().saturating_duration_since(epoch));
        counter.advance_to(wall.min(end));
        on_wake(counter);
        if wall >= end {
            return StopReason::WindowElapsed;
        }
        let wake = counter.next_due().unwrap_or(end).min(end);
        clock.sleep(wake.saturating_sub(wall).min(MAX_SLEEP_SLICE));
    }
}

/// Run until no task is left, giving up after `max` of wall time.
///
/// A counter in auto mode is never idle, so this only returns
/// [`StopReason::Idle`] for finite work such as a ramp or a single change.
pub fn run_until_idle<R: SlotRenderer, C: Clock + ?Sized>(
    counter: &mut Counter<R>,
    clock: &C,
    max: Duration,
    shutdown: Option<&AtomicBool>,
) -> Result<StopReason> {
    run_until_idle_with(counter, clock, max, shutdown, |_| {})
}

/// [`run_until_idle`], calling `on_wake` after each batch of due tasks has fired.
pub fn run_until_idle_with<R: SlotRenderer, C: Clock + ?Sized>(
    counter: &mut Counter<R>,
    clock: &C,
    max: Duration,
    shutdown: Option<&AtomicBool>,
    mut on_wake: impl FnMut(&mut Counter<R>),
) -> Result<StopReason> {
    let epoch = clock.now();
    let start = counter.now();
    let end = start.saturating_add(max);
    loop {
        if shutdown_requested(shutdown) {
            return Ok(StopReason::Shutdown);
        }
        let wall = start.saturating_add(clock.now().saturating_duration_since(epoch));
        counter.advance_to(wall.min(end));
        on_wake(counter);
        if counter.is_idle() {
            tracing::debug!(elapsed_ms = as_ms(counter.now() - start), "counter idle");
            return Ok(StopReason::Idle);
        }
        if wall >= end {
            return Err(CounterError::Timeout(as_ms(max)).into());
        }
        let wake = counter.next_due().unwrap_or(end).min(end);
        clock.sleep(wake.saturating_sub(wall).min(MAX_SLEEP_SLICE));
    }
}
