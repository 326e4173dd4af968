//! The counter controller (`Counter`).
//!
//! Owns the value and settings, pushes every value change through the diff
//! engine, and keeps at most one top-level timer (auto cycle or ramp step)
//! pending. Flip animations share the same queue but are not tracked, so
//! `stop()` lets them run to completion.

use std::time::Duration;

use flip_traits::{Frame, Half, SlotHandle, SlotRenderer};

use crate::animator::{FlipAnimation, SpeedContext};
use crate::config::{CounterCfg, DEFAULT_PACE_MS, SpriteGeometry};
use crate::diff::{DigitEdit, diff};
use crate::digits::{separator_before, to_digit_sequence};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::smart::{self, SmartRampPlan};
use crate::status::{Activity, CounterState, CounterStats};
use crate::util::as_ms;

/// Bounded run toward a target. `remaining` is `None` for a plain ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ramp {
    pub(crate) target: u64,
    pub(crate) remaining: Option<u64>,
}

#[derive(Debug)]
pub(crate) enum Task {
    Count,
    Ramp(Ramp),
    Flip(FlipAnimation),
}

/// One frame handed to the renderer, recorded when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    pub at: Duration,
    pub position: usize,
    pub frame: Frame,
}

pub struct Counter<R: SlotRenderer> {
    pub(crate) renderer: R,
    pub(crate) geometry: SpriteGeometry,
    pub(crate) slots: Vec<Option<SlotHandle>>,
    pub(crate) value: u64,
    pub(crate) increment: u64,
    pub(crate) pace_ms: u64,
    pub(crate) auto: bool,
    /// The single outstanding top-level timer. Written only by `reschedule`
    /// and cleared when that timer fires.
    pub(crate) pending: Option<TimerHandle>,
    pub(crate) scheduler: Scheduler<Task>,
    pub(crate) last_edits: Vec<DigitEdit>,
    pub(crate) last_plan: Option<SmartRampPlan>,
    pub(crate) stats: CounterStats,
    pub(crate) trace: Option<Vec<FrameRecord>>,
}

impl<R: SlotRenderer> core::fmt::Debug for Counter<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Counter")
            .field("value", &self.value)
            .field("increment", &self.increment)
            .field("pace_ms", &self.pace_ms)
            .field("auto", &self.auto)
            .field("pending", &self.pending)
            .field("now", &self.scheduler.now())
            .finish()
    }
}

impl<R: SlotRenderer> Counter<R> {
    /// Lay out the initial digits and, in auto mode, schedule the first cycle
    /// one pace from now. Configuration must already be validated.
    pub(crate) fn assemble(
        renderer: R,
        config: CounterCfg,
        geometry: SpriteGeometry,
        trace: bool,
    ) -> Self {
        let mut counter = Self {
            renderer,
            geometry,
            slots: Vec::new(),
            value: config.value,
            increment: config.increment,
            pace_ms: config.pace_ms,
            auto: config.auto,
            pending: None,
            scheduler: Scheduler::new(),
            last_edits: Vec::new(),
            last_plan: None,
            stats: CounterStats::default(),
            trace: trace.then(Vec::new),
        };
        for (position, digit) in to_digit_sequence(counter.value).into_iter().enumerate() {
            counter.attach(position, digit, separator_before(position));
        }
        if counter.auto {
            counter.reschedule(Some(Task::Count));
        }
        counter
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    pub fn pace_ms(&self) -> u64 {
        self.pace_ms
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Whether a top-level cycle (auto count or ramp step) is scheduled.
    pub fn has_pending_cycle(&self) -> bool {
        self.pending.is_some()
    }

    pub fn activity(&self) -> Activity {
        match self.pending.and_then(|h| self.scheduler.get(h)) {
            Some(Task::Count) => Activity::Counting,
            Some(Task::Ramp(r)) => Activity::Ramping { target: r.target },
            _ => Activity::Idle,
        }
    }

    pub fn state(&self) -> CounterState {
        CounterState {
            value: self.value,
            increment: self.increment,
            pace_ms: self.pace_ms,
            auto: self.auto,
            activity: self.activity(),
        }
    }

    pub fn stats(&self) -> CounterStats {
        self.stats
    }

    /// Edits produced by the most recent value change.
    pub fn last_edits(&self) -> &[DigitEdit] {
        &self.last_edits
    }

    /// Plan adopted by the most recent timed `increment_to`.
    pub fn last_plan(&self) -> Option<SmartRampPlan> {
        self.last_plan
    }

    pub fn geometry(&self) -> &SpriteGeometry {
        &self.geometry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Drain recorded frames. Empty when tracing is off.
    pub fn take_trace(&mut self) -> Vec<FrameRecord> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    // ── Operations ───────────────────────────────────────────────────────────

    /// Animate to `n` from whatever is shown now.
    pub fn set_value(&mut self, n: u64) -> &mut Self {
        let old = self.value;
        self.value = n;
        self.render_change(old, n);
        self
    }

    /// Takes effect on the next cycle; no animation.
    pub fn set_increment(&mut self, n: u64) -> &mut Self {
        self.increment = n;
        self
    }

    /// Takes effect on the next scheduled cycle. Zero restores the default pace.
    pub fn set_pace(&mut self, ms: u64) -> &mut Self {
        self.pace_ms = if ms == 0 { DEFAULT_PACE_MS } else { ms };
        self
    }

    /// Turning auto on runs a cycle immediately; turning it off cancels the pending one.
    pub fn set_auto(&mut self, enabled: bool) -> &mut Self {
        if enabled && !self.auto {
            self.auto = true;
            tracing::info!(value = self.value, pace_ms = self.pace_ms, "auto mode on");
            self.do_count();
        } else if !enabled && self.auto {
            self.reschedule(None);
            self.auto = false;
            tracing::info!(value = self.value, "auto mode off");
        }
        self
    }

    /// One manual cycle. Ignored while auto mode is on.
    pub fn step(&mut self) -> &mut Self {
        if !self.auto {
            self.do_count();
        }
        self
    }

    pub fn add(&mut self, n: u64) -> &mut Self {
        let old = self.value;
        self.value = old.saturating_add(n);
        self.render_change(old, self.value);
        self
    }

    /// Clamps at zero.
    pub fn subtract(&mut self, n: u64) -> &mut Self {
        let old = self.value;
        self.value = old.saturating_sub(n);
        self.render_change(old, self.value);
        self
    }

    /// Step toward `target`, one step per pace, with auto mode forced on until
    /// the target is reached.
    ///
    /// With a `duration`, the increment and pace are solved so the run lands on
    /// the target within that time (`pace_ms` is the preferred pace; current
    /// pace when `None`). Without one, the current increment and pace are used.
    pub fn increment_to(
        &mut self,
        target: u64,
        duration: Option<Duration>,
        pace_ms: Option<u64>,
    ) -> &mut Self {
        self.reschedule(None);
        let Some(duration) = duration else {
            self.do_ramp(Ramp {
                target,
                remaining: None,
            });
            return self;
        };

        let duration_ms = as_ms(duration);
        let desired = pace_ms.filter(|p| *p > 0).unwrap_or(self.pace_ms);
        let plan = target
            .checked_sub(self.value)
            .and_then(|diff| smart::solve(diff, duration_ms, desired));
        match plan {
            Some(plan) => {
                tracing::info!(
                    from = self.value,
                    target,
                    duration_ms,
                    increment = plan.increment,
                    pace_ms = plan.pace_ms,
                    cycles = plan.cycles,
                    "smart ramp"
                );
                self.increment = plan.increment;
                self.pace_ms = plan.pace_ms;
                self.last_plan = Some(plan);
                self.do_ramp(Ramp {
                    target,
                    remaining: Some(plan.cycles),
                });
            }
            None => {
                tracing::debug!(value = self.value, target, "at or past target; no ramp");
                self.auto = false;
            }
        }
        self
    }

    /// Cancel the pending cycle and leave auto mode. In-flight flips finish.
    pub fn stop(&mut self) -> &mut Self {
        self.reschedule(None);
        self.auto = false;
        self
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Current virtual time of the counter's timeline.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Due time of the next scheduled task, if any.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// No cycles and no animations left.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_empty()
    }

    pub fn advance_by(&mut self, d: Duration) {
        let t = self.now().saturating_add(d);
        self.advance_to(t);
    }

    /// Fire every task due at or before `t`, in order, then move time to `t`.
    pub fn advance_to(&mut self, t: Duration) {
        while let Some((handle, task)) = self.scheduler.pop_due(t) {
            if self.pending == Some(handle) {
                self.pending = None;
            }
            match task {
                Task::Count => self.do_count(),
                Task::Ramp(ramp) => self.do_ramp(ramp),
                Task::Flip(anim) => self.tick_flip(anim),
            }
        }
        self.scheduler.advance_to(t);
    }

    // ── Internals ────────────────────────────────────────────────────────────

    /// Cancel the pending top-level timer, then register `next` one pace out.
    fn reschedule(&mut self, next: Option<Task>) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        let pace = Duration::from_millis(self.pace_ms);
        self.pending = next.map(|task| self.scheduler.schedule(pace, task));
    }

    fn do_count(&mut self) {
        let old = self.value;
        self.value = old.saturating_add(self.increment);
        tracing::debug!(old, new = self.value, "count cycle");
        self.render_change(old, self.value);
        if self.auto {
            self.reschedule(Some(Task::Count));
        }
    }

    fn do_ramp(&mut self, mut ramp: Ramp) {
        if let Some(r) = ramp.remaining.as_mut() {
            *r = r.saturating_sub(1);
        }
        if self.value == ramp.target {
            self.auto = false;
            tracing::info!(value = self.value, "ramp reached target");
            return;
        }
        let old = self.value;
        self.auto = true;
        self.value = old
            .checked_add(self.increment)
            .filter(|v| *v <= ramp.target && ramp.remaining != Some(0))
            .unwrap_or(ramp.target);
        tracing::debug!(old, new = self.value, target = ramp.target, "ramp step");
        self.render_change(old, self.value);
        self.reschedule(Some(Task::Ramp(ramp)));
    }

    fn render_change(&mut self, old: u64, new: u64) {
        let edits = diff(old, new);
        self.stats.changes += 1;
        for edit in &edits {
            match *edit {
                DigitEdit::Insert {
                    position,
                    digit,
                    separator,
                } => self.attach(position, digit, separator),
                DigitEdit::Remove {
                    position,
                    separator,
                } => self.detach(position, separator),
                DigitEdit::Flip { position, from, to } => self.start_flip(position, from, to),
            }
        }
        self.last_edits = edits;
    }

    fn attach(&mut self, position: usize, digit: u8, separator: bool) {
        if self.slots.len() <= position {
            self.slots.resize(position + 1, None);
        }
        match self.renderer.attach_slot(position, digit, separator) {
            Ok(handle) => {
                self.slots[position] = Some(handle);
                self.paint(position, Frame::resting(Half::Upper, digit));
                self.paint(position, Frame::resting(Half::Lower, digit));
            }
            Err(e) => {
                self.stats.render_faults += 1;
                self.slots[position] = None;
                tracing::warn!(error = %e, position, "attach_slot failed; slot left blank");
            }
        }
    }

    fn detach(&mut self, position: usize, separator: bool) {
        let handle = self.slots.get_mut(position).and_then(Option::take);
        self.slots.truncate(position);
        if let Some(handle) = handle
            && let Err(e) = self.renderer.detach_slot(handle, separator)
        {
            self.stats.render_faults += 1;
            tracing::warn!(error = %e, position, "detach_slot failed");
        }
    }

    fn start_flip(&mut self, position: usize, from: u8, to: u8) {
        let ctx = SpeedContext {
            auto: self.auto,
            pace_ms: self.pace_ms,
        };
        self.stats.flips += 1;
        self.tick_flip(FlipAnimation::new(position, from, to, ctx));
    }

    fn tick_flip(&mut self, mut anim: FlipAnimation) {
        let position = anim.position();
        if let Some(delay) = anim.tick(|frame| self.paint(position, frame)) {
            self.scheduler.schedule(delay, Task::Flip(anim));
        }
    }

    fn paint(&mut self, position: usize, frame: Frame) {
        let Some(handle) = self.slots.get(position).copied().flatten() else {
            self.stats.frames_skipped += 1;
            return;
        };
        match self.renderer.set_frame(handle, frame) {
            Ok(()) => {
                self.stats.frames_painted += 1;
                let at = self.scheduler.now();
                if let Some(trace) = self.trace.as_mut() {
                    trace.push(FrameRecord {
                        at,
                        position,
                        frame,
                    });
                }
            }
            Err(e) => {
                self.stats.frames_skipped += 1;
                self.stats.render_faults += 1;
                tracing::warn!(error = %e, position, "set_frame failed; frame skipped");
            }
        }
    }
}
