//! Snapshots of controller state.

/// What the pending top-level timer will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// No cycle pending.
    Idle,
    /// Auto-mode stepping by `increment` every `pace`.
    Counting,
    /// Bounded run toward `target`.
    Ramping { target: u64 },
}

/// Point-in-time copy of the controller's settings and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    pub value: u64,
    pub increment: u64,
    pub pace_ms: u64,
    pub auto: bool,
    pub activity: Activity,
}

/// Running totals, for telemetry and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterStats {
    /// Value changes that went through the diff engine.
    pub changes: u64,
    /// Flip animations started.
    pub flips: u64,
    /// Frames handed to the renderer successfully.
    pub frames_painted: u64,
    /// Frames dropped (missing slot or renderer error).
    pub frames_skipped: u64,
    /// Renderer calls that returned an error.
    pub render_faults: u64,
}
