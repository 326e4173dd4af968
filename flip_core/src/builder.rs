//! Type-state builder for `Counter` and generic `build_counter` constructor.
//!
//! The builder enforces at compile time that a renderer is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use flip_traits::SlotRenderer;

use crate::config::{CounterCfg, SpriteGeometry};
use crate::counter::Counter;
use crate::error::{BuildError, Result};

/// Counter over a boxed renderer, as produced by [`CounterBuilder`].
pub type DynCounter = Counter<Box<dyn SlotRenderer>>;

impl DynCounter {
    /// Start building a Counter.
    pub fn builder() -> CounterBuilder<Missing> {
        CounterBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `DynCounter`. All fields are validated on `build()`.
pub struct CounterBuilder<R> {
    renderer: Option<Box<dyn SlotRenderer>>,
    config: Option<CounterCfg>,
    geometry: Option<SpriteGeometry>,
    trace: bool,
    _r: PhantomData<R>,
}

impl Default for CounterBuilder<Missing> {
    fn default() -> Self {
        Self {
            renderer: None,
            config: None,
            geometry: None,
            trace: false,
            _r: PhantomData,
        }
    }
}

/// Validate configuration and lay out the counter.
///
/// Single source of truth for validation, used by both
/// `CounterBuilder::try_build()` and `build_counter()`.
fn validate_and_build<R: SlotRenderer>(
    renderer: R,
    config: CounterCfg,
    geometry: SpriteGeometry,
    trace: bool,
) -> Result<Counter<R>> {
    if config.pace_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "pace_ms must be >= 1",
        )));
    }
    if config.pace_ms > flip_config::MAX_PACE_MS {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "pace_ms is unreasonably large",
        )));
    }
    if geometry.top_frame_height == 0 || geometry.bottom_frame_height == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "frame heights must be > 0",
        )));
    }
    if geometry.frame_width == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "frame_width must be > 0",
        )));
    }
    tracing::debug!(
        value = config.value,
        increment = config.increment,
        pace_ms = config.pace_ms,
        auto = config.auto,
        "counter assembled"
    );
    Ok(Counter::assemble(renderer, config, geometry, trace))
}

impl<R> CounterBuilder<R> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<DynCounter> {
        let renderer = self
            .renderer
            .ok_or_else(|| eyre::Report::new(BuildError::MissingRenderer))?;
        validate_and_build(
            renderer,
            self.config.unwrap_or_default(),
            self.geometry.unwrap_or_default(),
            self.trace,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<R> CounterBuilder<R> {
    pub fn with_config(mut self, config: CounterCfg) -> Self {
        self.config = Some(config);
        self
    }
    pub fn with_value(mut self, value: u64) -> Self {
        let mut c = self.config.unwrap_or_default();
        c.value = value;
        self.config = Some(c);
        self
    }
    pub fn with_increment(mut self, increment: u64) -> Self {
        let mut c = self.config.unwrap_or_default();
        c.increment = increment;
        self.config = Some(c);
        self
    }
    pub fn with_pace_ms(mut self, pace_ms: u64) -> Self {
        let mut c = self.config.unwrap_or_default();
        c.pace_ms = pace_ms;
        self.config = Some(c);
        self
    }
    pub fn with_auto(mut self, auto: bool) -> Self {
        let mut c = self.config.unwrap_or_default();
        c.auto = auto;
        self.config = Some(c);
        self
    }
    pub fn with_geometry(mut self, geometry: SpriteGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
    /// Record every painted frame; drain with `Counter::take_trace`.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }
}

// Setter that advances type-state
impl CounterBuilder<Missing> {
    pub fn with_renderer(self, renderer: impl SlotRenderer + 'static) -> CounterBuilder<Set> {
        CounterBuilder {
            renderer: Some(Box::new(renderer)),
            config: self.config,
            geometry: self.geometry,
            trace: self.trace,
            _r: PhantomData,
        }
    }
}

impl CounterBuilder<Set> {
    /// Validate and build the Counter. Only available once a renderer is set.
    pub fn build(self) -> Result<DynCounter> {
        self.try_build()
    }
}

/// Build a statically-dispatched `Counter` from a concrete renderer.
///
/// Delegates to the shared `validate_and_build`, no duplicated validation logic.
pub fn build_counter<R: SlotRenderer>(
    renderer: R,
    config: CounterCfg,
    geometry: Option<SpriteGeometry>,
    trace: bool,
) -> Result<Counter<R>> {
    validate_and_build(renderer, config, geometry.unwrap_or_default(), trace)
}
