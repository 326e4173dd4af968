//! Runtime configuration for the counter engine.
//!
//! Resolved once at construction. Separate from the TOML-deserialized config
//! in `flip_config`; see `conversions` for the bridge.

use flip_traits::{Frame, Half};

/// Increment restored when an invalid one is supplied.
pub const DEFAULT_INCREMENT: u64 = 1;
/// Pace restored when an invalid one is supplied.
pub const DEFAULT_PACE_MS: u64 = 1000;
/// Ramp duration used when the requested one cannot be read.
pub const DEFAULT_RAMP_MS: u64 = 10_000;

/// Counter behavior settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterCfg {
    /// Value displayed at construction.
    pub value: u64,
    /// Amount added per cycle.
    pub increment: u64,
    /// Milliseconds between cycles. Must be >= 1.
    pub pace_ms: u64,
    /// Schedule the first cycle at construction.
    pub auto: bool,
}

impl Default for CounterCfg {
    fn default() -> Self {
        Self {
            value: 0,
            increment: DEFAULT_INCREMENT,
            pace_ms: DEFAULT_PACE_MS,
            auto: true,
        }
    }
}

/// Sprite sheet geometry in pixels; turns a [`Frame`] into a background offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteGeometry {
    pub top_frame_height: u32,
    pub bottom_frame_height: u32,
    pub frame_width: u32,
    pub bottom_offset: u32,
}

impl Default for SpriteGeometry {
    fn default() -> Self {
        Self {
            top_frame_height: 20,
            bottom_frame_height: 40,
            frame_width: 29,
            bottom_offset: 200,
        }
    }
}

impl SpriteGeometry {
    /// Background offset `(x, y)` for a frame. Both are <= 0.
    pub fn offset(&self, frame: Frame) -> (i64, i64) {
        let x = -(i64::from(frame.column) * i64::from(self.frame_width));
        let digit = i64::from(frame.digit);
        let y = match frame.half {
            Half::Upper => -(digit * i64::from(self.top_frame_height)),
            Half::Lower => {
                -(digit * i64::from(self.bottom_frame_height) + i64::from(self.bottom_offset))
            }
        };
        (x, y)
    }

    /// CSS `background-position` value for a frame, e.g. `"-29px -60px"`.
    pub fn css(&self, frame: Frame) -> String {
        let (x, y) = self.offset(frame);
        let x = if x == 0 {
            "0".to_string()
        } else {
            format!("{x}px")
        };
        format!("{x} -{}px", y.unsigned_abs())
    }
}
