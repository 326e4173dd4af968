//! `From` implementations bridging `flip_config` types to `flip_core` types.

use crate::config::{CounterCfg, SpriteGeometry};

// ── CounterCfg ───────────────────────────────────────────────────────────────

impl From<&flip_config::CounterCfg> for CounterCfg {
    fn from(c: &flip_config::CounterCfg) -> Self {
        Self {
            value: c.value,
            increment: c.increment,
            pace_ms: c.pace_ms,
            auto: c.auto,
        }
    }
}

// ── SpriteGeometry ───────────────────────────────────────────────────────────

impl From<&flip_config::SpriteCfg> for SpriteGeometry {
    fn from(c: &flip_config::SpriteCfg) -> Self {
        Self {
            top_frame_height: c.top_frame_height,
            bottom_frame_height: c.bottom_frame_height,
            frame_width: c.frame_width,
            bottom_offset: c.bottom_offset,
        }
    }
}
