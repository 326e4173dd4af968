#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Flip-counter engine (renderer-agnostic).
//!
//! This crate owns the counter's value, its digit slots and every timer that
//! moves them. Drawing goes through `flip_traits::SlotRenderer`; time goes
//! through a virtual scheduler that `runner` maps onto a `flip_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Digits**: value -> least-significant-first digit sequence (`digits`)
//! - **Diff**: which slots to insert, remove, or flip between two values (`diff`)
//! - **Animation**: the seven-frame flip and its per-position speed (`animator`)
//! - **Smart ramp**: increment/pace search for timed ramps (`smart`)
//! - **Controller**: value, auto mode, ramps, slot lifecycle (`Counter`)
//! - **Scheduler**: single-threaded virtual-time timer queue (`scheduler`)
//!
//! ## Time
//!
//! Nothing in the controller sleeps. Tasks fire when the owner advances the
//! counter's timeline with `advance_to`/`advance_by`, directly in tests or
//! through `runner::run_for` against a real clock.

pub mod animator;
pub mod board;
pub mod builder;
pub mod command;
pub mod config;
pub mod conversions;
pub mod counter;
pub mod diff;
pub mod digits;
pub mod error;
pub mod mocks;
pub mod runner;
pub mod scheduler;
pub mod smart;
pub mod status;
pub mod util;

pub use animator::{FlipAnimation, SpeedContext, frame_at, frame_delay};
pub use board::{BoardSlot, SlotBoard};
pub use builder::{CounterBuilder, DynCounter, build_counter};
pub use command::{Command, parse_script};
pub use config::{CounterCfg, SpriteGeometry};
pub use counter::{Counter, FrameRecord};
pub use diff::{DigitEdit, diff};
pub use digits::{DigitSequence, to_digit_sequence};
pub use error::{BuildError, CounterError, Result};
pub use runner::{StopReason, run_for, run_for_with, run_until_idle, run_until_idle_with};
pub use smart::{PlanSource, SmartRampPlan, solve};
pub use status::{Activity, CounterState, CounterStats};
