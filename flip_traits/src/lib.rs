pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::error::Error;

/// Opaque handle for one materialized digit slot, issued by the renderer.
///
/// The engine keeps a position -> handle map and hands the handle back on
/// every later call; it never derives element identities on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle(pub u64);

/// Which half of a flip card a frame applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Upper,
    Lower,
}

impl Half {
    pub fn as_str(self) -> &'static str {
        match self {
            Half::Upper => "upper",
            Half::Lower => "lower",
        }
    }
}

/// A single visual frame request for one half of one slot.
///
/// `column` selects the sprite column (0 = resting card, 1..=3 = flip stages);
/// `digit` selects the row. Pixel geometry is the renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    pub half: Half,
    pub column: u8,
    pub digit: u8,
}

impl Frame {
    /// Resting frame showing `digit` on the given half.
    #[inline]
    pub fn resting(half: Half, digit: u8) -> Self {
        Self {
            half,
            column: 0,
            digit,
        }
    }
}

/// Rendering collaborator that materializes digit slots.
pub trait SlotRenderer {
    /// Create a slot for `position` showing `digit`. When `separator` is set, a
    /// group-separator marker goes between the new slot and the lower positions.
    fn attach_slot(
        &mut self,
        position: usize,
        digit: u8,
        separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>>;

    /// Remove a slot; `separator` asks to drop the marker that now leads the row.
    fn detach_slot(
        &mut self,
        slot: SlotHandle,
        separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Show `frame` on one half of a slot.
    fn set_frame(&mut self, slot: SlotHandle, frame: Frame)
    -> Result<(), Box<dyn Error + Send + Sync>>;
}

impl<R: SlotRenderer + ?Sized> SlotRenderer for Box<R> {
    fn attach_slot(
        &mut self,
        position: usize,
        digit: u8,
        separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>> {
        (**self).attach_slot(position, digit, separator)
    }

    fn detach_slot(
        &mut self,
        slot: SlotHandle,
        separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).detach_slot(slot, separator)
    }

    fn set_frame(
        &mut self,
        slot: SlotHandle,
        frame: Frame,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).set_frame(slot, frame)
    }
}
