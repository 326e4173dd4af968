//! Position-keyed model of the rendered digit row.
//!
//! `SlotBoard` is a complete in-memory `SlotRenderer`: the CLI draws from it
//! and tests assert against it.

use std::collections::{BTreeMap, HashMap};
use std::error::Error;

use flip_traits::{Frame, Half, SlotHandle, SlotRenderer};

/// One materialized slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSlot {
    pub handle: SlotHandle,
    /// Separator between this slot and the next lower position.
    pub separator: bool,
    pub upper: Frame,
    pub lower: Frame,
}

#[derive(Debug, Clone, Default)]
pub struct SlotBoard {
    next_handle: u64,
    slots: BTreeMap<usize, BoardSlot>,
    positions: HashMap<SlotHandle, usize>,
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, position: usize) -> Option<&BoardSlot> {
        self.slots.get(&position)
    }

    pub fn separator_count(&self) -> usize {
        self.slots.values().filter(|s| s.separator).count()
    }

    /// Digits shown on the upper cards, most significant first.
    pub fn digits_high_to_low(&self) -> Vec<u8> {
        self.slots.values().rev().map(|s| s.upper.digit).collect()
    }

    /// Whether every slot rests (column 0) on the same digit top and bottom.
    pub fn is_settled(&self) -> bool {
        self.slots.values().all(|s| {
            s.upper.column == 0 && s.lower.column == 0 && s.upper.digit == s.lower.digit
        })
    }

    /// Text rendering such as `"1,234"`.
    pub fn display(&self) -> String {
        let mut out = String::with_capacity(self.slots.len() + self.slots.len() / 3);
        for slot in self.slots.values().rev() {
            out.push(char::from(b'0' + slot.upper.digit));
            if slot.separator {
                out.push(',');
            }
        }
        out
    }

    fn slot_mut(
        &mut self,
        handle: SlotHandle,
    ) -> Result<&mut BoardSlot, Box<dyn Error + Send + Sync>> {
        let position = self
            .positions
            .get(&handle)
            .copied()
            .ok_or_else(|| format!("unknown slot {handle:?}"))?;
        self.slots
            .get_mut(&position)
            .ok_or_else(|| format!("slot {handle:?} lost its position {position}").into())
    }
}

impl SlotRenderer for SlotBoard {
    fn attach_slot(
        &mut self,
        position: usize,
        digit: u8,
        separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>> {
        if digit > 9 {
            return Err(format!("digit {digit} out of range").into());
        }
        if self.slots.contains_key(&position) {
            return Err(format!("position {position} already has a slot").into());
        }
        let handle = SlotHandle(self.next_handle);
        self.next_handle += 1;
        self.slots.insert(
            position,
            BoardSlot {
                handle,
                separator,
                upper: Frame::resting(Half::Upper, digit),
                lower: Frame::resting(Half::Lower, digit),
            },
        );
        self.positions.insert(handle, position);
        Ok(handle)
    }

    fn detach_slot(
        &mut self,
        slot: SlotHandle,
        _separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // the separator is owned by the slot, so it leaves with it
        let position = self
            .positions
            .remove(&slot)
            .ok_or_else(|| format!("unknown slot {slot:?}"))?;
        self.slots.remove(&position);
        Ok(())
    }

    fn set_frame(
        &mut self,
        slot: SlotHandle,
        frame: Frame,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let s = self.slot_mut(slot)?;
        match frame.half {
            Half::Upper => s.upper = frame,
            Half::Lower => s.lower = frame,
        }
        Ok(())
    }
}
