//! Test and helper renderers for flip_core

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use flip_traits::{Frame, SlotHandle, SlotRenderer};

use crate::board::SlotBoard;

/// One call observed by [`RecordingRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Attach {
        position: usize,
        digit: u8,
        separator: bool,
        handle: SlotHandle,
    },
    Detach {
        handle: SlotHandle,
        separator: bool,
    },
    Frame {
        handle: SlotHandle,
        frame: Frame,
    },
}

#[derive(Debug, Default)]
struct Recording {
    board: SlotBoard,
    events: Vec<RenderEvent>,
}

/// Renderer backed by a [`SlotBoard`] that also logs every call.
///
/// Clones share state, so a test can keep one clone while the counter owns
/// another (possibly boxed).
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current board.
    pub fn board(&self) -> SlotBoard {
        self.inner.borrow().board.clone()
    }

    pub fn display(&self) -> String {
        self.inner.borrow().board.display()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.inner.borrow_mut().events.clear();
    }
}

impl SlotRenderer for RecordingRenderer {
    fn attach_slot(
        &mut self,
        position: usize,
        digit: u8,
        separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>> {
        let mut rec = self.inner.borrow_mut();
        let handle = rec.board.attach_slot(position, digit, separator)?;
        rec.events.push(RenderEvent::Attach {
            position,
            digit,
            separator,
            handle,
        });
        Ok(handle)
    }

    fn detach_slot(
        &mut self,
        slot: SlotHandle,
        separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut rec = self.inner.borrow_mut();
        rec.board.detach_slot(slot, separator)?;
        rec.events.push(RenderEvent::Detach {
            handle: slot,
            separator,
        });
        Ok(())
    }

    fn set_frame(
        &mut self,
        slot: SlotHandle,
        frame: Frame,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut rec = self.inner.borrow_mut();
        rec.board.set_frame(slot, frame)?;
        rec.events.push(RenderEvent::Frame {
            handle: slot,
            frame,
        });
        Ok(())
    }
}

/// A renderer whose every call fails; the counter must keep working regardless.
#[derive(Debug, Default)]
pub struct FailingRenderer;

impl SlotRenderer for FailingRenderer {
    fn attach_slot(
        &mut self,
        _position: usize,
        _digit: u8,
        _separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("failing renderer")))
    }

    fn detach_slot(
        &mut self,
        _slot: SlotHandle,
        _separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("failing renderer")))
    }

    fn set_frame(
        &mut self,
        _slot: SlotHandle,
        _frame: Frame,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("failing renderer")))
    }
}
