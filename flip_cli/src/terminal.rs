//! Line-oriented renderer: prints the counter each time it comes to rest.

use std::error::Error;
use std::io::Write;

use flip_core::board::SlotBoard;
use flip_traits::{Frame, SlotHandle, SlotRenderer};

#[derive(Debug, Default)]
pub struct TerminalRenderer {
    board: SlotBoard,
    shown: Option<String>,
    echo: bool,
    lines: u64,
}

impl TerminalRenderer {
    /// `echo = false` tracks the board without printing (JSON mode).
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            ..Self::default()
        }
    }

    pub fn display(&self) -> String {
        self.board.display()
    }

    /// Settled values printed so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Print the board if every slot is at rest and it differs from the last line.
    ///
    /// Call between batches of counter work, never from inside one: structural
    /// edits land before their flips start.
    pub fn flush(&mut self) {
        if !self.board.is_settled() {
            return;
        }
        let text = self.board.display();
        if self.shown.as_deref() == Some(text.as_str()) {
            return;
        }
        if self.echo
            && let Err(e) = writeln!(std::io::stdout().lock(), "{text}")
        {
            tracing::warn!(error = %e, "stdout write failed");
        }
        self.lines += 1;
        self.shown = Some(text);
    }
}

impl SlotRenderer for TerminalRenderer {
    fn attach_slot(
        &mut self,
        position: usize,
        digit: u8,
        separator: bool,
    ) -> Result<SlotHandle, Box<dyn Error + Send + Sync>> {
        self.board.attach_slot(position, digit, separator)
    }

    fn detach_slot(
        &mut self,
        slot: SlotHandle,
        separator: bool,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.board.detach_slot(slot, separator)
    }

    fn set_frame(
        &mut self,
        slot: SlotHandle,
        frame: Frame,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.board.set_frame(slot, frame)
    }
}
