//! Digit diffing: which slots to add, drop, or flip between two values.

use crate::digits::{separator_before, to_digit_sequence};

/// One structural or visual change produced by [`diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitEdit {
    /// Materialize a new high-order slot showing `digit`.
    Insert {
        position: usize,
        digit: u8,
        separator: bool,
    },
    /// Drop a high-order slot (and its separator, if it had one).
    Remove { position: usize, separator: bool },
    /// Animate an existing slot from one digit to another.
    Flip { position: usize, from: u8, to: u8 },
}

impl DigitEdit {
    pub fn position(&self) -> usize {
        match *self {
            DigitEdit::Insert { position, .. }
            | DigitEdit::Remove { position, .. }
            | DigitEdit::Flip { position, .. } => position,
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, DigitEdit::Flip { .. })
    }
}

/// Edits that turn the display of `old` into the display of `new`.
///
/// Structural edits come first, highest position first; flips follow in
/// ascending position order. Equal values produce no edits.
pub fn diff(old: u64, new: u64) -> Vec<DigitEdit> {
    if old == new {
        return Vec::new();
    }
    let before = to_digit_sequence(old);
    let after = to_digit_sequence(new);
    let (xlen, ylen) = (before.len(), after.len());
    let mut edits = Vec::with_capacity(xlen.max(ylen));

    if ylen > xlen {
        for position in (xlen..ylen).rev() {
            edits.push(DigitEdit::Insert {
                position,
                digit: after[position],
                separator: separator_before(position),
            });
        }
    } else if ylen < xlen {
        for position in (ylen..xlen).rev() {
            edits.push(DigitEdit::Remove {
                position,
                separator: separator_before(position),
            });
        }
    }

    for (position, (&from, &to)) in before.iter().zip(after.iter()).enumerate() {
        if from != to {
            edits.push(DigitEdit::Flip { position, from, to });
        }
    }
    edits
}
