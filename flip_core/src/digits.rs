//! Integer -> digit sequence conversion.

/// Decimal digits of a value, least-significant first.
pub type DigitSequence = Vec<u8>;

/// Digits per separator group.
pub const GROUP_SIZE: usize = 3;

/// Split `n` into its decimal digits, least-significant first.
///
/// `0` yields `[0]`, never an empty sequence.
pub fn to_digit_sequence(n: u64) -> DigitSequence {
    n.to_string().bytes().rev().map(|b| b - b'0').collect()
}

/// Rebuild the decimal string from a least-significant-first sequence.
pub fn to_decimal_string(digits: &[u8]) -> String {
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

/// Whether a group separator sits between `position` and `position - 1`.
#[inline]
pub fn separator_before(position: usize) -> bool {
    position > 0 && position % GROUP_SIZE == 0
}
