//! Helpers for 16-bit surrogate pairs.
//!
//! Scalars above U+FFFF travel through 16-bit units as a high surrogate
//! (`0xD800..=0xDBFF`) followed by a low surrogate (`0xDC00..=0xDFFF`), each
//! carrying ten bits of the scalar's offset from U+10000.

use tartan_bitfield::bitfield;

use crate::buffer::CharBuffer;

use super::result::CoderResult;

pub const MIN_HIGH: u16 = 0xD800;
pub const MAX_HIGH: u16 = 0xDBFF;
pub const MIN_LOW: u16 = 0xDC00;
pub const MAX_LOW: u16 = 0xDFFF;
pub const MIN: u16 = MIN_HIGH;
pub const MAX: u16 = MAX_LOW;

/// The first scalar needing a pair.
pub const MIN_SUPPLEMENTARY: u32 = 0x1_0000;
/// The last Unicode scalar.
pub const MAX_SCALAR: u32 = 0x10_FFFF;

bitfield! {
    struct Unit(u16) {
        [0..10] payload: u16,
        [10..16] tag: u8,
    }
}

const HIGH_TAG: u8 = 0b11_0110;
const LOW_TAG: u8 = 0b11_0111;

pub fn is_high(unit: u16) -> bool {
    Unit(unit).tag() == HIGH_TAG
}

pub fn is_low(unit: u16) -> bool {
    Unit(unit).tag() == LOW_TAG
}

pub fn is_surrogate(unit: u16) -> bool {
    Unit(unit).tag() >> 1 == HIGH_TAG >> 1
}

/// Whether a 32-bit value falls in the surrogate range.
pub fn is_surrogate_scalar(scalar: u32) -> bool {
    (MIN as u32..=MAX as u32).contains(&scalar)
}

/// Whether a scalar fits a single unit.
pub fn is_bmp(scalar: u32) -> bool {
    scalar < MIN_SUPPLEMENTARY
}

/// Whether a scalar needs a pair.
pub fn is_supplementary(scalar: u32) -> bool {
    (MIN_SUPPLEMENTARY..=MAX_SCALAR).contains(&scalar)
}

/// Compose a pair into a scalar. The units must be a high and a low
/// surrogate, in that order.
pub fn to_scalar(high: u16, low: u16) -> u32 {
    debug_assert!(is_high(high) && is_low(low));
    let high = Unit(high).payload() as u32;
    let low = Unit(low).payload() as u32;

    MIN_SUPPLEMENTARY + (high << 10 | low)
}

/// The high surrogate of a supplementary scalar.
pub fn high(scalar: u32) -> u16 {
    debug_assert!(is_supplementary(scalar));
    MIN_HIGH | ((scalar - MIN_SUPPLEMENTARY) >> 10) as u16
}

/// The low surrogate of a supplementary scalar.
pub fn low(scalar: u32) -> u16 {
    debug_assert!(is_supplementary(scalar));
    MIN_LOW | ((scalar - MIN_SUPPLEMENTARY) & 0x3FF) as u16
}

/// Surrogate-aware reader of 16-bit input, used by encoders.
///
/// After a failed parse, [`Parser::error`] holds the result the caller
/// should return: `Malformed(1)` for a lone or ill-ordered surrogate, or
/// `Underflow` for a high surrogate at the very end of the available input.
#[derive(Debug, Default)]
pub struct Parser {
    scalar: u32,
    is_pair: bool,
    error: Option<CoderResult>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the scalar starting with `unit`. `rest` holds the units that
    /// follow it, up to the end of the available input.
    pub fn parse(&mut self, unit: u16, rest: &[u16]) -> Option<u32> {
        self.parse_unit(unit, rest.first().copied())
    }

    /// Parse the scalar starting with `unit`, which has already been taken
    /// from `src`. A low surrogate completing a pair is consumed from `src`.
    pub fn parse_next(&mut self, unit: u16, src: &mut CharBuffer) -> Option<u32> {
        let next = src.has_remaining().then(|| src.load(src.position()));
        let scalar = self.parse_unit(unit, next);

        if scalar.is_some() && self.is_pair {
            src.seek(src.position() + 1);
        }
        scalar
    }

    /// Parse the scalar starting with `unit`, given the unit after it if any
    /// input remains.
    pub fn parse_unit(&mut self, unit: u16, next: Option<u16>) -> Option<u32> {
        if is_high(unit) {
            match next {
                Some(next) if is_low(next) => self.parsed(to_scalar(unit, next), true),
                Some(_) => self.failed(CoderResult::Malformed(1)),
                None => self.failed(CoderResult::Underflow),
            }
        } else if is_low(unit) {
            self.failed(CoderResult::Malformed(1))
        } else {
            self.parsed(unit as u32, false)
        }
    }

    fn parsed(&mut self, scalar: u32, is_pair: bool) -> Option<u32> {
        self.scalar = scalar;
        self.is_pair = is_pair;
        self.error = None;
        Some(scalar)
    }

    fn failed(&mut self, error: CoderResult) -> Option<u32> {
        self.error = Some(error);
        None
    }

    /// The scalar from the last successful parse.
    pub fn scalar(&self) -> u32 {
        self.scalar
    }

    /// Whether the last successful parse consumed a pair.
    pub fn is_pair(&self) -> bool {
        self.is_pair
    }

    /// The result explaining the last failed parse.
    pub fn error(&self) -> Option<CoderResult> {
        self.error
    }

    /// `Unmappable` covering the units of the last successful parse.
    pub fn unmappable_result(&self) -> CoderResult {
        CoderResult::Unmappable(if self.is_pair { 2 } else { 1 })
    }
}

/// Write a scalar decoded from `len` source units as one or two 16-bit units.
///
/// Returns the number of units written. Fails with `Malformed(len)` for a
/// surrogate-range value, `Unmappable(len)` beyond U+10FFFF, and `Overflow`
/// when `dst` lacks room.
pub(crate) fn generate(scalar: u32, len: usize, dst: &mut CharBuffer) -> Result<usize, CoderResult> {
    if is_bmp(scalar) {
        if is_surrogate_scalar(scalar) {
            Err(CoderResult::Malformed(len))?;
        }
        if !dst.has_remaining() {
            Err(CoderResult::Overflow)?;
        }

        dst.push(scalar as u16);
        Ok(1)
    } else if is_supplementary(scalar) {
        if dst.remaining() < 2 {
            Err(CoderResult::Overflow)?;
        }

        dst.push(high(scalar));
        dst.push(low(scalar));
        Ok(2)
    } else {
        Err(CoderResult::Unmappable(len))
    }
}
