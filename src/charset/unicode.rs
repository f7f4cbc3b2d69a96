//! Byte order handling shared by the UTF-16 and UTF-32 codecs.

use either::Either::{self, Left, Right};
use zerocopy::byteorder::{BE, LE, U16, U32};

use crate::buffer::{ByteBuffer, ByteOrder};

/// U+FEFF, the byte-order mark.
pub(super) const BYTE_ORDER_MARK: u16 = 0xFEFF;
/// The mark read in the wrong order, U+FFFE, which is not a character.
pub(super) const REVERSED_MARK: u16 = 0xFFFE;

/// Inspect the first unit of a stream, read big-endian, for a byte-order
/// mark.
///
/// A mark in either order is accepted unless `expected` rules that order
/// out. Returns `Left` with the order of an accepted mark, which the caller
/// consumes, or `Right` with the order to decode in, falling back to
/// `default`, in which case the unit is ordinary input.
pub(super) fn detect(
    unit: u32,
    (big, little): (u32, u32),
    expected: Option<ByteOrder>,
    default: ByteOrder,
) -> Either<ByteOrder, ByteOrder> {
    use ByteOrder::*;

    match unit {
        _ if unit == big && expected != Some(LittleEndian) => Left(BigEndian),
        _ if unit == little && expected != Some(BigEndian) => Left(LittleEndian),
        _ => Right(expected.unwrap_or(default)),
    }
}

/// The 16-bit unit at `index` of `src`, which must lie before the limit.
pub(super) fn read_u16(src: &ByteBuffer, index: usize, order: ByteOrder) -> u16 {
    let r = [src.load(index), src.load(index + 1)];

    match order {
        ByteOrder::BigEndian => {
            let unit: U16<BE> = zerocopy::transmute!(r);
            unit.get()
        }
        ByteOrder::LittleEndian => {
            let unit: U16<LE> = zerocopy::transmute!(r);
            unit.get()
        }
    }
}

/// The 32-bit unit at `index` of `src`, which must lie before the limit.
pub(super) fn read_u32(src: &ByteBuffer, index: usize, order: ByteOrder) -> u32 {
    let r = [
        src.load(index),
        src.load(index + 1),
        src.load(index + 2),
        src.load(index + 3),
    ];

    match order {
        ByteOrder::BigEndian => {
            let unit: U32<BE> = zerocopy::transmute!(r);
            unit.get()
        }
        ByteOrder::LittleEndian => {
            let unit: U32<LE> = zerocopy::transmute!(r);
            unit.get()
        }
    }
}

/// The bytes of a 16-bit unit.
pub(super) fn u16_bytes(unit: u16, order: ByteOrder) -> [u8; 2] {
    match order {
        ByteOrder::BigEndian => zerocopy::transmute!(U16::<BE>::new(unit)),
        ByteOrder::LittleEndian => zerocopy::transmute!(U16::<LE>::new(unit)),
    }
}

/// The bytes of a 32-bit unit.
pub(super) fn u32_bytes(unit: u32, order: ByteOrder) -> [u8; 4] {
    match order {
        ByteOrder::BigEndian => zerocopy::transmute!(U32::<BE>::new(unit)),
        ByteOrder::LittleEndian => zerocopy::transmute!(U32::<LE>::new(unit)),
    }
}
