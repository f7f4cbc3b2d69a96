//! Table-driven single-byte charsets.
//!
//! A [`SingleByteTable`] is built at compile time from its 256-entry decoding
//! table. The encoding direction splits the 16-bit unit space into pages of
//! 256: a page index maps the high byte of a unit to its page, and every
//! page without a mapped unit shares the all-zero page at offset 0.

use alloc::vec;
use core::fmt;

use crate::{
    buffer::{ByteBuffer, CharBuffer},
    sans::{CodeLoop, CoderResult, Decoder, Encoder, surrogate::Parser},
};

use super::{Charset, ascii::unmappable};

/// Decoding table entry for an unmapped byte.
pub const UNMAPPABLE_DECODING: u16 = 0xFFFD;
/// Encoding table entry for an unmapped unit, other than U+0000 itself.
pub const UNMAPPABLE_ENCODING: u8 = 0x00;

/// Encoding pages a table may populate, besides the unmapped page.
const MAX_PAGES: usize = 8;

/// Mapping tables of a single-byte charset.
pub struct SingleByteTable {
    b2c: [u16; 256],
    c2b_index: [u16; 256],
    c2b: [u8; (MAX_PAGES + 1) * 256],
}

impl SingleByteTable {
    /// Build the encoding pages for a decoding table.
    ///
    /// Panics at compile time if the mapped units span more than
    /// `MAX_PAGES` pages.
    pub const fn new(b2c: [u16; 256]) -> Self {
        let mut c2b_index = [0u16; 256];
        let mut c2b = [UNMAPPABLE_ENCODING; (MAX_PAGES + 1) * 256];
        let mut pages = 1;

        let mut b = 0;
        while b < 256 {
            let c = b2c[b];
            if c != UNMAPPABLE_DECODING {
                let page = (c >> 8) as usize;
                if c2b_index[page] == 0 {
                    assert!(pages <= MAX_PAGES, "too many encoding pages");
                    c2b_index[page] = (pages * 256) as u16;
                    pages += 1;
                }
                c2b[c2b_index[page] as usize + (c & 0xFF) as usize] = b as u8;
            }
            b += 1;
        }

        Self {
            b2c,
            c2b_index,
            c2b,
        }
    }

    /// The unit for a byte, or [`UNMAPPABLE_DECODING`].
    pub fn decode(&self, b: u8) -> u16 {
        self.b2c[b as usize]
    }

    /// The byte for a unit, if mapped.
    pub fn encode(&self, c: u16) -> Option<u8> {
        let page = self.c2b_index[(c >> 8) as usize] as usize;

        match self.c2b[page + (c & 0xFF) as usize] {
            UNMAPPABLE_ENCODING if c != 0 => None,
            b => Some(b),
        }
    }
}

impl fmt::Debug for SingleByteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleByteTable").finish_non_exhaustive()
    }
}

/// ISO-8859-1 with some bytes remapped. A unit of [`UNMAPPABLE_DECODING`]
/// leaves the byte unmapped.
const fn latin1_with(overrides: &[(u8, u16)]) -> [u16; 256] {
    let mut b2c = [0u16; 256];

    let mut b = 0;
    while b < 256 {
        b2c[b] = b as u16;
        b += 1;
    }

    let mut i = 0;
    while i < overrides.len() {
        let (b, c) = overrides[i];
        b2c[b as usize] = c;
        i += 1;
    }

    b2c
}

const UNDEFINED: u16 = UNMAPPABLE_DECODING;

pub(super) static WINDOWS_1252: SingleByteTable = SingleByteTable::new(latin1_with(&[
    (0x80, 0x20AC),
    (0x81, UNDEFINED),
    (0x82, 0x201A),
    (0x83, 0x0192),
    (0x84, 0x201E),
    (0x85, 0x2026),
    (0x86, 0x2020),
    (0x87, 0x2021),
    (0x88, 0x02C6),
    (0x89, 0x2030),
    (0x8A, 0x0160),
    (0x8B, 0x2039),
    (0x8C, 0x0152),
    (0x8D, UNDEFINED),
    (0x8E, 0x017D),
    (0x8F, UNDEFINED),
    (0x90, UNDEFINED),
    (0x91, 0x2018),
    (0x92, 0x2019),
    (0x93, 0x201C),
    (0x94, 0x201D),
    (0x95, 0x2022),
    (0x96, 0x2013),
    (0x97, 0x2014),
    (0x98, 0x02DC),
    (0x99, 0x2122),
    (0x9A, 0x0161),
    (0x9B, 0x203A),
    (0x9C, 0x0153),
    (0x9D, UNDEFINED),
    (0x9E, 0x017E),
    (0x9F, 0x0178),
]));

pub(super) static ISO_8859_15: SingleByteTable = SingleByteTable::new(latin1_with(&[
    (0xA4, 0x20AC),
    (0xA6, 0x0160),
    (0xA8, 0x0161),
    (0xB4, 0x017D),
    (0xB8, 0x017E),
    (0xBC, 0x0152),
    (0xBD, 0x0153),
    (0xBE, 0x0178),
]));

pub(super) fn decoder(charset: &'static Charset, table: &'static SingleByteTable) -> Decoder {
    Decoder::new(charset, SingleByteDecoder { table }, 1.0, 1.0, vec![0xFFFD])
}

pub(super) fn encoder(charset: &'static Charset, table: &'static SingleByteTable) -> Encoder {
    let step = SingleByteEncoder {
        table,
        parser: Parser::new(),
    };
    Encoder::new(charset, step, 1.0, 1.0, vec![b'?'])
}

struct SingleByteDecoder {
    table: &'static SingleByteTable,
}

impl CodeLoop for SingleByteDecoder {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(b) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let c = self.table.decode(b);
            if c == UNMAPPABLE_DECODING {
                break CoderResult::Unmappable(1);
            }
            if !dst.has_remaining() {
                break CoderResult::Overflow;
            }

            dst.push(c);
            mark += 1;
        };

        src.seek(mark);
        result
    }
}

struct SingleByteEncoder {
    table: &'static SingleByteTable,
    parser: Parser,
}

impl CodeLoop for SingleByteEncoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let Some(b) = self.table.encode(c) else {
                break unmappable(&mut self.parser, c, src, mark);
            };
            if !dst.has_remaining() {
                break CoderResult::Overflow;
            }

            dst.push(b);
            mark += 1;
        };

        src.seek(mark);
        result
    }
}
