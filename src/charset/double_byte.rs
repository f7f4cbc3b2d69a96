//! Table-driven charsets mixing single bytes with lead/trail byte pairs.
//!
//! A byte is either a single byte, mapped (or not) by a 256-entry table, or a
//! lead byte introducing a pair. Pairs are looked up in per-lead rows indexed
//! by the trail byte. Encoding uses the same paged layout as
//! [`SingleByteTable`](super::SingleByteTable), with 16-bit entries: a value
//! above `0xFF` encodes to two bytes, high byte first.
//!
//! When a pair can't be decoded, the input is malformed (length 1, so that
//! decoding resumes at the trail byte) if the lead is not a lead byte, or the
//! trail is outside the trail range, is a lead byte or is a mapped single
//! byte. Otherwise the pair is well formed but unassigned, and unmappable
//! (length 2).

use alloc::vec;
use core::fmt;

use either::Either::{self, Left, Right};

use crate::{
    buffer::{ByteBuffer, CharBuffer},
    sans::{CodeLoop, CoderResult, Decoder, Encoder, surrogate::Parser},
};

use super::{Charset, ascii::unmappable};

/// Decoding table entry for an unmapped byte or pair.
pub const UNMAPPABLE_DECODING: u16 = 0xFFFD;
/// Encoding table entry for an unmapped unit.
pub const UNMAPPABLE_ENCODING: u16 = 0xFFFD;

/// Marks a byte that doesn't start a pair.
const NOT_LEAD: u8 = 0xFF;
/// Rows holding at least one pair, besides the unmapped row.
const MAX_ROWS: usize = 8;
/// Encoding pages a table may populate, besides the unmapped page.
const MAX_PAGES: usize = 16;

/// A run of consecutive pairs mapping to consecutive units:
/// `(first pair, first unit, length)`. Runs may not cross a row.
pub type Run = (u16, u16, u16);

/// Mapping tables of a double-byte charset.
pub struct DoubleByteTable {
    single: [u16; 256],
    rows: [u8; 256],
    b2c: [u16; (MAX_ROWS + 1) * 256],
    trail: (u8, u8),
    c2b_index: [u16; 256],
    c2b: [u16; (MAX_PAGES + 1) * 256],
}

impl DoubleByteTable {
    /// Build a table from its single bytes, lead byte ranges, inclusive trail
    /// byte range and pair runs.
    ///
    /// Panics at compile time on a run outside the lead or trail ranges, or
    /// if the table outgrows its rows or pages.
    pub const fn new(
        single: [u16; 256],
        leads: &[(u8, u8)],
        trail: (u8, u8),
        runs: &[Run],
    ) -> Self {
        let mut table = Self {
            single,
            rows: [NOT_LEAD; 256],
            b2c: [UNMAPPABLE_DECODING; (MAX_ROWS + 1) * 256],
            trail,
            c2b_index: [0; 256],
            c2b: [UNMAPPABLE_ENCODING; (MAX_PAGES + 1) * 256],
        };
        let mut pages = 1;
        let mut rows = 1;

        let mut i = 0;
        while i < leads.len() {
            let (first, last) = leads[i];
            let mut b = first as usize;
            while b <= last as usize {
                assert!(single[b] == UNMAPPABLE_DECODING, "lead byte mapped as single");
                table.rows[b] = 0;
                b += 1;
            }
            i += 1;
        }

        let mut b = 0;
        while b < 256 {
            if single[b] != UNMAPPABLE_DECODING {
                pages = map_encoding(&mut table, pages, single[b], b as u16);
            }
            b += 1;
        }

        let mut i = 0;
        while i < runs.len() {
            let (pair, first, len) = runs[i];
            let lead = (pair >> 8) as usize;
            assert!(table.rows[lead] != NOT_LEAD, "run outside lead ranges");

            if table.rows[lead] == 0 {
                assert!(rows <= MAX_ROWS, "too many rows");
                table.rows[lead] = rows as u8;
                rows += 1;
            }

            let mut k = 0;
            while k < len {
                let trail_byte = ((pair & 0xFF) + k) as u8;
                assert!(trail_byte >= trail.0 && trail_byte <= trail.1, "run outside trail range");

                let row = table.rows[lead] as usize;
                table.b2c[row * 256 + trail_byte as usize] = first + k;
                pages = map_encoding(&mut table, pages, first + k, pair + k);
                k += 1;
            }
            i += 1;
        }

        table
    }

    /// Classify a byte: either the unit it decodes to on its own (possibly
    /// [`UNMAPPABLE_DECODING`]), or the row of pairs it leads.
    pub fn classify(&self, b: u8) -> Either<u16, Row> {
        match self.rows[b as usize] {
            NOT_LEAD => Left(self.single[b as usize]),
            row => Right(Row(row)),
        }
    }

    /// The unit for a pair led by a byte of `row`, if assigned.
    pub fn decode_pair(&self, row: Row, trail: u8) -> Option<u16> {
        let (min, max) = self.trail;
        if trail < min || trail > max {
            return None;
        }

        match self.b2c[row.0 as usize * 256 + trail as usize] {
            UNMAPPABLE_DECODING => None,
            c => Some(c),
        }
    }

    /// The single byte (`<= 0xFF`) or pair for a unit, if mapped.
    pub fn encode(&self, c: u16) -> Option<u16> {
        let page = self.c2b_index[(c >> 8) as usize] as usize;

        match self.c2b[page + (c & 0xFF) as usize] {
            UNMAPPABLE_ENCODING => None,
            bb => Some(bb),
        }
    }

    fn is_single(&self, b: u8) -> bool {
        self.rows[b as usize] == NOT_LEAD && self.single[b as usize] != UNMAPPABLE_DECODING
    }

    fn is_lead(&self, b: u8) -> bool {
        self.rows[b as usize] != NOT_LEAD
    }

    /// The result for a pair `decode_pair` rejected.
    fn malformed_or_unmappable(&self, trail: u8) -> CoderResult {
        let (min, max) = self.trail;

        if trail < min || trail > max || self.is_lead(trail) || self.is_single(trail) {
            CoderResult::Malformed(1)
        } else {
            CoderResult::Unmappable(2)
        }
    }
}

/// A lead byte's row of pairs. Row 0 is shared by lead bytes with no pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row(u8);

const fn map_encoding(table: &mut DoubleByteTable, mut pages: usize, c: u16, bb: u16) -> usize {
    let page = (c >> 8) as usize;
    if table.c2b_index[page] == 0 {
        assert!(pages <= MAX_PAGES, "too many encoding pages");
        table.c2b_index[page] = (pages * 256) as u16;
        pages += 1;
    }
    table.c2b[table.c2b_index[page] as usize + (c & 0xFF) as usize] = bb;
    pages
}

impl fmt::Debug for DoubleByteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleByteTable")
            .field("trail", &self.trail)
            .finish_non_exhaustive()
    }
}

/// ASCII, and half-width katakana at `0xA1..=0xDF`.
const fn sjis_single() -> [u16; 256] {
    let mut single = [UNMAPPABLE_DECODING; 256];

    let mut b = 0;
    while b < 0x80 {
        single[b] = b as u16;
        b += 1;
    }

    let mut b = 0xA1;
    while b <= 0xDF {
        single[b] = 0xFF61 + (b - 0xA1) as u16;
        b += 1;
    }

    single
}

/// A basic subset of Shift_JIS: ASCII, half-width katakana, and from JIS X
/// 0208 the ideographic punctuation, full-width digits and Latin letters,
/// hiragana, katakana, Greek and Cyrillic.
pub(super) static SJIS_BASIC: DoubleByteTable = DoubleByteTable::new(
    sjis_single(),
    &[(0x81, 0x9F), (0xE0, 0xFC)],
    (0x40, 0xFC),
    &[
        (0x8140, 0x3000, 3),
        (0x815B, 0x30FC, 1),
        (0x824F, 0xFF10, 10),
        (0x8260, 0xFF21, 26),
        (0x8281, 0xFF41, 26),
        (0x829F, 0x3041, 83),
        (0x8340, 0x30A1, 63),
        (0x8380, 0x30E0, 23),
        (0x839F, 0x0391, 17),
        (0x83B0, 0x03A3, 7),
        (0x83BF, 0x03B1, 17),
        (0x83D0, 0x03C3, 7),
        (0x8440, 0x0410, 6),
        (0x8446, 0x0401, 1),
        (0x8447, 0x0416, 26),
        (0x8470, 0x0430, 6),
        (0x8476, 0x0451, 1),
        (0x8477, 0x0436, 8),
        (0x8480, 0x043E, 18),
    ],
);

pub(super) fn decoder(charset: &'static Charset, table: &'static DoubleByteTable) -> Decoder {
    Decoder::new(charset, DoubleByteDecoder { table }, 0.5, 1.0, vec![0xFFFD])
}

pub(super) fn encoder(charset: &'static Charset, table: &'static DoubleByteTable) -> Encoder {
    let step = DoubleByteEncoder {
        table,
        parser: Parser::new(),
    };
    Encoder::new(charset, step, 2.0, 2.0, vec![b'?'])
}

struct DoubleByteDecoder {
    table: &'static DoubleByteTable,
}

impl CodeLoop for DoubleByteDecoder {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(b1) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let (c, len) = match self.table.classify(b1) {
                Left(UNMAPPABLE_DECODING) => break CoderResult::Malformed(1),
                Left(c) => (c, 1),
                Right(row) => {
                    let Some(b2) = src.peek_at(mark + 1) else {
                        break CoderResult::Underflow;
                    };
                    match self.table.decode_pair(row, b2) {
                        Some(c) => (c, 2),
                        None => break self.table.malformed_or_unmappable(b2),
                    }
                }
            };

            if !dst.has_remaining() {
                break CoderResult::Overflow;
            }

            dst.push(c);
            mark += len;
        };

        src.seek(mark);
        result
    }
}

struct DoubleByteEncoder {
    table: &'static DoubleByteTable,
    parser: Parser,
}

impl CodeLoop for DoubleByteEncoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let Some(bb) = self.table.encode(c) else {
                break unmappable(&mut self.parser, c, src, mark);
            };

            if bb > 0xFF {
                if dst.remaining() < 2 {
                    break CoderResult::Overflow;
                }
                dst.push((bb >> 8) as u8);
                dst.push(bb as u8);
            } else {
                if !dst.has_remaining() {
                    break CoderResult::Overflow;
                }
                dst.push(bb as u8);
            }
            mark += 1;
        };

        src.seek(mark);
        result
    }
}
