//! UTF-8.
//!
//! Decoding accepts exactly the well-formed byte sequences of the Unicode
//! standard (table 3-7). A malformed sequence is reported over its longest
//! valid prefix, at least one byte, so decoding resumes at the first byte
//! that can't continue it.

use alloc::vec;

use crate::{
    buffer::{ByteBuffer, CharBuffer},
    sans::{
        CodeLoop, CoderResult, Decoder, Encoder,
        surrogate::{self, Parser},
    },
};

use super::Charset;

pub(super) fn decoder(charset: &'static Charset) -> Decoder {
    Decoder::new(charset, Utf8Decoder, 1.0, 1.0, vec![0xFFFD])
}

pub(super) fn encoder(charset: &'static Charset) -> Encoder {
    let step = Utf8Encoder {
        parser: Parser::new(),
    };
    Encoder::new(charset, step, 1.1, 3.0, vec![b'?'])
}

/// Sequence length and range of the second byte for a leading byte, or
/// `None` if the byte can't start a sequence.
fn sequence(b: u8) -> Option<(usize, u8, u8)> {
    let sequence = match b {
        0xC2..=0xDF => (2, 0x80, 0xBF),
        0xE0 => (3, 0xA0, 0xBF),
        0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80, 0xBF),
        0xED => (3, 0x80, 0x9F),
        0xF0 => (4, 0x90, 0xBF),
        0xF1..=0xF3 => (4, 0x80, 0xBF),
        0xF4 => (4, 0x80, 0x8F),
        _ => return None,
    };

    Some(sequence)
}

struct Utf8Decoder;

impl CodeLoop for Utf8Decoder {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = 'step: loop {
            let Some(b1) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            if b1 < 0x80 {
                if !dst.has_remaining() {
                    break CoderResult::Overflow;
                }
                dst.push(b1 as u16);
                mark += 1;
                continue;
            }

            let Some((len, min, max)) = sequence(b1) else {
                break CoderResult::Malformed(1);
            };

            let mut scalar = (b1 & (0x7F >> len)) as u32;

            for k in 1..len {
                let Some(b) = src.peek_at(mark + k) else {
                    break 'step CoderResult::Underflow;
                };

                let (min, max) = if k == 1 { (min, max) } else { (0x80, 0xBF) };
                if !(min..=max).contains(&b) {
                    break 'step CoderResult::Malformed(k);
                }

                scalar = scalar << 6 | (b & 0x3F) as u32;
            }

            match surrogate::generate(scalar, len, dst) {
                Ok(_) => mark += len,
                Err(result) => break result,
            }
        };

        src.seek(mark);
        result
    }
}

struct Utf8Encoder {
    parser: Parser,
}

impl CodeLoop for Utf8Encoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let (scalar, units) = if surrogate::is_surrogate(c) {
                match self.parser.parse_unit(c, src.peek_at(mark + 1)) {
                    Some(scalar) => (scalar, 2),
                    None => break self.parser.error().unwrap_or(CoderResult::Malformed(1)),
                }
            } else {
                (c as u32, 1)
            };

            let len = match scalar {
                0..0x80 => 1,
                0x80..0x800 => 2,
                0x800..0x1_0000 => 3,
                _ => 4,
            };
            if dst.remaining() < len {
                break CoderResult::Overflow;
            }

            if len == 1 {
                dst.push(scalar as u8);
            } else {
                // Leading byte: `len` high bits set, then the top payload bits.
                let shift = 6 * (len - 1);
                dst.push((0xFF00 >> len) as u8 | (scalar >> shift) as u8);
                for k in (0..len - 1).rev() {
                    dst.push(0x80 | (scalar >> (6 * k)) as u8 & 0x3F);
                }
            }
            mark += units;
        };

        src.seek(mark);
        result
    }
}
