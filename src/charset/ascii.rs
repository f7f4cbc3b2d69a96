//! US-ASCII and ISO-8859-1, where bytes and units coincide below a bound.

use alloc::vec;

use crate::{
    buffer::{ByteBuffer, CharBuffer},
    sans::{
        CodeLoop, CoderResult, Decoder, Encoder,
        surrogate::{self, Parser},
    },
};

use super::Charset;

pub(super) const ASCII_MAX: u8 = 0x7F;
pub(super) const LATIN1_MAX: u8 = 0xFF;

pub(super) fn decoder(charset: &'static Charset, max: u8) -> Decoder {
    Decoder::new(charset, Identity { max }, 1.0, 1.0, vec![0xFFFD])
}

pub(super) fn encoder(charset: &'static Charset, max: u8) -> Encoder {
    let step = IdentityEncoder {
        max,
        parser: Parser::new(),
    };
    Encoder::new(charset, step, 1.0, 1.0, vec![b'?'])
}

/// Bytes up to `max` decode to the unit of the same value.
struct Identity {
    max: u8,
}

impl CodeLoop for Identity {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(b) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };
            if b > self.max {
                break CoderResult::Malformed(1);
            }
            if !dst.has_remaining() {
                break CoderResult::Overflow;
            }

            dst.push(b as u16);
            mark += 1;
        };

        src.seek(mark);
        result
    }
}

/// Units up to `max` encode to the byte of the same value.
struct IdentityEncoder {
    max: u8,
    parser: Parser,
}

impl CodeLoop for IdentityEncoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            if c <= self.max as u16 {
                if !dst.has_remaining() {
                    break CoderResult::Overflow;
                }
                dst.push(c as u8);
                mark += 1;
                continue;
            }

            break unmappable(&mut self.parser, c, src, mark);
        };

        src.seek(mark);
        result
    }
}

/// The result for a unit an 8-bit encoder can't map, accounting for
/// surrogates: a lone one is malformed, a valid pair unmappable as a whole.
pub(super) fn unmappable(parser: &mut Parser, c: u16, src: &CharBuffer, mark: usize) -> CoderResult {
    if !surrogate::is_surrogate(c) {
        return CoderResult::Unmappable(1);
    }

    match parser.parse_unit(c, src.peek_at(mark + 1)) {
        Some(_) => parser.unmappable_result(),
        None => parser.error().unwrap_or(CoderResult::Malformed(1)),
    }
}
