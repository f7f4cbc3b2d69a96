//! UTF-32 in either byte order.

use alloc::vec;

use either::{Left, Right};

use crate::{
    buffer::{ByteBuffer, ByteOrder, CharBuffer},
    sans::{
        CodeLoop, CoderResult, Decoder, Encoder,
        surrogate::{self, Parser},
    },
};

use super::{
    Charset,
    unicode::{BYTE_ORDER_MARK, detect, read_u32, u32_bytes},
};

const MARKS: (u32, u32) = (0x0000_FEFF, 0xFFFE_0000);

/// Decode in `expected` order, or big-endian if `None`. A leading mark in
/// an acceptable order is consumed and selects the order.
pub(super) fn decoder(charset: &'static Charset, expected: Option<ByteOrder>) -> Decoder {
    let step = Utf32Decoder {
        expected,
        current: None,
    };
    Decoder::new(charset, step, 0.25, 1.0, vec![0xFFFD])
}

/// Encode in `order`, writing a leading mark if `mark` is set.
pub(super) fn encoder(charset: &'static Charset, order: ByteOrder, mark: bool) -> Encoder {
    let step = Utf32Encoder {
        order,
        mark,
        needs_mark: mark,
        parser: Parser::new(),
    };
    let replacement = u32_bytes(0xFFFD, order).to_vec();

    Encoder::new(charset, step, 4.0, 4.0, replacement)
}

struct Utf32Decoder {
    expected: Option<ByteOrder>,
    current: Option<ByteOrder>,
}

impl CodeLoop for Utf32Decoder {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();
        let limit = src.limit();

        if limit - mark < 4 {
            return CoderResult::Underflow;
        }

        let order = match self.current {
            Some(order) => order,
            None => {
                let unit = read_u32(src, mark, ByteOrder::BigEndian);

                let order = match detect(unit, MARKS, self.expected, ByteOrder::BigEndian) {
                    Left(order) => {
                        mark += 4;
                        order
                    }
                    Right(order) => order,
                };
                self.current = Some(order);
                order
            }
        };

        let result = loop {
            if limit - mark < 4 {
                break CoderResult::Underflow;
            }

            let scalar = read_u32(src, mark, order);
            if scalar > surrogate::MAX_SCALAR || surrogate::is_surrogate_scalar(scalar) {
                break CoderResult::Malformed(4);
            }

            match surrogate::generate(scalar, 4, dst) {
                Ok(_) => mark += 4,
                Err(result) => break result,
            }
        };

        src.seek(mark);
        result
    }

    fn reset(&mut self) {
        self.current = None;
    }
}

struct Utf32Encoder {
    order: ByteOrder,
    mark: bool,
    needs_mark: bool,
    parser: Parser,
}

impl Utf32Encoder {
    fn put(&self, dst: &mut ByteBuffer, unit: u32) {
        for b in u32_bytes(unit, self.order) {
            dst.push(b);
        }
    }
}

impl CodeLoop for Utf32Encoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        if self.needs_mark && src.has_remaining() {
            if dst.remaining() < 4 {
                return CoderResult::Overflow;
            }
            self.put(dst, BYTE_ORDER_MARK as u32);
            self.needs_mark = false;
        }

        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            let Some(scalar) = self.parser.parse_unit(c, src.peek_at(mark + 1)) else {
                break self.parser.error().unwrap_or(CoderResult::Malformed(1));
            };
            if dst.remaining() < 4 {
                break CoderResult::Overflow;
            }

            self.put(dst, scalar);
            mark += if self.parser.is_pair() { 2 } else { 1 };
        };

        src.seek(mark);
        result
    }

    fn reset(&mut self) {
        self.needs_mark = self.mark;
    }
}
