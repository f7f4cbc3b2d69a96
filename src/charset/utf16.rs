//! UTF-16 in either byte order, with optional byte-order marks.
//!
//! A lone or ill-ordered surrogate is malformed with length 1, as is a
//! high surrogate cut off by the end of input. A reversed mark after the
//! start is malformed with length 2.

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
    unicode::{BYTE_ORDER_MARK, REVERSED_MARK, detect, read_u16, u16_bytes},
};

/// Decode in `expected` order, or detect a leading mark and fall back to
/// `default` when `expected` is `None`.
pub(super) fn decoder(
    charset: &'static Charset,
    expected: Option<ByteOrder>,
    default: ByteOrder,
) -> Decoder {
    let step = Utf16Decoder {
        expected,
        default,
        current: expected,
    };
    Decoder::new(charset, step, 0.5, 1.0, vec![0xFFFD])
}

/// Encode in `order`, writing a leading mark if `mark` is set.
pub(super) fn encoder(charset: &'static Charset, order: ByteOrder, mark: bool) -> Encoder {
    let step = Utf16Encoder {
        order,
        mark,
        needs_mark: mark,
        parser: Parser::new(),
    };
    let max = if mark { 4.0 } else { 2.0 };
    let replacement = u16_bytes(0xFFFD, order).to_vec();

    Encoder::new(charset, step, 2.0, max, replacement)
}

struct Utf16Decoder {
    expected: Option<ByteOrder>,
    default: ByteOrder,
    /// `None` until the first unit has been inspected for a mark.
    current: Option<ByteOrder>,
}

impl CodeLoop for Utf16Decoder {
    type In = u8;
    type Out = u16;

    fn code(&mut self, src: &mut ByteBuffer, dst: &mut CharBuffer) -> CoderResult {
        let mut mark = src.position();
        let limit = src.limit();

        let result = loop {
            if limit - mark < 2 {
                break CoderResult::Underflow;
            }

            let order = match self.current {
                Some(order) => order,
                None => {
                    let unit = read_u16(src, mark, ByteOrder::BigEndian) as u32;
                    let marks = (BYTE_ORDER_MARK as u32, REVERSED_MARK as u32);

                    match detect(unit, marks, None, self.default) {
                        Left(order) => {
                            self.current = Some(order);
                            mark += 2;
                            continue;
                        }
                        Right(order) => {
                            self.current = Some(order);
                            order
                        }
                    }
                }
            };

            let c = read_u16(src, mark, order);

            if c == REVERSED_MARK {
                break CoderResult::Malformed(2);
            }
            if surrogate::is_low(c) {
                break CoderResult::Malformed(1);
            }

            if surrogate::is_high(c) {
                if limit - mark < 4 {
                    break CoderResult::Underflow;
                }

                let d = read_u16(src, mark + 2, order);
                if !surrogate::is_low(d) {
                    break CoderResult::Malformed(1);
                }
                if dst.remaining() < 2 {
                    break CoderResult::Overflow;
                }

                dst.push(c);
                dst.push(d);
                mark += 4;
                continue;
            }

            if !dst.has_remaining() {
                break CoderResult::Overflow;
            }

            dst.push(c);
            mark += 2;
        };

        src.seek(mark);
        result
    }

    fn malformed_tail(&self, _remaining: usize) -> usize {
        1
    }

    fn reset(&mut self) {
        self.current = self.expected;
    }
}

struct Utf16Encoder {
    order: ByteOrder,
    mark: bool,
    needs_mark: bool,
    parser: Parser,
}

impl Utf16Encoder {
    fn put(&self, dst: &mut ByteBuffer, unit: u16) {
        for b in u16_bytes(unit, self.order) {
            dst.push(b);
        }
    }
}

impl CodeLoop for Utf16Encoder {
    type In = u16;
    type Out = u8;

    fn code(&mut self, src: &mut CharBuffer, dst: &mut ByteBuffer) -> CoderResult {
        if self.needs_mark && src.has_remaining() {
            if dst.remaining() < 2 {
                return CoderResult::Overflow;
            }
            self.put(dst, BYTE_ORDER_MARK);
            self.needs_mark = false;
        }

        let mut mark = src.position();

        let result = loop {
            let Some(c) = src.peek_at(mark) else {
                break CoderResult::Underflow;
            };

            if !surrogate::is_surrogate(c) {
                if dst.remaining() < 2 {
                    break CoderResult::Overflow;
                }
                self.put(dst, c);
                mark += 1;
                continue;
            }

            let Some(scalar) = self.parser.parse_unit(c, src.peek_at(mark + 1)) else {
                break self.parser.error().unwrap_or(CoderResult::Malformed(1));
            };
            if dst.remaining() < 4 {
                break CoderResult::Overflow;
            }

            self.put(dst, surrogate::high(scalar));
            self.put(dst, surrogate::low(scalar));
            mark += 2;
        };

        src.seek(mark);
        result
    }

    fn reset(&mut self) {
        self.needs_mark = self.mark;
    }
}
