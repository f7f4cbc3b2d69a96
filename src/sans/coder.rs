//! The decoder/encoder engine.
//!
//! A [`Coder`] drives a codec's [`CodeLoop`] through a small lifecycle:
//!
//! ```text
//!   Reset --code(eoi=false)--> Coding --code(eoi=true)--> End --flush--> Flushed
//!     \_______________________code(eoi=true)_______________^
//! ```
//!
//! [`Coder::reset`] returns to `Reset` from any state. Calling an operation
//! out of order fails with [`CoderError::IllegalState`].
//!
//! [`Decoder`] and [`Encoder`] are the two directions of the engine, from
//! bytes to 16-bit units and back.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::{char, fmt};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    buffer::{Buffer, BufferError, ByteBuffer, CharBuffer, Element},
    charset::Charset,
};

use super::result::{CharacterCodingError, CoderResult};

/// A codec's conversion step.
///
/// See the [module documentation](crate::sans) for the contract a step must
/// uphold.
pub trait CodeLoop {
    /// Source unit.
    type In: Element;
    /// Destination unit.
    type Out: Element;

    /// Convert as much of `src` into `dst` as possible.
    ///
    /// Implementations may assume `dst` is writable.
    fn code(&mut self, src: &mut Buffer<Self::In>, dst: &mut Buffer<Self::Out>) -> CoderResult;

    /// Write any output held back until the end of input.
    fn flush(&mut self, _dst: &mut Buffer<Self::Out>) -> CoderResult {
        CoderResult::Underflow
    }

    /// The malformed length to report for `remaining` units left over when
    /// the input ends part way through a sequence.
    fn malformed_tail(&self, remaining: usize) -> usize {
        remaining
    }

    /// Forget all state carried between steps.
    fn reset(&mut self) {}
}

/// What to do about malformed input or an unmappable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodingErrorAction {
    /// Return the error result to the caller.
    #[default]
    Report,
    /// Skip the offending input and continue.
    Ignore,
    /// Write the replacement, skip the offending input and continue.
    Replace,
}

/// Lifecycle state of a [`Coder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoderState {
    Reset,
    Coding,
    End,
    Flushed,
}

/// An error driving a [`Coder`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoderError {
    /// An operation was called out of order.
    #[error("Illegal coder transition from {from:?} to {to:?}.")]
    IllegalState { from: CoderState, to: CoderState },
    /// A replacement was rejected.
    #[error("Illegal replacement: {0}.")]
    IllegalReplacement(&'static str),
    /// A malformed or unmappable run, raised by a checked entry point.
    #[error(transparent)]
    Coding(#[from] CharacterCodingError),
    /// Misuse of a buffer handed to the coder.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Converts bytes into 16-bit units.
pub type Decoder = Coder<u8, u16>;
/// Converts 16-bit units into bytes.
pub type Encoder = Coder<u16, u8>;

/// The engine shared by decoders and encoders.
pub struct Coder<I: Element, O: Element> {
    charset: &'static Charset,
    step: Box<dyn CodeLoop<In = I, Out = O>>,
    replacement: Vec<O>,
    average: f32,
    max: f32,
    state: CoderState,
    malformed: CodingErrorAction,
    unmappable: CodingErrorAction,
}

impl<I: Element, O: Element> Coder<I, O> {
    pub(crate) fn new(
        charset: &'static Charset,
        step: impl CodeLoop<In = I, Out = O> + 'static,
        average: f32,
        max: f32,
        replacement: Vec<O>,
    ) -> Self {
        debug_assert!(average > 0.0 && average <= max);
        Self {
            charset,
            step: Box::new(step),
            replacement,
            average,
            max,
            state: CoderState::Reset,
            malformed: CodingErrorAction::Report,
            unmappable: CodingErrorAction::Report,
        }
    }

    /// The charset that created this coder.
    pub fn charset(&self) -> &'static Charset {
        self.charset
    }

    pub fn state(&self) -> CoderState {
        self.state
    }

    /// The units written in place of bad input under
    /// [`CodingErrorAction::Replace`].
    pub fn replacement(&self) -> &[O] {
        &self.replacement
    }

    /// Expected output units per input unit, used to size output buffers.
    pub fn average_out_per_in(&self) -> f32 {
        self.average
    }

    /// The most output units a single input unit may produce.
    pub fn max_out_per_in(&self) -> f32 {
        self.max
    }

    pub fn malformed_action(&self) -> CodingErrorAction {
        self.malformed
    }

    pub fn unmappable_action(&self) -> CodingErrorAction {
        self.unmappable
    }

    pub fn on_malformed_input(&mut self, action: CodingErrorAction) -> &mut Self {
        self.malformed = action;
        self
    }

    pub fn on_unmappable_character(&mut self, action: CodingErrorAction) -> &mut Self {
        self.unmappable = action;
        self
    }

    /// Return to the initial state, discarding any codec state.
    pub fn reset(&mut self) -> &mut Self {
        self.step.reset();
        if self.state != CoderState::Reset {
            trace!("{}: {:?} -> Reset", self.charset, self.state);
        }
        self.state = CoderState::Reset;
        self
    }

    /// Run the step over `src`, applying the configured actions.
    ///
    /// Pass `end_of_input` once `src` holds the last of the input; input still
    /// left over when the step underflows is then reported as malformed.
    fn code(
        &mut self,
        src: &mut Buffer<I>,
        dst: &mut Buffer<O>,
        end_of_input: bool,
    ) -> Result<CoderResult, CoderError> {
        let next = if end_of_input {
            CoderState::End
        } else {
            CoderState::Coding
        };

        match self.state {
            CoderState::Reset | CoderState::Coding => {}
            CoderState::End if end_of_input => {}
            from => Err(CoderError::IllegalState { from, to: next })?,
        }

        if dst.is_read_only() {
            Err(BufferError::ReadOnly)?;
        }

        if self.state != next {
            trace!("{}: {:?} -> {:?}", self.charset, self.state, next);
        }
        self.state = next;

        loop {
            let result = match self.step.code(src, dst) {
                CoderResult::Underflow if end_of_input && src.has_remaining() => {
                    CoderResult::Malformed(self.step.malformed_tail(src.remaining()))
                }
                result => result,
            };

            let (action, length) = match result {
                CoderResult::Underflow | CoderResult::Overflow => return Ok(result),
                CoderResult::Malformed(n) => (self.malformed, n),
                CoderResult::Unmappable(n) => (self.unmappable, n),
            };

            match action {
                CodingErrorAction::Report => return Ok(result),
                CodingErrorAction::Replace => {
                    if dst.remaining() < self.replacement.len() {
                        return Ok(CoderResult::Overflow);
                    }
                    for unit in &self.replacement {
                        dst.push(*unit);
                    }
                }
                CodingErrorAction::Ignore => {}
            }

            debug!(
                "{}: {:?} at {} handled by {:?}",
                self.charset,
                result,
                src.position(),
                action
            );
            src.set_position(src.position() + length)?;
        }
    }

    /// Write any output the codec held back for the end of input.
    ///
    /// Only valid once coding has been told the input ended; repeated calls
    /// after a successful flush return `Underflow`.
    pub fn flush(&mut self, dst: &mut Buffer<O>) -> Result<CoderResult, CoderError> {
        match self.state {
            CoderState::End => {
                if dst.is_read_only() {
                    Err(BufferError::ReadOnly)?;
                }

                let result = self.step.flush(dst);
                if !result.is_overflow() {
                    trace!("{}: End -> Flushed", self.charset);
                    self.state = CoderState::Flushed;
                }
                Ok(result)
            }
            CoderState::Flushed => Ok(CoderResult::Underflow),
            from => Err(CoderError::IllegalState {
                from,
                to: CoderState::Flushed,
            }),
        }
    }

    /// Convert all of `src` into a newly allocated buffer, raising malformed
    /// and unmappable runs under [`CodingErrorAction::Report`].
    ///
    /// The output starts at `remaining * average` units and grows to
    /// `2n + 1` each time it fills. The result is flipped, ready for reading.
    fn code_all(&mut self, src: &mut Buffer<I>) -> Result<Buffer<O>, CoderError> {
        let mut n = (src.remaining() as f32 * self.average) as usize;
        let mut out = Buffer::allocate(n);

        if n == 0 && !src.has_remaining() {
            return Ok(out);
        }

        self.reset();

        loop {
            let result = match self.code(src, &mut out, true)? {
                CoderResult::Underflow => self.flush(&mut out)?,
                result => result,
            };

            match result.check()? {
                CoderResult::Overflow => {
                    n = 2 * n + 1;
                    trace!("{}: growing output to {}", self.charset, n);

                    let mut grown = Buffer::allocate(n);
                    out.flip();
                    grown.put_buffer(&mut out)?;
                    out = grown;
                }
                _ => break,
            }
        }

        out.flip();
        Ok(out)
    }

    fn check_replacement(&self, replacement: &[O]) -> Result<(), CoderError> {
        if replacement.is_empty() {
            Err(CoderError::IllegalReplacement("empty replacement"))?;
        }
        if replacement.len() as f32 > self.max {
            Err(CoderError::IllegalReplacement("replacement too long"))?;
        }
        Ok(())
    }
}

impl Coder<u8, u16> {
    /// Decode from `src` into `dst`. See [`Coder`] for the lifecycle.
    pub fn decode(
        &mut self,
        src: &mut ByteBuffer,
        dst: &mut CharBuffer,
        end_of_input: bool,
    ) -> Result<CoderResult, CoderError> {
        self.code(src, dst, end_of_input)
    }

    /// Decode all of `src` in one go, from a reset state.
    pub fn decode_all(&mut self, src: &mut ByteBuffer) -> Result<CharBuffer, CoderError> {
        self.code_all(src)
    }

    /// Replace the units written for bad input. The replacement must be
    /// non-empty and no longer than [`Coder::max_out_per_in`].
    pub fn replace_with(&mut self, replacement: &[u16]) -> Result<&mut Self, CoderError> {
        self.check_replacement(replacement)?;
        self.replacement = replacement.to_vec();
        Ok(self)
    }

    /// The replacement as a string.
    pub fn replacement_str(&self) -> String {
        char::decode_utf16(self.replacement.iter().copied())
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    pub fn average_chars_per_byte(&self) -> f32 {
        self.average
    }

    pub fn max_chars_per_byte(&self) -> f32 {
        self.max
    }
}

impl Coder<u16, u8> {
    /// Encode from `src` into `dst`. See [`Coder`] for the lifecycle.
    pub fn encode(
        &mut self,
        src: &mut CharBuffer,
        dst: &mut ByteBuffer,
        end_of_input: bool,
    ) -> Result<CoderResult, CoderError> {
        self.code(src, dst, end_of_input)
    }

    /// Encode all of `src` in one go, from a reset state.
    pub fn encode_all(&mut self, src: &mut CharBuffer) -> Result<ByteBuffer, CoderError> {
        self.code_all(src)
    }

    /// Encode a string slice in one go, from a reset state.
    pub fn encode_str(&mut self, s: &str) -> Result<ByteBuffer, CoderError> {
        self.code_all(&mut CharBuffer::wrap_str(s))
    }

    /// Replace the bytes written for bad input. The replacement must be
    /// non-empty, no longer than [`Coder::max_out_per_in`], and decode
    /// cleanly in this encoder's charset.
    pub fn replace_with(&mut self, replacement: &[u8]) -> Result<&mut Self, CoderError> {
        self.check_replacement(replacement)?;
        if !self.is_legal_replacement(replacement) {
            Err(CoderError::IllegalReplacement("replacement does not decode"))?;
        }

        self.replacement = replacement.to_vec();
        Ok(self)
    }

    /// Whether `replacement` decodes without error in this charset.
    pub fn is_legal_replacement(&self, replacement: &[u8]) -> bool {
        let mut decoder = self.charset.new_decoder();
        let mut src = ByteBuffer::from_slice(replacement);
        let capacity = (replacement.len() as f32 * decoder.max_out_per_in()) as usize;
        let mut dst = CharBuffer::allocate(capacity.max(1));

        match decoder.decode(&mut src, &mut dst, true) {
            Ok(result) => !result.is_error(),
            Err(_) => false,
        }
    }

    /// Whether a single unit can be encoded. Lone surrogates can't.
    pub fn can_encode_char(&self, unit: u16) -> Result<bool, CoderError> {
        self.can_encode_units(&[unit])
    }

    /// Whether every scalar of a string slice can be encoded.
    pub fn can_encode_str(&self, s: &str) -> Result<bool, CoderError> {
        self.can_encode_units(&s.encode_utf16().collect::<Vec<_>>())
    }

    /// Whether a run of units can be encoded.
    ///
    /// The trial runs on a fresh encoder of the same charset, so this
    /// encoder's state is untouched. Fails if this encoder is part way
    /// through an operation.
    pub fn can_encode_units(&self, units: &[u16]) -> Result<bool, CoderError> {
        match self.state {
            CoderState::Reset | CoderState::Flushed => {}
            from => Err(CoderError::IllegalState {
                from,
                to: CoderState::Coding,
            })?,
        }

        let mut trial = self.charset.new_encoder();
        Ok(trial.encode_all(&mut CharBuffer::from_slice(units)).is_ok())
    }

    pub fn average_bytes_per_char(&self) -> f32 {
        self.average
    }

    pub fn max_bytes_per_char(&self) -> f32 {
        self.max
    }
}

impl<I: Element, O: Element> fmt::Debug for Coder<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coder")
            .field("charset", &self.charset.name())
            .field("state", &self.state)
            .field("malformed", &self.malformed)
            .field("unmappable", &self.unmappable)
            .finish()
    }
}
