//! Codec-independent machinery for implementing decoders and encoders.
//!
//! Nothing here performs I/O. A codec supplies a [`coder::CodeLoop`], a step
//! function that converts as much of a source buffer as fits into a
//! destination buffer and reports why it stopped with a
//! [`result::CoderResult`]. The [`coder::Coder`] engine wraps a step function
//! with the lifecycle (reset, coding, end of input, flushed) and applies the
//! configured [`coder::CodingErrorAction`] to malformed and unmappable input.
//!
//! # Step contract
//!
//! On return from a step, the source position must sit just past the last
//! fully converted unit. When an error is reported, that is the first unit of
//! the offending run, so the engine (or a caller driving the step directly)
//! can skip or substitute at the exact offset.
//!
//! Step functions that convert between 16-bit units and 21-bit scalars lean
//! on the helpers in [`surrogate`].

pub mod coder;
pub mod result;
pub mod surrogate;

pub use coder::{CodeLoop, Coder, CoderError, CoderState, CodingErrorAction, Decoder, Encoder};
pub use result::{CharacterCodingError, CoderResult};
