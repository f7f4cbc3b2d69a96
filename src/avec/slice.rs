//! Slice-based conversion.

use alloc::{string::String, vec::Vec};

use thiserror::Error;

use crate::{
    Charset,
    buffer::{ByteBuffer, CharBuffer},
    sans::{CharacterCodingError, CoderError},
};

/// Errors occurring while converting a slice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input, at an offset in source units.
    #[error("Malformed input of length {length} at offset {offset}.")]
    Malformed { offset: usize, length: usize },
    /// A character the target charset can't represent, at an offset in
    /// source units.
    #[error("Unmappable character of length {length} at offset {offset}.")]
    Unmappable { offset: usize, length: usize },
    /// The coder was misused.
    #[error(transparent)]
    Coder(#[from] CoderError),
}

impl Error {
    fn at(offset: usize, err: CharacterCodingError) -> Self {
        match err {
            CharacterCodingError::MalformedInput(length) => Self::Malformed { offset, length },
            CharacterCodingError::UnmappableCharacter(length) => {
                Self::Unmappable { offset, length }
            }
        }
    }
}

/// Decode a slice of bytes in `charset`.
///
/// This method is also re-exported as `codeset::avec::decode_slice`.
pub fn decode(charset: &'static Charset, r: &[u8]) -> Result<String, Error> {
    let mut src = ByteBuffer::from_slice(r);

    match charset.new_decoder().decode_all(&mut src) {
        Ok(chars) => Ok(chars.to_string_lossy()),
        Err(CoderError::Coding(err)) => Err(Error::at(src.position(), err)),
        Err(err) => Err(err.into()),
    }
}

/// Encode a string slice in `charset`. Offsets in errors count 16-bit units.
///
/// This method is also re-exported as `codeset::avec::encode_str`.
pub fn encode(charset: &'static Charset, s: &str) -> Result<Vec<u8>, Error> {
    let mut src = CharBuffer::wrap_str(s);

    match charset.new_encoder().encode_all(&mut src) {
        Ok(bytes) => Ok(bytes.to_vec()),
        Err(CoderError::Coding(err)) => Err(Error::at(src.position(), err)),
        Err(err) => Err(err.into()),
    }
}
