//! Stream-based conversion.
//!
//! _Requires Cargo feature `std`._

use std::{
    io::{ErrorKind, Read, Write},
    string::String,
    vec,
};

use log::trace;
use thiserror::Error;

use crate::{
    Charset,
    buffer::{BufferError, ByteBuffer, CharBuffer},
    sans::{CharacterCodingError, CoderError, CoderResult},
};

extern crate std;

/// Bytes read or written per step.
const CHUNK: usize = 8192;

/// Errors occurring while converting to or from a stream.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader or writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),
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
    /// A staging buffer was misused.
    #[error(transparent)]
    Buffer(#[from] BufferError),
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

/// Decode everything a reader yields in `charset`.
///
/// Input is decoded a chunk at a time. An incomplete sequence at the end of
/// a chunk is carried over to the next.
///
/// This method is also re-exported as `codeset::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, charset: &'static Charset) -> Result<String, Error> {
    let mut decoder = charset.new_decoder();
    let mut src = ByteBuffer::allocate(CHUNK);
    let capacity = (CHUNK as f32 * decoder.max_chars_per_byte()) as usize;
    let mut dst = CharBuffer::allocate(capacity.max(2));

    let mut chunk = vec![0; CHUNK];
    let mut out = String::new();
    let mut offset = 0; // Bytes consumed before the start of `src`.

    loop {
        let n = match r.read(&mut chunk[..src.remaining()]) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => Err(err)?,
        };
        src.put_slice(&chunk[..n])?;
        src.flip();

        let end_of_input = n == 0;

        loop {
            let result = decoder.decode(&mut src, &mut dst, end_of_input)?;
            drain(&mut dst, &mut out);

            match result.check() {
                Ok(CoderResult::Overflow) => continue,
                Ok(_) => break,
                Err(err) => return Err(Error::at(offset + src.position(), err)),
            }
        }

        if end_of_input {
            while decoder.flush(&mut dst)?.is_overflow() {
                drain(&mut dst, &mut out);
            }
            drain(&mut dst, &mut out);

            trace!("{charset}: decoded {} bytes", offset + src.position());
            return Ok(out);
        }

        offset += src.position();
        src.compact()?;
    }
}

/// Move decoded units into a string, leaving `dst` empty.
fn drain(dst: &mut CharBuffer, out: &mut String) {
    dst.flip();
    out.push_str(&dst.to_string_lossy());
    dst.clear();
}

/// Encode a string slice in `charset` to a writer. Offsets in errors count
/// 16-bit units.
///
/// This method is also re-exported as `codeset::avec::encode_writer`.
///
/// _Requires Cargo feature `std`._
pub fn encode(w: &mut impl Write, charset: &'static Charset, s: &str) -> Result<(), Error> {
    let mut encoder = charset.new_encoder();
    let mut src = CharBuffer::wrap_str(s);
    let mut dst = ByteBuffer::allocate(CHUNK);

    loop {
        let result = match encoder.encode(&mut src, &mut dst, true)? {
            CoderResult::Underflow => encoder.flush(&mut dst)?,
            result => result,
        };

        dst.flip();
        w.write_all(&dst.to_vec())?;
        dst.clear();

        match result.check() {
            Ok(CoderResult::Overflow) => continue,
            Ok(_) => break,
            Err(err) => return Err(Error::at(src.position(), err)),
        }
    }

    w.flush()?;
    Ok(())
}
