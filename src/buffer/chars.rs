//! String conveniences for character buffers.

use alloc::{string::String, vec::Vec};
use core::{char, fmt};

use super::{Buffer, BufferError};

impl Buffer<u16> {
    /// Wrap the UTF-16 form of a string slice. The result is read-only.
    pub fn wrap_str(s: &str) -> Self {
        Self::frozen(s.encode_utf16().collect::<Vec<_>>())
    }

    /// Copy the UTF-16 form of a string slice in at the position.
    pub fn put_str(&mut self, s: &str) -> Result<&mut Self, BufferError> {
        self.check_writable()?;
        if s.encode_utf16().count() > self.remaining() {
            Err(BufferError::Overflow)?;
        }

        for unit in s.encode_utf16() {
            self.push(unit);
        }
        Ok(self)
    }

    /// Decode the remaining units, substituting U+FFFD for unpaired
    /// surrogates.
    pub fn to_string_lossy(&self) -> String {
        char::decode_utf16((self.position..self.limit).map(|i| self.load(i)))
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl fmt::Display for Buffer<u16> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
