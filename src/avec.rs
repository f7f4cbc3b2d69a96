//! Convenience interfaces for common conversion patterns.
//!
//! The functions in this module convert whole slices, strings and streams in
//! one call, reporting the first malformed or unmappable run with its offset.
//! They are strict: nothing is replaced or skipped. For lenient conversion,
//! see [`Charset::decode`](crate::Charset::decode) and
//! [`Charset::encode`](crate::Charset::encode), or configure a coder from the
//! [`sans`](crate::sans) module.

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::{decode as decode_reader, encode as encode_writer};
pub use slice::{decode as decode_slice, encode as encode_str};
