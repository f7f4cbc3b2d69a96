#![no_std]

//! Conversion between text and bytes in a set of named character encodings.
//!
//! Codeset looks up charsets by name or alias in a static registry, and hands
//! out decoders (bytes to 16-bit character units) and encoders (units to
//! bytes) driven by a common engine. The engine works over caller-owned
//! [`buffer`]s, converting as much as fits and reporting why it stopped, so
//! input and output can arrive and leave in pieces of any size.
//!
//! Most users should begin with the functions in the [`avec`] module, which
//! convert whole slices and streams. For incremental conversion, take a
//! [`Decoder`](sans::Decoder) or [`Encoder`](sans::Encoder) from a
//! [`Charset`] and drive it as described in the [`sans`] module.
//!
//! ```
//! let latin1 = codeset::for_name("latin1")?;
//! assert_eq!(codeset::avec::decode_slice(latin1, &[0x63, 0x61, 0x66, 0xE9])?, "café");
//! ```
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader- and writer-based conversion, and derive the
//!   default charset from the environment (default).

extern crate alloc;

pub mod avec;
pub mod buffer;
pub mod charset;
pub mod sans;

pub use charset::{Charset, CharsetId, LookupError, default_charset, for_name};
