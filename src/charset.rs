//! Named character sets and their codecs.
//!
//! Every supported charset is a variant of [`CharsetId`] with a static
//! [`Charset`] in the [`registry`]. A charset hands out fresh, independent
//! [`Decoder`]s and [`Encoder`]s; it holds no mutable state itself and may be
//! shared freely.
//!
//! | Charset | Decoder | Encoder |
//! | --- | --- | --- |
//! | `US-ASCII` | 7-bit | 7-bit |
//! | `ISO-8859-1` | identity | identity |
//! | `windows-1252`, `ISO-8859-15` | single-byte table | single-byte table |
//! | `x-SJIS-Basic` | double-byte table | double-byte table |
//! | `UTF-8` | | |
//! | `UTF-16` | byte-order mark, else big-endian | big-endian with mark |
//! | `UTF-16BE`, `UTF-16LE` | fixed order | fixed order |
//! | `x-UTF-16LE-BOM` | byte-order mark, else little-endian | little-endian with mark |
//! | `UTF-32` | byte-order mark, else big-endian | big-endian |
//! | `UTF-32BE`, `UTF-32LE` | optional matching mark | fixed order |
//! | `X-UTF-32BE-BOM`, `X-UTF-32LE-BOM` | optional matching mark | fixed order with mark |

use core::fmt;

use codeset_derive::CharsetNames;

use crate::{
    buffer::{ByteBuffer, ByteOrder, CharBuffer},
    sans::{CoderError, CodingErrorAction, Decoder, Encoder},
};

mod ascii;
mod double_byte;
pub mod registry;
mod single_byte;
mod unicode;
mod utf16;
mod utf32;
mod utf8;

pub use double_byte::DoubleByteTable;
pub use registry::{LookupError, Registry, default_charset, for_name};
pub use single_byte::SingleByteTable;

/// Canonical names and aliases of a closed set of charsets.
///
/// Derived for [`CharsetId`] by `#[derive(CharsetNames)]`, which reads a
/// `charset("name", aliases("alias", ...))` attribute on every variant and
/// rejects names that collide case-insensitively.
pub trait CharsetNames: Sized + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn canonical_name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str];

    /// Whether `name` is the canonical name or an alias, ignoring ASCII case.
    fn is_named(&self, name: &str) -> bool {
        core::iter::once(self.canonical_name())
            .chain(self.aliases().iter().copied())
            .any(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Identifier of a supported charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, CharsetNames)]
pub enum CharsetId {
    #[charset(
        "US-ASCII",
        aliases(
            "iso-ir-6",
            "ANSI_X3.4-1986",
            "ISO_646.irv:1991",
            "ASCII",
            "ISO646-US",
            "us",
            "IBM367",
            "cp367",
            "csASCII",
            "default",
            "646",
            "iso_646.irv:1983",
            "ANSI_X3.4-1968",
            "ascii7"
        )
    )]
    UsAscii,
    #[charset(
        "ISO-8859-1",
        aliases(
            "iso-ir-100",
            "ISO_8859-1",
            "latin1",
            "l1",
            "IBM819",
            "cp819",
            "csISOLatin1",
            "819",
            "IBM-819",
            "ISO8859_1",
            "ISO_8859-1:1987",
            "ISO_8859_1",
            "8859_1",
            "ISO8859-1"
        )
    )]
    IsoLatin1,
    #[charset(
        "windows-1252",
        aliases("cp1252", "cp5348", "ibm-1252", "ibm1252")
    )]
    Windows1252,
    #[charset(
        "ISO-8859-15",
        aliases(
            "ISO_8859-15",
            "Latin-9",
            "csISO885915",
            "8859_15",
            "IBM923",
            "IBM-923",
            "cp923",
            "923",
            "LATIN0",
            "csISOlatin9",
            "ISO8859_15_FDIS",
            "L9",
            "ISO8859-15",
            "LATIN9",
            "csISOlatin0",
            "ISO8859_15"
        )
    )]
    Iso885915,
    #[charset("x-SJIS-Basic", aliases("SJIS-Basic", "x-sjis-subset"))]
    SjisBasic,
    #[charset("UTF-8", aliases("UTF8", "unicode-1-1-utf-8"))]
    Utf8,
    #[charset("UTF-16", aliases("UTF_16", "utf16", "unicode", "UnicodeBig"))]
    Utf16,
    #[charset(
        "UTF-16BE",
        aliases("UTF_16BE", "ISO-10646-UCS-2", "X-UTF-16BE", "UnicodeBigUnmarked")
    )]
    Utf16Be,
    #[charset(
        "UTF-16LE",
        aliases("UTF_16LE", "X-UTF-16LE", "UnicodeLittleUnmarked")
    )]
    Utf16Le,
    #[charset("x-UTF-16LE-BOM", aliases("UnicodeLittle"))]
    Utf16LeBom,
    #[charset("UTF-32", aliases("UTF_32", "UTF32"))]
    Utf32,
    #[charset("UTF-32BE", aliases("UTF_32BE", "X-UTF-32BE"))]
    Utf32Be,
    #[charset("UTF-32LE", aliases("UTF_32LE", "X-UTF-32LE"))]
    Utf32Le,
    #[charset("X-UTF-32BE-BOM", aliases("UTF_32BE_BOM", "UTF-32BE-BOM"))]
    Utf32BeBom,
    #[charset("X-UTF-32LE-BOM", aliases("UTF_32LE_BOM", "UTF-32LE-BOM"))]
    Utf32LeBom,
}

impl CharsetId {
    /// Whether the charset can represent every Unicode scalar.
    pub fn is_unicode(self) -> bool {
        use CharsetId::*;

        matches!(
            self,
            Utf8 | Utf16 | Utf16Be | Utf16Le | Utf16LeBom | Utf32 | Utf32Be | Utf32Le | Utf32BeBom | Utf32LeBom
        )
    }

    /// Whether every character of `other` is representable in `self`.
    pub fn contains(self, other: CharsetId) -> bool {
        use CharsetId::*;

        self == other
            || self.is_unicode()
            || matches!(
                (self, other),
                (IsoLatin1 | Windows1252 | Iso885915 | SjisBasic, UsAscii)
            )
    }
}

/// How a charset converts, and the parameters of its codec.
#[derive(Clone, Copy)]
pub(crate) enum Codec {
    Ascii,
    Latin1,
    SingleByte(&'static SingleByteTable),
    DoubleByte(&'static DoubleByteTable),
    Utf8,
    /// `expected` is the fixed decoding order, or `None` to detect a mark and
    /// fall back to `default`. Encoding uses `default`.
    Utf16 {
        expected: Option<ByteOrder>,
        default: ByteOrder,
        mark: bool,
    },
    /// Decoding always looks for a leading mark agreeing with `expected`.
    /// Encoding uses `expected`, or big-endian.
    Utf32 {
        expected: Option<ByteOrder>,
        mark: bool,
    },
}

/// A named character set.
pub struct Charset {
    id: CharsetId,
    codec: Codec,
}

impl Charset {
    pub(crate) const fn new(id: CharsetId, codec: Codec) -> Self {
        Self { id, codec }
    }

    pub fn id(&self) -> CharsetId {
        self.id
    }

    /// The canonical name.
    pub fn name(&self) -> &'static str {
        self.id.canonical_name()
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.id.aliases()
    }

    /// Whether the canonical name is registered with IANA, i.e. doesn't carry
    /// an `x-` prefix.
    pub fn is_registered(&self) -> bool {
        let name = self.name().as_bytes();
        !(name.len() > 2 && name[..2].eq_ignore_ascii_case(b"x-"))
    }

    /// Whether this charset supports encoding. All supported charsets do.
    pub fn can_encode(&self) -> bool {
        true
    }

    /// Whether every character of `other` is representable in this charset.
    pub fn contains(&self, other: &Charset) -> bool {
        self.id.contains(other.id)
    }

    /// A new decoder in the `Reset` state, reporting all errors.
    pub fn new_decoder(&'static self) -> Decoder {
        match self.codec {
            Codec::Ascii => ascii::decoder(self, ascii::ASCII_MAX),
            Codec::Latin1 => ascii::decoder(self, ascii::LATIN1_MAX),
            Codec::SingleByte(table) => single_byte::decoder(self, table),
            Codec::DoubleByte(table) => double_byte::decoder(self, table),
            Codec::Utf8 => utf8::decoder(self),
            Codec::Utf16 {
                expected, default, ..
            } => utf16::decoder(self, expected, default),
            Codec::Utf32 { expected, .. } => utf32::decoder(self, expected),
        }
    }

    /// A new encoder in the `Reset` state, reporting all errors.
    pub fn new_encoder(&'static self) -> Encoder {
        match self.codec {
            Codec::Ascii => ascii::encoder(self, ascii::ASCII_MAX),
            Codec::Latin1 => ascii::encoder(self, ascii::LATIN1_MAX),
            Codec::SingleByte(table) => single_byte::encoder(self, table),
            Codec::DoubleByte(table) => double_byte::encoder(self, table),
            Codec::Utf8 => utf8::encoder(self),
            Codec::Utf16 { default, mark, .. } => utf16::encoder(self, default, mark),
            Codec::Utf32 { expected, mark } => {
                utf32::encoder(self, expected.unwrap_or(ByteOrder::BigEndian), mark)
            }
        }
    }

    /// Decode the rest of `src`, replacing malformed and unmappable input.
    pub fn decode(&'static self, src: &mut ByteBuffer) -> Result<CharBuffer, CoderError> {
        self.new_decoder()
            .on_malformed_input(CodingErrorAction::Replace)
            .on_unmappable_character(CodingErrorAction::Replace)
            .decode_all(src)
    }

    /// Encode the rest of `src`, replacing malformed and unmappable input.
    pub fn encode(&'static self, src: &mut CharBuffer) -> Result<ByteBuffer, CoderError> {
        self.new_encoder()
            .on_malformed_input(CodingErrorAction::Replace)
            .on_unmappable_character(CodingErrorAction::Replace)
            .encode_all(src)
    }

    /// Encode a string slice, replacing unmappable characters.
    pub fn encode_str(&'static self, s: &str) -> Result<ByteBuffer, CoderError> {
        self.encode(&mut CharBuffer::wrap_str(s))
    }
}

impl PartialEq for Charset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Charset {}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}
