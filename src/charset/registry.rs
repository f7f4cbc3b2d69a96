//! Lookup of charsets by name.

use alloc::{string::String, vec::Vec};

use log::debug;
use thiserror::Error;

use crate::buffer::ByteOrder::{BigEndian, LittleEndian};

#[cfg(feature = "std")]
extern crate std;

use super::{
    Charset, CharsetId, CharsetNames, Codec,
    double_byte::SJIS_BASIC,
    single_byte::{ISO_8859_15, WINDOWS_1252},
};

/// Errors looking up a charset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The name can't be a charset name.
    #[error("Illegal charset name: {0:?}.")]
    IllegalName(String),
    /// No supported charset goes by the name.
    #[error("Unsupported charset: {0:?}.")]
    Unsupported(String),
}

static CHARSETS: [Charset; CharsetId::ALL.len()] = [
    Charset::new(CharsetId::UsAscii, Codec::Ascii),
    Charset::new(CharsetId::IsoLatin1, Codec::Latin1),
    Charset::new(CharsetId::Windows1252, Codec::SingleByte(&WINDOWS_1252)),
    Charset::new(CharsetId::Iso885915, Codec::SingleByte(&ISO_8859_15)),
    Charset::new(CharsetId::SjisBasic, Codec::DoubleByte(&SJIS_BASIC)),
    Charset::new(CharsetId::Utf8, Codec::Utf8),
    Charset::new(
        CharsetId::Utf16,
        Codec::Utf16 {
            expected: None,
            default: BigEndian,
            mark: true,
        },
    ),
    Charset::new(
        CharsetId::Utf16Be,
        Codec::Utf16 {
            expected: Some(BigEndian),
            default: BigEndian,
            mark: false,
        },
    ),
    Charset::new(
        CharsetId::Utf16Le,
        Codec::Utf16 {
            expected: Some(LittleEndian),
            default: LittleEndian,
            mark: false,
        },
    ),
    Charset::new(
        CharsetId::Utf16LeBom,
        Codec::Utf16 {
            expected: None,
            default: LittleEndian,
            mark: true,
        },
    ),
    Charset::new(
        CharsetId::Utf32,
        Codec::Utf32 {
            expected: None,
            mark: false,
        },
    ),
    Charset::new(
        CharsetId::Utf32Be,
        Codec::Utf32 {
            expected: Some(BigEndian),
            mark: false,
        },
    ),
    Charset::new(
        CharsetId::Utf32Le,
        Codec::Utf32 {
            expected: Some(LittleEndian),
            mark: false,
        },
    ),
    Charset::new(
        CharsetId::Utf32BeBom,
        Codec::Utf32 {
            expected: Some(BigEndian),
            mark: true,
        },
    ),
    Charset::new(
        CharsetId::Utf32LeBom,
        Codec::Utf32 {
            expected: Some(LittleEndian),
            mark: true,
        },
    ),
];

static STANDARD: Registry = Registry {
    charsets: &CHARSETS,
};

/// An immutable set of charsets, searchable by name.
#[derive(Debug)]
pub struct Registry {
    charsets: &'static [Charset],
}

impl Registry {
    /// The registry of every supported charset.
    pub fn standard() -> &'static Registry {
        &STANDARD
    }

    /// The charset going by `name`, canonical or alias, ignoring ASCII case.
    pub fn for_name(&self, name: &str) -> Result<&'static Charset, LookupError> {
        check_name(name)?;

        match self.charsets.iter().find(|c| c.id.is_named(name)) {
            Some(charset) => Ok(charset),
            None => {
                debug!("No charset named {name:?}");
                Err(LookupError::Unsupported(name.into()))
            }
        }
    }

    /// Whether a charset goes by `name`. Fails only for an illegal name.
    pub fn is_supported(&self, name: &str) -> Result<bool, LookupError> {
        match self.for_name(name) {
            Ok(_) => Ok(true),
            Err(LookupError::Unsupported(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The charset with a given id.
    pub fn get(&self, id: CharsetId) -> Option<&'static Charset> {
        self.charsets.iter().find(|c| c.id == id)
    }

    /// Every charset, ordered by canonical name ignoring ASCII case.
    pub fn iter(&self) -> impl Iterator<Item = &'static Charset> + use<> {
        let mut charsets: Vec<&'static Charset> = self.charsets.iter().collect();
        charsets.sort_by_cached_key(|c| c.name().to_ascii_lowercase());
        charsets.into_iter()
    }
}

/// The charset going by `name` in the standard registry.
pub fn for_name(name: &str) -> Result<&'static Charset, LookupError> {
    STANDARD.for_name(name)
}

/// Whether `name` is syntactically a charset name: non-empty, starting with
/// a letter or digit, and otherwise made of letters, digits and `-+:_.`.
pub fn check_name(name: &str) -> Result<(), LookupError> {
    let legal = name.bytes().enumerate().all(|(i, b)| {
        b.is_ascii_alphanumeric() || (i > 0 && matches!(b, b'-' | b'+' | b':' | b'_' | b'.'))
    });

    if name.is_empty() || !legal {
        Err(LookupError::IllegalName(name.into()))?;
    }
    Ok(())
}

fn utf8() -> &'static Charset {
    &CHARSETS[CharsetId::Utf8 as usize]
}

/// The charset of the environment's locale.
///
/// The codeset of the first set variable among `LC_ALL`, `LC_CTYPE` and
/// `LANG` (as in `en_US.UTF-8@euro`) is looked up in the standard registry.
/// A locale without a codeset, or with an unsupported one, gives UTF-8.
///
/// _Without Cargo feature `std`, always UTF-8._
#[cfg(feature = "std")]
pub fn default_charset() -> &'static Charset {
    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.is_empty());

    let Some(locale) = locale else {
        return utf8();
    };

    locale_codeset(&locale)
        .and_then(|codeset| match for_name(codeset) {
            Ok(charset) => Some(charset),
            Err(err) => {
                debug!("Locale {locale:?}: {err}");
                None
            }
        })
        .unwrap_or_else(utf8)
}

/// The charset of the environment's locale.
///
/// _Without Cargo feature `std`, always UTF-8._
#[cfg(not(feature = "std"))]
pub fn default_charset() -> &'static Charset {
    utf8()
}

/// The codeset of a POSIX locale name, between `.` and any `@` modifier.
#[cfg(feature = "std")]
fn locale_codeset(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    let codeset = rest.split('@').next().unwrap_or(rest);

    (!codeset.is_empty()).then_some(codeset)
}
