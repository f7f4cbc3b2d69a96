#![cfg(feature = "std")]

use codeset::{
    CharsetId, LookupError, avec,
    buffer::{ByteBuffer, CharBuffer},
    charset::{CharsetNames, Registry, registry::check_name},
    default_charset, for_name,
    sans::CoderResult,
};

#[test]
fn lookup_ignores_case_and_accepts_aliases() {
    let ascii = for_name("US-ASCII").unwrap();

    for name in ["us-ascii", "ASCII", "iso646-us", "ANSI_X3.4-1968", "646"] {
        assert_eq!(for_name(name).unwrap(), ascii, "{name}");
    }
    assert_eq!(for_name("LATIN1").unwrap().name(), "ISO-8859-1");
    assert_eq!(for_name("cp1252").unwrap().name(), "windows-1252");
    assert_eq!(for_name("latin-9").unwrap().name(), "ISO-8859-15");
    assert_eq!(for_name("utf8").unwrap().name(), "UTF-8");
}

#[test]
fn lookup_errors() {
    assert_eq!(for_name(""), Err(LookupError::IllegalName("".into())));
    assert_eq!(for_name("-utf8"), Err(LookupError::IllegalName("-utf8".into())));
    assert_eq!(for_name("utf 8"), Err(LookupError::IllegalName("utf 8".into())));
    assert_eq!(for_name("x-unknown"), Err(LookupError::Unsupported("x-unknown".into())));

    assert!(check_name("a+b:c_d.e-f").is_ok());
    assert_eq!(Registry::standard().is_supported("KOI8-R"), Ok(false));
    assert_eq!(Registry::standard().is_supported("utf-16le"), Ok(true));
    assert!(Registry::standard().is_supported("é").is_err());
}

#[test]
fn every_id_is_registered_once() {
    let registry = Registry::standard();
    let names: Vec<_> = registry.iter().map(|c| c.name()).collect();

    assert_eq!(names.len(), CharsetId::ALL.len());
    assert!(names.is_sorted_by_key(|n| n.to_ascii_lowercase()));

    for id in CharsetId::ALL {
        let charset = registry.get(*id).unwrap();
        assert_eq!(charset.id(), *id);
        assert_eq!(for_name(id.canonical_name()).unwrap(), charset);

        for alias in id.aliases() {
            assert_eq!(for_name(alias).unwrap(), charset, "{alias}");
        }
    }
}

#[test]
fn charset_metadata() {
    let utf8 = for_name("UTF-8").unwrap();
    assert_eq!(utf8.to_string(), "UTF-8");
    assert!(utf8.aliases().contains(&"UTF8"));
    assert!(utf8.is_registered());
    assert!(utf8.can_encode());

    assert!(!for_name("x-SJIS-Basic").unwrap().is_registered());
    assert!(!for_name("X-UTF-32BE-BOM").unwrap().is_registered());
}

#[test]
fn containment() {
    let ascii = for_name("US-ASCII").unwrap();
    let latin1 = for_name("ISO-8859-1").unwrap();
    let cp1252 = for_name("windows-1252").unwrap();
    let sjis = for_name("x-SJIS-Basic").unwrap();

    for charset in Registry::standard().iter() {
        assert!(charset.contains(charset));
        assert!(for_name("UTF-16").unwrap().contains(charset));
        assert!(for_name("UTF-8").unwrap().contains(charset));
    }

    assert!(latin1.contains(ascii));
    assert!(cp1252.contains(ascii));
    assert!(sjis.contains(ascii));
    assert!(!ascii.contains(latin1));
    assert!(!latin1.contains(cp1252));
    assert!(!sjis.contains(latin1));
}

#[test]
fn default_is_supported() {
    let charset = default_charset();
    assert_eq!(for_name(charset.name()).unwrap(), charset);
}

#[test]
fn windows_1252() {
    let cp1252 = for_name("windows-1252").unwrap();

    assert_eq!(avec::decode_slice(cp1252, &[0x80, 0x41, 0xE9]).unwrap(), "€Aé");
    assert_eq!(avec::encode_str(cp1252, "‘€’").unwrap(), [0x91, 0x80, 0x92]);

    assert_eq!(
        avec::decode_slice(cp1252, &[0x41, 0x81]),
        Err(avec::slice::Error::Unmappable { offset: 1, length: 1 })
    );
    assert_eq!(
        avec::encode_str(cp1252, "a\u{0100}"),
        Err(avec::slice::Error::Unmappable { offset: 1, length: 1 })
    );
    assert_eq!(
        avec::encode_str(cp1252, "\u{1F600}"),
        Err(avec::slice::Error::Unmappable { offset: 0, length: 2 })
    );

    // Lenient conversion replaces.
    let chars = cp1252.decode(&mut ByteBuffer::from_slice(&[0x81])).unwrap();
    assert_eq!(chars.to_string(), "\u{FFFD}");
    let bytes = cp1252.encode_str("\u{0100}").unwrap();
    assert_eq!(bytes.to_vec(), b"?");
}

#[test]
fn single_byte_lone_surrogates_are_malformed() {
    let mut encoder = for_name("ISO-8859-15").unwrap().new_encoder();
    let mut src = CharBuffer::wrap(vec![0xDC00]);
    let mut dst = ByteBuffer::allocate(4);
    assert_eq!(encoder.encode(&mut src, &mut dst, true), Ok(CoderResult::Malformed(1)));
}

#[test]
fn iso_8859_15_euro() {
    let latin9 = for_name("ISO-8859-15").unwrap();

    assert_eq!(avec::decode_slice(latin9, &[0xA4]).unwrap(), "€");
    assert_eq!(avec::encode_str(latin9, "€Œ").unwrap(), [0xA4, 0xBC]);
    // The generic currency sign was displaced by the euro.
    assert!(avec::encode_str(latin9, "¤").is_err());
}

#[test]
fn latin1_and_ascii_bounds() {
    let latin1 = for_name("ISO-8859-1").unwrap();
    let all: Vec<u8> = (0..=255).collect();
    let text = avec::decode_slice(latin1, &all).unwrap();
    assert_eq!(avec::encode_str(latin1, &text).unwrap(), all);

    let ascii = for_name("US-ASCII").unwrap();
    assert_eq!(
        avec::decode_slice(ascii, b"ok\xFF"),
        Err(avec::slice::Error::Malformed { offset: 2, length: 1 })
    );
}

#[test]
fn double_byte_decoding() {
    let sjis = for_name("x-SJIS-Basic").unwrap();

    let bytes = [0x82, 0xA0, 0x83, 0x41, 0x41, 0xB1, 0x81, 0x42, 0x84, 0x40];
    assert_eq!(avec::decode_slice(sjis, &bytes).unwrap(), "\u{3042}\u{30A2}A\u{FF71}\u{3002}\u{0410}");
    assert_eq!(avec::decode_slice(sjis, &[0x82, 0x60, 0x82, 0x9A]).unwrap(), "\u{FF21}\u{FF5A}");
    assert_eq!(avec::decode_slice(sjis, &[0x83, 0x9F, 0x83, 0xD6]).unwrap(), "\u{0391}\u{03C9}");
}

#[test]
fn double_byte_errors() {
    let sjis = for_name("x-SJIS-Basic").unwrap();
    let step = |bytes: &[u8]| {
        let mut decoder = sjis.new_decoder();
        let mut src = ByteBuffer::from_slice(bytes);
        let mut dst = CharBuffer::allocate(4);
        (decoder.decode(&mut src, &mut dst, true).unwrap(), src.position())
    };

    // Not a single or a lead byte.
    assert_eq!(step(&[0x80]), (CoderResult::Malformed(1), 0));
    // Trail out of range, a lead byte, or a single byte.
    assert_eq!(step(&[0x82, 0x20]), (CoderResult::Malformed(1), 0));
    assert_eq!(step(&[0x82, 0x9E]), (CoderResult::Malformed(1), 0));
    assert_eq!(step(&[0x85, 0x41]), (CoderResult::Malformed(1), 0));
    // Well formed, but unassigned.
    assert_eq!(step(&[0x85, 0x80]), (CoderResult::Unmappable(2), 0));
    assert_eq!(step(&[0x82, 0x80]), (CoderResult::Unmappable(2), 0));
    // A lead byte at the end of input.
    assert_eq!(step(&[0x41, 0x82]), (CoderResult::Malformed(1), 1));
}

#[test]
fn double_byte_encoding() {
    let sjis = for_name("x-SJIS-Basic").unwrap();

    assert_eq!(avec::encode_str(sjis, "Aあ").unwrap(), [0x41, 0x82, 0xA0]);
    assert_eq!(avec::encode_str(sjis, "ｱー").unwrap(), [0xB1, 0x81, 0x5B]);
    assert_eq!(
        avec::encode_str(sjis, "a漢"),
        Err(avec::slice::Error::Unmappable { offset: 1, length: 1 })
    );

    let encoder = sjis.new_encoder();
    assert_eq!(encoder.average_bytes_per_char(), 2.0);
    assert_eq!(encoder.max_bytes_per_char(), 2.0);
    assert_eq!(sjis.new_decoder().average_chars_per_byte(), 0.5);
}

#[test]
fn double_byte_round_trip() {
    let sjis = for_name("x-SJIS-Basic").unwrap();
    let text = "ｺﾝﾆﾁﾊ、こんにちは。カタカナＡＢＣ０１２ αβγ Жизнь ё";

    let bytes = avec::encode_str(sjis, text).unwrap();
    assert_eq!(avec::decode_slice(sjis, &bytes).unwrap(), text);
}

#[test]
fn reader_decodes_in_chunks() {
    let utf8 = for_name("UTF-8").unwrap();
    let text = "ab€\u{1F600}".repeat(5000);

    let decoded = avec::decode_reader(&mut text.as_bytes(), utf8).unwrap();
    assert_eq!(decoded, text);

    let mut bytes = text.into_bytes();
    bytes.push(0xE2);
    let len = bytes.len();
    assert!(matches!(
        avec::decode_reader(&mut bytes.as_slice(), utf8),
        Err(avec::reader::Error::Malformed { offset, length: 1 }) if offset == len - 1
    ));
}

#[test]
fn writer_encodes_in_chunks() {
    let utf16 = for_name("UTF-16").unwrap();
    let text = "x€".repeat(10000);

    let mut out = Vec::new();
    avec::encode_writer(&mut out, utf16, &text).unwrap();
    assert_eq!(out.len(), 2 + 4 * 10000);
    assert_eq!(&out[..4], [0xFE, 0xFF, 0x00, 0x78]);
    assert_eq!(avec::decode_slice(utf16, &out).unwrap(), text);

    let mut out = Vec::new();
    assert!(matches!(
        avec::encode_writer(&mut out, for_name("US-ASCII").unwrap(), "abc€"),
        Err(avec::reader::Error::Unmappable { offset: 3, length: 1 })
    ));
    assert_eq!(out, b"abc");
}
