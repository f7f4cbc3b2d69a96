use std::path::Path;

use codeset::{
    Charset,
    buffer::{ByteBuffer, CharBuffer},
    for_name,
    sans::CoderResult,
};
use csv::ReaderBuilder;

/// A mapping fixture row: a byte and the unit it decodes to.
struct Row {
    byte: u8,
    unit: u16,
}

#[test]
fn windows_1252_matches_mapping() {
    validate("windows-1252", "fixtures/windows-1252.csv");
}

#[test]
fn iso_8859_15_matches_mapping() {
    validate("ISO-8859-15", "fixtures/iso-8859-15.csv");
}

fn validate(name: &str, path: impl AsRef<Path>) {
    let charset = for_name(name).unwrap();
    let rows = read_mapping(path.as_ref());
    let mut mapped = [false; 256];

    for Row { byte, unit } in rows {
        mapped[byte as usize] = true;

        assert_eq!(decode_one(charset, byte), (CoderResult::Underflow, Some(unit)), "{byte:#04X}");
        assert_eq!(encode_one(charset, unit), (CoderResult::Underflow, Some(byte)), "{unit:#06X}");
    }

    for byte in (0..=255).filter(|b| !mapped[*b as usize]) {
        assert_eq!(decode_one(charset, byte), (CoderResult::Unmappable(1), None), "{byte:#04X}");
    }
}

fn decode_one(charset: &'static Charset, byte: u8) -> (CoderResult, Option<u16>) {
    let mut src = ByteBuffer::from_slice(&[byte]);
    let mut dst = CharBuffer::allocate(1);

    let result = charset.new_decoder().decode(&mut src, &mut dst, true).unwrap();
    dst.flip();
    (result, dst.get().ok())
}

fn encode_one(charset: &'static Charset, unit: u16) -> (CoderResult, Option<u8>) {
    let mut src = CharBuffer::wrap(vec![unit]);
    let mut dst = ByteBuffer::allocate(1);

    let result = charset.new_encoder().encode(&mut src, &mut dst, true).unwrap();
    dst.flip();
    (result, dst.get().ok())
}

fn read_mapping(path: &Path) -> Vec<Row> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path).unwrap();

    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            Row {
                byte: parse_hex(&record[0]) as u8,
                unit: parse_hex(&record[1]) as u16,
            }
        })
        .collect()
}

fn parse_hex(field: &str) -> u32 {
    u32::from_str_radix(field.trim_start_matches("0x"), 16).unwrap()
}

