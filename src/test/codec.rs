use std::cell::Cell;
use std::io::{self, Write};

use flate2::{write::GzEncoder, Compression};

use crate::error::{ErrorKind, Result};
use crate::{
    from_bytes, has_gzip_header, parse, parse_uncompressed, parse_with, write_uncompressed,
    Compound, Decompressor, List, NamedCompound, ReadOpts, Tag, Value,
};

use super::builder::Builder;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(vec![], Compression::fast());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn every_kind() -> NamedCompound {
    let mut inner = Compound::new();
    inner.insert("x".to_owned(), Value::Int(1));
    inner.insert("empty".to_owned(), Value::Compound(Compound::new()));

    let mut c = Compound::new();
    c.insert("byte".to_owned(), Value::Byte(i8::MIN));
    c.insert("short".to_owned(), Value::Short(i16::MAX));
    c.insert("int".to_owned(), Value::Int(-42));
    c.insert("long".to_owned(), Value::Long(i64::MIN));
    c.insert("float".to_owned(), Value::Float(1.5));
    c.insert("double".to_owned(), Value::Double(-0.25));
    c.insert("bytes".to_owned(), Value::ByteArray(vec![1, -1, 0]));
    c.insert("no bytes".to_owned(), Value::ByteArray(vec![]));
    c.insert("string".to_owned(), Value::from("héllo \u{1F600}"));
    c.insert("empty string".to_owned(), Value::from(""));
    c.insert(
        "list".to_owned(),
        Value::List(List::new(Tag::Double, vec![Value::Double(1.0), Value::Double(2.0)]).unwrap()),
    );
    c.insert("end list".to_owned(), Value::List(List::empty(Tag::End)));
    c.insert("empty int list".to_owned(), Value::List(List::empty(Tag::Int)));
    c.insert(
        "compounds".to_owned(),
        Value::List(List::new(Tag::Compound, vec![Value::Compound(inner.clone())]).unwrap()),
    );
    c.insert(
        "lists".to_owned(),
        Value::List(
            List::new(
                Tag::List,
                vec![Value::List(List::new(Tag::Byte, vec![Value::Byte(3)]).unwrap())],
            )
            .unwrap(),
        ),
    );
    c.insert("compound".to_owned(), Value::Compound(inner));
    c.insert("ints".to_owned(), Value::IntArray(vec![i32::MIN, 0, i32::MAX]));
    c.insert("no ints".to_owned(), Value::IntArray(vec![]));
    c.insert("longs".to_owned(), Value::LongArray(vec![i64::MAX]));
    c.insert("no longs".to_owned(), Value::LongArray(vec![]));

    NamedCompound::new("My Level", c)
}

#[test]
fn round_trip_every_kind() -> Result<()> {
    let level = every_kind();
    let data = write_uncompressed(&level)?;
    let back = parse_uncompressed(&data)?;

    assert_eq!(back, level);

    let keys: Vec<_> = back.value.keys().collect();
    let expected: Vec<_> = level.value.keys().collect();
    assert_eq!(keys, expected);
    Ok(())
}

#[test]
fn round_trip_empty_root() -> Result<()> {
    let level = NamedCompound::default();
    let data = write_uncompressed(&level)?;

    assert_eq!(data, [10, 0, 0, 0]);
    assert_eq!(parse_uncompressed(&data)?, level);
    Ok(())
}

#[test]
fn write_matches_hand_built_archive() -> Result<()> {
    let mut c = Compound::new();
    c.insert("foo".to_owned(), Value::Int(42));
    c.insert("bar".to_owned(), Value::from("Hi!"));
    c.insert("s".to_owned(), Value::Short(-7));
    c.insert("l".to_owned(), Value::Long(1 << 40));
    c.insert("f".to_owned(), Value::Float(0.5));
    c.insert("d".to_owned(), Value::Double(1e300));
    c.insert("b".to_owned(), Value::Byte(-1));

    let data = write_uncompressed(&NamedCompound::new("My Level", c))?;
    let expected = Builder::new()
        .start_compound("My Level")
        .int("foo", 42)
        .string("bar", "Hi!")
        .short("s", -7)
        .long("l", 1 << 40)
        .float("f", 0.5)
        .double("d", 1e300)
        .byte("b", -1)
        .end_compound()
        .build();

    assert_eq!(data, expected);
    Ok(())
}

#[test]
fn parse_uncompressed_empty_is_argument_error() {
    let err = parse_uncompressed(&[]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Argument);
}

#[test]
fn parse_uncompressed_list_root_is_format_error() {
    let data = Builder::new()
        .start_list("", Tag::Byte, 0)
        .build();
    let err = parse_uncompressed(&data).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Format);
}

#[test]
fn truncated_archive_underruns_at_every_length() -> Result<()> {
    let data = write_uncompressed(&every_kind())?;
    for len in 1..data.len() {
        let err = parse_uncompressed(&data[..len]).unwrap_err();
        assert!(err.is_underrun(), "len {}: {}", len, err);
    }
    Ok(())
}

#[test]
fn trailing_data_is_ignored() -> Result<()> {
    let mut data = write_uncompressed(&every_kind())?;
    data.extend_from_slice(&[1, 2, 3]);
    assert_eq!(parse_uncompressed(&data)?, every_kind());
    Ok(())
}

#[test]
fn gzip_header_detection() {
    assert!(has_gzip_header(&[0x1f, 0x8b]));
    assert!(has_gzip_header(&[0x1f, 0x8b, 0, 0]));
    assert!(!has_gzip_header(&[0x1f]));
    assert!(!has_gzip_header(&[0x8b, 0x1f]));
    assert!(!has_gzip_header(&[10, 0, 0, 0]));
}

#[test]
fn parse_uncompressed_calls_continuation() -> Result<()> {
    let data = write_uncompressed(&every_kind())?;
    let mut result = None;
    parse(&data, |r| result = Some(r))?;
    assert_eq!(result, Some(Ok(every_kind())));
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn parse_compressed() -> Result<()> {
    let data = gzip(&write_uncompressed(&every_kind())?);
    let mut result = None;
    parse(&data, |r| result = Some(r))?;
    assert_eq!(result, Some(Ok(every_kind())));
    Ok(())
}

#[test]
fn parse_empty_is_argument_error_without_continuation() {
    let called = Cell::new(false);
    let err = parse(&[], |_| called.set(true)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Argument);
    assert!(!called.get());
}

#[test]
#[cfg(feature = "gzip")]
fn parse_bare_magic_is_decompression_failure() -> Result<()> {
    let mut result = None;
    parse(&[0x1f, 0x8b], |r| result = Some(r))?;

    let err = result.unwrap().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Decompression);
    Ok(())
}

#[test]
fn parse_uncompressed_format_error_is_returned() {
    let called = Cell::new(false);
    let err = parse(&[9, 0, 0], |_| called.set(true)).unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::Format);
    assert!(!called.get());
}

#[test]
fn parse_uncompressed_underrun_is_returned() -> Result<()> {
    let data = write_uncompressed(&every_kind())?;
    let called = Cell::new(false);
    let err = parse(&data[..data.len() - 1], |_| called.set(true)).unwrap_err();

    assert!(err.is_underrun());
    assert!(!called.get());
    Ok(())
}

#[test]
fn format_error_after_decompression_goes_to_continuation() -> Result<()> {
    let list_root = |_: &[u8]| -> io::Result<Vec<u8>> { Ok(vec![9, 0, 0]) };

    let mut result = None;
    parse_with(&[0x1f, 0x8b], Some(&list_root), ReadOpts::default(), |r| {
        result = Some(r)
    })?;

    assert_eq!(result.unwrap().unwrap_err().kind(), &ErrorKind::Format);
    Ok(())
}

#[test]
fn parse_without_decompressor() -> Result<()> {
    let data = gzip(&write_uncompressed(&every_kind())?);
    let mut result = None;
    parse_with(&data, None, ReadOpts::default(), |r| result = Some(r))?;

    let err = result.unwrap().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DecompressionUnavailable);
    Ok(())
}

#[test]
fn uncompressed_data_never_reaches_decompressor() -> Result<()> {
    let calls = Cell::new(0);
    let counting = |_: &[u8]| -> io::Result<Vec<u8>> {
        calls.set(calls.get() + 1);
        Ok(vec![])
    };

    let data = write_uncompressed(&every_kind())?;
    let mut result = None;
    parse_with(&data, Some(&counting), ReadOpts::default(), |r| result = Some(r))?;

    assert_eq!(calls.get(), 0);
    assert!(result.unwrap().is_ok());
    Ok(())
}

#[test]
fn magic_routes_to_decompressor_even_if_not_gzip() -> Result<()> {
    let inner = write_uncompressed(&every_kind())?;
    let seen = Cell::new(0);
    let fake = |data: &[u8]| -> io::Result<Vec<u8>> {
        seen.set(data.len());
        Ok(inner.clone())
    };

    let mut result = None;
    parse_with(&[0x1f, 0x8b, 0xde, 0xad], Some(&fake), ReadOpts::default(), |r| {
        result = Some(r)
    })?;

    assert_eq!(seen.get(), 4);
    assert_eq!(result, Some(Ok(every_kind())));
    Ok(())
}

#[test]
fn decompressor_error_goes_to_continuation() -> Result<()> {
    let failing = |_: &[u8]| -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt"))
    };

    let mut result = None;
    parse_with(&[0x1f, 0x8b], Some(&failing), ReadOpts::default(), |r| {
        result = Some(r)
    })?;

    let err = result.unwrap().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Decompression);
    assert!(err.to_string().contains("corrupt"));
    Ok(())
}

#[test]
fn decompressed_to_nothing_underruns() -> Result<()> {
    let empty = |_: &[u8]| -> io::Result<Vec<u8>> { Ok(vec![]) };

    let mut result = None;
    parse_with(&[0x1f, 0x8b], Some(&empty), ReadOpts::default(), |r| {
        result = Some(r)
    })?;

    assert!(result.unwrap().unwrap_err().is_underrun());
    Ok(())
}

#[test]
fn custom_decompressor_type() -> Result<()> {
    struct Identity;

    impl Decompressor for Identity {
        fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
            Ok(data[2..].to_vec())
        }
    }

    let mut data = vec![0x1f, 0x8b];
    data.extend(write_uncompressed(&every_kind())?);

    let mut result = None;
    parse_with(&data, Some(&Identity), ReadOpts::default(), |r| result = Some(r))?;
    assert_eq!(result, Some(Ok(every_kind())));
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn opts_apply_after_decompression() -> Result<()> {
    let data = gzip(&write_uncompressed(&every_kind())?);
    let mut result = None;
    parse_with(
        &data,
        Some(&crate::Gzip),
        ReadOpts::new().max_depth(1),
        |r| result = Some(r),
    )?;
    assert_eq!(result.unwrap().unwrap_err().kind(), &ErrorKind::DepthLimit);
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn from_bytes_either_form() -> Result<()> {
    let raw = write_uncompressed(&every_kind())?;
    assert_eq!(from_bytes(&raw)?, every_kind());
    assert_eq!(from_bytes(&gzip(&raw))?, every_kind());
    assert_eq!(from_bytes(&[]).unwrap_err().kind(), &ErrorKind::Argument);
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn write_compressed_round_trip() -> Result<()> {
    let data = crate::write_compressed(&every_kind())?;
    assert!(has_gzip_header(&data));
    assert_eq!(from_bytes(&data)?, every_kind());
    Ok(())
}

#[test]
#[cfg(feature = "gzip")]
fn level_dat_string_by_pointer() -> Result<()> {
    let data = Builder::new()
        .start_compound("")
        .start_compound("Data")
        .int("version", 19133)
        .string("LevelName", "Survival")
        .start_list("ServerBrands", Tag::String, 1)
        .string_payload("vanilla")
        .end_compound()
        .end_compound()
        .build();

    let level = from_bytes(&gzip(&data))?;
    assert_eq!(
        level.pointer("/Data/LevelName").and_then(Value::as_str),
        Some("Survival")
    );
    Ok(())
}
