//! String encoding for NBT.
//!
//! NBT strings are written one UTF-16 code unit at a time, so characters
//! outside the basic multilingual plane become a pair of three byte surrogate
//! sequences (CESU-8) rather than a single four byte sequence. Decoding
//! accepts both forms.
//!
//! By default decoding is lenient: bytes that do not form a valid sequence are
//! dropped, as are unpaired surrogates. [`ReadOpts::strict_strings`] turns
//! these into [`ErrorKind::Nonunicode`] errors instead.
//!
//! [`ReadOpts::strict_strings`]: crate::ReadOpts::strict_strings
//! [`ErrorKind::Nonunicode`]: crate::error::ErrorKind::Nonunicode

use std::borrow::Cow;

use log::debug;

use crate::error::{Error, Result};

/// Encode a string to the bytes stored in NBT. This borrows the input if it
/// has nothing outside the basic multilingual plane.
pub fn encode(s: &str) -> Cow<'_, [u8]> {
    cesu8::to_cesu8(s)
}

/// Decode NBT string bytes, dropping malformed sequences.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match decode_inner(bytes) {
        Ok(s) => s,
        Err(s) => {
            debug!(
                "dropped malformed bytes while decoding string: {}",
                String::from_utf8_lossy(bytes)
            );
            Cow::Owned(s)
        }
    }
}

/// Decode NBT string bytes, failing on the first malformed sequence.
pub fn decode_strict(bytes: &[u8]) -> Result<Cow<'_, str>> {
    decode_inner(bytes).map_err(|_| Error::nonunicode_string(bytes))
}

/// Either the decoded string, or what survived once malformed parts were
/// dropped.
fn decode_inner(bytes: &[u8]) -> std::result::Result<Cow<'_, str>, String> {
    // Plain UTF-8 and well-formed surrogate pairs both pass here.
    if let Ok(s) = cesu8::from_cesu8(bytes) {
        return Ok(s);
    }

    let mut malformed = false;
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match sequence(&bytes[i..]) {
            Some((cp, width)) => {
                push_units(&mut units, cp);
                i += width;
            }
            None => {
                malformed = true;
                i += 1;
            }
        }
    }

    let mut out = String::with_capacity(units.len());
    for c in char::decode_utf16(units) {
        match c {
            Ok(c) => out.push(c),
            Err(_) => malformed = true,
        }
    }

    if malformed {
        Err(out)
    } else {
        Ok(Cow::Owned(out))
    }
}

/// Decode the sequence at the start of `b`, returning the code point and the
/// number of bytes it took. Overlong forms are accepted, so Java's two byte
/// NUL (`C0 80`) decodes to U+0000.
fn sequence(b: &[u8]) -> Option<(u32, usize)> {
    let cont = |i: usize| b.get(i).filter(|&&c| c & 0xC0 == 0x80).map(|&c| (c & 0x3F) as u32);
    let lead = *b.first()? as u32;

    if lead & 0x80 == 0 {
        Some((lead, 1))
    } else if lead & 0xE0 == 0xC0 {
        Some((((lead & 0x1F) << 6) | cont(1)?, 2))
    } else if lead & 0xF0 == 0xE0 {
        Some((((lead & 0x0F) << 12) | (cont(1)? << 6) | cont(2)?, 3))
    } else if lead & 0xF8 == 0xF0 {
        let cp = ((lead & 0x07) << 18) | (cont(1)? << 12) | (cont(2)? << 6) | cont(3)?;
        (cp <= 0x10FFFF).then_some((cp, 4))
    } else {
        None
    }
}

fn push_units(units: &mut Vec<u16>, cp: u32) {
    if cp >= 0x10000 {
        let cp = cp - 0x10000;
        units.push(0xD800 | (cp >> 10) as u16);
        units.push(0xDC00 | (cp & 0x3FF) as u16);
    } else {
        units.push(cp as u16);
    }
}
