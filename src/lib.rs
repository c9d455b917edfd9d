//! worldnbt reads and writes NBT data from *Minecraft: Java Edition*. This
//! format is used by the game to store various things, such as the world
//! metadata in `level.dat` and player inventories.
//!
//! * For the tree of values see [`Value`], [`List`], [`Compound`] and
//!   [`NamedCompound`].
//! * For the low level cursor based codec see [`Writer`] and [`Reader`].
//! * For whole archives see [`parse`], [`parse_uncompressed`] and
//!   [`write_uncompressed`].
//!
//! # Quick example
//!
//! This reads a `level.dat` file, which is gzip compressed, and prints the
//! name of the world.
//!
//! ```no_run
//! use worldnbt::Value;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let args: Vec<_> = std::env::args().skip(1).collect();
//!     let data = std::fs::read(&args[0])?;
//!
//!     worldnbt::parse(&data, |level| match level {
//!         Ok(level) => {
//!             let name = level.pointer("/Data/LevelName").and_then(Value::as_str);
//!             println!("{:?}", name);
//!         }
//!         Err(e) => eprintln!("could not read level: {}", e),
//!     })?;
//!     Ok(())
//! }
//! ```
//!
//! # Strings
//!
//! Strings are stored with a 16 bit length, so cannot exceed 65535 encoded
//! bytes. See the [`utf8`] module for how they are encoded.

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Serialize;

pub mod error;
pub mod utf8;

mod gzip;
mod reader;
mod scalar;
mod value;
mod writer;

pub use gzip::{default_decompressor, has_gzip_header, Decompressor};
pub use reader::Reader;
pub use scalar::Scalar;
pub use value::*;
pub use writer::Writer;

#[cfg(feature = "gzip")]
pub use gzip::Gzip;

#[cfg(test)]
mod test;

use error::{Error, Result};

/// An NBT tag. This does not carry the value or the name of the data.
#[derive(Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same tag.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl Tag {
    /// Every tag, in numeric order.
    pub const ALL: [Tag; 13] = [
        Tag::End,
        Tag::Byte,
        Tag::Short,
        Tag::Int,
        Tag::Long,
        Tag::Float,
        Tag::Double,
        Tag::ByteArray,
        Tag::String,
        Tag::List,
        Tag::Compound,
        Tag::IntArray,
        Tag::LongArray,
    ];

    /// The name of the tag, eg `byteArray`. [`FromStr`] does the reverse.
    pub fn name(self) -> &'static str {
        match self {
            Tag::End => "end",
            Tag::Byte => "byte",
            Tag::Short => "short",
            Tag::Int => "int",
            Tag::Long => "long",
            Tag::Float => "float",
            Tag::Double => "double",
            Tag::ByteArray => "byteArray",
            Tag::String => "string",
            Tag::List => "list",
            Tag::Compound => "compound",
            Tag::IntArray => "intArray",
            Tag::LongArray => "longArray",
        }
    }
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually. The tags will very rarely change.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> std::result::Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::bespoke(format!("unknown tag name: {}", s)))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options for reading NBT.
///
/// ```
/// # use worldnbt::ReadOpts;
/// let opts = ReadOpts::new().max_seq_len(1000).strict_strings(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOpts {
    pub(crate) max_seq_len: usize,
    pub(crate) max_depth: usize,
    pub(crate) strict_strings: bool,
}

impl Default for ReadOpts {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOpts {
    pub fn new() -> Self {
        Self {
            max_seq_len: i32::MAX as usize,
            max_depth: 128,
            strict_strings: false,
        }
    }

    /// Maximum number of elements in any list or array.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }

    /// Maximum nesting of lists and compounds. The root compound counts as
    /// one level. Reading recurses once per level, so raising this far above
    /// the default of 128 needs a larger stack than a default thread has.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Fail on malformed string bytes rather than dropping them.
    pub fn strict_strings(mut self, value: bool) -> Self {
        self.strict_strings = value;
        self
    }
}

/// Serialize a named compound as an uncompressed NBT archive: a compound tag,
/// the name, then the compound's entries.
///
/// ```
/// # use worldnbt::{Compound, NamedCompound, Value};
/// let mut value = Compound::new();
/// value.insert("foo".to_owned(), Value::Int(42));
///
/// let data = worldnbt::write_uncompressed(&NamedCompound::new("", value)).unwrap();
/// assert_eq!(data, [10, 0, 0, 3, 0, 3, b'f', b'o', b'o', 0, 0, 0, 42, 0]);
/// ```
pub fn write_uncompressed(named: &NamedCompound) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    writer.tag(Tag::Compound);
    writer.string(&named.name)?;
    writer.compound(&named.value)?;
    Ok(writer.into_data())
}

/// [`write_uncompressed`] wrapped in gzip, the form `level.dat` is stored in.
#[cfg(feature = "gzip")]
pub fn write_compressed(named: &NamedCompound) -> Result<Vec<u8>> {
    Ok(gzip::compress(&write_uncompressed(named)?)?)
}

/// Parse an uncompressed NBT archive. Fails with an argument error if `data`
/// is empty, or a format error if it does not start with a compound tag.
pub fn parse_uncompressed(data: &[u8]) -> Result<NamedCompound> {
    parse_uncompressed_with_opts(data, ReadOpts::default())
}

pub fn parse_uncompressed_with_opts(data: &[u8], opts: ReadOpts) -> Result<NamedCompound> {
    if data.is_empty() {
        return Err(Error::argument("data"));
    }
    read_archive(Reader::unchecked(data, opts))
}

fn read_archive(mut reader: Reader) -> Result<NamedCompound> {
    let tag = reader.ubyte()?;
    if tag != u8::from(Tag::Compound) {
        return Err(Error::no_root_compound(tag));
    }

    Ok(NamedCompound {
        name: reader.string()?,
        value: reader.compound()?,
    })
}

/// Parse an NBT archive that may be gzip compressed, handing the result to
/// `continuation`.
///
/// Data starting with the gzip magic bytes is decompressed with
/// [`default_decompressor`] first. Failure to decompress, having no
/// decompressor, or an error in the decompressed archive is reported to the
/// continuation.
///
/// Errors in uncompressed data are returned directly, as is an argument error
/// for empty `data`, and the continuation is not called. Otherwise it is
/// called exactly once.
pub fn parse<F>(data: &[u8], continuation: F) -> Result<()>
where
    F: FnOnce(Result<NamedCompound>),
{
    parse_with(data, default_decompressor(), ReadOpts::default(), continuation)
}

/// [`parse`] with a chosen decompressor and options. Passing `None` as the
/// decompressor makes compressed input fail with
/// [`DecompressionUnavailable`][`error::ErrorKind::DecompressionUnavailable`].
pub fn parse_with<F>(
    data: &[u8],
    decompressor: Option<&dyn Decompressor>,
    opts: ReadOpts,
    continuation: F,
) -> Result<()>
where
    F: FnOnce(Result<NamedCompound>),
{
    if data.is_empty() {
        return Err(Error::argument("data"));
    }
    if !has_gzip_header(data) {
        let archive = read_archive(Reader::unchecked(data, opts))?;
        continuation(Ok(archive));
        return Ok(());
    }
    continuation(decompress_archive(data, decompressor, opts));
    Ok(())
}

/// Synchronous form of [`parse`]: reads an archive that may be gzip
/// compressed.
pub fn from_bytes(data: &[u8]) -> Result<NamedCompound> {
    from_bytes_with_opts(data, ReadOpts::default())
}

pub fn from_bytes_with_opts(data: &[u8], opts: ReadOpts) -> Result<NamedCompound> {
    if data.is_empty() {
        return Err(Error::argument("data"));
    }
    if !has_gzip_header(data) {
        return read_archive(Reader::unchecked(data, opts));
    }
    decompress_archive(data, default_decompressor(), opts)
}

fn decompress_archive(
    data: &[u8],
    decompressor: Option<&dyn Decompressor>,
    opts: ReadOpts,
) -> Result<NamedCompound> {
    debug!("nbt archive is gzip compressed ({} bytes)", data.len());
    let decompressor = decompressor.ok_or_else(Error::decompression_unavailable)?;
    let raw = decompressor.decompress(data).map_err(|e| {
        debug!("could not decompress nbt archive: {}", e);
        Error::decompression(e)
    })?;

    // An empty result reads as an underrun, not a missing argument.
    read_archive(Reader::unchecked(&raw, opts))
}
