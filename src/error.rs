//! Contains the Error and Result type used by the reader, writer and entry
//! points.
use std::fmt::Display;

/// Various errors that can occur while reading or writing NBT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A required input was missing. For byte buffers this means empty.
    Argument,

    /// The data is structurally wrong: the root is not a compound, a length
    /// is negative, or a list mixes element types.
    Format,

    /// A tag byte outside of the known range.
    InvalidTag(u8),

    /// A read would have gone past the end of the buffer.
    BufferUnderrun,

    /// String bytes were not valid (modified) UTF-8. Only produced when strict
    /// string decoding is enabled. Contains the offending bytes.
    Nonunicode(Vec<u8>),

    /// A length does not fit its prefix, or exceeds the configured maximum.
    LengthOverflow,

    /// Compounds and lists were nested deeper than the configured maximum.
    DepthLimit,

    /// The input is gzip compressed but there is no decompressor to use.
    DecompressionUnavailable,

    /// The decompressor failed.
    Decompression,

    /// Any other errors. Users should not match on this variant and should
    /// instead use a wildcard `_`.
    Other,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::bespoke(format!("io error: {}", e))
    }
}

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_underrun(&self) -> bool {
        matches!(self.kind, ErrorKind::BufferUnderrun)
    }

    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
        }
    }

    pub(crate) fn argument(name: &str) -> Error {
        Error::new(
            ErrorKind::Argument,
            format!("argument '{}' is missing or empty", name),
        )
    }

    pub(crate) fn no_root_compound(tag: u8) -> Error {
        Error::new(
            ErrorKind::Format,
            format!("invalid nbt: top tag must be compound, found {}", tag),
        )
    }

    pub(crate) fn format(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::Format, msg)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Error {
        Error::new(
            ErrorKind::InvalidTag(tag),
            format!("invalid nbt tag value: {}", tag),
        )
    }

    pub(crate) fn buffer_underrun(offset: usize, wanted: usize, len: usize) -> Error {
        Error::new(
            ErrorKind::BufferUnderrun,
            format!(
                "eof: reading {} bytes at offset {} overruns buffer of {} bytes",
                wanted, offset, len
            ),
        )
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Error {
        Error::new(
            ErrorKind::Nonunicode(data.to_vec()),
            format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(data)
            ),
        )
    }

    pub(crate) fn length_overflow(msg: impl Into<String>) -> Error {
        Error::new(ErrorKind::LengthOverflow, msg)
    }

    pub(crate) fn depth_limit(max: usize) -> Error {
        Error::new(
            ErrorKind::DepthLimit,
            format!("nbt nested deeper than maximum depth ({})", max),
        )
    }

    pub(crate) fn decompression_unavailable() -> Error {
        Error::new(
            ErrorKind::DecompressionUnavailable,
            "nbt archive is compressed but no decompressor is available",
        )
    }

    pub(crate) fn decompression(e: std::io::Error) -> Error {
        Error::new(
            ErrorKind::Decompression,
            format!("failed to decompress nbt archive: {}", e),
        )
    }

    pub(crate) fn bespoke(msg: String) -> Error {
        Error::new(ErrorKind::Other, msg)
    }
}
