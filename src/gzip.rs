//! Detection and unwrapping of the gzip envelope around NBT archives.
//!
//! `level.dat` and player files are gzip compressed. The codec does not
//! decompress anything itself; it hands the data to a [`Decompressor`].

use std::io;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether data starts with the gzip magic bytes. The rest of the data is not
/// looked at, so this says nothing about whether it is valid gzip.
pub fn has_gzip_header(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Something that can turn a complete gzip stream into the bytes it contains.
///
/// Closures of the right shape implement this, which is handy for plugging in
/// a different implementation:
///
/// ```
/// # use worldnbt::Decompressor;
/// let refuse = |_: &[u8]| -> std::io::Result<Vec<u8>> {
///     Err(std::io::Error::new(std::io::ErrorKind::Other, "no thanks"))
/// };
/// assert!(refuse.decompress(&[0x1f, 0x8b]).is_err());
/// ```
pub trait Decompressor {
    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>>;
}

impl<F> Decompressor for F
where
    F: Fn(&[u8]) -> io::Result<Vec<u8>>,
{
    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        self(data)
    }
}

/// Gzip decompression with [`flate2`].
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Gzip;

#[cfg(feature = "gzip")]
impl Decompressor for Gzip {
    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        use std::io::Read;

        let mut decoder = flate2::read::GzDecoder::new(data);
        let mut out = vec![];
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// The decompressor used by [`parse`][`crate::parse`] and
/// [`from_bytes`][`crate::from_bytes`]. `None` when the `gzip` feature is off.
pub fn default_decompressor() -> Option<&'static dyn Decompressor> {
    #[cfg(feature = "gzip")]
    {
        Some(&Gzip)
    }
    #[cfg(not(feature = "gzip"))]
    {
        None
    }
}

/// Wrap data in a gzip envelope.
#[cfg(feature = "gzip")]
pub(crate) fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(vec![], flate2::Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
