//! Deserialization of NBT from a byte slice.

use std::convert::TryFrom;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::value::{Compound, List, Value};
use crate::{utf8, ReadOpts, Tag};

/// Reads NBT from a borrowed buffer at a movable cursor. Mirrors
/// [`Writer`][`crate::Writer`]: every method reads what the same-named writer
/// method writes, and advances the cursor by exactly that many bytes.
///
/// Reading past the end of the buffer is an error of kind
/// [`BufferUnderrun`][`crate::error::ErrorKind::BufferUnderrun`].
///
/// ```
/// # use worldnbt::Reader;
/// # fn main() -> worldnbt::error::Result<()> {
/// let data = [0, 0, 0, 42, 0, 3, b'f', b'o', b'o'];
/// let mut reader = Reader::new(&data)?;
///
/// assert_eq!(reader.int()?, 42);
/// assert_eq!(reader.string()?, "foo");
/// assert!(reader.byte().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
    depth: usize,
    opts: ReadOpts,
}

impl<'a> Reader<'a> {
    /// Fails with an argument error if `data` is empty.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_opts(data, ReadOpts::default())
    }

    pub fn with_opts(data: &'a [u8], opts: ReadOpts) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::argument("data"));
        }
        Ok(Self::unchecked(data, opts))
    }

    pub(crate) fn unchecked(data: &'a [u8], opts: ReadOpts) -> Self {
        Self {
            data,
            offset: 0,
            depth: 0,
            opts,
        }
    }

    /// Where the next read will come from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the cursor. Moving it past the end is allowed, but the next read
    /// will fail.
    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::buffer_underrun(self.offset, n, self.data.len()))?;

        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    /// Read a fixed-width big-endian value at the cursor.
    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        Ok(T::get(self.take(T::SIZE)?))
    }

    pub fn byte(&mut self) -> Result<i8> {
        self.read()
    }

    pub fn ubyte(&mut self) -> Result<u8> {
        self.read()
    }

    pub fn short(&mut self) -> Result<i16> {
        self.read()
    }

    pub fn ushort(&mut self) -> Result<u16> {
        self.read()
    }

    pub fn int(&mut self) -> Result<i32> {
        self.read()
    }

    pub fn long(&mut self) -> Result<i64> {
        self.read()
    }

    pub fn float(&mut self) -> Result<f32> {
        self.read()
    }

    pub fn double(&mut self) -> Result<f64> {
        self.read()
    }

    pub fn tag(&mut self) -> Result<Tag> {
        let tag = self.ubyte()?;
        Tag::try_from(tag).map_err(|_| Error::invalid_tag(tag))
    }

    /// Read an i32 element count, and check that `count * min_size` bytes
    /// remain. Nothing is allocated for a count the buffer cannot satisfy.
    fn len(&mut self, min_size: usize) -> Result<usize> {
        let len = self.int()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::format(format!("negative length: {}", len)))?;

        if len > self.opts.max_seq_len {
            return Err(Error::length_overflow(format!(
                "size ({}) greater than max sequence length ({})",
                len, self.opts.max_seq_len,
            )));
        }

        let needed = len.saturating_mul(min_size);
        if needed > self.remaining() {
            return Err(Error::buffer_underrun(self.offset, needed, self.data.len()));
        }
        Ok(len)
    }

    pub fn byte_array(&mut self) -> Result<Vec<i8>> {
        let len = self.len(1)?;
        Ok(self.take(len)?.iter().map(|&b| b as i8).collect())
    }

    pub fn int_array(&mut self) -> Result<Vec<i32>> {
        let len = self.len(4)?;
        let mut out = vec![0; len];
        BigEndian::read_i32_into(self.take(len * 4)?, &mut out);
        Ok(out)
    }

    pub fn long_array(&mut self) -> Result<Vec<i64>> {
        let len = self.len(8)?;
        let mut out = vec![0; len];
        BigEndian::read_i64_into(self.take(len * 8)?, &mut out);
        Ok(out)
    }

    /// Read a u16 byte length, then that many bytes of string. Malformed
    /// bytes are dropped unless strict strings are enabled.
    pub fn string(&mut self) -> Result<String> {
        let len = self.ushort()? as usize;
        let bytes = self.take(len)?;
        let s = if self.opts.strict_strings {
            utf8::decode_strict(bytes)?
        } else {
            utf8::decode(bytes)
        };
        Ok(s.into_owned())
    }

    /// Read an element tag, an element count, and then that many payloads of
    /// the element tag.
    pub fn list(&mut self) -> Result<List> {
        self.nested(|r| {
            let element_tag = r.tag()?;
            let len = r.len(min_payload_size(element_tag))?;

            // Some old chunks store empty lists as 'list of end', so an empty
            // one is fine.
            if element_tag == Tag::End {
                if len != 0 {
                    return Err(Error::format(format!(
                        "list of end with nonzero length: {}",
                        len
                    )));
                }
                return Ok(List::empty(Tag::End));
            }

            let mut elements = Vec::with_capacity(len);
            for _ in 0..len {
                elements.push(r.payload(element_tag)?);
            }
            Ok(List::from_decoded(element_tag, elements))
        })
    }

    /// Read named entries until an end tag. Nested compounds consume their
    /// own end tag, so only the end tag at this level stops the loop.
    ///
    /// If a name appears twice the later value wins, but the entry keeps the
    /// position of the first.
    pub fn compound(&mut self) -> Result<Compound> {
        self.nested(|r| {
            let mut compound = Compound::new();
            loop {
                let tag = r.tag()?;
                if tag == Tag::End {
                    return Ok(compound);
                }
                let name = r.string()?;
                let value = r.payload(tag)?;
                compound.insert(name, value);
            }
        })
    }

    /// Read the payload for `tag`. There is no payload for an end tag, so
    /// that is an error here.
    pub fn payload(&mut self, tag: Tag) -> Result<Value> {
        Ok(match tag {
            Tag::End => return Err(Error::format("unexpected end tag")),
            Tag::Byte => Value::Byte(self.byte()?),
            Tag::Short => Value::Short(self.short()?),
            Tag::Int => Value::Int(self.int()?),
            Tag::Long => Value::Long(self.long()?),
            Tag::Float => Value::Float(self.float()?),
            Tag::Double => Value::Double(self.double()?),
            Tag::ByteArray => Value::ByteArray(self.byte_array()?),
            Tag::String => Value::String(self.string()?),
            Tag::List => Value::List(self.list()?),
            Tag::Compound => Value::Compound(self.compound()?),
            Tag::IntArray => Value::IntArray(self.int_array()?),
            Tag::LongArray => Value::LongArray(self.long_array()?),
        })
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.opts.max_depth {
            return Err(Error::depth_limit(self.opts.max_depth));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }
}

/// The fewest bytes a payload of this tag can occupy.
fn min_payload_size(tag: Tag) -> usize {
    match tag {
        Tag::End => 0,
        Tag::Byte => 1,
        Tag::Short => 2,
        Tag::Int => 4,
        Tag::Long => 8,
        Tag::Float => 4,
        Tag::Double => 8,
        Tag::ByteArray => 4,
        Tag::String => 2,
        Tag::List => 5,
        Tag::Compound => 1,
        Tag::IntArray => 4,
        Tag::LongArray => 4,
    }
}
