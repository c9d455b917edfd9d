//! Serialization of NBT values into a growable buffer.

use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use crate::value::{Compound, List, Value};
use crate::{utf8, Tag};

const INITIAL_CAPACITY: usize = 1024;

/// Writes NBT into an owned buffer at a movable cursor.
///
/// The buffer doubles in size whenever a write would pass its end. The cursor
/// can be moved anywhere with [`Writer::set_offset`], including past the end
/// of the buffer, in which case the gap is zero filled on the next write. This
/// allows going back and patching something already written:
///
/// ```
/// # use worldnbt::Writer;
/// let mut writer = Writer::new();
/// writer.int(42).int(7);
///
/// // overwrite the second int
/// writer.set_offset(4);
/// writer.int(999);
///
/// assert_eq!(writer.into_data(), [0, 0, 0, 42, 0, 0, 3, 231]);
/// ```
///
/// Scalar writes cannot fail and return the writer for chaining. Anything
/// with a length prefix returns a `Result`, since the length might not fit.
#[derive(Debug, Clone)]
pub struct Writer {
    buf: Vec<u8>,
    offset: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create a writer whose buffer starts at `capacity` bytes. A capacity of
    /// zero is treated as one, so that doubling can grow it.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)],
            offset: 0,
        }
    }

    /// Where the next write will go.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move the cursor. Nothing is written or allocated until the next write.
    ///
    /// Writing at an offset the buffer cannot grow to panics with a capacity
    /// overflow, as growing a `Vec` that far does.
    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Current size of the underlying buffer, including unused space.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Ensures the buffer is large enough to write `size` bytes at the
    /// current offset.
    fn accommodate(&mut self, size: usize) {
        // Saturating, so an impossible size reaches Vec as one and fails there.
        let required = self.offset.saturating_add(size);
        if self.buf.len() >= required {
            return;
        }

        let mut len = self.buf.len();
        while len < required {
            len = len.saturating_mul(2);
        }

        // New bytes, including any gap up to the offset, are zero.
        self.buf.resize(len, 0);
    }

    /// Write a fixed-width value at the cursor in big-endian order, and
    /// advance past it.
    pub fn write<T: Scalar>(&mut self, value: T) -> &mut Self {
        self.accommodate(T::SIZE);
        value.put(&mut self.buf[self.offset..self.offset + T::SIZE]);
        self.offset += T::SIZE;
        self
    }

    fn write_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.accommodate(bytes.len());
        self.buf[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        self
    }

    /// Array and list lengths are an i32 on the wire.
    fn write_len(&mut self, len: usize) -> Result<&mut Self> {
        let len = i32::try_from(len)
            .map_err(|_| Error::length_overflow(format!("length too large: {}", len)))?;
        Ok(self.int(len))
    }

    pub fn byte(&mut self, value: i8) -> &mut Self {
        self.write(value)
    }

    pub fn ubyte(&mut self, value: u8) -> &mut Self {
        self.write(value)
    }

    pub fn short(&mut self, value: i16) -> &mut Self {
        self.write(value)
    }

    pub fn ushort(&mut self, value: u16) -> &mut Self {
        self.write(value)
    }

    pub fn int(&mut self, value: i32) -> &mut Self {
        self.write(value)
    }

    pub fn long(&mut self, value: i64) -> &mut Self {
        self.write(value)
    }

    pub fn float(&mut self, value: f32) -> &mut Self {
        self.write(value)
    }

    pub fn double(&mut self, value: f64) -> &mut Self {
        self.write(value)
    }

    pub fn tag(&mut self, tag: Tag) -> &mut Self {
        self.ubyte(tag.into())
    }

    pub fn byte_array(&mut self, value: &[i8]) -> Result<&mut Self> {
        self.write_len(value.len())?;
        self.accommodate(value.len());
        for (dst, &b) in self.buf[self.offset..].iter_mut().zip(value) {
            *dst = b as u8;
        }
        self.offset += value.len();
        Ok(self)
    }

    pub fn int_array(&mut self, value: &[i32]) -> Result<&mut Self> {
        self.write_len(value.len())?;
        for &v in value {
            self.int(v);
        }
        Ok(self)
    }

    pub fn long_array(&mut self, value: &[i64]) -> Result<&mut Self> {
        self.write_len(value.len())?;
        for &v in value {
            self.long(v);
        }
        Ok(self)
    }

    /// Write a string as a u16 byte length followed by its encoded bytes.
    /// Fails if the encoding is longer than 65535 bytes.
    pub fn string(&mut self, value: &str) -> Result<&mut Self> {
        let bytes = utf8::encode(value);
        let len = u16::try_from(bytes.len()).map_err(|_| {
            Error::length_overflow(format!("string too long: {} bytes", bytes.len()))
        })?;
        Ok(self.ushort(len).write_raw(&bytes))
    }

    /// Write the element tag, the element count, then each element without
    /// its own tag.
    pub fn list(&mut self, list: &List) -> Result<&mut Self> {
        self.tag(list.element_tag());
        self.write_len(list.len())?;
        for el in list {
            // Lists can be assembled without going through List::push, eg
            // with pointer_mut, so check again here.
            if el.tag() != list.element_tag() {
                return Err(Error::format(format!(
                    "list of {} contains {}",
                    list.element_tag(),
                    el.tag()
                )));
            }
            self.payload(el)?;
        }
        Ok(self)
    }

    /// Write each entry as tag, name and payload, in the compound's order,
    /// then an end tag.
    pub fn compound(&mut self, compound: &Compound) -> Result<&mut Self> {
        for (name, value) in compound {
            self.tag(value.tag());
            self.string(name)?;
            self.payload(value)?;
        }
        Ok(self.tag(Tag::End))
    }

    /// Write the payload of a value, without its tag.
    pub fn payload(&mut self, value: &Value) -> Result<&mut Self> {
        match value {
            Value::Byte(v) => Ok(self.byte(*v)),
            Value::Short(v) => Ok(self.short(*v)),
            Value::Int(v) => Ok(self.int(*v)),
            Value::Long(v) => Ok(self.long(*v)),
            Value::Float(v) => Ok(self.float(*v)),
            Value::Double(v) => Ok(self.double(*v)),
            Value::ByteArray(v) => self.byte_array(v),
            Value::String(v) => self.string(v),
            Value::List(v) => self.list(v),
            Value::Compound(v) => self.compound(v),
            Value::IntArray(v) => self.int_array(v),
            Value::LongArray(v) => self.long_array(v),
        }
    }

    /// Everything up to the cursor. Space beyond it is not included, even if
    /// it was written before the cursor was moved back.
    pub fn data(&mut self) -> &[u8] {
        self.accommodate(0);
        &self.buf[..self.offset]
    }

    /// Consume the writer, returning everything up to the cursor.
    pub fn into_data(mut self) -> Vec<u8> {
        self.accommodate(0);
        self.buf.truncate(self.offset);
        self.buf
    }
}
