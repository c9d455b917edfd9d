use byteorder::{BigEndian, ByteOrder};

mod private {
    // Only this crate can implement this trait. Other traits can inherit from
    // Sealed in order to prevent other crates from creating implementations.
    pub trait Sealed {}
}

/// A fixed-width number as it appears on the wire. All multi-byte values are
/// big-endian.
///
/// This is what [`Writer::write`][`crate::Writer::write`] and
/// [`Reader::read`][`crate::Reader::read`] are generic over. It cannot be
/// implemented outside of this crate.
pub trait Scalar: Copy + private::Sealed {
    /// Number of bytes this value occupies.
    const SIZE: usize;

    #[doc(hidden)]
    fn put(self, dst: &mut [u8]);

    #[doc(hidden)]
    fn get(src: &[u8]) -> Self;
}

impl private::Sealed for i8 {}
impl private::Sealed for u8 {}

impl Scalar for i8 {
    const SIZE: usize = 1;

    fn put(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }

    fn get(src: &[u8]) -> Self {
        src[0] as i8
    }
}

impl Scalar for u8 {
    const SIZE: usize = 1;

    fn put(self, dst: &mut [u8]) {
        dst[0] = self;
    }

    fn get(src: &[u8]) -> Self {
        src[0]
    }
}

macro_rules! scalar {
    ($($type:ty, $size:literal, $write:ident, $read:ident;)*) => {
        $(
            impl private::Sealed for $type {}

            impl Scalar for $type {
                const SIZE: usize = $size;

                fn put(self, dst: &mut [u8]) {
                    BigEndian::$write(dst, self)
                }

                fn get(src: &[u8]) -> Self {
                    BigEndian::$read(src)
                }
            }
        )*
    };
}

scalar! {
    i16, 2, write_i16, read_i16;
    u16, 2, write_u16, read_u16;
    i32, 4, write_i32, read_i32;
    i64, 8, write_i64, read_i64;
    f32, 4, write_f32, read_f32;
    f64, 8, write_f64, read_f64;
}
