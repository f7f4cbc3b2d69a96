//! Byte order and multi-byte accessors for byte buffers.

use super::{Buffer, BufferError};

/// The order in which the bytes of a multi-byte value are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the target platform.
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }
}

impl Buffer<u8> {
    /// The order used by the multi-byte accessors. New views start out
    /// big-endian, whatever the order of the view they were taken from.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ByteOrder) -> &mut Self {
        self.order = order;
        self
    }
}

macro_rules! typed_access {
    ($t:ident, $get:ident, $put:ident, $get_at:ident, $put_at:ident) => {
        impl Buffer<u8> {
            #[doc = concat!("Read a `", stringify!($t), "` at the position in the buffer's byte order, advancing past it.")]
            pub fn $get(&mut self) -> Result<$t, BufferError> {
                let mut r = [0; size_of::<$t>()];
                self.get_slice(&mut r)?;

                Ok(match self.order {
                    ByteOrder::BigEndian => $t::from_be_bytes(r),
                    ByteOrder::LittleEndian => $t::from_le_bytes(r),
                })
            }

            #[doc = concat!("Write a `", stringify!($t), "` at the position in the buffer's byte order, advancing past it.")]
            pub fn $put(&mut self, value: $t) -> Result<&mut Self, BufferError> {
                let r = match self.order {
                    ByteOrder::BigEndian => value.to_be_bytes(),
                    ByteOrder::LittleEndian => value.to_le_bytes(),
                };

                self.put_slice(&r)
            }

            #[doc = concat!("Read a `", stringify!($t), "` at a byte index.")]
            pub fn $get_at(&self, index: usize) -> Result<$t, BufferError> {
                let mut r = [0; size_of::<$t>()];
                self.get_slice_at(index, &mut r)?;

                Ok(match self.order {
                    ByteOrder::BigEndian => $t::from_be_bytes(r),
                    ByteOrder::LittleEndian => $t::from_le_bytes(r),
                })
            }

            #[doc = concat!("Write a `", stringify!($t), "` at a byte index.")]
            pub fn $put_at(&mut self, index: usize, value: $t) -> Result<&mut Self, BufferError> {
                let r = match self.order {
                    ByteOrder::BigEndian => value.to_be_bytes(),
                    ByteOrder::LittleEndian => value.to_le_bytes(),
                };

                self.put_slice_at(index, &r)
            }
        }
    };
}

typed_access!(u16, get_u16, put_u16, get_u16_at, put_u16_at);
typed_access!(i16, get_i16, put_i16, get_i16_at, put_i16_at);
typed_access!(u32, get_u32, put_u32, get_u32_at, put_u32_at);
typed_access!(i32, get_i32, put_i32, get_i32_at, put_i32_at);
typed_access!(u64, get_u64, put_u64, get_u64_at, put_u64_at);
typed_access!(i64, get_i64, put_i64, get_i64_at, put_i64_at);
typed_access!(f32, get_f32, put_f32, get_f32_at, put_f32_at);
typed_access!(f64, get_f64, put_f64, get_f64_at, put_f64_at);
