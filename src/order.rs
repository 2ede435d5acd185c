use zerocopy::byteorder::{BigEndian, LittleEndian, F32, F64, U16, U32, U64};

/// Selects how multi-byte values are laid out in the stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ByteOrder {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

macro_rules! order_codec {
    ($read:ident, $write:ident, $ty:ty, $wrapper:ident, $n:literal) => {
        #[doc = concat!("Decodes a `", stringify!($ty), "` from its ", stringify!($n), "-byte encoding.")]
        #[inline(always)]
        pub fn $read(self, bytes: [u8; $n]) -> $ty {
            match self {
                Self::Little => $wrapper::<LittleEndian>::from_bytes(bytes).get(),
                Self::Big => $wrapper::<BigEndian>::from_bytes(bytes).get(),
            }
        }

        #[doc = concat!("Encodes a `", stringify!($ty), "` into ", stringify!($n), " bytes.")]
        #[inline(always)]
        pub fn $write(self, value: $ty) -> [u8; $n] {
            match self {
                Self::Little => $wrapper::<LittleEndian>::new(value).to_bytes(),
                Self::Big => $wrapper::<BigEndian>::new(value).to_bytes(),
            }
        }
    };
}

impl ByteOrder {
    /// The byte order of the target platform.
    #[cfg(target_endian = "little")]
    pub const NATIVE: ByteOrder = ByteOrder::Little;

    /// The byte order of the target platform.
    #[cfg(target_endian = "big")]
    pub const NATIVE: ByteOrder = ByteOrder::Big;

    order_codec!(read_u16, write_u16, u16, U16, 2);
    order_codec!(read_u32, write_u32, u32, U32, 4);
    order_codec!(read_u64, write_u64, u64, U64, 8);

    // Floats go through the bit pattern untouched, so NaN payloads survive.
    order_codec!(read_f32, write_f32, f32, F32, 4);
    order_codec!(read_f64, write_f64, f64, F64, 8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_layout() {
        assert_eq!(ByteOrder::Little.write_u32(0x04d2), [0xd2, 0x04, 0x00, 0x00]);
        assert_eq!(ByteOrder::Big.write_u32(0x04d2), [0x00, 0x00, 0x04, 0xd2]);
        assert_eq!(ByteOrder::Big.read_u16([0x08, 0x00]), 0x0800);
        assert_eq!(ByteOrder::Little.read_u16([0x08, 0x00]), 0x0008);
    }

    #[test]
    fn nan_payload_is_preserved() {
        let bits: u32 = 0x7fc0_1234;
        let bytes = ByteOrder::Big.write_f32(f32::from_bits(bits));
        assert_eq!(ByteOrder::Big.read_f32(bytes).to_bits(), bits);
    }

    #[test]
    fn native_matches_platform() {
        assert_eq!(
            ByteOrder::NATIVE.write_u64(0x0102_0304_0506_0708),
            0x0102_0304_0506_0708u64.to_ne_bytes()
        );
    }
}
