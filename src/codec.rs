//! # Binary Codec Module
//!
//! Bounds-checked reads and writes of 16/32/64-bit integers at a byte offset.
//!
//! ## Plain English Explanation
//!
//! A byte buffer is just a row of boxes. To store the number `0x1234` you
//! split it into two bytes and decide which goes first:
//!
//! ```text
//!   little endian:  [0x34][0x12]   (small end first, what x86/ARM use)
//!   big endian:     [0x12][0x34]   (big end first, "network order")
//! ```
//!
//! Every function here checks the row is long enough before touching it, so
//! a bad offset gives `false` / `None` / your default instead of a panic.

/// Byte order of a multi-byte value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endian {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

/// True if `dest` has room for `needed` bytes.
pub fn can_encode(needed: usize, dest: &[u8]) -> bool {
    needed <= dest.len()
}

/// True if `src` holds at least `needed` bytes.
pub fn can_decode(needed: usize, src: &[u8]) -> bool {
    needed <= src.len()
}

fn window(len: usize, index: usize, width: usize) -> Option<std::ops::Range<usize>> {
    let end = index.checked_add(width)?;
    (end <= len).then_some(index..end)
}

// ============================================
// ENCODERS
// ============================================

macro_rules! encoder {
    ($(#[$doc:meta])* $name:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(dest: &mut [u8], index: usize, value: $ty, endian: Endian) -> bool {
            let Some(range) = window(dest.len(), index, std::mem::size_of::<$ty>()) else {
                return false;
            };
            let bytes = match endian {
                Endian::Little => value.to_le_bytes(),
                Endian::Big => value.to_be_bytes(),
            };
            dest[range].copy_from_slice(&bytes);
            true
        }
    };
}

encoder!(
    /// Writes `value` at `dest[index..index + 2]`. Returns false (and writes
    /// nothing) when that range does not fit.
    encode_u16_at,
    u16
);
encoder!(
    /// Writes `value` at `dest[index..index + 4]`.
    encode_u32_at,
    u32
);
encoder!(
    /// Writes `value` at `dest[index..index + 8]`.
    encode_u64_at,
    u64
);

// ============================================
// DECODERS
// ============================================

macro_rules! decoder {
    ($(#[$doc:meta])* $name:ident, $defaulted:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(src: &[u8], index: usize, endian: Endian) -> Option<$ty> {
            let range = window(src.len(), index, std::mem::size_of::<$ty>())?;
            let bytes = <[u8; std::mem::size_of::<$ty>()]>::try_from(&src[range]).ok()?;
            Some(match endian {
                Endian::Little => <$ty>::from_le_bytes(bytes),
                Endian::Big => <$ty>::from_be_bytes(bytes),
            })
        }

        #[doc = concat!("Like [`", stringify!($name), "`] but returns `or_default` when out of range.")]
        pub fn $defaulted(src: &[u8], index: usize, or_default: $ty, endian: Endian) -> $ty {
            $name(src, index, endian).unwrap_or(or_default)
        }
    };
}

decoder!(
    /// Reads the `u16` at `src[index..index + 2]`, if present.
    decode_u16_at,
    defaulted_u16_at,
    u16
);
decoder!(
    /// Reads the `u32` at `src[index..index + 4]`, if present.
    decode_u32_at,
    defaulted_u32_at,
    u32
);
decoder!(
    /// Reads the `u64` at `src[index..index + 8]`, if present.
    decode_u64_at,
    defaulted_u64_at,
    u64
);

// ============================================
// TESTS
// ============================================
