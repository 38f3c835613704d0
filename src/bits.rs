//! # Bit Packing Helpers
//!
//! Split integers into halves and glue halves back together.
//!
//! ## Plain English
//!
//! `0x1234` is two bytes, `0x12` (high) and `0x34` (low). These helpers pull
//! those pieces apart and put them back, for bytes, nibbles, 16-bit halves
//! and 32-bit words. They are `const`, so they work in constant tables too.

/// Bits 0..8 of `v`.
pub const fn low_byte(v: u16) -> u8 {
    (v & 0xff) as u8
}

/// Bits 8..16 of `v`.
pub const fn high_byte(v: u16) -> u8 {
    (v >> 8) as u8
}

/// `(high << 8) | low`
pub const fn form16(high: u8, low: u8) -> u16 {
    ((high as u16) << 8) | low as u16
}

/// Bits 0..16 of `v`.
pub const fn low_half(v: u32) -> u16 {
    (v & 0xffff) as u16
}

/// Bits 16..32 of `v`.
pub const fn high_half(v: u32) -> u16 {
    (v >> 16) as u16
}

/// `(high << 16) | low`
pub const fn form32(high: u16, low: u16) -> u32 {
    ((high as u32) << 16) | low as u32
}

/// Bits 0..4 of `v`.
pub const fn low_nibble(v: u8) -> u8 {
    v & 0x0f
}

/// Bits 4..8 of `v`.
pub const fn high_nibble(v: u8) -> u8 {
    v >> 4
}

/// `(high << 4) | low`, each nibble masked to 4 bits.
pub const fn form8(high: u8, low: u8) -> u8 {
    ((high & 0x0f) << 4) | (low & 0x0f)
}

/// Bits 0..32 of `v`.
pub const fn low_word(v: u64) -> u32 {
    (v & 0xffff_ffff) as u32
}

/// Bits 32..64 of `v`.
pub const fn high_word(v: u64) -> u32 {
    (v >> 32) as u32
}

/// `(high << 32) | low`
pub const fn form64(high: u32, low: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}

/// Replaces the `bit_count` bits of `word` starting at `bit_start` with the
/// low bits of `value`.
///
/// ## Plain English
///
/// The read-modify-write you do on a hardware register: clear a field,
/// drop the new value in, leave every other bit alone.
///
/// ```
/// use fixcap::bits::write_bits_u32;
///
/// // Put 0xab into the top byte
/// assert_eq!(write_bits_u32(0xfedc_ba98, 0xab, 24, 8), 0xabdc_ba98);
/// ```
///
/// A zero-width field, or one that runs past bit 31, leaves `word` as-is.
pub const fn write_bits_u32(word: u32, value: u32, bit_start: u32, bit_count: u32) -> u32 {
    if bit_count == 0 || bit_start >= 32 || bit_count > 32 - bit_start {
        return word;
    }
    let mask = (u32::MAX >> (32 - bit_count)) << bit_start;
    (word & !mask) | ((value << bit_start) & mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_form_16() {
        assert_eq!(high_byte(0x1234), 0x12);
        assert_eq!(low_byte(0x1234), 0x34);
        assert_eq!(form16(0x12, 0x34), 0x1234);
    }

    #[test]
    fn test_split_and_form_32() {
        assert_eq!(high_half(0x1234_5678), 0x1234);
        assert_eq!(low_half(0x1234_5678), 0x5678);
        assert_eq!(form32(0x1234, 0x5678), 0x1234_5678);
    }

    #[test]
    fn test_split_and_form_nibbles() {
        assert_eq!(high_nibble(0x12), 0x1);
        assert_eq!(low_nibble(0x12), 0x2);
        assert_eq!(form8(0x1, 0x2), 0x12);
        assert_eq!(form8(0xf1, 0xf2), 0x12);
    }

    #[test]
    fn test_split_and_form_64() {
        let v = 0x0123_4567_89ab_cdef_u64;
        assert_eq!(high_word(v), 0x0123_4567);
        assert_eq!(low_word(v), 0x89ab_cdef);
        assert_eq!(form64(0x0123_4567, 0x89ab_cdef), v);
    }

    #[test]
    fn test_write_bits_sequence() {
        let mut word = 0xfedc_ba98;
        word = write_bits_u32(word, 0xab, 24, 8);
        assert_eq!(word, 0xabdc_ba98);
        word = write_bits_u32(word, 0xef, 8, 8);
        assert_eq!(word, 0xabdc_ef98);
        word = write_bits_u32(word, 0x89, 4, 8);
        assert_eq!(word, 0xabdc_e898);
    }

    #[test]
    fn test_write_bits_edges() {
        assert_eq!(write_bits_u32(0x1234, 0xffff, 0, 0), 0x1234);
        assert_eq!(write_bits_u32(0x1234, 0xff, 30, 4), 0x1234);
        assert_eq!(write_bits_u32(0x1234, 0xff, 32, 1), 0x1234);
        assert_eq!(write_bits_u32(0, 0xffff_ffff, 0, 32), 0xffff_ffff);
        assert_eq!(write_bits_u32(0, 1, 31, 1), 0x8000_0000);
    }
}
