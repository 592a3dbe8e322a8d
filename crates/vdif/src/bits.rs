//! Low-level bit utilities over 32-bit header words.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of a word.
//! Words are in transmission order; a 64-bit value keeps its low half in the
//! earlier word.

/// Bit of word 0 that marks a 4-word legacy header.
pub const LEGACY_BIT: u32 = 30;

/// Returns a mask covering the low `bit_length` bits (`bit_length` <= 64).
pub fn mask(bit_length: u32) -> u64 {
    if bit_length >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    }
}

/// Reads `bit_length` bits of `word` starting at `bit_index` as an unsigned value.
///
/// Callers are expected to have checked `bit_index + bit_length <= 32`.
pub fn extract_bits(word: u32, bit_index: u32, bit_length: u32) -> u64 {
    (u64::from(word) >> bit_index) & mask(bit_length)
}

/// Joins two words into one 64-bit value, `lo` holding the low 32 bits.
pub fn join_words(lo: u32, hi: u32) -> u64 {
    u64::from(lo) + (u64::from(hi) << 32)
}

/// Whether the first header word announces a legacy (4-word) header.
pub fn is_legacy_word(word0: u32) -> bool {
    extract_bits(word0, LEGACY_BIT, 1) == 1
}

/// Converts little-endian bytes into words. Trailing bytes that do not fill a word are ignored.
pub fn words_from_le_bytes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 0b1);
        assert_eq!(mask(30), 0x3FFF_FFFF);
        assert_eq!(mask(32), 0xFFFF_FFFF);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn test_extract_bits() {
        assert_eq!(extract_bits(0b1011_0000, 4, 4), 0b1011);
        assert_eq!(extract_bits(u32::MAX, 31, 1), 1);
        assert_eq!(extract_bits(u32::MAX, 0, 32), u64::from(u32::MAX));
    }

    #[test]
    fn test_join_words() {
        assert_eq!(join_words(1, 0), 1);
        assert_eq!(join_words(0, 1), 1 << 32);
        assert_eq!(join_words(u32::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn test_is_legacy_word() {
        assert!(is_legacy_word(1 << 30));
        assert!(!is_legacy_word(1 << 31));
        assert!(!is_legacy_word(0x3FFF_FFFF));
    }

    #[test]
    fn test_words_from_le_bytes() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12, 0xFF];
        assert_eq!(words_from_le_bytes(&bytes), vec![1, 0x1234_5678]);
    }
}
