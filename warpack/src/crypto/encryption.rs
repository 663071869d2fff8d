//! The word-wise symmetric stream cipher

use super::constants::CRYPT_TABLE;

/// Decrypts a buffer in place
///
/// Operates on consecutive 32-bit little-endian words. Trailing bytes
/// that do not fill a whole word are left untouched; archive tables are
/// always word-aligned, sector payloads may carry a short tail.
pub fn decrypt_block(data: &mut [u8], mut key: u32) {
    let mut seed: u32 = 0xEEEE_EEEE;

    for chunk in data.chunks_exact_mut(4) {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);

        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let plain = word ^ key.wrapping_add(seed);
        chunk.copy_from_slice(&plain.to_le_bytes());

        key = ((!key << 21).wrapping_add(0x1111_1111)) | (key >> 11);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}

/// Encrypts a buffer in place; exact inverse of [`decrypt_block`]
///
/// The cipher is symmetric apart from which side of the XOR feeds the
/// running seed. Retrieval never encrypts; this exists for fixture
/// construction and diagnostics.
pub fn encrypt_block(data: &mut [u8], mut key: u32) {
    let mut seed: u32 = 0xEEEE_EEEE;

    for chunk in data.chunks_exact_mut(4) {
        seed = seed.wrapping_add(CRYPT_TABLE[0x400 + (key & 0xFF) as usize]);

        let plain = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let cipher = plain ^ key.wrapping_add(seed);
        chunk.copy_from_slice(&cipher.to_le_bytes());

        key = ((!key << 21).wrapping_add(0x1111_1111)) | (key >> 11);
        seed = plain
            .wrapping_add(seed)
            .wrapping_add(seed << 5)
            .wrapping_add(3);
    }
}
