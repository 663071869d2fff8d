//! Keyed table hashing for name resolution and key derivation

use super::constants::CRYPT_TABLE;

/// Selects one of the four 256-entry slices of the crypt table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// Start slot in the hash table
    TableOffset = 0,
    /// First name-verification hash
    NameA = 1,
    /// Second name-verification hash
    NameB = 2,
    /// Per-file encryption key
    FileKey = 3,
}

/// Hashes a string with the crypt table
///
/// Case-insensitive: input bytes are ASCII-uppercased before folding.
/// Total function with no failure mode; the empty string hashes to the
/// initial seed.
pub fn hash_string(input: &str, hash_type: HashType) -> u32 {
    let mut seed1: u32 = 0x7FED_7FED;
    let mut seed2: u32 = 0xEEEE_EEEE;

    for ch in input.bytes().map(|b| b.to_ascii_uppercase()) {
        let value = CRYPT_TABLE[((hash_type as usize) << 8) + ch as usize];
        seed1 = value ^ seed1.wrapping_add(seed2);
        seed2 = (ch as u32)
            .wrapping_add(seed1)
            .wrapping_add(seed2)
            .wrapping_add(seed2 << 5)
            .wrapping_add(3);
    }

    seed1
}
