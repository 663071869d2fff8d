//! Per-file key derivation

use super::hash::{hash_string, HashType};
use crate::tables::BlockFlags;

/// Derives the encryption key for a stored file
///
/// The key is hashed from the base name of the logical path (the part
/// after the last separator). Entries flagged FIX_KEY are keyed to their
/// position inside the archive rather than to the name alone: the block
/// offset relative to the archive base and the uncompressed size are
/// mixed in.
pub fn file_key(name: &str, flags: BlockFlags, block_offset: u32, uncompressed_size: u32) -> u32 {
    let mut key = hash_string(base_name(name), HashType::FileKey);
    if flags.contains(BlockFlags::FIX_KEY) {
        key = key.wrapping_add(block_offset) ^ uncompressed_size;
    }
    key
}

/// Strips everything up to and including the last path separator
fn base_name(name: &str) -> &str {
    match name.rfind(['\\', '/']) {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}
