//! The open-addressed hash table mapping name hashes to block indices

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::crypto::{decrypt_block, hash_string, HashType};
use crate::error::Result;

/// Block index sentinel: this slot terminates a probe sequence
pub const BLOCK_INDEX_EMPTY: u32 = 0xFFFF_FFFF;

/// Block index sentinel: this slot was deleted, probing continues
pub const BLOCK_INDEX_DELETED: u32 = 0xFFFF_FFFE;

/// The neutral locale, preferred when several locale variants match
pub const LOCALE_NEUTRAL: u16 = 0;

/// One 16-byte hash table entry, decrypted
#[derive(Debug, Clone, Copy)]
pub struct HashEntry {
    /// First name-verification hash
    pub name_a: u32,
    /// Second name-verification hash
    pub name_b: u32,
    /// Language variant of this entry
    pub locale: u16,
    /// Platform variant of this entry
    pub platform: u16,
    /// Index into the block table, or a sentinel
    pub block_index: u32,
}

impl HashEntry {
    /// True if this slot terminates a probe sequence
    pub fn is_empty(&self) -> bool {
        self.block_index == BLOCK_INDEX_EMPTY
    }

    /// True if this slot was deleted and probing should continue
    pub fn is_deleted(&self) -> bool {
        self.block_index == BLOCK_INDEX_DELETED
    }
}

/// The decrypted hash table of one archive
#[derive(Debug)]
pub struct HashTable {
    entries: Vec<HashEntry>,
}

impl HashTable {
    /// Decrypts and decodes the raw table bytes
    ///
    /// `raw` must hold exactly `count * 16` bytes as read from the
    /// archive; they are decrypted with the table key derived from
    /// `"(hash table)"` and decoded field by field.
    pub fn from_encrypted(mut raw: Vec<u8>) -> Result<Self> {
        let key = hash_string("(hash table)", HashType::FileKey);
        decrypt_block(&mut raw, key);

        let count = raw.len() / 16;
        let mut cursor = Cursor::new(raw);
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(HashEntry {
                name_a: cursor.read_u32::<LittleEndian>()?,
                name_b: cursor.read_u32::<LittleEndian>()?,
                locale: cursor.read_u16::<LittleEndian>()?,
                platform: cursor.read_u16::<LittleEndian>()?,
                block_index: cursor.read_u32::<LittleEndian>()?,
            });
        }

        Ok(Self { entries })
    }

    /// Builds a table directly from decrypted entries
    pub fn from_entries(entries: Vec<HashEntry>) -> Self {
        Self { entries }
    }

    /// Number of slots in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no slots
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a normalized name to its hash entry
    ///
    /// Probes linearly from the name's start slot, wrapping at most
    /// once: deleted slots are skipped, an empty slot ends the probe
    /// with a miss. When several locale variants match, the neutral
    /// locale wins; otherwise the first probed match is used.
    pub fn find(&self, name: &str) -> Option<HashEntry> {
        if self.entries.is_empty() {
            return None;
        }

        let count = self.entries.len() as u32;
        let name_a = hash_string(name, HashType::NameA);
        let name_b = hash_string(name, HashType::NameB);
        let start = hash_string(name, HashType::TableOffset) % count;

        let mut first_match: Option<HashEntry> = None;
        for i in 0..count {
            let entry = self.entries[((start + i) % count) as usize];

            if entry.is_empty() {
                break;
            }
            if entry.is_deleted() {
                continue;
            }
            if entry.name_a == name_a && entry.name_b == name_b {
                if entry.locale == LOCALE_NEUTRAL {
                    return Some(entry);
                }
                first_match.get_or_insert(entry);
            }
        }

        first_match
    }
}
