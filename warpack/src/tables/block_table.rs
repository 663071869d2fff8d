//! The block table describing where and how each file is stored

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::crypto::{decrypt_block, hash_string, HashType};
use crate::error::Result;

bitflags! {
    /// Storage flags of a block table entry
    ///
    /// Unknown bits are retained so diagnostics can surface them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u32 {
        /// File payload is imploded (legacy compression tag)
        const IMPLODED = 0x0000_0100;
        /// File payload is compressed
        const COMPRESSED = 0x0000_0200;
        /// Any compression bit
        const COMPRESSION_MASK = 0x0000_FF00;
        /// File payload is encrypted with its per-file key
        const ENCRYPTED = 0x0001_0000;
        /// Per-file key is additionally bound to the block offset
        const FIX_KEY = 0x0002_0000;
        /// File is an incremental patch
        const PATCH_FILE = 0x0010_0000;
        /// File is stored as one unit, not split into sectors
        const SINGLE_UNIT = 0x0100_0000;
        /// A checksum sector follows the data sectors
        const SECTOR_CRC = 0x0400_0000;
        /// Entry is in use
        const EXISTS = 0x8000_0000;
    }
}

/// One 16-byte block table entry, decrypted
#[derive(Debug, Clone, Copy)]
pub struct BlockEntry {
    /// Offset of the stored payload, relative to the archive base
    pub offset: u32,
    /// Stored (possibly compressed) size in bytes
    pub compressed_size: u32,
    /// Size after decompression in bytes
    pub uncompressed_size: u32,
    /// Storage flags
    pub flags: BlockFlags,
}

impl BlockEntry {
    /// True if any compression bit is set
    pub fn is_compressed(&self) -> bool {
        self.flags.intersects(BlockFlags::COMPRESSION_MASK)
    }

    /// True if the payload is encrypted
    pub fn is_encrypted(&self) -> bool {
        self.flags.contains(BlockFlags::ENCRYPTED)
    }

    /// True if the payload is stored as a single unit
    pub fn is_single_unit(&self) -> bool {
        self.flags.contains(BlockFlags::SINGLE_UNIT)
    }

    /// True if a checksum sector trails the data sectors
    pub fn has_sector_crc(&self) -> bool {
        self.flags.contains(BlockFlags::SECTOR_CRC)
    }
}

/// The decrypted block table of one archive
#[derive(Debug)]
pub struct BlockTable {
    entries: Vec<BlockEntry>,
}

impl BlockTable {
    /// Decrypts and decodes the raw table bytes
    ///
    /// `raw` must hold exactly `count * 16` bytes as read from the
    /// archive; they are decrypted with the table key derived from
    /// `"(block table)"` and decoded field by field.
    pub fn from_encrypted(mut raw: Vec<u8>) -> Result<Self> {
        let key = hash_string("(block table)", HashType::FileKey);
        decrypt_block(&mut raw, key);

        let count = raw.len() / 16;
        let mut cursor = Cursor::new(raw);
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(BlockEntry {
                offset: cursor.read_u32::<LittleEndian>()?,
                compressed_size: cursor.read_u32::<LittleEndian>()?,
                uncompressed_size: cursor.read_u32::<LittleEndian>()?,
                flags: BlockFlags::from_bits_retain(cursor.read_u32::<LittleEndian>()?),
            });
        }

        Ok(Self { entries })
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if in range
    pub fn get(&self, index: u32) -> Option<&BlockEntry> {
        self.entries.get(index as usize)
    }
}
