//! Synthetic archive construction for integration tests
//!
//! Builds minimal but structurally valid archives in memory: header,
//! stored file payloads, then the encrypted hash and block tables. The
//! layout mirrors what retail packers emit closely enough to exercise
//! every read path.

// Not every integration test crate uses every helper.
#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use warpack::crypto::{encrypt_block, file_key, hash_string, HashType};
use warpack::tables::BlockFlags;

const HEADER_SIZE: u32 = 32;
const BLOCK_EMPTY: u32 = 0xFFFF_FFFF;

/// How a file's payload is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Direct byte range, no sector table
    Plain,
    /// One unit, stored verbatim
    SingleUnit,
    /// One unit, zlib-compressed
    SingleUnitCompressed,
    /// Sector table + per-sector payloads; sectors that shrink under
    /// zlib are stored compressed, the rest verbatim
    Sectored,
}

/// One file to pack into a synthetic archive
#[derive(Debug, Clone)]
pub struct FileSpec {
    pub name: String,
    pub locale: u16,
    pub data: Vec<u8>,
    pub storage: Storage,
    pub encrypted: bool,
    pub fix_key: bool,
    pub sector_crc: bool,
    /// Overrides the stored bytes (payload corruption scenarios)
    pub stored_override: Option<(Vec<u8>, u32)>,
    /// Overrides the declared compressed size (truncation scenarios)
    pub declared_compressed_size: Option<u32>,
}

impl FileSpec {
    pub fn new(name: &str, data: &[u8], storage: Storage) -> Self {
        Self {
            name: name.to_string(),
            locale: 0,
            data: data.to_vec(),
            storage,
            encrypted: false,
            fix_key: false,
            sector_crc: false,
            stored_override: None,
            declared_compressed_size: None,
        }
    }

    pub fn plain(name: &str, data: &[u8]) -> Self {
        Self::new(name, data, Storage::Plain)
    }

    pub fn locale(mut self, locale: u16) -> Self {
        self.locale = locale;
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.encrypted = true;
        self
    }

    pub fn fix_key(mut self) -> Self {
        self.fix_key = true;
        self
    }

    pub fn sector_crc(mut self) -> Self {
        self.sector_crc = true;
        self
    }

    /// Stores `stored` verbatim as a single compressed unit declaring
    /// `uncompressed_size`; used to plant unsupported or broken payloads
    pub fn stored_raw(name: &str, stored: &[u8], uncompressed_size: u32) -> Self {
        let mut spec = Self::new(name, &[], Storage::SingleUnitCompressed);
        spec.stored_override = Some((stored.to_vec(), uncompressed_size));
        spec
    }

    pub fn declared_compressed_size(mut self, size: u32) -> Self {
        self.declared_compressed_size = Some(size);
        self
    }

    fn flags(&self) -> BlockFlags {
        let mut flags = BlockFlags::EXISTS;
        match self.storage {
            Storage::Plain => {}
            Storage::SingleUnit => flags |= BlockFlags::SINGLE_UNIT,
            Storage::SingleUnitCompressed => {
                flags |= BlockFlags::SINGLE_UNIT | BlockFlags::COMPRESSED
            }
            Storage::Sectored => flags |= BlockFlags::COMPRESSED,
        }
        if self.encrypted {
            flags |= BlockFlags::ENCRYPTED;
        }
        if self.fix_key {
            flags |= BlockFlags::FIX_KEY;
        }
        if self.sector_crc {
            flags |= BlockFlags::SECTOR_CRC;
        }
        flags
    }
}

pub struct ArchiveBuilder {
    sector_shift: u16,
    hash_slots: u32,
    prefix: usize,
    files: Vec<FileSpec>,
    dangling: Vec<(String, u32)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            sector_shift: 3,
            hash_slots: 16,
            prefix: 0,
            files: Vec::new(),
            dangling: Vec::new(),
        }
    }

    pub fn sector_shift(mut self, shift: u16) -> Self {
        self.sector_shift = shift;
        self
    }

    /// Prepends `len` zero bytes so the archive base is not file start;
    /// must be a multiple of 0x200 for the header scan to find it
    pub fn prefix(mut self, len: usize) -> Self {
        assert_eq!(len % 0x200, 0);
        self.prefix = len;
        self
    }

    pub fn file(mut self, spec: FileSpec) -> Self {
        self.files.push(spec);
        self
    }

    /// Adds a hash entry pointing at a nonexistent block
    pub fn dangling_entry(mut self, name: &str, block_index: u32) -> Self {
        self.dangling.push((name.to_string(), block_index));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let sector_size = 512u32 << self.sector_shift;

        // Lay out payloads first so block offsets are known
        let mut payload = Vec::new();
        let mut blocks = Vec::new();
        for spec in &self.files {
            let offset = HEADER_SIZE + payload.len() as u32;
            let flags = spec.flags();

            let (stored, uncompressed_size) = match &spec.stored_override {
                Some((stored, usize_)) => (stored.clone(), *usize_),
                None => (
                    encode_payload(spec, sector_size, offset, flags),
                    spec.data.len() as u32,
                ),
            };

            let compressed_size = spec
                .declared_compressed_size
                .unwrap_or(stored.len() as u32);

            payload.extend_from_slice(&stored);
            blocks.push((offset, compressed_size, uncompressed_size, flags.bits()));
        }

        // Hash table: linear-probe insertion in declaration order
        let slots = self.hash_slots;
        let mut hash_entries = vec![(0u32, 0u32, 0u16, 0u16, BLOCK_EMPTY); slots as usize];
        let named: Vec<(&str, u16, u32)> = self
            .files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.as_str(), f.locale, i as u32))
            .chain(self.dangling.iter().map(|(n, b)| (n.as_str(), 0, *b)))
            .collect();
        for (name, locale, block_index) in named {
            let start = hash_string(name, HashType::TableOffset) % slots;
            let name_a = hash_string(name, HashType::NameA);
            let name_b = hash_string(name, HashType::NameB);
            let slot = (0..slots)
                .map(|i| ((start + i) % slots) as usize)
                .find(|&idx| hash_entries[idx].4 == BLOCK_EMPTY)
                .expect("hash table full");
            hash_entries[slot] = (name_a, name_b, locale, 0, block_index);
        }

        let hash_table_offset = HEADER_SIZE + payload.len() as u32;
        let mut hash_raw = Vec::new();
        for (a, b, locale, platform, block) in &hash_entries {
            hash_raw.extend_from_slice(&a.to_le_bytes());
            hash_raw.extend_from_slice(&b.to_le_bytes());
            hash_raw.extend_from_slice(&locale.to_le_bytes());
            hash_raw.extend_from_slice(&platform.to_le_bytes());
            hash_raw.extend_from_slice(&block.to_le_bytes());
        }
        encrypt_block(&mut hash_raw, hash_string("(hash table)", HashType::FileKey));

        let block_table_offset = hash_table_offset + hash_raw.len() as u32;
        let mut block_raw = Vec::new();
        for (offset, csize, usize_, flags) in &blocks {
            block_raw.extend_from_slice(&offset.to_le_bytes());
            block_raw.extend_from_slice(&csize.to_le_bytes());
            block_raw.extend_from_slice(&usize_.to_le_bytes());
            block_raw.extend_from_slice(&flags.to_le_bytes());
        }
        encrypt_block(&mut block_raw, hash_string("(block table)", HashType::FileKey));

        let archive_size = block_table_offset + block_raw.len() as u32;

        let mut out = vec![0u8; self.prefix];
        out.extend_from_slice(&0x1A51504Du32.to_le_bytes());
        out.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        out.extend_from_slice(&archive_size.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&self.sector_shift.to_le_bytes());
        out.extend_from_slice(&hash_table_offset.to_le_bytes());
        out.extend_from_slice(&block_table_offset.to_le_bytes());
        out.extend_from_slice(&slots.to_le_bytes());
        out.extend_from_slice(&(blocks.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
        out.extend_from_slice(&hash_raw);
        out.extend_from_slice(&block_raw);
        out
    }
}

/// Encodes one file's stored bytes, encrypting when asked
fn encode_payload(spec: &FileSpec, sector_size: u32, offset: u32, flags: BlockFlags) -> Vec<u8> {
    let key = file_key(&spec.name, flags, offset, spec.data.len() as u32);

    match spec.storage {
        Storage::Plain | Storage::SingleUnit => {
            let mut stored = spec.data.clone();
            if spec.encrypted {
                encrypt_block(&mut stored, key);
            }
            stored
        }
        Storage::SingleUnitCompressed => {
            let mut stored = deflate(&spec.data);
            if spec.encrypted {
                encrypt_block(&mut stored, key);
            }
            stored
        }
        Storage::Sectored => {
            let sectors: Vec<&[u8]> = spec.data.chunks(sector_size as usize).collect();
            let mut encoded: Vec<Vec<u8>> = sectors
                .iter()
                .map(|sector| {
                    let compressed = deflate(sector);
                    if compressed.len() < sector.len() {
                        compressed
                    } else {
                        sector.to_vec()
                    }
                })
                .collect();

            let mut table_entries = sectors.len() + 1;
            if spec.sector_crc {
                table_entries += 1;
            }
            let table_len = (table_entries * 4) as u32;

            let mut offsets = Vec::with_capacity(table_entries);
            let mut cursor = table_len;
            offsets.push(cursor);
            for enc in &encoded {
                cursor += enc.len() as u32;
                offsets.push(cursor);
            }
            // The checksum sector holds one u32 per data sector; its
            // contents are never verified by readers
            if spec.sector_crc {
                cursor += (sectors.len() * 4) as u32;
                offsets.push(cursor);
            }

            let mut table: Vec<u8> = offsets.iter().flat_map(|o| o.to_le_bytes()).collect();
            if spec.encrypted {
                encrypt_block(&mut table, key.wrapping_sub(1));
                for (i, enc) in encoded.iter_mut().enumerate() {
                    encrypt_block(enc, key.wrapping_add(i as u32));
                }
            }

            let mut stored = table;
            for enc in &encoded {
                stored.extend_from_slice(enc);
            }
            if spec.sector_crc {
                stored.extend(std::iter::repeat(0u8).take(sectors.len() * 4));
            }
            stored
        }
    }
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(vec![0x02u8], Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Deterministic incompressible-ish filler
pub fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545F491_4F6CDD1Du64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}
