//! Reading one opened archive
//!
//! An [`Archive`] owns its storage handle and the decrypted index
//! tables. Opening is all-or-nothing: a malformed header or table fails
//! the open, there are no partial or retry states. The handle is
//! expected to stay open for the caller's whole session; [`Archive::close`]
//! consumes the value, so use-after-close is a compile error rather
//! than a runtime surprise.

use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::compression::decompress;
use crate::crypto::{decrypt_block, file_key};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::listfile;
use crate::tables::{BlockEntry, BlockTable, HashTable};

/// Storage abstraction archives are opened from
///
/// Only cursor-based reads are required; positioned reads are
/// serialized internally with a lock scoped to the seek+read pair.
pub trait ReadSeek: Read + Seek + Send {}
impl<T: Read + Seek + Send> ReadSeek for T {}

/// An opened archive
pub struct Archive {
    /// Where the archive was opened from, when opened from a path
    path: Option<PathBuf>,
    header: Header,
    /// Position of the header in the underlying file; all block and
    /// table offsets are relative to this
    base_offset: u64,
    hash_table: HashTable,
    block_table: BlockTable,
    reader: Mutex<Box<dyn ReadSeek>>,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("path", &self.path)
            .field("base_offset", &self.base_offset)
            .field("hash_entries", &self.hash_table.len())
            .field("block_entries", &self.block_table.len())
            .finish_non_exhaustive()
    }
}

impl Archive {
    /// Opens an archive from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), Some(path.as_ref().to_path_buf()))
    }

    /// Opens an archive from any seekable reader
    ///
    /// `path` is recorded for diagnostics when known; it is never read
    /// from again.
    pub fn from_reader<R: ReadSeek + 'static>(reader: R, path: Option<PathBuf>) -> Result<Self> {
        let mut reader: Box<dyn ReadSeek> = Box::new(reader);

        let (header, base_offset) = Header::find_and_read(&mut reader)?;

        let hash_raw = read_exact_at(
            &mut reader,
            base_offset + header.hash_table_offset as u64,
            header.hash_table_count as usize * 16,
        )?;
        let hash_table = HashTable::from_encrypted(hash_raw)?;

        let block_raw = read_exact_at(
            &mut reader,
            base_offset + header.block_table_offset as u64,
            header.block_table_count as usize * 16,
        )?;
        let block_table = BlockTable::from_encrypted(block_raw)?;

        Ok(Self {
            path,
            header,
            base_offset,
            hash_table,
            block_table,
            reader: Mutex::new(reader),
        })
    }

    /// The path this archive was opened from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The parsed archive header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Position of the archive base in the underlying file
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// True if `name` resolves in the hash table
    ///
    /// A pure index lookup; the payload is not touched, so a corrupt
    /// block can still make a later [`Archive::read`] fail.
    pub fn contains(&self, name: &str) -> bool {
        self.hash_table.find(&normalize(name)).is_some()
    }

    /// Reads and decodes one stored file
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let normalized = normalize(name);

        let entry = self
            .hash_table
            .find(&normalized)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        let block = *self.block_table.get(entry.block_index).ok_or_else(|| {
            Error::Format(format!(
                "hash entry for {name} points at block {} of {}",
                entry.block_index,
                self.block_table.len()
            ))
        })?;

        if block.is_single_unit() {
            self.read_single_unit(&normalized, &block)
        } else if block.is_compressed() {
            self.read_sectored(&normalized, &block)
        } else {
            // Plain storage: a direct byte-range read
            self.read_raw(block.offset, block.uncompressed_size as usize)
        }
    }

    /// Names listed in the archive's `(listfile)`, when it carries one
    pub fn list(&self) -> Result<Vec<String>> {
        let data = self.read("(listfile)")?;
        Ok(listfile::parse(&data))
    }

    /// Releases the storage handle
    ///
    /// Consuming `self` makes any later use a compile error; dropping
    /// the archive has the same effect.
    pub fn close(self) {}

    /// A whole file stored as one unit
    fn read_single_unit(&self, name: &str, block: &BlockEntry) -> Result<Vec<u8>> {
        let mut raw = self.read_raw(block.offset, block.compressed_size as usize)?;

        if block.is_encrypted() {
            let key = file_key(name, block.flags, block.offset, block.uncompressed_size);
            decrypt_block(&mut raw, key);
        }

        if !block.is_compressed() {
            return Ok(raw);
        }

        decompress(&raw, block.uncompressed_size as usize)
    }

    /// A file split into independently stored sectors
    ///
    /// The stored block starts with a table of `sector_count + 1`
    /// offsets (one more when a checksum sector trails the data; the
    /// checksums themselves are not verified). Each sector is either
    /// verbatim, exactly its expected uncompressed length, or a tagged
    /// compressed payload.
    fn read_sectored(&self, name: &str, block: &BlockEntry) -> Result<Vec<u8>> {
        let raw = self.read_raw(block.offset, block.compressed_size as usize)?;

        let sector_size = self.header.sector_size();
        let sector_count = block.uncompressed_size.div_ceil(sector_size);

        let mut table_entries = sector_count as usize + 1;
        if block.has_sector_crc() {
            table_entries += 1;
        }
        let table_len = table_entries * 4;
        if raw.len() < table_len {
            return Err(Error::Format(format!(
                "{name}: stored block too small for its sector table ({} < {table_len})",
                raw.len()
            )));
        }

        let key = file_key(name, block.flags, block.offset, block.uncompressed_size);

        let mut table_bytes = raw[..table_len].to_vec();
        if block.is_encrypted() {
            decrypt_block(&mut table_bytes, key.wrapping_sub(1));
        }
        let offsets: Vec<u32> = table_bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let mut out = Vec::with_capacity(block.uncompressed_size as usize);
        for i in 0..sector_count {
            let start = offsets[i as usize] as usize;
            let end = offsets[i as usize + 1] as usize;
            if start > end || end > raw.len() {
                return Err(Error::Format(format!(
                    "{name}: sector {i} spans {start}..{end} outside stored block of {}",
                    raw.len()
                )));
            }

            let mut sector = raw[start..end].to_vec();
            if block.is_encrypted() {
                decrypt_block(&mut sector, key.wrapping_add(i));
            }

            let expected = (block.uncompressed_size - i * sector_size).min(sector_size) as usize;
            if sector.len() == expected {
                out.extend_from_slice(&sector);
            } else {
                out.extend_from_slice(&decompress(&sector, expected)?);
            }
        }

        if out.len() != block.uncompressed_size as usize {
            return Err(Error::Format(format!(
                "{name}: reassembled {} bytes, block declares {}",
                out.len(),
                block.uncompressed_size
            )));
        }

        Ok(out)
    }

    /// Positioned read of `len` bytes at `offset` past the archive base
    fn read_raw(&self, offset: u32, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        {
            // Lock covers only the seek+read pair, never decode work
            let mut reader = self.reader.lock();
            reader.seek(SeekFrom::Start(self.base_offset + offset as u64))?;
            reader.read_exact(&mut buf)?;
        }
        Ok(buf)
    }
}

fn read_exact_at(reader: &mut Box<dyn ReadSeek>, offset: u64, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.seek(SeekFrom::Start(offset))?;
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Converts a caller-facing name to the archive's separator convention
fn normalize(name: &str) -> String {
    name.replace('/', "\\")
}
