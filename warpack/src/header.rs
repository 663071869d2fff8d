//! Archive header parsing and location

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Archive header signature: 'MPQ\x1A'
pub const HEADER_SIGNATURE: u32 = 0x1A51504D;

/// Size of the fixed header
pub const HEADER_SIZE: u32 = 32;

/// Alignment of the header within the underlying file
const HEADER_ALIGN: u64 = 0x200;

/// The fixed archive header
///
/// Parsed once at open and immutable afterwards. All offsets are
/// relative to the archive base, the position in the underlying file
/// where the signature was found.
#[derive(Debug, Clone)]
pub struct Header {
    /// Declared size of the header in bytes
    pub header_size: u32,
    /// Declared size of the archive in bytes
    pub archive_size: u32,
    /// Format version of the archive
    pub format_version: u16,
    /// Sector size as a shift: sector bytes = 512 << shift
    pub sector_size_shift: u16,
    /// Offset of the encrypted hash table
    pub hash_table_offset: u32,
    /// Offset of the encrypted block table
    pub block_table_offset: u32,
    /// Number of hash table entries
    pub hash_table_count: u32,
    /// Number of block table entries
    pub block_table_count: u32,
}

impl Header {
    /// Sector size in bytes for this archive
    pub fn sector_size(&self) -> u32 {
        512 << self.sector_size_shift
    }

    /// Locates and parses the header, scanning aligned offsets
    ///
    /// Archives may be embedded in a carrier file (installers prepend
    /// their own data), so the signature is searched at every 512-byte
    /// boundary. Returns the header and the archive base offset.
    pub fn find_and_read<R: Read + Seek>(reader: &mut R) -> Result<(Self, u64)> {
        let file_len = reader.seek(SeekFrom::End(0))?;

        let mut offset = 0u64;
        while offset + HEADER_SIZE as u64 <= file_len {
            reader.seek(SeekFrom::Start(offset))?;
            let signature = reader.read_u32::<LittleEndian>()?;

            if signature == HEADER_SIGNATURE {
                let header = Self::read_after_signature(reader)?;
                header.validate(offset, file_len)?;
                log::debug!(
                    "archive header at {:#x}: {} hash entries, {} block entries, sector size {}",
                    offset,
                    header.hash_table_count,
                    header.block_table_count,
                    header.sector_size()
                );
                return Ok((header, offset));
            }

            offset += HEADER_ALIGN;
        }

        Err(Error::Format("no archive signature found".into()))
    }

    /// Reads the fixed fields following an already-consumed signature
    fn read_after_signature<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Header {
            header_size: reader.read_u32::<LittleEndian>()?,
            archive_size: reader.read_u32::<LittleEndian>()?,
            format_version: reader.read_u16::<LittleEndian>()?,
            sector_size_shift: reader.read_u16::<LittleEndian>()?,
            hash_table_offset: reader.read_u32::<LittleEndian>()?,
            block_table_offset: reader.read_u32::<LittleEndian>()?,
            hash_table_count: reader.read_u32::<LittleEndian>()?,
            block_table_count: reader.read_u32::<LittleEndian>()?,
        })
    }

    /// Checks that every declared range lies within the underlying file
    fn validate(&self, base: u64, file_len: u64) -> Result<()> {
        if self.header_size < HEADER_SIZE {
            return Err(Error::Format(format!(
                "header size {} below minimum {}",
                self.header_size, HEADER_SIZE
            )));
        }

        // 512 << 16 no longer fits the u32 sector arithmetic downstream
        if self.sector_size_shift >= 16 {
            return Err(Error::Format(format!(
                "unreasonable sector size shift {}",
                self.sector_size_shift
            )));
        }

        let remaining = file_len - base;
        for (what, offset, count) in [
            ("hash table", self.hash_table_offset, self.hash_table_count),
            (
                "block table",
                self.block_table_offset,
                self.block_table_count,
            ),
        ] {
            let end = offset as u64 + count as u64 * 16;
            if end > remaining {
                return Err(Error::Format(format!(
                    "{what} extends past end of file ({end} > {remaining})"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn raw_header(hash_count: u32, block_count: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&HEADER_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        buf.extend_from_slice(&1024u32.to_le_bytes()); // archive size
        buf.extend_from_slice(&0u16.to_le_bytes()); // version
        buf.extend_from_slice(&3u16.to_le_bytes()); // sector shift
        buf.extend_from_slice(&32u32.to_le_bytes()); // hash table offset
        buf.extend_from_slice(&(32 + hash_count * 16).to_le_bytes());
        buf.extend_from_slice(&hash_count.to_le_bytes());
        buf.extend_from_slice(&block_count.to_le_bytes());
        buf
    }

    #[test]
    fn parse_at_start() {
        let mut raw = raw_header(4, 2);
        raw.resize(32 + 4 * 16 + 2 * 16, 0);

        let (header, base) = Header::find_and_read(&mut Cursor::new(raw)).unwrap();
        assert_eq!(base, 0);
        assert_eq!(header.hash_table_count, 4);
        assert_eq!(header.block_table_count, 2);
        assert_eq!(header.sector_size(), 4096);
    }

    #[test]
    fn scan_finds_embedded_header() {
        let mut raw = vec![0u8; 0x400];
        let mut inner = raw_header(1, 1);
        inner.resize(32 + 16 + 16, 0);
        raw.extend_from_slice(&inner);

        let (_, base) = Header::find_and_read(&mut Cursor::new(raw)).unwrap();
        assert_eq!(base, 0x400);
    }

    #[test]
    fn bad_magic_is_format_error() {
        let raw = vec![0xFFu8; 64];
        let err = Header::find_and_read(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn tables_must_fit_in_file() {
        // Declares four hash entries but the file ends right after the header
        let raw = raw_header(4, 2);
        let err = Header::find_and_read(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn oversized_sector_shift_rejected() {
        let mut raw = raw_header(0, 0);
        raw[14..16].copy_from_slice(&16u16.to_le_bytes());
        let err = Header::find_and_read(&mut Cursor::new(raw)).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
