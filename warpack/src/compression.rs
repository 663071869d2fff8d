//! Decompression of stored payloads
//!
//! Compressed payloads tag their algorithm in the first byte. Shipped
//! assets only ever use the deflate family; every other tag is
//! recognized and rejected rather than silently passed through.

use flate2::read::ZlibDecoder;
use std::io::Read;

use crate::error::{Error, Result};

/// Algorithm tag: zlib / deflate
pub const COMPRESSION_ZLIB: u8 = 0x02;

/// Decompresses a tagged payload to exactly `expected_size` bytes
///
/// The first byte of `data` selects the algorithm; the remainder is the
/// compressed stream. A short or long result is a structural error, not
/// a warning.
pub fn decompress(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let (&tag, payload) = data
        .split_first()
        .ok_or_else(|| Error::Format("empty compressed payload".into()))?;

    match tag {
        COMPRESSION_ZLIB => inflate(payload, expected_size),
        other => Err(Error::UnsupportedCompression(other)),
    }
}

fn inflate(payload: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut out = Vec::with_capacity(expected_size);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::Format(format!("zlib stream: {e}")))?;

    if out.len() != expected_size {
        return Err(Error::Format(format!(
            "decompressed {} bytes, expected {}",
            out.len(),
            expected_size
        )));
    }

    Ok(out)
}
