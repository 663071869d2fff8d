//! Error types for warpack

use std::io;
use thiserror::Error;

/// Errors produced while reading archives or decoding textures
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying storage could not be read (including truncated reads)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Structural violation: bad magic, out-of-bounds offsets, short header
    ///
    /// Fatal to the archive (when raised at open) or to the single asset
    /// (when raised during extraction or decoding). Never coerced into a
    /// softer error.
    #[error("malformed data: {0}")]
    Format(String),

    /// A compression tag was recognized but is not implemented
    ///
    /// Fatal to that one file only; the archive stays usable.
    #[error("unsupported compression: 0x{0:02X}")]
    UnsupportedCompression(u8),

    /// A texture color encoding was recognized but is not implemented
    ///
    /// Fatal to that one image only.
    #[error("unsupported pixel encoding: {0}")]
    UnsupportedEncoding(u8),

    /// The name is absent from the searched archive(s); expected, non-fatal
    #[error("file not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Returns true if this error means "the asset does not exist",
    /// as opposed to "the archive or asset is corrupt".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type for warpack operations
pub type Result<T> = std::result::Result<T, Error>;
