//! # warpack
//!
//! Read-only, random-access retrieval of assets packed in MPQ archives,
//! layered across multiple archives with last-added-wins override
//! semantics, plus decoding of BLP2 block-compressed textures to RGBA8
//! pixels.
//!
//! The crate is fully synchronous and CPU-bound. Reads across different
//! archives in a stack are safe concurrently; reads within one archive
//! serialize on an internal lock scoped to the positioned read.
//!
//! ## Example
//!
//! ```no_run
//! use warpack::{Archive, ArchiveStack, Filesystem};
//!
//! # fn main() -> warpack::Result<()> {
//! let mut stack = ArchiveStack::new();
//! stack.add(Archive::open("common.mpq")?);
//! stack.add(Archive::open("patch.mpq")?); // shadows common.mpq
//!
//! let fs = Filesystem::new(stack);
//! let tile = fs.open("textures/minimap/map01.blp")?;
//! let image = warpack::blp::decode(&tile.into_bytes())?;
//! println!("{}x{}", image.width, image.height);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod archive;
pub mod blp;
pub mod compression;
pub mod crypto;
pub mod error;
pub mod header;
pub mod listfile;
pub mod stack;
pub mod tables;
pub mod vfs;

// Re-export commonly used types
pub use archive::Archive;
pub use blp::Image;
pub use error::{Error, Result};
pub use stack::{ArchiveStack, FileSource};
pub use vfs::{Filesystem, VirtualFile};
