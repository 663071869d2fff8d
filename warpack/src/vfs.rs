//! Filesystem-style access to an archive stack
//!
//! Callers hand in hierarchical slash-separated paths, optionally with
//! a leading slash; archives store case-insensitive backslash-separated
//! logical names. This adapter bridges the two and wraps results as
//! read-only file handles. Archives have no real directory concept, so
//! there is no listing or globbing, only full names.

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::error::Result;
use crate::stack::ArchiveStack;

/// A filesystem view over an [`ArchiveStack`]
#[derive(Debug)]
pub struct Filesystem {
    stack: ArchiveStack,
}

impl Filesystem {
    /// Wraps a stack in a filesystem view
    pub fn new(stack: ArchiveStack) -> Self {
        Self { stack }
    }

    /// The underlying stack
    pub fn stack(&self) -> &ArchiveStack {
        &self.stack
    }

    /// Opens a file by slash-separated path
    pub fn open(&self, path: &str) -> Result<VirtualFile> {
        let native = to_native(path);
        let data = self.stack.read(&native)?;
        Ok(VirtualFile::new(leaf_name(&native).to_string(), data))
    }

    /// True if the path resolves in any archive of the stack
    pub fn exists(&self, path: &str) -> bool {
        self.stack.contains(&to_native(path))
    }
}

/// Converts a slash-separated caller path to the native archive form
fn to_native(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).replace('/', "\\")
}

/// The last path component of a native name
fn leaf_name(native: &str) -> &str {
    native.rsplit('\\').next().unwrap_or(native)
}

/// A read-only in-memory file handle with size metadata
#[derive(Debug)]
pub struct VirtualFile {
    name: String,
    cursor: Cursor<Vec<u8>>,
}

impl VirtualFile {
    fn new(name: String, data: Vec<u8>) -> Self {
        Self {
            name,
            cursor: Cursor::new(data),
        }
    }

    /// Base name of the file
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total size in bytes
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    /// True for zero-length files
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Consumes the handle, returning the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Read for VirtualFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for VirtualFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}
