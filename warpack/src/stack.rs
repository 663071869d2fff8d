//! Layered archives with last-added-wins override semantics
//!
//! Patch archives fully shadow same-named files in earlier archives;
//! there is no content merging. The stack probes newest to oldest and
//! returns the first archive that can actually produce the bytes.

use crate::archive::Archive;
use crate::error::{Error, Result};

/// An ordered set of opened archives
///
/// Priorities grow with load order; re-adding an archive creates an
/// independent, higher-priority entry. Structural mutation is `&mut
/// self` and expected to finish before concurrent reads begin.
#[derive(Debug, Default)]
pub struct ArchiveStack {
    archives: Vec<Archive>,
}

/// Which archive would satisfy a read, for diagnostics
#[derive(Debug)]
pub struct FileSource<'a> {
    /// The archive holding the winning copy
    pub archive: &'a Archive,
    /// Its 1-based load order
    pub priority: usize,
}

impl ArchiveStack {
    /// Creates an empty stack; valid, and always misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an archive with the next-higher priority
    pub fn add(&mut self, archive: Archive) {
        self.archives.push(archive);
    }

    /// Number of archives in the stack
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    /// True if no archives have been added
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Reads the highest-priority copy of `name`
    ///
    /// A failing archive is treated as a miss for that archive only;
    /// the probe continues into older archives rather than aborting.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        for (idx, archive) in self.archives.iter().enumerate().rev() {
            match archive.read(name) {
                Ok(data) => return Ok(data),
                Err(err) if err.is_not_found() => {}
                Err(err) => {
                    log::debug!(
                        "archive #{} failed reading {name}, treating as miss: {err}",
                        idx + 1
                    );
                }
            }
        }

        Err(Error::NotFound(name.to_string()))
    }

    /// True if any archive can produce `name`
    pub fn contains(&self, name: &str) -> bool {
        self.archives.iter().rev().any(|a| a.contains(name))
    }

    /// Reports which archive a read of `name` would be served from
    ///
    /// Runs the same probe as [`ArchiveStack::read`], including the
    /// error-as-miss rule, without transferring ownership of the bytes.
    pub fn source_of(&self, name: &str) -> Option<FileSource<'_>> {
        for (idx, archive) in self.archives.iter().enumerate().rev() {
            if archive.read(name).is_ok() {
                return Some(FileSource {
                    archive,
                    priority: idx + 1,
                });
            }
        }
        None
    }
}
