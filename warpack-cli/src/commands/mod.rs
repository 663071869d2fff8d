//! Subcommand implementations

pub mod extract;
pub mod hash;
pub mod info;
pub mod list;
pub mod source;
pub mod texture;

use anyhow::{Context, Result};
use std::path::Path;
use warpack::{Archive, ArchiveStack};

/// Opens a base archive plus patches into a stack, in load order
pub fn open_stack(base: &Path, patches: &[impl AsRef<Path>]) -> Result<ArchiveStack> {
    let mut stack = ArchiveStack::new();
    stack.add(open_archive(base)?);
    for patch in patches {
        stack.add(open_archive(patch.as_ref())?);
    }
    Ok(stack)
}

pub fn open_archive(path: &Path) -> Result<Archive> {
    Archive::open(path).with_context(|| format!("opening {}", path.display()))
}
