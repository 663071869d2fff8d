//! `source` - report which archive in a stack supplies a file

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use super::open_archive;
use warpack::ArchiveStack;

pub fn run(archives: &[PathBuf], file: &str) -> Result<()> {
    let mut stack = ArchiveStack::new();
    for path in archives {
        stack.add(open_archive(path)?);
    }

    match stack.source_of(file) {
        Some(source) => {
            let path = source
                .archive
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".into());
            println!(
                "{file} {} {} (priority {})",
                "<-".dimmed(),
                path.bold(),
                source.priority
            );
            Ok(())
        }
        None => anyhow::bail!("{file} not found in any of the {} archives", stack.len()),
    }
}
