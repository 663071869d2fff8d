//! `list` - print the names carried in the archive's (listfile)

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::open_archive;

pub fn run(path: &Path) -> Result<()> {
    let archive = open_archive(path)?;

    let names = archive
        .list()
        .with_context(|| format!("{} carries no readable (listfile)", path.display()))?;

    for name in &names {
        println!("{name}");
    }
    eprintln!("{}", format!("{} files", names.len()).dimmed());

    Ok(())
}
