//! `info` - show archive header information

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::open_archive;

pub fn run(path: &Path) -> Result<()> {
    let archive = open_archive(path)?;
    let header = archive.header();

    println!("{}", path.display().to_string().bold());
    println!("  base offset:     {:#x}", archive.base_offset());
    println!("  format version:  {}", header.format_version);
    println!(
        "  sector size:     {} (shift {})",
        header.sector_size(),
        header.sector_size_shift
    );
    println!("  archive size:    {}", header.archive_size);
    println!(
        "  hash table:      {} entries at {:#x}",
        header.hash_table_count, header.hash_table_offset
    );
    println!(
        "  block table:     {} entries at {:#x}",
        header.block_table_count, header.block_table_offset
    );

    Ok(())
}
