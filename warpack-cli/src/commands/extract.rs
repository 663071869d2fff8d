//! `extract` - pull files out of a stack of archives

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::open_stack;

pub fn run(base: &Path, patches: &[PathBuf], files: &[String], output: &Path) -> Result<()> {
    let stack = open_stack(base, patches)?;

    let mut failed = 0usize;
    for name in files {
        match stack.read(name) {
            Ok(data) => {
                let dest = output.join(name.replace('\\', "/"));
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                fs::write(&dest, &data).with_context(|| format!("writing {}", dest.display()))?;
                println!("{} {} ({} bytes)", "extracted".green(), name, data.len());
            }
            Err(err) => {
                // One unreadable file should not stop the batch
                eprintln!("{} {}: {}", "failed".red(), name, err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}
