//! `texture` - decode a BLP texture from a stack

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use super::open_stack;
use warpack::blp;

pub fn run(base: &Path, patches: &[PathBuf], file: &str, output: Option<&Path>) -> Result<()> {
    let stack = open_stack(base, patches)?;

    let blob = stack.read(file).with_context(|| format!("reading {file}"))?;
    let image = blp::decode(&blob).with_context(|| format!("decoding {file}"))?;

    println!(
        "{file}: {}x{} pixels, {} bytes RGBA",
        image.width,
        image.height,
        image.pixels.len()
    );

    if let Some(path) = output {
        fs::write(path, &image.pixels).with_context(|| format!("writing {}", path.display()))?;
        println!("{} {}", "wrote".green(), path.display());
    }

    Ok(())
}
