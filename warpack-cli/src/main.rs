//! warpack - inspect and extract layered MPQ archives

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "warpack",
    about = "Inspect and extract layered MPQ archives",
    version,
    after_help = "EXAMPLES:
    # Show header information
    warpack info common.mpq

    # List files named in the archive's (listfile)
    warpack list common.mpq

    # Extract a file, letting patch archives shadow the base
    warpack extract common.mpq textures\\\\minimap\\\\map01.blp -p patch.mpq -o out/

    # Which archive would serve a file?
    warpack source -a common.mpq -a patch.mpq textures\\\\minimap\\\\map01.blp

    # Decode a texture and dump its RGBA8 pixels
    warpack texture common.mpq textures\\\\minimap\\\\map01.blp -o map01.rgba"
)]
struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show archive header information
    Info {
        /// Path to the archive
        archive: PathBuf,
    },

    /// List names from the archive's (listfile)
    List {
        /// Path to the archive
        archive: PathBuf,
    },

    /// Extract files from a stack of archives
    Extract {
        /// Base archive
        archive: PathBuf,

        /// Archive-internal names of the files to extract
        #[arg(required = true)]
        files: Vec<String>,

        /// Patch archives layered over the base, in load order
        #[arg(short, long)]
        patch: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Print the four hash values of a name
    Hash {
        /// Logical name to hash
        name: String,
    },

    /// Report which archive in a stack supplies a file
    Source {
        /// Archives in load order (repeat; later shadows earlier)
        #[arg(short, long, required = true)]
        archive: Vec<PathBuf>,

        /// Archive-internal name to resolve
        file: String,
    },

    /// Decode a BLP texture and report its dimensions
    Texture {
        /// Base archive
        archive: PathBuf,

        /// Archive-internal name of the texture
        file: String,

        /// Patch archives layered over the base, in load order
        #[arg(short, long)]
        patch: Vec<PathBuf>,

        /// Write the decoded RGBA8 pixels to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Info { archive } => commands::info::run(&archive),
        Command::List { archive } => commands::list::run(&archive),
        Command::Extract {
            archive,
            files,
            patch,
            output,
        } => commands::extract::run(&archive, &patch, &files, &output),
        Command::Hash { name } => commands::hash::run(&name),
        Command::Source { archive, file } => commands::source::run(&archive, &file),
        Command::Texture {
            archive,
            file,
            patch,
            output,
        } => commands::texture::run(&archive, &patch, &file, output.as_deref()),
    }
}
