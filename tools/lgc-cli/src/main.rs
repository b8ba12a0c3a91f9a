//! LGC CLI - Inspect and build Layered Graphics Containers
//!
//! # Commands
//!
//! - `lgc info` - Print the layer table of a container
//! - `lgc pack` - Bundle source images into a new container
//! - `lgc extract` - Pull one layer out as a PNG
//! - `lgc append` - Add a source image to an existing container in place
//!
//! # Usage
//!
//! ```bash
//! # Pack two sprites into one container, zlib-compressed
//! lgc pack background.png sprite.png -o scene.lgc
//!
//! # See what ended up inside
//! lgc info scene.lgc
//!
//! # Add another layer without rewriting the file
//! lgc append scene.lgc overlay.png
//!
//! # Get layer 1 back out
//! lgc extract scene.lgc --layer 1 -o sprite_again.png
//! ```

mod append;
mod convert;
mod extract;
mod info;
mod pack;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// LGC CLI - Inspect and build Layered Graphics Containers
#[derive(Parser)]
#[command(name = "lgc")]
#[command(about = "Inspect and build Layered Graphics Containers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layer table of a container
    Info(info::InfoArgs),

    /// Bundle source images into a new container
    Pack(pack::PackArgs),

    /// Pull one layer out as a PNG
    Extract(extract::ExtractArgs),

    /// Add a source image to an existing container in place
    Append(append::AppendArgs),
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Info(args) => info::run(args),
        Commands::Pack(args) => pack::run(args),
        Commands::Extract(args) => extract::run(args),
        Commands::Append(args) => append::run(args),
    }
}
