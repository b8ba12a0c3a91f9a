//! `lgc append` - add a source image to an existing container in place

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::convert::load_layer;

#[derive(Args)]
pub struct AppendArgs {
    /// Container file to grow
    pub file: PathBuf,

    /// Source image (png/jpeg) for the new top layer
    pub input: PathBuf,

    /// Store the new layer's body uncompressed
    #[arg(long)]
    pub store: bool,
}

pub fn run(args: AppendArgs) -> Result<()> {
    let layer = load_layer(&args.input, !args.store)?;
    lgc::append_layer(&args.file, &layer)
        .with_context(|| format!("failed to append to {}", args.file.display()))?;

    println!(
        "appended {} to {}",
        args.input.display(),
        args.file.display()
    );
    Ok(())
}
