//! `lgc pack` - bundle source images into a new container

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::convert::load_layer;

#[derive(Args)]
pub struct PackArgs {
    /// Source images (png/jpeg), bottom layer first
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output container path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Store layer bodies uncompressed
    #[arg(long)]
    pub store: bool,
}

pub fn run(args: PackArgs) -> Result<()> {
    let mut image = lgc::Image::new();
    for input in &args.inputs {
        let layer = load_layer(input, !args.store)?;
        image.push_layer(&layer);
    }

    lgc::write_image(&args.output, &image)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "packed {} layer(s) into {}",
        image.layer_count(),
        args.output.display()
    );
    Ok(())
}
