//! `lgc extract` - pull one layer out as a PNG

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use lgc::ColorModel;

#[derive(Args)]
pub struct ExtractArgs {
    /// Container file to read
    pub file: PathBuf,

    /// Layer index, 0 is the bottom layer
    #[arg(short = 'n', long)]
    pub layer: u32,

    /// Output PNG path
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let layer = lgc::read_layer(&args.file, args.layer)
        .with_context(|| format!("failed to read layer {} of {}", args.layer, args.file.display()))?;

    let width = layer.width as u32;
    let height = layer.height as u32;
    match (layer.format.bytes_per_pixel, layer.format.color_model) {
        (1, ColorModel::Gray) => image::GrayImage::from_raw(width, height, layer.data)
            .context("layer buffer does not match its dimensions")?
            .save(&args.output)?,
        (3, ColorModel::Rgb) => image::RgbImage::from_raw(width, height, layer.data)
            .context("layer buffer does not match its dimensions")?
            .save(&args.output)?,
        (4, ColorModel::Rgb) => image::RgbaImage::from_raw(width, height, layer.data)
            .context("layer buffer does not match its dimensions")?
            .save(&args.output)?,
        (bpp, model) => bail!("cannot export {}-byte {} layers as PNG", bpp, model),
    }

    println!(
        "extracted layer {} ({}x{}) to {}",
        args.layer,
        width,
        height,
        args.output.display()
    );
    Ok(())
}
