//! `lgc info` - print the layer table of a container

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Container file to inspect
    pub file: PathBuf,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let mut stream = File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    // One handle for everything: the head read and each per-layer head
    // read rewind it behind themselves.
    let head = lgc::read_image_head_from(&mut stream)
        .with_context(|| format!("{} is not a readable LGC container", args.file.display()))?;

    println!("{}: {} layer(s)", args.file.display(), head.layer_count);
    if head.layer_count == 0 {
        return Ok(());
    }

    println!(
        "{:>5}  {:>5}  {:>6}  {:>6}  {:>6}  {:>5}  {:>10}  {:>10}",
        "layer", "width", "height", "x", "y", "model", "bits/pixel", "disk bytes"
    );
    for n in 0..head.layer_count {
        let layer = lgc::read_layer_head_from(&mut stream, n)
            .with_context(|| format!("failed to read head of layer {n}"))?;
        println!(
            "{:>5}  {:>5}  {:>6}  {:>6}  {:>6}  {:>5}  {:>10}  {:>10}",
            n,
            layer.width,
            layer.height,
            layer.x,
            layer.y,
            layer.format.color_model,
            layer.format.bytes_per_pixel * 8,
            format!(
                "{}{}",
                layer.data_len,
                if layer.format.compressed { "z" } else { "" }
            ),
        );
    }
    Ok(())
}
