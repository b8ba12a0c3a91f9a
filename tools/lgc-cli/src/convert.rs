//! Source image to layer conversion
//!
//! The codec never decodes PNG/JPEG itself; this is the collaborator
//! that turns a source image into a raw pixel buffer plus format. Only
//! the pixel layouts LGC can represent one-to-one are accepted:
//! 8-bit gray, 8-bit RGB and 8-bit RGBA.

use std::path::Path;

use anyhow::{bail, Context, Result};
use lgc::{ColorModel, Layer, PixelFormat};

/// Decode a source image file into one LGC layer at (0, 0).
pub fn load_layer(path: &Path, compressed: bool) -> Result<Layer> {
    let source =
        image::open(path).with_context(|| format!("failed to load {}", path.display()))?;

    let width = u16::try_from(source.width())
        .with_context(|| format!("{}: wider than 65535 pixels", path.display()))?;
    let height = u16::try_from(source.height())
        .with_context(|| format!("{}: taller than 65535 pixels", path.display()))?;

    let (bytes_per_pixel, color_model, data) = match source {
        image::DynamicImage::ImageLuma8(buf) => (1, ColorModel::Gray, buf.into_raw()),
        image::DynamicImage::ImageRgb8(buf) => (3, ColorModel::Rgb, buf.into_raw()),
        image::DynamicImage::ImageRgba8(buf) => (4, ColorModel::Rgb, buf.into_raw()),
        other => bail!(
            "{}: unsupported source pixel format {:?}",
            path.display(),
            other.color()
        ),
    };

    Ok(Layer {
        width,
        height,
        x: 0,
        y: 0,
        format: PixelFormat {
            bytes_per_pixel,
            color_model,
            compressed,
        },
        flags: 0,
        data,
    })
}
