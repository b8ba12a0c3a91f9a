//! Layered Graphics Container (LGC) codec
//!
//! LGC packs multiple raster layers into one seekable binary file with
//! random access by layer index and in-place append. Each layer carries
//! its own dimensions, placement offset, pixel format and (optionally
//! zlib-compressed) pixel body, so a file can mix e.g. a full-size
//! background with small compressed sprite layers.
//!
//! # File Structure
//!
//! ```text
//! offset 0x00: opaque header block (32 bytes, caller-defined, never interpreted)
//! offset 0x20: magic (u32, 0x100006ef)
//! offset 0x24: layer count (u32)
//! offset 0x28: layer records, back-to-back, no padding
//!
//! Layer record:
//!   width    u16
//!   height   u16
//!   x        i32
//!   y        i32
//!   format   u8   (bits 0-1: bytes/pixel - 1; bits 2-4: color model; bit 6: compressed)
//!   flags    i32  (opaque, caller-defined)
//!   length   u32  (byte count of the body that follows)
//!   body     `length` bytes (raw pixels, or a zlib stream of them)
//! ```
//!
//! All multi-byte fields use the host's native byte order. Files are
//! therefore not portable between platforms of differing endianness;
//! this is an accepted constraint of the format, not something the
//! codec papers over.
//!
//! # Usage
//!
//! ```
//! use std::io::Cursor;
//! use lgc::{ColorModel, Image, Layer, PixelFormat};
//!
//! let mut image = Image::new();
//! image.push_layer(&Layer {
//!     width: 4,
//!     height: 4,
//!     x: 0,
//!     y: 0,
//!     format: PixelFormat {
//!         bytes_per_pixel: 1,
//!         color_model: ColorModel::Gray,
//!         compressed: true,
//!     },
//!     flags: 0,
//!     data: vec![0x2a; 16],
//! });
//!
//! let mut stream = Cursor::new(Vec::new());
//! lgc::write_image_to(&mut stream, &image).unwrap();
//!
//! let decoded = lgc::read_image_from(&mut stream).unwrap();
//! assert_eq!(decoded.layers.len(), 1);
//! assert_eq!(decoded.layers[0].data, vec![0x2a; 16]);
//! ```
//!
//! # Stream ownership
//!
//! Every operation comes in two flavors: a path flavor (`read_image`,
//! `write_image`, ...) where the codec opens and closes the file
//! itself, and a stream flavor (`read_image_from`, `write_image_to`,
//! ...) where the caller supplies an already-open `Read + Seek` /
//! `Write + Seek` handle. Stream flavors rewind the handle to the
//! start on completion and never close it, so several operations can
//! share one handle. [`append_layer`] exists only in the path flavor:
//! it seeks to the end and then back into the header, which assumes
//! exclusive ownership of the stream position for the whole call.

mod decode;
mod encode;
mod error;
mod format;
mod image;

pub use decode::{
    check_head, read_image, read_image_from, read_image_head, read_image_head_from, read_layer,
    read_layer_from, read_layer_head, read_layer_head_from,
};
pub use encode::{
    append_layer, write_image, write_image_head, write_image_head_to, write_image_to,
};
pub use error::LgcError;
pub use format::{ColorModel, PixelFormat};
pub use image::{Image, ImageHead, Layer, LayerHead};

/// Magic number at [`BASE_OFFSET`], identifies the format.
pub const MAGIC: u32 = 0x100006ef;

/// Size of the opaque header block preceding the magic.
pub const BASE_OFFSET: usize = 0x20;

/// Fixed layer record prefix before the length field:
/// width + height + x + y + format + flags.
pub const LAYER_HEAD_LEN: usize = 2 + 2 + 4 + 4 + 1 + 4;

/// zlib compression level for layer bodies.
pub(crate) const COMPRESSION_LEVEL: u32 = 9;
