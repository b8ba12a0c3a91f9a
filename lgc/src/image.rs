//! Container and layer entity model
//!
//! An [`Image`] owns an ordered sequence of [`Layer`]s; insertion
//! order is on-disk order is compositing order. Each layer exclusively
//! owns its pixel buffer, which always holds *uncompressed* bytes -
//! compression exists only on the wire.

use crate::format::PixelFormat;
use crate::BASE_OFFSET;

/// A whole decoded container: opaque header block plus layer stack.
///
/// The magic number is not stored; a constructed `Image` is always
/// valid to encode, and the decoder rejects bad magic before building
/// one. The on-disk layer count equals `layers.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Opaque 32-byte header block. Caller-defined content, written and
    /// read back verbatim, never interpreted by the codec.
    pub header: [u8; BASE_OFFSET],
    /// Layer stack, bottom first.
    pub layers: Vec<Layer>,
}

impl Image {
    /// Create an empty container with a zeroed header block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer count as it would appear on disk.
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// Append a deep copy of `layer` to the stack.
    ///
    /// The new layer gets its own pixel buffer; the source stays with
    /// the caller untouched.
    pub fn push_layer(&mut self, layer: &Layer) {
        self.layers.push(layer.clone());
    }

    /// Take the topmost layer out of the stack.
    ///
    /// Ownership of the pixel buffer moves to the returned layer; no
    /// copy is made. Returns `None` when the stack is empty.
    pub fn pop_layer(&mut self) -> Option<Layer> {
        self.layers.pop()
    }
}

/// One raster layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// Horizontal placement offset, for consumers compositing layers.
    pub x: i32,
    /// Vertical placement offset.
    pub y: i32,
    pub format: PixelFormat,
    /// Opaque caller-defined word, carried through the file untouched.
    pub flags: i32,
    /// Uncompressed pixel bytes, row-major,
    /// `width * height * bytes_per_pixel` of them.
    pub data: Vec<u8>,
}

impl Layer {
    /// Uncompressed body size implied by the dimensions and format.
    pub fn body_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel as usize
    }
}

/// Fixed fields of one layer record, without the pixel body.
///
/// This is what header-only layer reads return, and what the
/// random-access reader uses to hop over records it does not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerHead {
    pub width: u16,
    pub height: u16,
    pub x: i32,
    pub y: i32,
    pub format: PixelFormat,
    pub flags: i32,
    /// Declared on-disk body length: the compressed size when the
    /// compressed bit is set, the uncompressed size otherwise.
    pub data_len: u32,
}

impl LayerHead {
    /// Uncompressed body size implied by the dimensions and format.
    pub fn body_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel as usize
    }
}

/// Container head without the layer records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHead {
    /// Opaque 32-byte header block, verbatim.
    pub header: [u8; BASE_OFFSET],
    /// Layer count as stored in the file.
    pub layer_count: u32,
}
