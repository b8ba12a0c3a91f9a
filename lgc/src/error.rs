//! LGC codec error types

/// Errors produced by LGC encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum LgcError {
    /// Magic number mismatch - the file is not an LGC container.
    #[error("not an LGC container (bad magic number)")]
    BadMagic,

    /// Short read or write at a fixed field or a declared-length body.
    #[error("unexpected end of stream at {what}")]
    Truncated { what: &'static str },

    /// Format byte carries an unknown color model tag.
    #[error("unknown color model in format byte 0x{byte:02x}")]
    BadFormat { byte: u8 },

    /// Requested layer index is not present in the container.
    #[error("layer {index} does not exist (container has {count} layers)")]
    LayerOutOfRange { index: u32, count: u32 },

    /// Layer body could not be inflated.
    #[error("layer {index} body is corrupt: {detail}")]
    Corrupt { index: u32, detail: String },

    /// Layer pixel buffer does not match `width * height * bytes_per_pixel`.
    #[error("layer buffer holds {actual} bytes, expected {expected}")]
    BadLayer { expected: usize, actual: usize },

    /// Underlying I/O failure (open, seek, or non-EOF read/write error).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
