//! Packed format byte <-> typed pixel format
//!
//! On the wire a layer's pixel format is a single packed byte:
//!
//! ```text
//!  7               0
//!  -----------------
//!  | | | | | | | | |
//!  -----------------
//!   | ||     | |   |
//!   | ||-----| |---|
//!   | |   |      |
//!   | |   |      +---- bytes per pixel - 1
//!   | |   +----------- color model
//!   | +--------------- compressed?
//!   +----------------- unused
//! ```
//!
//! In memory it is the [`PixelFormat`] struct; [`PixelFormat::pack`]
//! and [`PixelFormat::unpack`] convert between the two without losing
//! wire compatibility.

use core::fmt;

use crate::error::LgcError;

/// Color model tag stored in bits 2-4 of the format byte.
///
/// The codec never interprets pixel values; the tag only tells
/// consumers how to read the decoded bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorModel {
    #[default]
    Gray = 0,
    Rgb = 1,
    Cmyk = 2,
    Hsv = 3,
    Hls = 4,
    Lab = 5,
}

impl ColorModel {
    /// Decode a 3-bit wire tag. Tags 6 and 7 are unassigned.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(ColorModel::Gray),
            1 => Some(ColorModel::Rgb),
            2 => Some(ColorModel::Cmyk),
            3 => Some(ColorModel::Hsv),
            4 => Some(ColorModel::Hls),
            5 => Some(ColorModel::Lab),
            _ => None,
        }
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorModel::Gray => "gray",
            ColorModel::Rgb => "rgb",
            ColorModel::Cmyk => "cmyk",
            ColorModel::Hsv => "hsv",
            ColorModel::Hls => "hls",
            ColorModel::Lab => "lab",
        };
        f.write_str(name)
    }
}

/// Unpacked pixel format of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    /// Bytes per pixel, 1 through 4.
    pub bytes_per_pixel: u8,
    pub color_model: ColorModel,
    /// Whether the on-disk body is a zlib stream instead of raw pixels.
    pub compressed: bool,
}

impl PixelFormat {
    /// Pack into the wire format byte.
    pub fn pack(&self) -> u8 {
        debug_assert!((1..=4).contains(&self.bytes_per_pixel));
        let mut byte = (self.bytes_per_pixel.wrapping_sub(1)) & 0x03;
        byte |= (self.color_model as u8) << 2;
        if self.compressed {
            byte |= 0x40;
        }
        byte
    }

    /// Unpack a wire format byte.
    ///
    /// Fails with [`LgcError::BadFormat`] when the color model tag is
    /// one of the two unassigned values.
    pub fn unpack(byte: u8) -> Result<Self, LgcError> {
        let color_model =
            ColorModel::from_tag((byte >> 2) & 0x07).ok_or(LgcError::BadFormat { byte })?;
        Ok(PixelFormat {
            bytes_per_pixel: (byte & 0x03) + 1,
            color_model,
            compressed: byte & 0x40 != 0,
        })
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat {
            bytes_per_pixel: 1,
            color_model: ColorModel::Gray,
            compressed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_all_models_and_depths() {
        let models = [
            ColorModel::Gray,
            ColorModel::Rgb,
            ColorModel::Cmyk,
            ColorModel::Hsv,
            ColorModel::Hls,
            ColorModel::Lab,
        ];
        for model in models {
            for bpp in 1..=4u8 {
                for compressed in [false, true] {
                    let format = PixelFormat {
                        bytes_per_pixel: bpp,
                        color_model: model,
                        compressed,
                    };
                    let unpacked = PixelFormat::unpack(format.pack()).unwrap();
                    assert_eq!(unpacked, format);
                }
            }
        }
    }

    #[test]
    fn test_wire_byte_layout() {
        // rgb, 3 bytes/pixel, compressed: 0b0100_0110
        let format = PixelFormat {
            bytes_per_pixel: 3,
            color_model: ColorModel::Rgb,
            compressed: true,
        };
        assert_eq!(format.pack(), 0x46);

        // gray, 1 byte/pixel, stored: all zero bits
        assert_eq!(PixelFormat::default().pack(), 0x00);
    }

    #[test]
    fn test_unassigned_model_tags_rejected() {
        for tag in [6u8, 7u8] {
            let byte = tag << 2;
            assert!(matches!(
                PixelFormat::unpack(byte),
                Err(LgcError::BadFormat { .. })
            ));
        }
    }

    #[test]
    fn test_unused_high_bit_ignored() {
        let unpacked = PixelFormat::unpack(0x80).unwrap();
        assert_eq!(unpacked, PixelFormat::default());
    }
}
