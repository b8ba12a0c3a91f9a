//! Container and layer decoding
//!
//! Three entry levels:
//!
//! - [`check_head`] peeks magic and layer count, leaving the stream
//!   rewound - a cheap "is this an LGC file" probe.
//! - [`read_image`] / [`read_image_head`] decode a whole container,
//!   with or without layer bodies.
//! - [`read_layer`] / [`read_layer_head`] pull a single layer out by
//!   index, hopping over preceding records via their declared lengths
//!   instead of decoding them.
//!
//! Path flavors open and close the file; `_from` stream flavors take a
//! caller-owned handle and rewind it on completion, success or not.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use flate2::read::ZlibDecoder;

use crate::error::LgcError;
use crate::format::PixelFormat;
use crate::image::{Image, ImageHead, Layer, LayerHead};
use crate::{BASE_OFFSET, LAYER_HEAD_LEN, MAGIC};

fn read_exact_field<R: Read>(
    r: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), LgcError> {
    r.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => LgcError::Truncated { what },
        _ => LgcError::Io(e),
    })
}

fn read_u8<R: Read>(r: &mut R, what: &'static str) -> Result<u8, LgcError> {
    let mut buf = [0u8; 1];
    read_exact_field(r, &mut buf, what)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(r: &mut R, what: &'static str) -> Result<u16, LgcError> {
    let mut buf = [0u8; 2];
    read_exact_field(r, &mut buf, what)?;
    Ok(u16::from_ne_bytes(buf))
}

fn read_u32<R: Read>(r: &mut R, what: &'static str) -> Result<u32, LgcError> {
    let mut buf = [0u8; 4];
    read_exact_field(r, &mut buf, what)?;
    Ok(u32::from_ne_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R, what: &'static str) -> Result<i32, LgcError> {
    let mut buf = [0u8; 4];
    read_exact_field(r, &mut buf, what)?;
    Ok(i32::from_ne_bytes(buf))
}

/// Check the magic number and fetch the layer count without consuming
/// the stream: the handle is rewound to the start on every path out,
/// including failures.
pub fn check_head<R: Read + Seek>(r: &mut R) -> Result<u32, LgcError> {
    r.seek(SeekFrom::Start(BASE_OFFSET as u64))?;
    let result: Result<(u32, u32), LgcError> = (|| {
        let magic = read_u32(r, "magic")?;
        let count = read_u32(r, "layer count")?;
        Ok((magic, count))
    })();
    r.rewind()?;
    let (magic, count) = result?;
    if magic != MAGIC {
        return Err(LgcError::BadMagic);
    }
    Ok(count)
}

/// Layer record fields as read off the wire, format byte still packed.
///
/// Keeping the raw byte around lets the whole-image decode loop skip a
/// record with an unknown color model: the declared length is known
/// even though the format cannot be represented as a [`PixelFormat`].
struct RawLayerHead {
    width: u16,
    height: u16,
    x: i32,
    y: i32,
    format_byte: u8,
    flags: i32,
    data_len: u32,
}

impl RawLayerHead {
    fn typed(&self) -> Result<LayerHead, LgcError> {
        Ok(LayerHead {
            width: self.width,
            height: self.height,
            x: self.x,
            y: self.y,
            format: PixelFormat::unpack(self.format_byte)?,
            flags: self.flags,
            data_len: self.data_len,
        })
    }
}

fn read_raw_layer_head<R: Read>(r: &mut R) -> Result<RawLayerHead, LgcError> {
    Ok(RawLayerHead {
        width: read_u16(r, "layer width")?,
        height: read_u16(r, "layer height")?,
        x: read_i32(r, "layer x")?,
        y: read_i32(r, "layer y")?,
        format_byte: read_u8(r, "layer format")?,
        flags: read_i32(r, "layer flags")?,
        data_len: read_u32(r, "layer length")?,
    })
}

/// Read and decode one layer body, the stream positioned right after
/// the record's fixed fields.
///
/// Always consumes exactly `head.data_len` bytes, so on an inflate
/// failure the stream is left at the next record boundary.
fn read_layer_body<R: Read>(r: &mut R, head: &LayerHead, index: u32) -> Result<Layer, LgcError> {
    let mut body = vec![0u8; head.data_len as usize];
    read_exact_field(r, &mut body, "layer body")?;

    let data = if head.format.compressed {
        let expected = head.body_len();
        let mut pixels = Vec::with_capacity(expected);
        ZlibDecoder::new(body.as_slice())
            .read_to_end(&mut pixels)
            .map_err(|e| LgcError::Corrupt {
                index,
                detail: e.to_string(),
            })?;
        if pixels.len() != expected {
            return Err(LgcError::Corrupt {
                index,
                detail: format!("inflated to {} bytes, expected {}", pixels.len(), expected),
            });
        }
        pixels
    } else {
        body
    };

    Ok(Layer {
        width: head.width,
        height: head.height,
        x: head.x,
        y: head.y,
        format: head.format,
        flags: head.flags,
        data,
    })
}

/// Discard `len` body bytes of a record that will not be kept.
fn skip_body<R: Read>(r: &mut R, len: u32) -> Result<(), LgcError> {
    let skipped = std::io::copy(&mut r.by_ref().take(len as u64), &mut std::io::sink())?;
    if skipped != len as u64 {
        return Err(LgcError::Truncated { what: "layer body" });
    }
    Ok(())
}

fn read_image_head_inner<R: Read>(r: &mut R) -> Result<ImageHead, LgcError> {
    let mut header = [0u8; BASE_OFFSET];
    read_exact_field(r, &mut header, "container header")?;
    if read_u32(r, "magic")? != MAGIC {
        return Err(LgcError::BadMagic);
    }
    let layer_count = read_u32(r, "layer count")?;
    Ok(ImageHead {
        header,
        layer_count,
    })
}

fn read_image_inner<R: Read>(r: &mut R) -> Result<Image, LgcError> {
    let head = read_image_head_inner(r)?;
    let mut layers = Vec::with_capacity(head.layer_count.min(1024) as usize);

    // A truncated record means nothing after it can be trusted, so the
    // loop stops there with whatever decoded cleanly. A record whose
    // body merely fails to inflate, or whose format byte carries an
    // unassigned color model, is dropped and the loop continues at the
    // next record boundary using the declared length.
    for index in 0..head.layer_count {
        let raw = match read_raw_layer_head(r) {
            Ok(raw) => raw,
            Err(e @ LgcError::Truncated { .. }) => {
                log::warn!(
                    "layer {index}: {e}; keeping {} of {} layers",
                    layers.len(),
                    head.layer_count
                );
                break;
            }
            Err(e) => return Err(e),
        };

        let typed = match raw.typed() {
            Ok(typed) => typed,
            Err(e) => {
                log::warn!("layer {index}: {e}; skipping record");
                match skip_body(r, raw.data_len) {
                    Ok(()) => continue,
                    Err(LgcError::Truncated { .. }) => break,
                    Err(e) => return Err(e),
                }
            }
        };

        match read_layer_body(r, &typed, index) {
            Ok(layer) => layers.push(layer),
            Err(e @ LgcError::Corrupt { .. }) => {
                log::warn!("{e}; dropping layer");
            }
            Err(e @ LgcError::Truncated { .. }) => {
                log::warn!(
                    "layer {index}: {e}; keeping {} of {} layers",
                    layers.len(),
                    head.layer_count
                );
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Image {
        header: head.header,
        layers,
    })
}

/// Decode a whole container from a file.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Image, LgcError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_image_inner(&mut reader)
}

/// Decode a whole container from a caller-owned stream positioned at
/// its start. The stream is rewound on completion, never closed.
pub fn read_image_from<R: Read + Seek>(r: &mut R) -> Result<Image, LgcError> {
    let result = read_image_inner(r);
    let rewound = r.rewind();
    let image = result?;
    rewound?;
    Ok(image)
}

/// Decode only the container head from a file: opaque header block and
/// layer count. No layer data is read or allocated.
pub fn read_image_head<P: AsRef<Path>>(path: P) -> Result<ImageHead, LgcError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_image_head_inner(&mut reader)
}

/// Stream flavor of [`read_image_head`]; rewinds on completion.
pub fn read_image_head_from<R: Read + Seek>(r: &mut R) -> Result<ImageHead, LgcError> {
    let result = read_image_head_inner(r);
    let rewound = r.rewind();
    let head = result?;
    rewound?;
    Ok(head)
}

/// Position the stream at the start of record `n`, hopping over the
/// preceding records via their declared lengths. Cost is proportional
/// to the skipped records' on-disk sizes, not to a full decode.
fn seek_to_layer<R: Read + Seek>(r: &mut R, n: u32) -> Result<(), LgcError> {
    let count = check_head(r)?;
    if n >= count {
        return Err(LgcError::LayerOutOfRange { index: n, count });
    }

    r.seek(SeekFrom::Start((BASE_OFFSET + 8) as u64))?;
    for _ in 0..n {
        r.seek(SeekFrom::Current(LAYER_HEAD_LEN as i64))?;
        let len = read_u32(r, "layer length")?;
        r.seek(SeekFrom::Current(len as i64))?;
    }
    Ok(())
}

fn read_layer_at<R: Read + Seek>(r: &mut R, n: u32) -> Result<Layer, LgcError> {
    seek_to_layer(r, n)?;
    let head = read_raw_layer_head(r)?.typed()?;
    read_layer_body(r, &head, n)
}

fn read_layer_head_at<R: Read + Seek>(r: &mut R, n: u32) -> Result<LayerHead, LgcError> {
    seek_to_layer(r, n)?;
    read_raw_layer_head(r)?.typed()
}

/// Extract a single layer by index from a file without decoding the
/// rest of the container.
pub fn read_layer<P: AsRef<Path>>(path: P, n: u32) -> Result<Layer, LgcError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_layer_at(&mut reader, n)
}

/// Stream flavor of [`read_layer`]; rewinds on completion.
pub fn read_layer_from<R: Read + Seek>(r: &mut R, n: u32) -> Result<Layer, LgcError> {
    let result = read_layer_at(r, n);
    let rewound = r.rewind();
    let layer = result?;
    rewound?;
    Ok(layer)
}

/// Read only the fixed fields of layer `n`: dimensions, placement,
/// format, flags and declared body length. The body is not touched.
pub fn read_layer_head<P: AsRef<Path>>(path: P, n: u32) -> Result<LayerHead, LgcError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_layer_head_at(&mut reader, n)
}

/// Stream flavor of [`read_layer_head`]; rewinds on completion.
pub fn read_layer_head_from<R: Read + Seek>(r: &mut R, n: u32) -> Result<LayerHead, LgcError> {
    let result = read_layer_head_at(r, n);
    let rewound = r.rewind();
    let head = result?;
    rewound?;
    Ok(head)
}
