//! Container and layer encoding
//!
//! [`write_image`] / [`write_image_head`] serialize a container to a
//! file, [`write_image_to`] / [`write_image_head_to`] to a
//! caller-owned stream (rewound on completion, never closed).
//! [`append_layer`] grows an existing file by one layer without
//! rewriting it: the new record goes at the end and the count field in
//! the header is patched in place.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::decode::check_head;
use crate::error::LgcError;
use crate::image::{Image, Layer};
use crate::{BASE_OFFSET, COMPRESSION_LEVEL, MAGIC};

fn write_field<W: Write>(w: &mut W, bytes: &[u8], what: &'static str) -> Result<(), LgcError> {
    w.write_all(bytes).map_err(|e| match e.kind() {
        ErrorKind::WriteZero => LgcError::Truncated { what },
        _ => LgcError::Io(e),
    })
}

/// Serialize one layer record: fixed fields, length, body.
///
/// When the compressed bit is set the body is deflated here and the
/// length field records the compressed size; otherwise the raw buffer
/// is written and the length equals the uncompressed size. Either way
/// the in-memory buffer must hold exactly
/// `width * height * bytes_per_pixel` bytes.
pub(crate) fn write_layer_record<W: Write>(w: &mut W, layer: &Layer) -> Result<(), LgcError> {
    let body_len = layer.body_len();
    if layer.data.len() != body_len {
        return Err(LgcError::BadLayer {
            expected: body_len,
            actual: layer.data.len(),
        });
    }

    let deflated;
    let body: &[u8] = if layer.format.compressed {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(body_len / 2 + 0x20),
            Compression::new(COMPRESSION_LEVEL),
        );
        encoder.write_all(&layer.data)?;
        deflated = encoder.finish()?;
        &deflated
    } else {
        &layer.data
    };

    write_field(w, &layer.width.to_ne_bytes(), "layer width")?;
    write_field(w, &layer.height.to_ne_bytes(), "layer height")?;
    write_field(w, &layer.x.to_ne_bytes(), "layer x")?;
    write_field(w, &layer.y.to_ne_bytes(), "layer y")?;
    write_field(w, &[layer.format.pack()], "layer format")?;
    write_field(w, &layer.flags.to_ne_bytes(), "layer flags")?;
    write_field(w, &(body.len() as u32).to_ne_bytes(), "layer length")?;
    write_field(w, body, "layer body")?;
    Ok(())
}

fn write_container_head<W: Write>(w: &mut W, image: &Image) -> Result<(), LgcError> {
    write_field(w, &image.header, "container header")?;
    write_field(w, &MAGIC.to_ne_bytes(), "magic")?;
    write_field(w, &image.layer_count().to_ne_bytes(), "layer count")?;
    Ok(())
}

fn write_image_inner<W: Write>(w: &mut W, image: &Image) -> Result<(), LgcError> {
    write_container_head(w, image)?;
    for layer in &image.layers {
        write_layer_record(w, layer)?;
    }
    Ok(())
}

/// Encode a whole container to a file, replacing any existing content.
pub fn write_image<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), LgcError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_image_inner(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encode a whole container to a caller-owned stream. The stream is
/// rewound before writing and again on completion, never closed.
pub fn write_image_to<W: Write + Seek>(w: &mut W, image: &Image) -> Result<(), LgcError> {
    w.rewind()?;
    let result = write_image_inner(w, image);
    let rewound = w.rewind();
    result?;
    rewound?;
    Ok(())
}

/// Write only the container head to a file: opaque header block,
/// magic and layer count, no layer records.
pub fn write_image_head<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), LgcError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_container_head(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Stream flavor of [`write_image_head`]; rewinds on completion.
pub fn write_image_head_to<W: Write + Seek>(w: &mut W, image: &Image) -> Result<(), LgcError> {
    w.rewind()?;
    let result = write_container_head(w, image);
    let rewound = w.rewind();
    result?;
    rewound?;
    Ok(())
}

/// Append one layer to an existing container file in place.
///
/// The file must already be a valid container. The record is written
/// at end-of-file and the layer count field is patched, so nothing
/// before the new record is rewritten. Path-only by design: the
/// seek-to-end-then-back dance assumes this call exclusively owns the
/// stream position, so no caller-supplied stream flavor exists.
pub fn append_layer<P: AsRef<Path>>(path: P, layer: &Layer) -> Result<(), LgcError> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    check_head(&mut file)?;

    file.seek(SeekFrom::End(0))?;
    write_layer_record(&mut file, layer)?;

    let count_pos = SeekFrom::Start((BASE_OFFSET + 4) as u64);
    file.seek(count_pos)?;
    let mut buf = [0u8; 4];
    file.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => LgcError::Truncated { what: "layer count" },
        _ => LgcError::Io(e),
    })?;
    let count = u32::from_ne_bytes(buf).wrapping_add(1);

    file.seek(count_pos)?;
    write_field(&mut file, &count.to_ne_bytes(), "layer count")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{read_image, read_image_from};
    use crate::format::{ColorModel, PixelFormat};
    use crate::LAYER_HEAD_LEN;
    use std::io::Cursor;

    fn gray_layer(fill: u8, compressed: bool) -> Layer {
        Layer {
            width: 4,
            height: 4,
            x: 1,
            y: -2,
            format: PixelFormat {
                bytes_per_pixel: 1,
                color_model: ColorModel::Gray,
                compressed,
            },
            flags: 7,
            data: vec![fill; 16],
        }
    }

    #[test]
    fn test_wire_layout_uncompressed() {
        let mut image = Image::new();
        image.header[0] = 0xde;
        image.push_layer(&gray_layer(0x2a, false));

        let mut stream = Cursor::new(Vec::new());
        write_image_to(&mut stream, &image).unwrap();
        let bytes = stream.into_inner();

        assert_eq!(bytes.len(), BASE_OFFSET + 8 + LAYER_HEAD_LEN + 4 + 16);
        assert_eq!(bytes[0], 0xde);
        assert_eq!(bytes[BASE_OFFSET..BASE_OFFSET + 4], MAGIC.to_ne_bytes());
        assert_eq!(bytes[BASE_OFFSET + 4..BASE_OFFSET + 8], 1u32.to_ne_bytes());

        let record = &bytes[BASE_OFFSET + 8..];
        assert_eq!(record[0..2], 4u16.to_ne_bytes());
        assert_eq!(record[2..4], 4u16.to_ne_bytes());
        assert_eq!(record[4..8], 1i32.to_ne_bytes());
        assert_eq!(record[8..12], (-2i32).to_ne_bytes());
        assert_eq!(record[12], 0x00); // gray, 1 byte/pixel, stored
        assert_eq!(record[13..17], 7i32.to_ne_bytes());
        assert_eq!(record[17..21], 16u32.to_ne_bytes());
        assert_eq!(&record[21..], &[0x2a; 16]);
    }

    #[test]
    fn test_compressed_length_field_matches_body() {
        let mut image = Image::new();
        image.push_layer(&gray_layer(0x2a, true));

        let mut stream = Cursor::new(Vec::new());
        write_image_to(&mut stream, &image).unwrap();
        let bytes = stream.into_inner();

        let len_off = BASE_OFFSET + 8 + LAYER_HEAD_LEN;
        let disk_len =
            u32::from_ne_bytes(bytes[len_off..len_off + 4].try_into().unwrap()) as usize;
        assert_eq!(bytes.len(), len_off + 4 + disk_len);
    }

    #[test]
    fn test_head_only_write() {
        let mut image = Image::new();
        image.push_layer(&gray_layer(0x2a, false));

        let mut stream = Cursor::new(Vec::new());
        write_image_head_to(&mut stream, &image).unwrap();
        let bytes = stream.into_inner();

        assert_eq!(bytes.len(), BASE_OFFSET + 8);
        assert_eq!(bytes[BASE_OFFSET + 4..BASE_OFFSET + 8], 1u32.to_ne_bytes());
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let mut layer = gray_layer(0, false);
        layer.data.truncate(3);
        let mut image = Image::new();
        image.layers.push(layer);

        let mut stream = Cursor::new(Vec::new());
        assert!(matches!(
            write_image_to(&mut stream, &image),
            Err(LgcError::BadLayer {
                expected: 16,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_append_grows_file_in_place() {
        let mut image = Image::new();
        image.push_layer(&gray_layer(0x01, false));
        image.push_layer(&gray_layer(0x02, true));

        let file = tempfile::NamedTempFile::new().unwrap();
        write_image(file.path(), &image).unwrap();
        let before = std::fs::read(file.path()).unwrap();

        append_layer(file.path(), &gray_layer(0x03, true)).unwrap();

        let after = std::fs::read(file.path()).unwrap();
        // Everything before the new record is unchanged except the
        // patched count field.
        assert_eq!(before[..BASE_OFFSET + 4], after[..BASE_OFFSET + 4]);
        assert_eq!(after[BASE_OFFSET + 4..BASE_OFFSET + 8], 3u32.to_ne_bytes());
        assert_eq!(before[BASE_OFFSET + 8..], after[BASE_OFFSET + 8..before.len()]);

        let decoded = read_image(file.path()).unwrap();
        assert_eq!(decoded.layer_count(), 3);
        assert_eq!(decoded.layers[0].data, vec![0x01; 16]);
        assert_eq!(decoded.layers[2].data, vec![0x03; 16]);
    }

    #[test]
    fn test_append_rejects_non_lgc_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), vec![0u8; 64]).unwrap();

        assert!(matches!(
            append_layer(file.path(), &gray_layer(0, false)),
            Err(LgcError::BadMagic)
        ));
    }

    #[test]
    fn test_path_roundtrip() {
        let mut image = Image::new();
        image.header[..4].copy_from_slice(b"meta");
        image.push_layer(&gray_layer(0x2a, true));

        let file = tempfile::NamedTempFile::new().unwrap();
        write_image(file.path(), &image).unwrap();
        assert_eq!(read_image(file.path()).unwrap(), image);
    }

    #[test]
    fn test_write_rewinds_caller_stream() {
        let mut image = Image::new();
        image.push_layer(&gray_layer(0x2a, false));

        let mut stream = Cursor::new(Vec::new());
        write_image_to(&mut stream, &image).unwrap();
        assert_eq!(stream.position(), 0);

        // Same handle readable straight after the write.
        let decoded = read_image_from(&mut stream).unwrap();
        assert_eq!(decoded, image);
    }
}
