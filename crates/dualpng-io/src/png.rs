//! PNG decoding and gAMA-tagged encoding.
//!
//! Output is always 8-bit RGBA. The gAMA chunk stores the file gamma
//! scaled by 100000; a value of 2300 therefore means a file gamma of
//! 0.023, which gamma-aware viewers raise every sample to an exponent of
//! roughly `1 / (0.023 * 2.2)` before display.

use crate::{IoError, IoResult};
use dualpng_core::Image;
use std::io::{Cursor, Write};
use tracing::trace;

/// Decodes PNG bytes into RGBA.
///
/// Palette, grayscale, 16-bit and tRNS inputs are all normalized to eight
/// bits per channel first.
pub fn decode(data: &[u8]) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().map_err(decode_err)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader.next_frame(&mut buf).map_err(decode_err)?;
    buf.truncate(info.buffer_size());

    trace!(
        width = info.width,
        height = info.height,
        color = ?info.color_type,
        "png frame decoded"
    );

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        other => {
            return Err(IoError::DecodeError(format!(
                "unexpected color type after normalization: {other:?}"
            )));
        }
    };

    Image::from_rgba(info.width, info.height, rgba).map_err(|e| IoError::DecodeError(e.to_string()))
}

/// Reads the gAMA chunk, if any, as the scaled integer stored in the file.
pub fn read_gamma(data: &[u8]) -> IoResult<Option<u32>> {
    let reader = png::Decoder::new(Cursor::new(data))
        .read_info()
        .map_err(decode_err)?;
    Ok(reader.info().gama_chunk.map(|g| g.into_scaled()))
}

/// Encodes `image` as 8-bit RGBA PNG.
///
/// With `Some(gamma)` a gAMA chunk holding that scaled value is written;
/// with `None` the file carries no gamma information at all.
pub fn encode<W: Write>(writer: W, image: &Image, gamma: Option<u32>) -> IoResult<()> {
    if image.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot encode {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    if let Some(g) = gamma {
        encoder.set_source_gamma(png::ScaledFloat::from_scaled(g));
    }

    let mut png_writer = encoder.write_header().map_err(encode_err)?;
    png_writer.write_image_data(image.as_raw()).map_err(encode_err)?;
    png_writer.finish().map_err(encode_err)?;
    trace!(width = image.width(), height = image.height(), ?gamma, "png encoded");
    Ok(())
}

fn decode_err(e: png::DecodingError) -> IoError {
    match e {
        png::DecodingError::IoError(io) if io.kind() != std::io::ErrorKind::UnexpectedEof => {
            IoError::Io(io)
        }
        other => IoError::DecodeError(other.to_string()),
    }
}

fn encode_err(e: png::EncodingError) -> IoError {
    match e {
        png::EncodingError::IoError(io) => IoError::Io(io),
        other => IoError::EncodeError(other.to_string()),
    }
}
