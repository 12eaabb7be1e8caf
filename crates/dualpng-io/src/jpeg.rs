//! JPEG decoding via `jpeg-decoder`.

use crate::{IoError, IoResult};
use dualpng_core::Image;
use std::io::Cursor;

/// Decodes JPEG bytes into opaque RGBA.
///
/// Grayscale, 16-bit grayscale and CMYK sources are converted to RGB.
pub fn decode(data: &[u8]) -> IoResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(data));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let rgba: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        // big-endian samples, keep the high byte
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l| [l[0], l[0], l[0], 255])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - f32::from(cmyk[3]) / 255.0;
                let ch = |c: u8| ((1.0 - f32::from(c) / 255.0) * k * 255.0).round() as u8;
                [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2]), 255]
            })
            .collect(),
    };

    Image::from_rgba(u32::from(info.width), u32::from(info.height), rgba)
        .map_err(|e| IoError::DecodeError(e.to_string()))
}
