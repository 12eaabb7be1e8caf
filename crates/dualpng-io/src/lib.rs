//! # dualpng-io
//!
//! Decoding of uploaded images and PNG encoding with an optional gAMA
//! chunk.
//!
//! | Format | Decode | Encode | Feature |
//! |--------|--------|--------|---------|
//! | PNG    | Yes    | Yes (RGBA8, gAMA) | always |
//! | JPEG   | Yes    | No     | `jpeg` (default) |
//! | GIF    | Yes (first frame) | No | `gif` (default) |
//!
//! Format is chosen by content sniffing, never by file name, so an upload
//! called `photo.png` holding JPEG data still decodes.
//!
//! ```rust
//! use dualpng_core::Image;
//!
//! let image = Image::filled(4, 4, [255, 255, 255, 255]);
//! let mut png = Vec::new();
//! dualpng_io::encode(&mut png, &image, 2300).unwrap();
//! assert_eq!(dualpng_io::read_gamma(&png).unwrap(), Some(2300));
//! assert_eq!(dualpng_io::decode(&png).unwrap(), image);
//! ```

#![warn(missing_docs)]

mod detect;
mod error;
pub mod png;

#[cfg(feature = "gif")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};

use dualpng_core::Image;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Decodes PNG, JPEG or GIF bytes into an RGBA image.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] for unrecognized bytes (or a format
/// whose feature is disabled), [`IoError::DecodeError`] for corrupt data.
pub fn decode(data: &[u8]) -> IoResult<Image> {
    let format = Format::from_bytes(data);
    debug!(%format, bytes = data.len(), "decoding image");
    match format {
        Format::Png => png::decode(data),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::decode(data),

        #[cfg(feature = "gif")]
        Format::Gif => gif::decode(data),

        other => Err(IoError::UnsupportedFormat(format!(
            "{other} ({} bytes)",
            data.len()
        ))),
    }
}

/// Encodes `image` as PNG with a gAMA chunk holding `gamma`
/// (file gamma × 100000).
pub fn encode<W: Write>(writer: W, image: &Image, gamma: u32) -> IoResult<()> {
    png::encode(writer, image, Some(gamma))
}

/// Encodes `image` as PNG without any gamma information.
pub fn encode_plain<W: Write>(writer: W, image: &Image) -> IoResult<()> {
    png::encode(writer, image, None)
}

/// Reads the gAMA value of PNG bytes; `None` when the chunk is absent.
///
/// # Errors
///
/// [`IoError::UnsupportedFormat`] if `data` is not a PNG.
pub fn read_gamma(data: &[u8]) -> IoResult<Option<u32>> {
    match Format::from_bytes(data) {
        Format::Png => png::read_gamma(data),
        other => Err(IoError::UnsupportedFormat(format!(
            "gamma is only stored in png, got {other}"
        ))),
    }
}

/// Reads and decodes an image file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading image");
    let data = fs::read(path)?;
    decode(&data)
}

/// Writes `image` as PNG to `path`, tagged with `gamma` when given.
pub fn write<P: AsRef<Path>>(path: P, image: &Image, gamma: Option<u32>) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?gamma, "writing png");
    let mut writer = BufWriter::new(File::create(path)?);
    png::encode(&mut writer, image, gamma)?;
    writer.flush()?;
    Ok(())
}
