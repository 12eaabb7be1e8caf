//! Format detection from magic bytes and file extensions.

use crate::IoResult;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Input formats the decoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG.
    Png,
    /// JPEG (baseline or progressive).
    Jpeg,
    /// GIF87a / GIF89a, first frame only.
    Gif,
    /// Anything else.
    Unknown,
}

impl Format {
    /// Detects format from leading bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&PNG_MAGIC) {
            Format::Png
        } else if bytes.starts_with(&JPEG_MAGIC) {
            Format::Jpeg
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Format::Gif
        } else {
            Format::Unknown
        }
    }

    /// Detects format from the file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Format::Png,
            Some("jpg") | Some("jpeg") => Format::Jpeg,
            Some("gif") => Format::Gif,
            _ => Format::Unknown,
        }
    }

    /// Detects format of a file: magic bytes first, extension as fallback.
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let mut header = [0u8; 8];
        let n = File::open(path)?.read(&mut header)?;
        match Self::from_bytes(&header[..n]) {
            Format::Unknown => Ok(Self::from_extension(path)),
            format => Ok(format),
        }
    }

    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpeg",
            Format::Gif => "gif",
            Format::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(Format::from_bytes(&PNG_MAGIC), Format::Png);
        assert_eq!(Format::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Format::Jpeg);
        assert_eq!(Format::from_bytes(b"GIF89a\x01\x00"), Format::Gif);
        assert_eq!(Format::from_bytes(b"GIF87a"), Format::Gif);
        assert_eq!(Format::from_bytes(b"BM\x00\x00"), Format::Unknown);
        assert_eq!(Format::from_bytes(&[]), Format::Unknown);
        // truncated PNG signature
        assert_eq!(Format::from_bytes(&PNG_MAGIC[..5]), Format::Unknown);
    }

    #[test]
    fn test_extension() {
        assert_eq!(Format::from_extension("a/b/photo.JPG"), Format::Jpeg);
        assert_eq!(Format::from_extension("x.jpeg"), Format::Jpeg);
        assert_eq!(Format::from_extension("anim.gif"), Format::Gif);
        assert_eq!(Format::from_extension("out.png"), Format::Png);
        assert_eq!(Format::from_extension("noext"), Format::Unknown);
    }
}
