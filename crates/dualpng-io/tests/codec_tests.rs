//! File-level codec checks.

use dualpng_core::Image;
use dualpng_io::{decode, encode, encode_plain, read, read_gamma, write, Format, IoError};
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> Image {
    Image::from_fn(width, height, |x, y| [(x * 9) as u8, (y * 11) as u8, 128, 255])
}

#[test]
fn gamma_survives_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merged.png");
    let image = gradient(20, 12);

    write(&path, &image, Some(2300)).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(Format::from_bytes(&bytes), Format::Png);
    assert_eq!(read_gamma(&bytes).unwrap(), Some(2300));
    assert_eq!(read(&path).unwrap(), image);
}

#[test]
fn plain_encoding_has_no_gamma() {
    let image = gradient(3, 3);
    let mut tagged = Vec::new();
    let mut plain = Vec::new();
    encode(&mut tagged, &image, 2300).unwrap();
    encode_plain(&mut plain, &image).unwrap();

    assert_eq!(read_gamma(&plain).unwrap(), None);
    assert!(tagged.len() > plain.len());
    assert_eq!(decode(&plain).unwrap(), decode(&tagged).unwrap());
}

#[test]
fn unknown_bytes_are_unsupported() {
    let err = decode(b"BM6\x00\x00\x00not an image").unwrap_err();
    assert!(matches!(err, IoError::UnsupportedFormat(_)), "{err}");
    assert!(matches!(decode(&[]), Err(IoError::UnsupportedFormat(_))));
    assert!(read_gamma(b"GIF89a").is_err());
}

#[test]
fn corrupt_png_is_decode_error() {
    let mut bytes = Vec::new();
    encode(&mut bytes, &gradient(8, 8), 2300).unwrap();
    // keep the signature, scramble the IHDR chunk
    for b in &mut bytes[12..24] {
        *b ^= 0x5A;
    }
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, IoError::DecodeError(_)), "{err}");
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read(dir.path().join("absent.png")).unwrap_err();
    assert!(matches!(err, IoError::Io(_)));
}

#[test]
fn name_does_not_decide_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("really_a_png.jpg");
    write(&path, &gradient(2, 2), None).unwrap();
    assert_eq!(Format::from_extension(&path), Format::Jpeg);
    assert_eq!(Format::detect(&path).unwrap(), Format::Png);
    assert_eq!(read(&path).unwrap().dimensions(), (2, 2));
}
