//! GIF decoding through the `image` crate. Only the first frame is read.

use crate::{IoError, IoResult};
use dualpng_core::Image;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// Decodes the first frame of a GIF into RGBA.
pub fn decode(data: &[u8]) -> IoResult<Image> {
    let rgba = ImageReader::with_format(Cursor::new(data), ImageFormat::Gif)
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    Image::from_rgba(width, height, rgba.into_raw()).map_err(|e| IoError::DecodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Frame, RgbaImage};

    #[test]
    fn test_first_frame_decoded() {
        let mut frame = RgbaImage::new(3, 2);
        frame.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        frame.put_pixel(2, 1, image::Rgba([0, 0, 255, 255]));

        let mut bytes = Vec::new();
        {
            let mut enc = GifEncoder::new(&mut bytes);
            enc.encode_frame(Frame::new(frame)).unwrap();
        }
        let img = decode(&bytes).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        // palette quantization may nudge colours slightly
        let red = img.pixel(0, 0);
        assert!(red[0] > 200 && red[2] < 50 && red[3] == 255, "{red:?}");
        let blue = img.pixel(2, 1);
        assert!(blue[2] > 200 && blue[0] < 50 && blue[3] == 255, "{blue:?}");
    }

    #[test]
    fn test_truncated_header() {
        assert!(decode(b"GIF89a").is_err());
    }
}
