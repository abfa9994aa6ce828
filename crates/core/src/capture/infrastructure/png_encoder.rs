use std::io::Cursor;

use crate::capture::domain::captured_frame::SnapshotFormat;
use crate::capture::domain::frame_capturer::FrameEncoder;
use crate::shared::frame::Frame;

/// PNG snapshot encoder backed by the `image` crate.
pub struct PngFrameEncoder;

impl PngFrameEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PngFrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder for PngFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Png
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_png_magic() {
        let frame = Frame::filled(16, 8, [200, 100, 50]);
        let bytes = PngFrameEncoder::new().encode(&frame).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_roundtrip_preserves_dimensions_and_pixels() {
        let mut frame = Frame::filled(10, 6, [0, 0, 0]);
        frame.set_pixel(3, 2, [255, 0, 128]);
        let bytes = PngFrameEncoder::new().encode(&frame).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 6);
        assert_eq!(decoded.get_pixel(3, 2).0, [255, 0, 128]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
