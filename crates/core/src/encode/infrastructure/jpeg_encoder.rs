use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::encode::domain::frame_encoder::{EncodedFrame, FrameEncoder};
use crate::shared::frame::Frame;

const JPEG_QUALITY: u8 = 75;

/// JPEG encoding via the `image` crate, standard quality.
pub struct JpegFrameEncoder;

impl JpegFrameEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<EncodedFrame, Box<dyn std::error::Error>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).encode(
            frame.data(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(EncodedFrame::jpeg(buffer))
    }
}
