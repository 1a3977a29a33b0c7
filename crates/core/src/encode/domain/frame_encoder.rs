use crate::shared::frame::Frame;

pub const JPEG_MIME: &str = "image/jpeg";

/// One compressed, annotated frame ready for delivery. Immutable once
/// produced; ownership moves to the stream boundary on yield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    data: Vec<u8>,
    mime: &'static str,
}

impl EncodedFrame {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime: JPEG_MIME,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

/// Serializes an annotated frame into a compressed image buffer.
///
/// The buffer is never empty for a valid non-empty frame; failures
/// surface to the pipeline, which decides the per-frame policy.
pub trait FrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<EncodedFrame, Box<dyn std::error::Error>>;
}
