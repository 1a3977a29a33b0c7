use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Implementations take `&mut self` because the underlying engine keeps
/// scratch state, but they must never mutate the input frame; color data
/// is preserved for annotation and encoding. Detection is memoryless
/// across frames (no tracking), so the same face may shift or flicker
/// between consecutive results.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<DetectionResult, Box<dyn std::error::Error>>;
}
