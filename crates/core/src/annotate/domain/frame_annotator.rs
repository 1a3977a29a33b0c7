use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Draws detection overlays onto a frame.
///
/// Takes the frame by value and returns it: annotation always succeeds
/// and never changes the frame's dimensions, only its pixels. The
/// returned frame is what gets encoded, so implementations own the full
/// visual contract (boxes, mirror flip, count label).
pub trait FrameAnnotator {
    fn annotate(&self, frame: Frame, detections: &DetectionResult) -> Frame;
}
