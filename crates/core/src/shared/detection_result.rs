use crate::shared::bounding_box::BoundingBox;

/// The outcome of running face detection on one frame: the boxes in the
/// detector's own order (not semantically significant) and a count that
/// is always derived from the list length, never stored separately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetectionResult {
    boxes: Vec<BoundingBox>,
}

impl DetectionResult {
    pub fn new(boxes: Vec<BoundingBox>) -> Self {
        Self { boxes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn boxes(&self) -> &[BoundingBox] {
        &self.boxes
    }

    /// Instantaneous per-frame face count. No cross-frame aggregation or
    /// deduplication: the same person is counted again on every frame.
    pub fn count(&self) -> usize {
        self.boxes.len()
    }
}
