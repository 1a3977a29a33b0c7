use std::path::Path;

use rustface::ImageData;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::luminance::to_luminance;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_PYRAMID_SCALE_FACTOR, DEFAULT_SCORE_THRESH,
    DEFAULT_SLIDE_WINDOW_STEP,
};
use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Detection-quality tuning knobs for the cascade engine.
///
/// `min_face_size` carries the source system's 80x80 window floor
/// directly. The engine expresses scan granularity as a pyramid shrink
/// ratio and a score cut rather than OpenCV's scale-factor/min-neighbors
/// pair; the defaults here are the engine's recommended equivalents.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    pub min_face_size: u32,
    pub score_thresh: f64,
    pub pyramid_scale_factor: f32,
    pub slide_window_step: (u32, u32),
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            score_thresh: DEFAULT_SCORE_THRESH,
            pyramid_scale_factor: DEFAULT_PYRAMID_SCALE_FACTOR,
            slide_window_step: DEFAULT_SLIDE_WINDOW_STEP,
        }
    }
}

/// Face detector backed by the rustface funnel-structured cascade.
///
/// The engine wants single-channel input, so each frame is converted to
/// a luminance scratch buffer; the frame itself is never written to.
/// A missing or corrupt model file fails construction, which callers
/// treat as a fatal startup error.
pub struct CascadeDetector {
    engine: Box<dyn rustface::Detector>,
}

impl CascadeDetector {
    pub fn new(model_path: &Path, config: DetectorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let path = model_path
            .to_str()
            .ok_or("model path is not valid UTF-8")?;
        let mut engine = rustface::create_detector(path)
            .map_err(|e| format!("failed to load cascade model {path}: {e}"))?;
        engine.set_min_face_size(config.min_face_size);
        engine.set_score_thresh(config.score_thresh);
        engine.set_pyramid_scale_factor(config.pyramid_scale_factor);
        engine.set_slide_window_step(config.slide_window_step.0, config.slide_window_step.1);
        Ok(Self { engine })
    }
}

impl FaceDetector for CascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<DetectionResult, Box<dyn std::error::Error>> {
        let luma = to_luminance(frame);
        // luma must outlive the detect call; ImageData borrows it raw.
        let mut image = ImageData::new(&luma, frame.width(), frame.height());
        let faces = self.engine.detect(&mut image);

        // Cascade windows near an edge can extend past the frame; clamp
        // so annotation never draws out of bounds.
        let boxes = faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                BoundingBox::clamped(
                    bbox.x(),
                    bbox.y(),
                    bbox.width(),
                    bbox.height(),
                    frame.width(),
                    frame.height(),
                )
            })
            .collect();
        Ok(DetectionResult::new(boxes))
    }
}
