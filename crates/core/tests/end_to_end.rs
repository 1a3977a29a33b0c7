//! Full pipeline scenarios over stub sources, with the real annotator
//! and JPEG encoder where the environment allows.

use std::path::PathBuf;

use ab_glyph::FontArc;
use headcount_core::annotate::infrastructure::overlay_annotator::OverlayAnnotator;
use headcount_core::capture::domain::frame_source::{share, FrameSource, SourceInfo};
use headcount_core::detection::domain::face_detector::FaceDetector;
use headcount_core::encode::infrastructure::jpeg_encoder::JpegFrameEncoder;
use headcount_core::pipeline::stream_pipeline::{PipelineState, StreamPipeline};
use headcount_core::shared::bounding_box::BoundingBox;
use headcount_core::shared::detection_result::DetectionResult;
use headcount_core::shared::frame::Frame;

struct BlackFrameSource {
    remaining: usize,
    next_index: usize,
}

impl BlackFrameSource {
    fn new(count: usize) -> Self {
        Self {
            remaining: count,
            next_index: 0,
        }
    }
}

impl FrameSource for BlackFrameSource {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        Ok(SourceInfo {
            width: 640,
            height: 480,
        })
    }

    fn read(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.next_index;
        self.next_index += 1;
        Some(Frame::new(vec![0u8; 640 * 480 * 3], 640, 480, index))
    }

    fn release(&mut self) {}
}

struct FixedDetector {
    boxes: Vec<BoundingBox>,
}

impl FaceDetector for FixedDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<DetectionResult, Box<dyn std::error::Error>> {
        Ok(DetectionResult::new(self.boxes.clone()))
    }
}

/// Any TTF on the machine will do for rendering the label; tests that
/// need one return early when none is installed.
fn system_font() -> Option<FontArc> {
    fn find_ttf(dir: &PathBuf, depth: usize) -> Option<PathBuf> {
        if depth == 0 {
            return None;
        }
        for entry in std::fs::read_dir(dir).ok()?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if let Some(found) = find_ttf(&path, depth - 1) {
                    return Some(found);
                }
            } else if path.extension().is_some_and(|ext| ext == "ttf") {
                return Some(path);
            }
        }
        None
    }
    let path = find_ttf(&PathBuf::from("/usr/share/fonts"), 4)?;
    FontArc::try_from_vec(std::fs::read(path).ok()?).ok()
}

#[test]
fn black_frame_with_no_faces_streams_a_valid_jpeg_part() {
    let Some(font) = system_font() else {
        return;
    };
    let annotator = OverlayAnnotator::new(font, "People in frame: ");
    assert_eq!(annotator.label(0), "People in frame: 0");

    let mut pipeline = StreamPipeline::new(
        share(Box::new(BlackFrameSource::new(1))),
        Box::new(FixedDetector { boxes: Vec::new() }),
        Box::new(annotator),
        Box::new(JpegFrameEncoder::new()),
        None,
    );

    let part = pipeline.next().expect("one frame expected");
    assert!(part.starts_with(b"--frame\r\n"));
    let header_end = b"\r\n\r\n";
    let body_start = part
        .windows(header_end.len())
        .position(|w| w == header_end)
        .unwrap()
        + header_end.len();
    // Non-empty JPEG payload with the SOI marker
    assert!(part.len() > body_start + 2);
    assert_eq!(&part[body_start..body_start + 2], &[0xFF, 0xD8]);

    assert!(pipeline.next().is_none());
    assert_eq!(pipeline.state(), PipelineState::Exhausted);
}

#[test]
fn mocked_single_face_is_annotated_and_streamed() {
    let Some(font) = system_font() else {
        return;
    };
    let detections_box = BoundingBox::new(10, 20, 100, 100);

    // Contract check on the detection result itself
    let result = DetectionResult::new(vec![detections_box]);
    assert_eq!(result.count(), 1);
    assert_eq!(result.boxes()[0], detections_box);

    let mut pipeline = StreamPipeline::new(
        share(Box::new(BlackFrameSource::new(2))),
        Box::new(FixedDetector {
            boxes: vec![detections_box],
        }),
        Box::new(OverlayAnnotator::new(font, "People in frame: ")),
        Box::new(JpegFrameEncoder::new()),
        None,
    );

    let parts: Vec<Vec<u8>> = pipeline.by_ref().collect();
    assert_eq!(parts.len(), 2, "two reads then end-of-stream");
    for part in &parts {
        assert!(part.starts_with(b"--frame\r\n"));
        let text = String::from_utf8_lossy(part);
        assert!(text.contains("Content-Type: image/jpeg"));
    }
    // Annotation paints the box green somewhere in the visible frame, so
    // consecutive identical source frames still encode identically here.
    assert_eq!(parts[0], parts[1]);
}
