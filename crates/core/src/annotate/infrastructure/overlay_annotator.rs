use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::annotate::domain::frame_annotator::FrameAnnotator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::detection_result::DetectionResult;
use crate::shared::frame::Frame;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const STROKE_WIDTH: u32 = 4;
const LABEL_POSITION: (i32, i32) = (10, 30);
const LABEL_SCALE: f32 = 32.0;

/// Draws the detection overlay: green box outlines, a horizontal mirror
/// flip, and a blue count label.
///
/// The order is a compatibility contract: boxes are drawn in detector
/// coordinates first, the whole frame (boxes included) is then mirrored
/// so the stream reads like a mirror, and the label goes on last so its
/// text is not reversed.
pub struct OverlayAnnotator {
    font: FontArc,
    label_prefix: String,
}

impl OverlayAnnotator {
    pub fn new(font: FontArc, label_prefix: impl Into<String>) -> Self {
        Self {
            font,
            label_prefix: label_prefix.into(),
        }
    }

    pub fn label(&self, count: usize) -> String {
        format!("{}{}", self.label_prefix, count)
    }
}

impl FrameAnnotator for OverlayAnnotator {
    fn annotate(&self, frame: Frame, detections: &DetectionResult) -> Frame {
        let (width, height, index) = (frame.width(), frame.height(), frame.index());
        let mut img = RgbImage::from_raw(width, height, frame.into_data())
            .expect("frame buffer matches its dimensions");

        for bounding_box in detections.boxes() {
            draw_box_outline(&mut img, bounding_box);
        }
        image::imageops::flip_horizontal_in_place(&mut img);
        draw_text_mut(
            &mut img,
            LABEL_COLOR,
            LABEL_POSITION.0,
            LABEL_POSITION.1,
            PxScale::from(LABEL_SCALE),
            &self.font,
            &self.label(detections.count()),
        );

        Frame::new(img.into_raw(), width, height, index)
    }
}

/// A `STROKE_WIDTH`-thick outline, drawn as nested one-pixel rectangles
/// growing inward so the stroke stays inside the clamped box.
fn draw_box_outline(img: &mut RgbImage, bounding_box: &BoundingBox) {
    for inset in 0..STROKE_WIDTH {
        if bounding_box.width <= 2 * inset || bounding_box.height <= 2 * inset {
            break;
        }
        let rect = Rect::at(
            (bounding_box.x + inset) as i32,
            (bounding_box.y + inset) as i32,
        )
        .of_size(
            bounding_box.width - 2 * inset,
            bounding_box.height - 2 * inset,
        );
        draw_hollow_rect_mut(img, rect, BOX_COLOR);
    }
}
