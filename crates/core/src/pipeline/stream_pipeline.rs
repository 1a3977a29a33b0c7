use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::annotate::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::SharedSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::encode::domain::frame_encoder::FrameEncoder;
use crate::pipeline::multipart;
use crate::shared::frame::Frame;

/// Lifecycle of one stream. A pipeline never leaves a terminal state;
/// restarting means building a new pipeline over the same shared source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, no frame read yet.
    Init,
    Running,
    /// Ended by cancellation (consumer went away).
    Stopped,
    /// Ended by the source: a single failed read is permanent.
    Exhausted,
}

/// The per-consumer control loop: read, detect, annotate, encode, yield.
///
/// Strictly sequential, one frame fully processed before the next read.
/// Implemented as a pull iterator over framed stream parts so the
/// consumer's pace is the only thing driving frame production. Error
/// policy: a failed read or a detector error permanently ends the
/// stream; an encode failure drops that frame with a warning and the
/// loop continues.
pub struct StreamPipeline {
    source: SharedSource,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    encoder: Box<dyn FrameEncoder>,
    state: PipelineState,
    cancelled: Arc<AtomicBool>,
}

impl StreamPipeline {
    pub fn new(
        source: SharedSource,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        encoder: Box<dyn FrameEncoder>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source,
            detector,
            annotator,
            encoder,
            state: PipelineState::Init,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Handle for requesting a clean stop; checked once per iteration
    /// boundary, so an in-flight frame always completes.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    fn read_frame(&mut self) -> Option<Frame> {
        match self.source.lock() {
            Ok(mut source) => source.read(),
            Err(poisoned) => {
                log::error!("camera mutex poisoned; ending stream");
                drop(poisoned);
                None
            }
        }
    }
}

impl Iterator for StreamPipeline {
    /// One complete multipart stream part.
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                PipelineState::Stopped | PipelineState::Exhausted => return None,
                PipelineState::Init | PipelineState::Running => {}
            }
            if self.cancelled.load(Ordering::Relaxed) {
                log::debug!("stream cancelled by consumer");
                self.state = PipelineState::Stopped;
                return None;
            }
            self.state = PipelineState::Running;

            // A failed read ends the stream permanently: no retry, no
            // backoff, no reconnect.
            let Some(frame) = self.read_frame() else {
                log::info!("frame source exhausted; ending stream");
                self.state = PipelineState::Exhausted;
                return None;
            };

            let detections = match self.detector.detect(&frame) {
                Ok(detections) => detections,
                Err(e) => {
                    log::error!("face detection failed on frame {}: {e}", frame.index());
                    self.state = PipelineState::Exhausted;
                    return None;
                }
            };
            log::trace!(
                "frame {}: {} face(s) detected",
                frame.index(),
                detections.count()
            );

            let annotated = self.annotator.annotate(frame, &detections);

            match self.encoder.encode(&annotated) {
                Ok(encoded) => return Some(multipart::encode_part(&encoded)),
                Err(e) => {
                    // Skip-and-continue: the frame is lost, the stream
                    // is not.
                    log::warn!("encode failed on frame {}: {e}", annotated.index());
                    continue;
                }
            }
        }
    }
}
