//! Route tests over a stub pipeline: no camera, no model, no font.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use headcount_core::annotate::domain::frame_annotator::FrameAnnotator;
use headcount_core::capture::domain::frame_source::{share, FrameSource, SourceInfo};
use headcount_core::detection::domain::face_detector::FaceDetector;
use headcount_core::encode::domain::frame_encoder::{EncodedFrame, FrameEncoder};
use headcount_core::pipeline::stream_pipeline::StreamPipeline;
use headcount_core::shared::detection_result::DetectionResult;
use headcount_core::shared::frame::Frame;
use headcount_server::app::{app, AppState, PipelineFactory};

struct StubSource {
    remaining: usize,
}

impl FrameSource for StubSource {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        Ok(SourceInfo {
            width: 4,
            height: 4,
        })
    }

    fn read(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, self.remaining))
    }

    fn release(&mut self) {}
}

struct NoFaces;

impl FaceDetector for NoFaces {
    fn detect(&mut self, _frame: &Frame) -> Result<DetectionResult, Box<dyn std::error::Error>> {
        Ok(DetectionResult::empty())
    }
}

struct Passthrough;

impl FrameAnnotator for Passthrough {
    fn annotate(&self, frame: Frame, _detections: &DetectionResult) -> Frame {
        frame
    }
}

struct TinyJpeg;

impl FrameEncoder for TinyJpeg {
    fn encode(&self, _frame: &Frame) -> Result<EncodedFrame, Box<dyn std::error::Error>> {
        Ok(EncodedFrame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]))
    }
}

/// Factory producing pipelines that end after `frames` parts, so the
/// response body is finite and can be collected.
fn stub_state(frames: usize) -> Arc<AppState> {
    let factory: PipelineFactory = Box::new(move || {
        Ok(StreamPipeline::new(
            share(Box::new(StubSource { remaining: frames })),
            Box::new(NoFaces),
            Box::new(Passthrough),
            Box::new(TinyJpeg),
            None,
        ))
    });
    Arc::new(AppState::new(factory))
}

#[tokio::test]
async fn home_page_renders() {
    let response = app(stub_state(0))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("text/html"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("id=\"stream\""));
    assert!(html.contains("src=\"/video\""));
}

#[tokio::test]
async fn video_feed_has_multipart_content_type() {
    let response = app(stub_state(1))
        .oneshot(Request::builder().uri("/video").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "multipart/x-mixed-replace; boundary=frame"
    );
}

#[tokio::test]
async fn video_feed_streams_each_frame_as_a_part() {
    let response = app(stub_state(3))
        .oneshot(Request::builder().uri("/video").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // The stub source is finite, so the stream terminates and the whole
    // body can be read back.
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(body.starts_with(b"--frame\r\n"));

    let text = String::from_utf8_lossy(&body);
    assert_eq!(text.matches("--frame\r\n").count(), 3);
    assert_eq!(text.matches("Content-Type: image/jpeg").count(), 3);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = app(stub_state(0))
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
