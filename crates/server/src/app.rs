use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bytes::Bytes;
use tokio_stream::wrappers::ReceiverStream;

use headcount_core::pipeline::multipart::STREAM_CONTENT_TYPE;
use headcount_core::pipeline::stream_pipeline::StreamPipeline;

/// Builds one pipeline per stream consumer over the shared camera.
///
/// The pipeline itself is not `Send` (the cascade engine is thread
/// local), so construction happens on the blocking thread that runs the
/// stream; only the factory crosses threads.
pub type PipelineFactory = Box<
    dyn Fn() -> Result<StreamPipeline, Box<dyn std::error::Error + Send + Sync>> + Send + Sync,
>;

pub struct AppState {
    pipelines: PipelineFactory,
}

impl AppState {
    pub fn new(pipelines: PipelineFactory) -> Self {
        Self { pipelines }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/video", get(video_feed))
        .with_state(state)
}

async fn home() -> Html<&'static str> {
    Html(include_str!("../templates/home.html"))
}

/// The multipart stream endpoint.
///
/// The synchronous pipeline runs on a blocking thread and hands parts
/// through a capacity-1 channel: `blocking_send` parks the producer
/// until the client has taken the previous part, which is the
/// backpressure contract. A dropped receiver (client went away) cancels
/// the pipeline at the next iteration boundary.
async fn video_feed(State(state): State<Arc<AppState>>) -> Response {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, std::convert::Infallible>>(1);

    tokio::task::spawn_blocking(move || {
        let mut pipeline = match (state.pipelines)() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                log::error!("failed to build stream pipeline: {e}");
                return;
            }
        };
        let cancel = pipeline.cancel_handle();
        for part in pipeline.by_ref() {
            if tx.blocking_send(Ok(Bytes::from(part))).is_err() {
                cancel.store(true, Ordering::Relaxed);
            }
        }
        log::debug!("video stream ended in state {:?}", pipeline.state());
    });

    (
        [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}
