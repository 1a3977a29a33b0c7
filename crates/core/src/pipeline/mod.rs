pub mod multipart;
pub mod stream_pipeline;
