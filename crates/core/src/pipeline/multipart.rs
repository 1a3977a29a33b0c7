//! Wire framing for the live video stream.
//!
//! Every part is framed exactly as browsers expect for motion JPEG over
//! `multipart/x-mixed-replace`; the byte layout is a compatibility
//! contract and must not change.

use crate::encode::domain::frame_encoder::EncodedFrame;

pub const BOUNDARY: &str = "frame";

/// Value for the HTTP response `Content-Type` header.
pub const STREAM_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Frames one encoded image as a stream part:
/// `--frame\r\nContent-Type: <mime>\r\n\r\n<bytes>\r\n`.
pub fn encode_part(encoded: &EncodedFrame) -> Vec<u8> {
    let header = format!("--{BOUNDARY}\r\nContent-Type: {}\r\n\r\n", encoded.mime());
    let mut part = Vec::with_capacity(header.len() + encoded.data().len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(encoded.data());
    part.extend_from_slice(b"\r\n");
    part
}
