//! Face counting pipeline: camera capture, cascade face detection,
//! frame annotation, JPEG encoding, and multipart stream framing.
//!
//! Each concern is split into a `domain` module (traits and pure logic)
//! and an `infrastructure` module (adapters over external crates), so
//! the pipeline can be exercised end-to-end with stubs in tests.

pub mod annotate;
pub mod capture;
pub mod detection;
pub mod encode;
pub mod pipeline;
pub mod shared;
