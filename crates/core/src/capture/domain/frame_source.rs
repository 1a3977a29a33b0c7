use std::sync::{Arc, Mutex};

use crate::shared::frame::Frame;

/// Resolution reported by an opened source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
}

/// Produces raw frames on demand from a camera or other device.
///
/// Implementations handle device I/O and pixel-format conversion; the
/// pipeline only ever sees RGB `Frame`s. A source is opened exactly once
/// and shared for the life of the process.
pub trait FrameSource: Send {
    /// Acquires the device. Failure here is a startup error, not a
    /// per-frame condition.
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>>;

    /// Reads the next frame. `None` signals end-of-stream or a device
    /// failure; by contract a single `None` ends the stream permanently
    /// for any pipeline reading from this source.
    fn read(&mut self) -> Option<Frame>;

    /// Releases the device. Reads after release return `None`.
    fn release(&mut self);
}

/// One camera handle shared across stream consumers. The mutex
/// serializes reads; concurrent consumers would otherwise race on the
/// device's read cursor.
pub type SharedSource = Arc<Mutex<Box<dyn FrameSource>>>;

/// Wraps an opened source for injection into pipelines.
pub fn share(source: Box<dyn FrameSource>) -> SharedSource {
    Arc::new(Mutex::new(source))
}
