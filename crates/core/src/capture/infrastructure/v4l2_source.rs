use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

use crate::capture::domain::frame_source::{FrameSource, SourceInfo};
use crate::shared::frame::Frame;

const BUFFER_COUNT: u32 = 4;

/// Webcam source over Video4Linux2.
///
/// The memory-mapped capture stream borrows the device, so both live on
/// a dedicated capture thread; frames cross to the caller through a
/// zero-capacity rendezvous channel. The channel is what preserves pull
/// semantics: the thread cannot run ahead of `read` by more than the one
/// frame it is offering.
pub struct V4l2Source {
    device_index: usize,
    requested: (u32, u32),
    frames: Option<Receiver<Frame>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl V4l2Source {
    pub fn new(device_index: usize, width: u32, height: u32) -> Self {
        Self {
            device_index,
            requested: (width, height),
            frames: None,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

impl FrameSource for V4l2Source {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        let device = Device::new(self.device_index)?;

        let mut format = device.format()?;
        format.width = self.requested.0;
        format.height = self.requested.1;
        format.fourcc = FourCC::new(b"MJPG");
        let format = device.set_format(&format)?;

        // The driver may refuse MJPG and keep its own pixel format.
        match &format.fourcc.repr {
            b"MJPG" | b"YUYV" => {}
            other => {
                return Err(format!(
                    "unsupported camera pixel format {}",
                    String::from_utf8_lossy(other)
                )
                .into());
            }
        }
        log::info!(
            "camera /dev/video{} opened: {}x{} {}",
            self.device_index,
            format.width,
            format.height,
            format.fourcc
        );

        let (tx, rx) = crossbeam_channel::bounded(0);
        let stop = self.stop.clone();
        let info = SourceInfo {
            width: format.width,
            height: format.height,
        };
        self.worker = Some(std::thread::spawn(move || {
            capture_loop(device, format, tx, stop)
        }));
        self.frames = Some(rx);
        Ok(info)
    }

    fn read(&mut self) -> Option<Frame> {
        self.frames.as_ref()?.recv().ok()
    }

    fn release(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Drop the receiver first so a worker blocked in send() exits.
        self.frames = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for V4l2Source {
    fn drop(&mut self) {
        self.release();
    }
}

fn capture_loop(device: Device, format: Format, tx: Sender<Frame>, stop: Arc<AtomicBool>) {
    let mut stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("failed to start capture stream: {e}");
            return;
        }
    };

    let mut index = 0usize;
    while !stop.load(Ordering::Relaxed) {
        let (buf, _meta) = match stream.next() {
            Ok(item) => item,
            Err(e) => {
                // A failed read permanently ends the stream; no retry.
                log::error!("camera read failed: {e}");
                return;
            }
        };
        let frame = match decode_frame(buf, &format, index) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("undecodable camera frame: {e}");
                return;
            }
        };
        index += 1;
        if tx.send(frame).is_err() {
            return; // source released
        }
    }
}

fn decode_frame(
    buf: &[u8],
    format: &Format,
    index: usize,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let (width, height) = (format.width, format.height);
    let data = match &format.fourcc.repr {
        b"MJPG" => {
            let img = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)?.to_rgb8();
            if img.dimensions() != (width, height) {
                return Err(format!(
                    "JPEG frame is {}x{}, negotiated format is {width}x{height}",
                    img.width(),
                    img.height()
                )
                .into());
            }
            img.into_raw()
        }
        b"YUYV" => yuyv_to_rgb(buf, width, height)?,
        other => {
            return Err(
                format!("unsupported pixel format {}", String::from_utf8_lossy(other)).into(),
            )
        }
    };
    Ok(Frame::new(data, width, height, index))
}

/// Packed YUV 4:2:2 to RGB, ITU-R BT.601 full-swing conversion.
/// Each four input bytes (y0 u y1 v) yield two RGB pixels.
fn yuyv_to_rgb(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let expected = (width as usize) * (height as usize) * 2;
    if buf.len() < expected {
        return Err(format!(
            "YUYV buffer too short: {} bytes for {width}x{height}",
            buf.len()
        )
        .into());
    }

    let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for quad in buf[..expected].chunks_exact(4) {
        let (y0, u, y1, v) = (quad[0], quad[1], quad[2], quad[3]);
        push_pixel(&mut rgb, y0, u, v);
        push_pixel(&mut rgb, y1, u, v);
    }
    Ok(rgb)
}

fn push_pixel(rgb: &mut Vec<u8>, y: u8, u: u8, v: u8) {
    let c = i32::from(y) - 16;
    let d = i32::from(u) - 128;
    let e = i32::from(v) - 128;
    let clamp = |x: i32| x.clamp(0, 255) as u8;
    rgb.push(clamp((298 * c + 409 * e + 128) >> 8));
    rgb.push(clamp((298 * c - 100 * d - 208 * e + 128) >> 8));
    rgb.push(clamp((298 * c + 516 * d + 128) >> 8));
}
