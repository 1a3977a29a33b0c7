use ndarray::ArrayView3;

/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Sources convert whatever the device delivers into this layout, so
/// everything downstream can assume 8-bit RGB. The `index` is assigned
/// by the source and increments per successful read.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

/// Color channels per pixel; frames are always RGB.
pub const CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the frame, handing out the pixel buffer so it can be
    /// wrapped in an `image` buffer without copying.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// (height, width, channel) view for per-pixel math.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        let shape = (self.height as usize, self.width as usize, CHANNELS);
        ArrayView3::from_shape(shape, &self.data)
            .expect("Frame data length must match dimensions")
    }
}
