/// An axis-aligned face bounding box in pixel coordinates, top-left
/// origin. Coordinates are non-negative and clamped into frame bounds
/// at construction, since cascade windows near an edge can poke past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from raw detector output, clamping it into a
    /// `frame_width` x `frame_height` frame. Detector coordinates may be
    /// negative or extend past the frame edge; the clamped box satisfies
    /// `x + width <= frame_width` and `y + height <= frame_height`.
    /// Returns `None` if nothing of the box lies inside the frame.
    pub fn clamped(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Self> {
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        if x0 >= frame_width || y0 >= frame_height {
            return None;
        }
        // Portion cut off by a negative origin
        let lost_x = (x0 as i64 - x as i64) as u32;
        let lost_y = (y0 as i64 - y as i64) as u32;
        let w = width
            .saturating_sub(lost_x)
            .min(frame_width - x0);
        let h = height
            .saturating_sub(lost_y)
            .min(frame_height - y0);
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self::new(x0, y0, w, h))
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}
