use crate::shared::frame::Frame;

/// Converts an RGB frame to a single-channel luminance buffer, one byte
/// per pixel in row-major order.
///
/// Integer Rec.601 weights (77/150/29, summing to 256) keep the result
/// within one step of the float formula without leaving u8 arithmetic.
/// The cascade classifier operates on this buffer only; the frame itself
/// is untouched.
pub fn to_luminance(frame: &Frame) -> Vec<u8> {
    let pixels = frame.as_ndarray();
    let mut luma = Vec::with_capacity((frame.width() as usize) * (frame.height() as usize));
    for row in pixels.outer_iter() {
        for px in row.outer_iter() {
            let (r, g, b) = (u32::from(px[0]), u32::from(px[1]), u32::from(px[2]));
            luma.push(((77 * r + 150 * g + 29 * b) >> 8) as u8);
        }
    }
    luma
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn solid_frame(r: u8, g: u8, b: u8, width: u32, height: u32) -> Frame {
        let data = [r, g, b].repeat((width * height) as usize);
        Frame::new(data, width, height, 0)
    }

    #[rstest]
    #[case::black(0, 0, 0, 0)]
    #[case::white(255, 255, 255, 255)]
    #[case::pure_red(255, 0, 0, 76)]
    #[case::pure_green(0, 255, 0, 149)]
    #[case::pure_blue(0, 0, 255, 28)]
    fn test_known_luminance_values(
        #[case] r: u8,
        #[case] g: u8,
        #[case] b: u8,
        #[case] expected: u8,
    ) {
        let frame = solid_frame(r, g, b, 2, 2);
        let luma = to_luminance(&frame);
        assert_eq!(luma, vec![expected; 4]);
    }

    #[test]
    fn test_output_length_is_one_byte_per_pixel() {
        let frame = solid_frame(10, 20, 30, 7, 3);
        assert_eq!(to_luminance(&frame).len(), 21);
    }

    #[test]
    fn test_input_frame_is_not_mutated() {
        let frame = solid_frame(120, 90, 60, 4, 4);
        let before = frame.data().to_vec();
        let _ = to_luminance(&frame);
        assert_eq!(frame.data(), &before[..]);
    }

    #[test]
    fn test_row_major_pixel_order() {
        // 2x1 frame: white pixel then black pixel
        let frame = Frame::new(vec![255, 255, 255, 0, 0, 0], 2, 1, 0);
        assert_eq!(to_luminance(&frame), vec![255, 0]);
    }
}
