use image::GrayImage;
use ndarray::{ArrayView3, Axis};

/// ITU-R BT.601 luma weights in 14-bit fixed point (sum = 1 << 14).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// A single video frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Mirrors the frame top-to-bottom in place.
    pub fn flip_vertical(&mut self) {
        let row_len = self.width as usize * self.channels as usize;
        let height = self.height as usize;
        for top in 0..height / 2 {
            let bottom = height - 1 - top;
            let (upper, lower) = self.data.split_at_mut(bottom * row_len);
            upper[top * row_len..(top + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
        }
    }

    /// Converts to single-channel luma.
    ///
    /// Three-channel frames are treated as RGB; single-channel frames are
    /// copied as-is.
    pub fn to_grayscale(&self) -> GrayImage {
        let pixels: Vec<u8> = if self.channels == 1 {
            self.data.clone()
        } else {
            self.as_ndarray()
                .lanes(Axis(2))
                .into_iter()
                .map(|px| {
                    let weighted = LUMA_R * px[0] as u32
                        + LUMA_G * px[1] as u32
                        + LUMA_B * px[2] as u32
                        + (1 << (LUMA_SHIFT - 1));
                    (weighted >> LUMA_SHIFT) as u8
                })
                .collect()
        };
        GrayImage::from_raw(self.width, self.height, pixels)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rgb_frame(width: u32, height: u32, rows: &[[u8; 3]]) -> Frame {
        let mut data = Vec::new();
        for px in rows {
            data.extend_from_slice(px);
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let data = vec![0u8; 24]; // 2x4x3
        let frame = Frame::new(data, 4, 2, 3, 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]); // (height, width, channels)
    }

    #[test]
    fn test_flip_vertical_swaps_rows() {
        // 1 column, 3 rows
        let mut frame = rgb_frame(1, 3, &[[1, 1, 1], [2, 2, 2], [3, 3, 3]]);
        frame.flip_vertical();
        assert_eq!(frame.data(), &[3, 3, 3, 2, 2, 2, 1, 1, 1]);
    }

    #[test]
    fn test_flip_vertical_even_height() {
        let mut frame = rgb_frame(2, 2, &[[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]]);
        frame.flip_vertical();
        let arr = frame.as_ndarray();
        assert_eq!(arr[[0, 0, 0]], 3);
        assert_eq!(arr[[0, 1, 0]], 4);
        assert_eq!(arr[[1, 0, 0]], 1);
        assert_eq!(arr[[1, 1, 0]], 2);
    }

    #[test]
    fn test_flip_vertical_twice_is_identity() {
        let original = Frame::new((0..18).collect(), 2, 3, 3, 0);
        let mut frame = original.clone();
        frame.flip_vertical();
        frame.flip_vertical();
        assert_eq!(frame, original);
    }

    #[rstest]
    #[case::black([0, 0, 0], 0)]
    #[case::white([255, 255, 255], 255)]
    #[case::red([255, 0, 0], 76)]
    #[case::green([0, 255, 0], 150)]
    #[case::blue([0, 0, 255], 29)]
    fn test_to_grayscale_bt601(#[case] px: [u8; 3], #[case] expected: u8) {
        let frame = rgb_frame(1, 1, &[px]);
        let gray = frame.to_grayscale();
        assert_eq!(gray.dimensions(), (1, 1));
        assert_eq!(gray.get_pixel(0, 0).0[0], expected);
    }

    #[test]
    fn test_to_grayscale_preserves_layout() {
        let frame = rgb_frame(2, 1, &[[0, 0, 0], [255, 255, 255]]);
        let gray = frame.to_grayscale();
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
        assert_eq!(gray.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_to_grayscale_single_channel_passthrough() {
        let frame = Frame::new(vec![10, 20, 30, 40], 2, 2, 1, 0);
        let gray = frame.to_grayscale();
        assert_eq!(gray.into_raw(), vec![10, 20, 30, 40]);
    }
}
