use ndarray::ArrayView3;

/// A decoded RGB24 frame: tightly packed bytes in row-major order.
///
/// Readers convert whatever the source pixel format is (BGR, YUV, ...) to
/// RGB at the I/O boundary, so detection never deals with channel order.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// `index` is the zero-based position of the frame in decode order.
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
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

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based position in decode order (frame #10 has index 9).
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                Self::CHANNELS,
            ),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels into an `image` buffer for cropping and resizing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_ordinal_is_one_based() {
        let frame = Frame::new(vec![0u8; 3], 1, 1, 9);
        assert_eq!(frame.ordinal(), 10);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 RGB: pixel (row=1, col=0) is red
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let frame = Frame::new(data, 2, 2, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_to_rgb_image_keeps_dimensions_and_pixels() {
        let mut data = vec![0u8; 4 * 2 * 3];
        data[3] = 7; // row=0, col=1, R
        let frame = Frame::new(data, 4, 2, 0);
        let img = frame.to_rgb_image().unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(1, 0).0, [7, 0, 0]);
    }
}
