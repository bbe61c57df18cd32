use image::{ImageBuffer, Rgba, RgbaImage};

use crate::types::{BYTES_PER_PIXEL, FrameDescription};

/// A BGRA8 image owned by a generator and refreshed in place on every update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed (transparent black) buffer.
    pub fn new(description: FrameDescription) -> Self {
        Self {
            width: description.width,
            height: description.height,
            pixels: vec![0u8; description.byte_len()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn description(&self) -> FrameDescription {
        FrameDescription::new(self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the BGRA bytes at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.pixels.get(idx..idx + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Copies the buffer into an RGBA image for display or saving.
    ///
    /// `None` only if the byte count cannot form a `width x height` image.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        let mut rgba = self.pixels.clone();
        for px in rgba.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.swap(0, 2);
        }
        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(self.width, self.height, rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zeroed_and_sized() {
        let buffer = PixelBuffer::new(FrameDescription::new(3, 2));
        assert_eq!(buffer.len(), 3 * 2 * BYTES_PER_PIXEL);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.description(), FrameDescription::new(3, 2));
    }

    #[test]
    fn pixel_reads_bgra_at_coordinate() {
        let mut buffer = PixelBuffer::new(FrameDescription::new(2, 2));
        buffer.as_bytes_mut()[12..16].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buffer.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(buffer.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(2, 0), None);
        assert_eq!(buffer.pixel(0, 2), None);
    }

    #[test]
    fn rgba_image_swaps_red_and_blue() {
        let mut buffer = PixelBuffer::new(FrameDescription::new(1, 1));
        buffer.as_bytes_mut().copy_from_slice(&[10, 20, 30, 255]);
        let image = buffer.to_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [30, 20, 10, 255]);
        assert_eq!(buffer.pixel(0, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn rgba_image_keeps_dimensions() {
        let buffer = PixelBuffer::new(FrameDescription::new(3, 2));
        let image = buffer.to_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().all(|px| px.0 == [0, 0, 0, 0]));
    }
}
