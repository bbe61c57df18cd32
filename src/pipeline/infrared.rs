use rayon::prelude::*;

use super::BitmapSource;
use crate::{
    buffer::PixelBuffer,
    config::InfraredConfig,
    error::{FrameError, UpdateOutcome, check_len},
    lifecycle::Lifecycle,
    tone::{clamp_discarded_bits, infrared_to_intensity, write_opaque},
    types::{BYTES_PER_PIXEL, InfraredFrame, StreamKind},
};

struct InfraredBuffers {
    pixels: PixelBuffer,
    infrared_data: Vec<u16>,
}

/// Renders infrared frames as grayscale.
pub struct InfraredCompositor {
    discarded_bits: u8,
    state: Lifecycle<InfraredBuffers>,
}

impl InfraredCompositor {
    pub fn new(config: InfraredConfig) -> Self {
        Self {
            discarded_bits: clamp_discarded_bits(config.discarded_bits),
            state: Lifecycle::default(),
        }
    }

    pub fn discarded_bits(&self) -> u8 {
        self.discarded_bits
    }

    /// Takes effect on the next update. Values above 8 are clamped to 8.
    pub fn set_discarded_bits(&mut self, bits: u8) {
        self.discarded_bits = clamp_discarded_bits(bits);
    }

    pub fn infrared_data(&self) -> Option<&[u16]> {
        self.state.get().map(|s| s.infrared_data.as_slice())
    }

    pub fn update(&mut self, frame: &InfraredFrame<'_>) -> UpdateOutcome {
        match self.try_update(frame) {
            Ok(()) => UpdateOutcome::Refreshed,
            Err(err) => {
                log::warn!("skipping infrared frame: {err}");
                UpdateOutcome::Skipped(err)
            }
        }
    }

    fn try_update(&mut self, frame: &InfraredFrame<'_>) -> Result<(), FrameError> {
        let pixel_count = frame.description.pixel_count();
        check_len(StreamKind::Infrared, pixel_count, frame.data.len())?;

        let state = self.state.get_or_init(|| {
            log::info!("allocating infrared bitmap {}", frame.description);
            InfraredBuffers {
                pixels: PixelBuffer::new(frame.description),
                infrared_data: vec![0; pixel_count],
            }
        });

        check_len(StreamKind::Infrared, state.infrared_data.len(), pixel_count)?;
        check_len(StreamKind::Infrared, state.pixels.len(), pixel_count * BYTES_PER_PIXEL)?;

        state.infrared_data.copy_from_slice(frame.data);

        let bits = self.discarded_bits;
        state
            .pixels
            .as_bytes_mut()
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(state.infrared_data.par_iter())
            .for_each(|(dst, &raw)| write_opaque(dst, [infrared_to_intensity(raw, bits); 3]));

        Ok(())
    }
}

impl Default for InfraredCompositor {
    fn default() -> Self {
        Self::new(InfraredConfig::default())
    }
}

impl BitmapSource for InfraredCompositor {
    fn pixels(&self) -> Option<&PixelBuffer> {
        self.state.get().map(|s| &s.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameDescription;

    fn frame(data: &[u16]) -> InfraredFrame<'_> {
        InfraredFrame {
            description: FrameDescription::new(2, 2),
            data,
        }
    }

    #[test]
    fn default_discards_six_bits() {
        let mut compositor = InfraredCompositor::default();
        assert_eq!(compositor.discarded_bits(), 6);

        assert!(compositor.update(&frame(&[16383, 64, 0, u16::MAX])).is_refreshed());
        let pixels = compositor.pixels().unwrap();
        assert_eq!(pixels.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(pixels.pixel(1, 0), Some([1, 1, 1, 255]));
        assert_eq!(pixels.pixel(0, 1), Some([0, 0, 0, 255]));
        assert_eq!(pixels.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn discarded_bits_can_change_between_frames() {
        let mut compositor = InfraredCompositor::default();
        let data = [512u16, 512, 512, 512];
        assert!(compositor.update(&frame(&data)).is_refreshed());
        assert_eq!(compositor.pixels().unwrap().pixel(0, 0), Some([8, 8, 8, 255]));

        compositor.set_discarded_bits(2);
        assert!(compositor.update(&frame(&data)).is_refreshed());
        assert_eq!(compositor.pixels().unwrap().pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn discarded_bits_are_clamped() {
        let mut compositor = InfraredCompositor::new(InfraredConfig { discarded_bits: 11 });
        assert_eq!(compositor.discarded_bits(), 8);
        compositor.set_discarded_bits(9);
        assert_eq!(compositor.discarded_bits(), 8);
    }

    #[test]
    fn mismatched_frame_keeps_previous_pixels() {
        let mut compositor = InfraredCompositor::default();
        assert!(compositor.update(&frame(&[16383; 4])).is_refreshed());
        let before = compositor.pixels().unwrap().clone();

        assert!(!compositor.update(&frame(&[0; 5])).is_refreshed());
        assert_eq!(compositor.pixels().unwrap(), &before);
        assert_eq!(compositor.infrared_data(), Some(&[16383u16; 4][..]));
    }
}
