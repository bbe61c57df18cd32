use rayon::prelude::*;

use super::BitmapSource;
use crate::{
    buffer::PixelBuffer,
    error::{FrameError, UpdateOutcome, check_len},
    lifecycle::Lifecycle,
    tone::{depth_to_intensity, player_tint, write_opaque},
    types::{BYTES_PER_PIXEL, BodyIndexFrame, DepthFrame, StreamKind},
};

struct DepthBuffers {
    pixels: PixelBuffer,
    depth_data: Vec<u16>,
    body_data: Option<Vec<u8>>,
}

/// Renders depth frames as grayscale, nearest reliable distance brightest,
/// optionally tinting tracked bodies.
#[derive(Default)]
pub struct DepthCompositor {
    state: Lifecycle<DepthBuffers>,
}

impl DepthCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth samples of the last accepted frame.
    pub fn depth_data(&self) -> Option<&[u16]> {
        self.state.get().map(|s| s.depth_data.as_slice())
    }

    /// Body indices of the last accepted frame that carried them.
    pub fn body_data(&self) -> Option<&[u8]> {
        self.state.get().and_then(|s| s.body_data.as_deref())
    }

    pub fn update(
        &mut self,
        depth: &DepthFrame<'_>,
        body: Option<&BodyIndexFrame<'_>>,
    ) -> UpdateOutcome {
        match self.try_update(depth, body) {
            Ok(()) => UpdateOutcome::Refreshed,
            Err(err) => {
                log::warn!("skipping depth frame: {err}");
                UpdateOutcome::Skipped(err)
            }
        }
    }

    fn try_update(
        &mut self,
        depth: &DepthFrame<'_>,
        body: Option<&BodyIndexFrame<'_>>,
    ) -> Result<(), FrameError> {
        let pixel_count = depth.description.pixel_count();
        check_len(StreamKind::Depth, pixel_count, depth.data.len())?;
        if let Some(body) = body {
            check_len(StreamKind::BodyIndex, pixel_count, body.description.pixel_count())?;
            check_len(StreamKind::BodyIndex, pixel_count, body.data.len())?;
        }

        let state = self.state.get_or_init(|| {
            log::info!("allocating depth bitmap {}", depth.description);
            DepthBuffers {
                pixels: PixelBuffer::new(depth.description),
                depth_data: vec![0; pixel_count],
                body_data: None,
            }
        });

        check_len(StreamKind::Depth, state.depth_data.len(), pixel_count)?;
        check_len(StreamKind::Depth, state.pixels.len(), pixel_count * BYTES_PER_PIXEL)?;

        state.depth_data.copy_from_slice(depth.data);

        let min = depth.min_reliable_distance;
        let max = depth.max_reliable_distance;
        let depth_data = &state.depth_data;
        let pixels = state.pixels.as_bytes_mut();

        match body {
            Some(body) => {
                let body_data = state.body_data.get_or_insert_with(|| vec![0; pixel_count]);
                body_data.copy_from_slice(body.data);

                pixels
                    .par_chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(depth_data.par_iter().zip(body_data.par_iter()))
                    .for_each(|(dst, (&distance, &body_index))| {
                        let intensity = depth_to_intensity(distance, min, max);
                        write_opaque(dst, player_tint(intensity, body_index));
                    });
            }
            None => {
                pixels
                    .par_chunks_exact_mut(BYTES_PER_PIXEL)
                    .zip(depth_data.par_iter())
                    .for_each(|(dst, &distance)| {
                        write_opaque(dst, [depth_to_intensity(distance, min, max); 3]);
                    });
            }
        }

        Ok(())
    }
}

impl BitmapSource for DepthCompositor {
    fn pixels(&self) -> Option<&PixelBuffer> {
        self.state.get().map(|s| &s.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameDescription, NO_BODY};

    const DESC: FrameDescription = FrameDescription::new(2, 2);

    fn depth_frame(data: &[u16]) -> DepthFrame<'_> {
        DepthFrame {
            description: DESC,
            data,
            min_reliable_distance: 500,
            max_reliable_distance: 1500,
        }
    }

    #[test]
    fn renders_reference_gradient() {
        let mut compositor = DepthCompositor::new();
        let outcome = compositor.update(&depth_frame(&[500, 1000, 1500, 2000]), None);
        assert!(outcome.is_refreshed());

        let pixels = compositor.pixels().unwrap();
        assert_eq!(
            pixels.as_bytes(),
            &[
                255, 255, 255, 255, //
                128, 128, 128, 255, //
                0, 0, 0, 255, //
                0, 0, 0, 255,
            ]
        );
        assert_eq!(compositor.depth_data(), Some(&[500, 1000, 1500, 2000][..]));
    }

    #[test]
    fn body_pixels_are_tinted() {
        let mut compositor = DepthCompositor::new();
        let body = BodyIndexFrame {
            description: DESC,
            data: &[0, 1, 3, NO_BODY],
        };
        let outcome = compositor.update(&depth_frame(&[500, 500, 500, 500]), Some(&body));
        assert!(outcome.is_refreshed());

        let pixels = compositor.pixels().unwrap();
        assert_eq!(pixels.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(pixels.pixel(1, 0), Some([0, 255, 0, 255]));
        assert_eq!(pixels.pixel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(pixels.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(compositor.body_data(), Some(&[0, 1, 3, NO_BODY][..]));
    }

    #[test]
    fn short_depth_frame_leaves_pixels_untouched() {
        let mut compositor = DepthCompositor::new();
        assert!(compositor.update(&depth_frame(&[500, 1000, 1500, 2000]), None).is_refreshed());
        let before = compositor.pixels().unwrap().clone();

        let outcome = compositor.update(&depth_frame(&[1500, 1500, 1500]), None);
        assert!(matches!(
            outcome,
            UpdateOutcome::Skipped(FrameError::DimensionMismatch {
                stream: StreamKind::Depth,
                expected: 4,
                actual: 3,
            })
        ));
        assert_eq!(compositor.pixels().unwrap(), &before);
    }

    #[test]
    fn mismatched_first_frame_does_not_allocate() {
        let mut compositor = DepthCompositor::new();
        let outcome = compositor.update(&depth_frame(&[500]), None);
        assert!(!outcome.is_refreshed());
        assert!(compositor.pixels().is_none());
    }

    #[test]
    fn resized_frame_is_rejected_not_reallocated() {
        let mut compositor = DepthCompositor::new();
        assert!(compositor.update(&depth_frame(&[500; 4]), None).is_refreshed());

        let larger = DepthFrame {
            description: FrameDescription::new(3, 2),
            data: &[500; 6],
            min_reliable_distance: 500,
            max_reliable_distance: 1500,
        };
        assert!(!compositor.update(&larger, None).is_refreshed());
        assert_eq!(compositor.pixels().unwrap().description(), DESC);
    }

    #[test]
    fn repeated_updates_are_identical() {
        let mut compositor = DepthCompositor::new();
        let frame = depth_frame(&[700, 900, 1100, 0]);
        assert!(compositor.update(&frame, None).is_refreshed());
        let first = compositor.pixels().unwrap().clone();
        assert!(compositor.update(&frame, None).is_refreshed());
        assert_eq!(compositor.pixels().unwrap(), &first);
    }
}
