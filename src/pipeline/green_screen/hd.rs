use rayon::prelude::*;

use crate::{
    buffer::PixelBuffer,
    error::{FrameError, UpdateOutcome, check_len},
    lifecycle::Lifecycle,
    mapping::CoordinateMapper,
    pipeline::{BitmapSource, color_convert::copy_color_to_bgra},
    types::{
        BYTES_PER_PIXEL, BodyIndexFrame, ColorFrame, DepthFrame, NO_BODY, SpacePoint, StreamKind,
    },
};

struct HdBuffers {
    pixels: PixelBuffer,
    depth_data: Vec<u16>,
    body_data: Vec<u8>,
    depth_points: Vec<SpacePoint>,
}

/// Green screen at color resolution.
///
/// Every color pixel is kept when it maps onto a tracked body and zeroed
/// otherwise.
pub struct HdCompositor<M> {
    mapper: M,
    state: Lifecycle<HdBuffers>,
}

impl<M: CoordinateMapper> HdCompositor<M> {
    pub fn new(mapper: M) -> Self {
        Self {
            mapper,
            state: Lifecycle::default(),
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn update(
        &mut self,
        color: &ColorFrame<'_>,
        depth: &DepthFrame<'_>,
        body: &BodyIndexFrame<'_>,
    ) -> UpdateOutcome {
        match self.try_update(color, depth, body) {
            Ok(foreground) => {
                log::debug!("hd green screen: {foreground} foreground pixels");
                UpdateOutcome::Refreshed
            }
            Err(err) => {
                log::warn!("skipping hd green screen frame: {err}");
                UpdateOutcome::Skipped(err)
            }
        }
    }

    fn try_update(
        &mut self,
        color: &ColorFrame<'_>,
        depth: &DepthFrame<'_>,
        body: &BodyIndexFrame<'_>,
    ) -> Result<usize, FrameError> {
        let color_pixels = color.description.pixel_count();
        let depth_pixels = depth.description.pixel_count();
        let body_pixels = body.description.pixel_count();

        check_len(
            StreamKind::Color,
            color.format.required_len(color.description),
            color.data.len(),
        )?;
        check_len(StreamKind::Depth, depth_pixels, depth.data.len())?;
        check_len(StreamKind::BodyIndex, body_pixels, body.data.len())?;

        let state = self.state.get_or_init(|| {
            log::info!(
                "allocating hd green screen: color {}, depth {}",
                color.description,
                depth.description
            );
            HdBuffers {
                pixels: PixelBuffer::new(color.description),
                depth_data: vec![0; depth_pixels],
                body_data: vec![NO_BODY; depth_pixels],
                depth_points: vec![SpacePoint::UNMAPPED; color_pixels],
            }
        });

        check_len(StreamKind::Depth, state.depth_data.len(), depth_pixels)?;
        check_len(StreamKind::Color, state.pixels.len(), color_pixels * BYTES_PER_PIXEL)?;
        check_len(StreamKind::BodyIndex, state.body_data.len(), body_pixels)?;

        copy_color_to_bgra(color, state.pixels.as_bytes_mut())?;
        state.depth_data.copy_from_slice(depth.data);
        state.body_data.copy_from_slice(body.data);

        self.mapper
            .map_color_frame_to_depth_space(&state.depth_data, &mut state.depth_points);

        let depth_width = depth.description.width;
        let depth_height = depth.description.height;
        let body_data = &state.body_data;

        let foreground = state
            .pixels
            .as_bytes_mut()
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(state.depth_points.par_iter())
            .map(|(dst, point)| {
                let tracked = point
                    .to_pixel_index(depth_width, depth_height)
                    .and_then(|idx| body_data.get(idx))
                    .is_some_and(|&body_index| body_index != NO_BODY);

                if tracked {
                    1
                } else {
                    dst.fill(0);
                    0
                }
            })
            .sum::<usize>();

        Ok(foreground)
    }
}

impl<M> BitmapSource for HdCompositor<M> {
    fn pixels(&self) -> Option<&PixelBuffer> {
        self.state.get().map(|s| &s.pixels)
    }
}
