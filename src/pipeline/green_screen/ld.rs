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

struct LdBuffers {
    pixels: PixelBuffer,
    depth_data: Vec<u16>,
    body_data: Vec<u8>,
    color_data: Vec<u8>,
    color_points: Vec<SpacePoint>,
}

/// Green screen at depth resolution.
///
/// Cheaper than [`HdCompositor`](super::HdCompositor): only tracked body
/// pixels are looked up in the color frame, everything else stays
/// transparent black.
pub struct LdCompositor<M> {
    mapper: M,
    state: Lifecycle<LdBuffers>,
}

impl<M: CoordinateMapper> LdCompositor<M> {
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
                log::debug!("ld green screen: {foreground} foreground pixels");
                UpdateOutcome::Refreshed
            }
            Err(err) => {
                log::warn!("skipping ld green screen frame: {err}");
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
                "allocating ld green screen: depth {}, color {}",
                depth.description,
                color.description
            );
            LdBuffers {
                pixels: PixelBuffer::new(depth.description),
                depth_data: vec![0; depth_pixels],
                body_data: vec![NO_BODY; depth_pixels],
                color_data: vec![0; color.description.byte_len()],
                color_points: vec![SpacePoint::UNMAPPED; depth_pixels],
            }
        });

        check_len(StreamKind::Depth, state.depth_data.len(), depth_pixels)?;
        check_len(StreamKind::Color, state.color_data.len(), color_pixels * BYTES_PER_PIXEL)?;
        check_len(StreamKind::BodyIndex, state.body_data.len(), body_pixels)?;

        copy_color_to_bgra(color, &mut state.color_data)?;
        state.depth_data.copy_from_slice(depth.data);
        state.body_data.copy_from_slice(body.data);

        self.mapper
            .map_depth_frame_to_color_space(&state.depth_data, &mut state.color_points);

        let color_width = color.description.width;
        let color_height = color.description.height;
        let color_data = &state.color_data;

        let pixels = state.pixels.as_bytes_mut();
        pixels.fill(0);

        let foreground = pixels
            .par_chunks_exact_mut(BYTES_PER_PIXEL)
            .zip(state.body_data.par_iter())
            .zip(state.color_points.par_iter())
            .filter(|((_, body_index), _)| **body_index != NO_BODY)
            .filter_map(|((dst, _), point)| {
                let offset = point.to_pixel_index(color_width, color_height)? * BYTES_PER_PIXEL;
                let src = color_data.get(offset..offset + BYTES_PER_PIXEL)?;
                dst.copy_from_slice(src);
                Some(())
            })
            .count();

        Ok(foreground)
    }
}

impl<M> BitmapSource for LdCompositor<M> {
    fn pixels(&self) -> Option<&PixelBuffer> {
        self.state.get().map(|s| &s.pixels)
    }
}
