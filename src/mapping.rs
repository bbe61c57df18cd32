//! Depth/color spatial correspondence.
//!
//! The compositors never compute correspondences themselves. A
//! [`CoordinateMapper`] (usually backed by the sensor's calibration data) fills
//! a table with one [`SpacePoint`] per source pixel, using
//! [`SpacePoint::UNMAPPED`] where no pixel corresponds.

use rayon::prelude::*;

use crate::types::{FrameDescription, SpacePoint};

pub trait CoordinateMapper {
    /// Fills `depth_points` (one entry per color pixel) with the depth-space
    /// coordinate of each color pixel.
    fn map_color_frame_to_depth_space(&self, depth_data: &[u16], depth_points: &mut [SpacePoint]);

    /// Fills `color_points` (one entry per depth pixel) with the color-space
    /// coordinate of each depth pixel.
    fn map_depth_frame_to_color_space(&self, depth_data: &[u16], color_points: &mut [SpacePoint]);
}

impl<M: CoordinateMapper + ?Sized> CoordinateMapper for &M {
    fn map_color_frame_to_depth_space(&self, depth_data: &[u16], depth_points: &mut [SpacePoint]) {
        (**self).map_color_frame_to_depth_space(depth_data, depth_points)
    }

    fn map_depth_frame_to_color_space(&self, depth_data: &[u16], color_points: &mut [SpacePoint]) {
        (**self).map_depth_frame_to_color_space(depth_data, color_points)
    }
}

impl<M: CoordinateMapper + ?Sized> CoordinateMapper for Box<M> {
    fn map_color_frame_to_depth_space(&self, depth_data: &[u16], depth_points: &mut [SpacePoint]) {
        (**self).map_color_frame_to_depth_space(depth_data, depth_points)
    }

    fn map_depth_frame_to_color_space(&self, depth_data: &[u16], color_points: &mut [SpacePoint]) {
        (**self).map_depth_frame_to_color_space(depth_data, color_points)
    }
}

/// Depth sensor resolution of a time-of-flight RGB-D camera.
pub const DEFAULT_DEPTH_DESCRIPTION: FrameDescription = FrameDescription::new(512, 424);
/// Color sensor resolution of a time-of-flight RGB-D camera.
pub const DEFAULT_COLOR_DESCRIPTION: FrameDescription = FrameDescription::new(1920, 1080);

/// Correspondence by proportional scaling plus a fixed color-space offset.
///
/// Stands in for a calibrated mapper in tests and demos. Depth samples of 0
/// (unknown distance) have no correspondence in either direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearCoordinateMapper {
    depth: FrameDescription,
    color: FrameDescription,
    offset_x: f32,
    offset_y: f32,
}

impl LinearCoordinateMapper {
    pub fn new(depth: FrameDescription, color: FrameDescription) -> Self {
        Self {
            depth,
            color,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Shifts color-space coordinates by `(x, y)` color pixels.
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn depth_description(&self) -> FrameDescription {
        self.depth
    }

    pub fn color_description(&self) -> FrameDescription {
        self.color
    }

    fn scale(&self) -> (f32, f32) {
        (
            self.color.width.max(1) as f32 / self.depth.width.max(1) as f32,
            self.color.height.max(1) as f32 / self.depth.height.max(1) as f32,
        )
    }

    fn depth_at(&self, depth_data: &[u16], point: SpacePoint) -> Option<u16> {
        let idx = point.to_pixel_index(self.depth.width, self.depth.height)?;
        depth_data.get(idx).copied()
    }
}

impl Default for LinearCoordinateMapper {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_DESCRIPTION, DEFAULT_COLOR_DESCRIPTION)
    }
}

impl CoordinateMapper for LinearCoordinateMapper {
    fn map_color_frame_to_depth_space(&self, depth_data: &[u16], depth_points: &mut [SpacePoint]) {
        let (sx, sy) = self.scale();
        let color_width = self.color.width.max(1) as usize;

        depth_points
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, point)| {
                let cx = (idx % color_width) as f32;
                let cy = (idx / color_width) as f32;
                let mapped = SpacePoint::new((cx - self.offset_x) / sx, (cy - self.offset_y) / sy);

                // Coordinates outside the depth frame are reported as-is; only
                // pixels landing on an unknown depth sample are unmapped.
                *point = match self.depth_at(depth_data, mapped) {
                    Some(0) => SpacePoint::UNMAPPED,
                    _ => mapped,
                };
            });
    }

    fn map_depth_frame_to_color_space(&self, depth_data: &[u16], color_points: &mut [SpacePoint]) {
        let (sx, sy) = self.scale();
        let depth_width = self.depth.width.max(1) as usize;

        color_points
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, point)| {
                *point = match depth_data.get(idx) {
                    Some(&depth) if depth != 0 => {
                        let dx = (idx % depth_width) as f32;
                        let dy = (idx / depth_width) as f32;
                        SpacePoint::new(dx * sx + self.offset_x, dy * sy + self.offset_y)
                    }
                    _ => SpacePoint::UNMAPPED,
                };
            });
    }
}
