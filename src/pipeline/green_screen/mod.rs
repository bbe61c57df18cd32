//! Background removal by fusing body-index masks with color frames.

mod hd;
mod ld;

pub use hd::HdCompositor;
pub use ld::LdCompositor;

use crate::{
    buffer::PixelBuffer,
    config::SegmentationResolution,
    error::UpdateOutcome,
    mapping::CoordinateMapper,
    pipeline::BitmapSource,
    types::{BodyIndexFrame, ColorFrame, DepthFrame},
};

/// One of the two green-screen compositors, picked at construction time.
pub enum GreenScreenCompositor<M> {
    Hd(HdCompositor<M>),
    Ld(LdCompositor<M>),
}

impl<M: CoordinateMapper> GreenScreenCompositor<M> {
    pub fn new(resolution: SegmentationResolution, mapper: M) -> Self {
        match resolution {
            SegmentationResolution::High => GreenScreenCompositor::Hd(HdCompositor::new(mapper)),
            SegmentationResolution::Low => GreenScreenCompositor::Ld(LdCompositor::new(mapper)),
        }
    }

    /// Like [`new`](Self::new), falling back to `M::default()` when no mapper
    /// is supplied.
    pub fn create(resolution: SegmentationResolution, mapper: Option<M>) -> Self
    where
        M: Default,
    {
        Self::new(resolution, mapper.unwrap_or_default())
    }

    pub fn resolution(&self) -> SegmentationResolution {
        match self {
            GreenScreenCompositor::Hd(_) => SegmentationResolution::High,
            GreenScreenCompositor::Ld(_) => SegmentationResolution::Low,
        }
    }

    pub fn is_hd(&self) -> bool {
        self.resolution().is_hd()
    }

    pub fn mapper(&self) -> &M {
        match self {
            GreenScreenCompositor::Hd(inner) => inner.mapper(),
            GreenScreenCompositor::Ld(inner) => inner.mapper(),
        }
    }

    /// Composites one time-aligned set of frames.
    pub fn update(
        &mut self,
        color: &ColorFrame<'_>,
        depth: &DepthFrame<'_>,
        body: &BodyIndexFrame<'_>,
    ) -> UpdateOutcome {
        match self {
            GreenScreenCompositor::Hd(inner) => inner.update(color, depth, body),
            GreenScreenCompositor::Ld(inner) => inner.update(color, depth, body),
        }
    }
}

impl<M> BitmapSource for GreenScreenCompositor<M> {
    fn pixels(&self) -> Option<&PixelBuffer> {
        match self {
            GreenScreenCompositor::Hd(inner) => inner.pixels(),
            GreenScreenCompositor::Ld(inner) => inner.pixels(),
        }
    }
}
