//! Bitmap generation for RGB-D camera frames.
//!
//! Turns depth, infrared, color and body-index frames into BGRA8
//! [`PixelBuffer`]s:
//!
//! - [`DepthCompositor`]: depth as grayscale, optionally tinted per body
//! - [`InfraredCompositor`]: infrared as grayscale
//! - [`GreenScreenCompositor`]: color pixels kept only where a body is
//!   tracked, at color ([`HdCompositor`]) or depth ([`LdCompositor`])
//!   resolution
//!
//! Every compositor allocates its buffers from the first frame it accepts and
//! refreshes them in place afterwards. Frames whose sizes disagree with their
//! descriptions are skipped and the previous output is kept.

pub mod buffer;
pub mod config;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod tone;
pub mod types;

mod lifecycle;

// Re-export primary API
pub use buffer::PixelBuffer;
pub use config::{BitmapConfig, InfraredConfig, SegmentationResolution};
pub use error::{ConfigError, FrameError, UpdateOutcome};
pub use mapping::{CoordinateMapper, LinearCoordinateMapper};
pub use pipeline::{
    BitmapSource, DepthCompositor, GreenScreenCompositor, HdCompositor, InfraredCompositor,
    LdCompositor,
};
pub use types::{
    BodyIndexFrame, ColorFormat, ColorFrame, DepthFrame, FrameDescription, InfraredFrame,
    NO_BODY, SpacePoint, StreamKind,
};
