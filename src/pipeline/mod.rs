pub mod color_convert;
pub mod depth;
pub mod green_screen;
pub mod infrared;

use crate::buffer::PixelBuffer;

/// Anything that turns sensor frames into a displayable BGRA buffer.
pub trait BitmapSource {
    /// The current output, or `None` until the first frame has been accepted.
    fn pixels(&self) -> Option<&PixelBuffer>;

    fn is_ready(&self) -> bool {
        self.pixels().is_some()
    }
}

// Re-exports for convenience
pub use color_convert::copy_color_to_bgra;
pub use depth::DepthCompositor;
pub use green_screen::{GreenScreenCompositor, HdCompositor, LdCompositor};
pub use infrared::InfraredCompositor;
