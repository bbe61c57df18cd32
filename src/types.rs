use std::fmt;

/// Output pixels are always 4-byte BGRA.
pub const BYTES_PER_PIXEL: usize = 4;

/// Body-index value for a pixel that belongs to no tracked body.
pub const NO_BODY: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameDescription {
    pub width: u32,
    pub height: u32,
}

impl FrameDescription {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn byte_len(&self) -> usize {
        self.pixel_count().saturating_mul(BYTES_PER_PIXEL)
    }
}

impl fmt::Display for FrameDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which sensor stream a frame came from. Used when reporting mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    Depth,
    Infrared,
    Color,
    BodyIndex,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Depth => "depth",
            StreamKind::Infrared => "infrared",
            StreamKind::Color => "color",
            StreamKind::BodyIndex => "body index",
        };
        f.write_str(name)
    }
}

/// Raw layout of the bytes in a [`ColorFrame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFormat {
    Bgra,
    Rgba,
    Bgr,
    Rgb,
    /// Packed YUV 4:2:2 (`Y0 U Y1 V`), the usual raw layout of RGB-D color sensors.
    Yuyv,
    /// Y plane followed by an interleaved UV plane at half resolution.
    Nv12,
    Gray,
}

impl ColorFormat {
    /// Number of raw bytes a frame of `desc` needs in this layout.
    pub fn required_len(&self, desc: FrameDescription) -> usize {
        let pixels = desc.pixel_count();
        match self {
            ColorFormat::Bgra | ColorFormat::Rgba => pixels.saturating_mul(4),
            ColorFormat::Bgr | ColorFormat::Rgb => pixels.saturating_mul(3),
            ColorFormat::Yuyv => pixels.saturating_mul(2),
            ColorFormat::Nv12 => pixels.saturating_add(pixels / 2),
            ColorFormat::Gray => pixels,
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorFormat::Bgra => "BGRA",
            ColorFormat::Rgba => "RGBA",
            ColorFormat::Bgr => "BGR",
            ColorFormat::Rgb => "RGB",
            ColorFormat::Yuyv => "YUYV",
            ColorFormat::Nv12 => "NV12",
            ColorFormat::Gray => "GRAY",
        };
        f.write_str(name)
    }
}

/// One depth frame: distances in millimetres, 0 meaning unknown.
#[derive(Clone, Copy, Debug)]
pub struct DepthFrame<'a> {
    pub description: FrameDescription,
    pub data: &'a [u16],
    pub min_reliable_distance: u16,
    pub max_reliable_distance: u16,
}

#[derive(Clone, Copy, Debug)]
pub struct InfraredFrame<'a> {
    pub description: FrameDescription,
    pub data: &'a [u16],
}

/// Per-depth-pixel body indices; [`NO_BODY`] marks background.
#[derive(Clone, Copy, Debug)]
pub struct BodyIndexFrame<'a> {
    pub description: FrameDescription,
    pub data: &'a [u8],
}

#[derive(Clone, Copy, Debug)]
pub struct ColorFrame<'a> {
    pub description: FrameDescription,
    pub format: ColorFormat,
    pub data: &'a [u8],
}

/// A coordinate in another sensor's pixel space, as produced by a
/// [`CoordinateMapper`](crate::mapping::CoordinateMapper).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacePoint {
    pub x: f32,
    pub y: f32,
}

impl SpacePoint {
    /// No pixel corresponds to the source pixel.
    pub const UNMAPPED: SpacePoint = SpacePoint {
        x: f32::NEG_INFINITY,
        y: f32::NEG_INFINITY,
    };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_unmapped(&self) -> bool {
        self.x == f32::NEG_INFINITY || self.y == f32::NEG_INFINITY
    }

    /// Rounds half-up on both axes and returns the pixel index inside a
    /// `width` x `height` grid, or `None` for the sentinel and anything that
    /// lands outside the grid.
    pub fn to_pixel_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.is_unmapped() {
            return None;
        }

        let x = (self.x + 0.5).floor();
        let y = (self.y + 0.5).floor();

        // NaN fails both comparisons and falls through to None.
        if x >= 0.0 && x < width as f32 && y >= 0.0 && y < height as f32 {
            Some(y as usize * width as usize + x as usize)
        } else {
            None
        }
    }
}

impl Default for SpacePoint {
    fn default() -> Self {
        SpacePoint::UNMAPPED
    }
}
