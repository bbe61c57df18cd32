use rayon::prelude::*;
#[cfg(feature = "yuv-color")]
use yuv::{
    YuvBiPlanarImage, YuvConversionMode, YuvPackedImage, YuvRange, YuvStandardMatrix,
    yuv_nv12_to_bgra, yuyv422_to_bgra,
};

use crate::{
    error::{FrameError, check_len},
    types::{BYTES_PER_PIXEL, ColorFormat, ColorFrame, StreamKind},
};

/// Byte layout of an interleaved 8-bit color format.
///
/// `order[c]` is the source byte feeding BGRA channel `c`; `None` writes an
/// opaque 255.
#[derive(Debug, Clone, Copy)]
struct PackedLayout {
    stride: usize,
    order: [Option<usize>; BYTES_PER_PIXEL],
}

const RGBA_LAYOUT: PackedLayout = PackedLayout {
    stride: 4,
    order: [Some(2), Some(1), Some(0), Some(3)],
};
const BGR_LAYOUT: PackedLayout = PackedLayout {
    stride: 3,
    order: [Some(0), Some(1), Some(2), None],
};
const RGB_LAYOUT: PackedLayout = PackedLayout {
    stride: 3,
    order: [Some(2), Some(1), Some(0), None],
};
const GRAY_LAYOUT: PackedLayout = PackedLayout {
    stride: 1,
    order: [Some(0), Some(0), Some(0), None],
};

/// Writes `frame` into `dst` as BGRA8.
///
/// BGRA frames are copied verbatim; everything else is converted with an
/// opaque alpha channel. `frame.data` must be exactly as long as its format
/// requires for the declared size, and `dst` must hold exactly one BGRA pixel
/// per color pixel. Nothing is written when the sizes do not line up.
pub fn copy_color_to_bgra(frame: &ColorFrame<'_>, dst: &mut [u8]) -> Result<(), FrameError> {
    let desc = frame.description;
    check_len(StreamKind::Color, frame.format.required_len(desc), frame.data.len())?;
    check_len(StreamKind::Color, desc.byte_len(), dst.len())?;

    let data = frame.data;
    match frame.format {
        ColorFormat::Bgra => dst.copy_from_slice(data),
        ColorFormat::Rgba => reorder_to_bgra(data, dst, RGBA_LAYOUT),
        ColorFormat::Bgr => reorder_to_bgra(data, dst, BGR_LAYOUT),
        ColorFormat::Rgb => reorder_to_bgra(data, dst, RGB_LAYOUT),
        ColorFormat::Gray => reorder_to_bgra(data, dst, GRAY_LAYOUT),
        ColorFormat::Yuyv => yuyv_to_bgra(data, dst, desc.width, desc.height)?,
        ColorFormat::Nv12 => nv12_to_bgra(data, dst, desc.width, desc.height)?,
    }

    Ok(())
}

fn reorder_to_bgra(data: &[u8], dst: &mut [u8], layout: PackedLayout) {
    dst.par_chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(data.par_chunks_exact(layout.stride))
        .for_each(|(dst, src)| {
            for (out, source) in dst.iter_mut().zip(layout.order) {
                *out = source.map_or(u8::MAX, |c| src[c]);
            }
        });
}

#[cfg(feature = "yuv-color")]
fn yuyv_to_bgra(data: &[u8], dst: &mut [u8], width: u32, height: u32) -> Result<(), FrameError> {
    let packed = YuvPackedImage {
        yuy: data,
        yuy_stride: width * 2,
        width,
        height,
    };

    yuyv422_to_bgra(
        &packed,
        dst,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
    )
    .map_err(|err| FrameError::ColorConversion(format!("YUYV422→BGRA failed: {err:?}")))
}

#[cfg(feature = "yuv-color")]
fn nv12_to_bgra(data: &[u8], dst: &mut [u8], width: u32, height: u32) -> Result<(), FrameError> {
    let y_plane_len = width as usize * height as usize;
    let (y_plane, uv_plane) = data.split_at(y_plane_len);

    let image = YuvBiPlanarImage {
        y_plane,
        y_stride: width,
        uv_plane,
        uv_stride: width,
        width,
        height,
    };

    yuv_nv12_to_bgra(
        &image,
        dst,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .map_err(|err| FrameError::ColorConversion(format!("NV12→BGRA failed: {err:?}")))
}

#[cfg(not(feature = "yuv-color"))]
fn yuyv_to_bgra(
    _data: &[u8],
    _dst: &mut [u8],
    _width: u32,
    _height: u32,
) -> Result<(), FrameError> {
    Err(FrameError::UnsupportedFormat(ColorFormat::Yuyv))
}

#[cfg(not(feature = "yuv-color"))]
fn nv12_to_bgra(
    _data: &[u8],
    _dst: &mut [u8],
    _width: u32,
    _height: u32,
) -> Result<(), FrameError> {
    Err(FrameError::UnsupportedFormat(ColorFormat::Nv12))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameDescription;

    fn frame(format: ColorFormat, data: &[u8]) -> ColorFrame<'_> {
        ColorFrame {
            description: FrameDescription::new(2, 1),
            format,
            data,
        }
    }

    #[test]
    fn bgra_is_copied_verbatim() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        copy_color_to_bgra(&frame(ColorFormat::Bgra, &data), &mut dst).unwrap();
        assert_eq!(dst, data);
    }

    #[test]
    fn rgba_swaps_red_and_blue() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        copy_color_to_bgra(&frame(ColorFormat::Rgba, &data), &mut dst).unwrap();
        assert_eq!(dst, [3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn packed_rgb_and_bgr_gain_opaque_alpha() {
        let data = [10, 20, 30, 40, 50, 60];
        let mut dst = [0u8; 8];
        copy_color_to_bgra(&frame(ColorFormat::Rgb, &data), &mut dst).unwrap();
        assert_eq!(dst, [30, 20, 10, 255, 60, 50, 40, 255]);

        copy_color_to_bgra(&frame(ColorFormat::Bgr, &data), &mut dst).unwrap();
        assert_eq!(dst, [10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn gray_is_replicated() {
        let mut dst = [0u8; 8];
        copy_color_to_bgra(&frame(ColorFormat::Gray, &[9, 200]), &mut dst).unwrap();
        assert_eq!(dst, [9, 9, 9, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn short_raw_buffer_is_rejected_without_writing() {
        let mut dst = [7u8; 8];
        let err = copy_color_to_bgra(&frame(ColorFormat::Rgb, &[1, 2, 3]), &mut dst).unwrap_err();
        assert_eq!(
            err,
            FrameError::DimensionMismatch {
                stream: StreamKind::Color,
                expected: 6,
                actual: 3,
            }
        );
        assert_eq!(dst, [7u8; 8]);
    }

    #[test]
    fn oversized_raw_buffer_is_rejected_without_writing() {
        let mut dst = [7u8; 8];
        let err = copy_color_to_bgra(&frame(ColorFormat::Bgra, &[1; 32]), &mut dst).unwrap_err();
        assert_eq!(
            err,
            FrameError::DimensionMismatch {
                stream: StreamKind::Color,
                expected: 8,
                actual: 32,
            }
        );
        assert_eq!(dst, [7u8; 8]);

        let err = copy_color_to_bgra(&frame(ColorFormat::Gray, &[1, 2, 3]), &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::DimensionMismatch { expected: 2, actual: 3, .. }));
    }

    #[test]
    fn destination_must_match_declared_size() {
        let mut dst = [0u8; 4];
        let err = copy_color_to_bgra(&frame(ColorFormat::Bgra, &[0; 8]), &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::DimensionMismatch { stream: StreamKind::Color, .. }));
    }

    #[cfg(feature = "yuv-color")]
    #[test]
    fn yuyv_neutral_chroma_stays_gray() {
        let data = [128, 128, 128, 128];
        let mut dst = [0u8; 8];
        copy_color_to_bgra(&frame(ColorFormat::Yuyv, &data), &mut dst).unwrap();
        for px in dst.chunks_exact(4) {
            assert_eq!(px[3], 255);
            assert!(px[0].abs_diff(128) <= 2);
            assert!(px[0].abs_diff(px[1]) <= 1 && px[1].abs_diff(px[2]) <= 1);
        }
    }
}
