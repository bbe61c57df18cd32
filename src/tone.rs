//! Scalar tone curves shared by the depth and infrared generators.

use crate::types::NO_BODY;

/// Most-significant bits the infrared curve may discard; the output is 8 bits
/// of a 16-bit sample.
pub const MAX_DISCARDED_BITS: u8 = 8;

pub const DEFAULT_DISCARDED_BITS: u8 = 6;

/// Maps a distance to a gray level, nearest reliable distance brightest.
///
/// Samples outside `[min_reliable, max_reliable]` are clamped first. A
/// degenerate range (`max_reliable <= min_reliable`) uses a denominator of 1
/// and maps every sample to 255.
pub fn depth_to_intensity(distance: u16, min_reliable: u16, max_reliable: u16) -> u8 {
    let clamped = distance.max(min_reliable).min(max_reliable);
    let offset = clamped.saturating_sub(min_reliable);
    let range = max_reliable.saturating_sub(min_reliable).max(1);

    // Truncates like an integer cast, so the midpoint of 500..1500 gives 128.
    let scaled = (offset as f32 / range as f32 * 255.0) as u8;
    255 - scaled
}

pub fn clamp_discarded_bits(bits: u8) -> u8 {
    bits.min(MAX_DISCARDED_BITS)
}

/// Maps a raw infrared sample to a gray level.
///
/// Values above `(1 << (8 + bits)) - 1` saturate to 255; this keeps detail in
/// the dim near field instead of the rare bright returns.
pub fn infrared_to_intensity(raw: u16, discarded_bits: u8) -> u8 {
    let bits = clamp_discarded_bits(discarded_bits) as u32;
    let ceiling = ((1u32 << (8 + bits)) - 1).min(u16::MAX as u32);
    ((raw as u32).min(ceiling) >> bits) as u8
}

/// Colors a gray level by body index; returns `[blue, green, red]`.
///
/// `body_index + 1` is read as a 3-bit selector: a clear bit 0 zeroes blue,
/// bit 1 green, bit 2 red. [`NO_BODY`] leaves the pixel gray.
pub fn player_tint(intensity: u8, body_index: u8) -> [u8; 3] {
    if body_index == NO_BODY {
        return [intensity; 3];
    }

    let selector = body_index.wrapping_add(1);
    let channel = |bit: u8| if selector & bit == 0 { 0 } else { intensity };
    [channel(1), channel(2), channel(4)]
}

/// Writes a BGRA pixel with full opacity.
#[inline]
pub(crate) fn write_opaque(dst: &mut [u8], bgr: [u8; 3]) {
    dst[0] = bgr[0];
    dst[1] = bgr[1];
    dst[2] = bgr[2];
    dst[3] = 0xFF;
}
