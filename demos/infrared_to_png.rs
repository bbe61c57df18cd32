use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rgbd_bitmaps::{
    BitmapConfig, BitmapSource, InfraredCompositor, InfraredFrame,
    mapping::DEFAULT_DEPTH_DESCRIPTION,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("infrared.png"));

    let mut compositor = InfraredCompositor::new(BitmapConfig::from_env().infrared);
    if let Some(bits) = args.next() {
        let bits: u8 = bits
            .parse()
            .with_context(|| format!("invalid discarded bits `{bits}`"))?;
        compositor.set_discarded_bits(bits);
    }

    // Horizontal ramp across the full 16-bit range.
    let desc = DEFAULT_DEPTH_DESCRIPTION;
    let width = desc.width as usize;
    let data: Vec<u16> = (0..desc.pixel_count())
        .map(|idx| ((idx % width) * u16::MAX as usize / width.max(1)) as u16)
        .collect();

    let outcome = compositor.update(&InfraredFrame {
        description: desc,
        data: &data,
    });
    if let Some(err) = outcome.skip_reason() {
        return Err(anyhow!("infrared frame rejected: {err}"));
    }

    let image = compositor
        .pixels()
        .and_then(|pixels| pixels.to_rgba_image())
        .ok_or_else(|| anyhow!("infrared bitmap not ready"))?;
    image
        .save(&output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    println!(
        "wrote {} discarding {} bits",
        output.display(),
        compositor.discarded_bits()
    );
    Ok(())
}
