use std::{path::PathBuf, time::Instant};

use anyhow::{Context, Result, anyhow};
use rgbd_bitmaps::{
    BitmapConfig, BitmapSource, BodyIndexFrame, ColorFormat, ColorFrame, DepthFrame,
    FrameDescription, GreenScreenCompositor, LinearCoordinateMapper, NO_BODY,
    SegmentationResolution,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let resolution = match args.next() {
        Some(raw) => raw.parse::<SegmentationResolution>()?,
        None => BitmapConfig::from_env().segmentation,
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("green_screen_{resolution}.png")));

    let mapper = LinearCoordinateMapper::default();
    let depth_desc = mapper.depth_description();
    let color_desc = mapper.color_description();

    let color = checkerboard(color_desc);
    let (depth, body) = silhouette(depth_desc);

    let mut compositor = GreenScreenCompositor::create(resolution, Some(mapper));

    let started = Instant::now();
    let outcome = compositor.update(
        &ColorFrame {
            description: color_desc,
            format: ColorFormat::Yuyv,
            data: &color,
        },
        &DepthFrame {
            description: depth_desc,
            data: &depth,
            min_reliable_distance: 500,
            max_reliable_distance: 4500,
        },
        &BodyIndexFrame {
            description: depth_desc,
            data: &body,
        },
    );
    if let Some(err) = outcome.skip_reason() {
        return Err(anyhow!("green screen frame rejected: {err}"));
    }
    log::info!("{resolution} green screen took {:?}", started.elapsed());

    let image = compositor
        .pixels()
        .and_then(|pixels| pixels.to_rgba_image())
        .ok_or_else(|| anyhow!("green screen bitmap not ready"))?;
    image
        .save(&output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    println!("wrote {} ({}x{})", output.display(), image.width(), image.height());
    Ok(())
}

/// YUYV checkerboard with colored squares, as a color sensor would deliver it.
fn checkerboard(desc: FrameDescription) -> Vec<u8> {
    let (w, h) = (desc.width as usize, desc.height as usize);
    let mut yuyv = Vec::with_capacity(w * h * 2);

    for y in 0..h {
        for x in (0..w).step_by(2) {
            let square = (x / 120 + y / 120) % 2 == 0;
            let (luma, u, v) = if square { (200, 90, 180) } else { (60, 160, 100) };
            yuyv.extend_from_slice(&[luma, u, luma, v]);
        }
    }

    yuyv
}

/// One body in the middle of the depth frame, everything else background.
fn silhouette(desc: FrameDescription) -> (Vec<u16>, Vec<u8>) {
    let (w, h) = (desc.width as usize, desc.height as usize);
    let mut depth = vec![3500u16; w * h];
    let mut body = vec![NO_BODY; w * h];

    for y in 0..h {
        for x in 0..w {
            let dx = x.abs_diff(w / 2);
            let head = dx * dx + y.abs_diff(h / 4).pow(2) < (h / 10).pow(2);
            let torso = dx < w / 8 && y > h / 3;
            if head || torso {
                let idx = y * w + x;
                depth[idx] = 1500;
                body[idx] = 0;
            }
        }
    }

    (depth, body)
}
