use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use rgbd_bitmaps::{
    BitmapSource, BodyIndexFrame, DepthCompositor, DepthFrame, FrameDescription, NO_BODY,
    mapping::DEFAULT_DEPTH_DESCRIPTION,
};

const MIN_RELIABLE: u16 = 500;
const MAX_RELIABLE: u16 = 4500;

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("depth.png"));

    let desc = DEFAULT_DEPTH_DESCRIPTION;
    let (depth, body) = synthetic_scene(desc);

    let mut compositor = DepthCompositor::new();
    let outcome = compositor.update(
        &DepthFrame {
            description: desc,
            data: &depth,
            min_reliable_distance: MIN_RELIABLE,
            max_reliable_distance: MAX_RELIABLE,
        },
        Some(&BodyIndexFrame {
            description: desc,
            data: &body,
        }),
    );
    if let Some(err) = outcome.skip_reason() {
        return Err(anyhow!("depth frame rejected: {err}"));
    }

    let image = compositor
        .pixels()
        .and_then(|pixels| pixels.to_rgba_image())
        .ok_or_else(|| anyhow!("depth bitmap not ready"))?;
    image
        .save(&output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    println!("wrote {} ({desc})", output.display());
    Ok(())
}

/// A back wall that recedes left to right, with two bodies standing in front.
fn synthetic_scene(desc: FrameDescription) -> (Vec<u16>, Vec<u8>) {
    let (w, h) = (desc.width as usize, desc.height as usize);
    let mut depth = vec![0u16; w * h];
    let mut body = vec![NO_BODY; w * h];

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            depth[idx] = (MIN_RELIABLE as usize + x * 5000 / w) as u16;

            for (player, cx) in [(0u8, w / 3), (1u8, 2 * w / 3)] {
                let dx = x.abs_diff(cx);
                let dy = y.abs_diff(h / 2);
                if dx * dx * 4 + dy * dy < (h / 3) * (h / 3) {
                    depth[idx] = 1200 + (player as u16) * 800;
                    body[idx] = player;
                }
            }
        }
    }

    (depth, body)
}
