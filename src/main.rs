mod preview;

use anyhow::{Context, Result};
use sdf::{FrameHandoff, Renderer, RendererConfig, TileGrid};
use std::{
    env, fs,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PREVIEW_COLUMNS: u32 = 80;

fn load_config() -> Result<RendererConfig> {
    match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", path))
        }
        None => Ok(RendererConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    let mut renderer = Renderer::from_config(&config).context("setting up renderer")?;
    let tiles = TileGrid::new(config.width, config.height, config.tile_size)?.len();
    tracing::info!(
        width = config.width,
        height = config.height,
        tile_size = config.tile_size,
        tiles,
        "starting render"
    );

    let handoff = FrameHandoff::new(config.width, config.height);
    let producer = handoff.clone();
    let done = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&done);
    let start = Instant::now();
    renderer.render_async(config.tile_size, move |rect, pixels| {
        producer.publish_region(pixels, rect);
        counter.fetch_add(1, Ordering::Relaxed);
    })?;

    while !renderer.is_finished() {
        let lit = handoff.read_if_changed(|frame| {
            frame.pixels().iter().filter(|pixel| pixel.max() > 0.0).count()
        });
        if let Some(lit) = lit {
            tracing::info!(done = done.load(Ordering::Relaxed), tiles, lit, "frame updated");
        }
        thread::sleep(POLL_INTERVAL);
    }
    let pixels = renderer.wait().context("finishing render")?;
    tracing::info!(elapsed = ?start.elapsed(), "render finished");

    print!("{}", preview::ascii_preview(pixels, PREVIEW_COLUMNS));
    Ok(())
}
