//! Tiled renderer.
//!
//! The blocking path fans every tile out onto the rayon pool and joins before
//! returning. The async path sweeps tiles one after another on a single
//! background thread so a display can pick up finished tiles as they land.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    f32::consts::FRAC_PI_4,
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
};
use super::{
    camera::Camera,
    component::Color,
    elements::SdfEntity,
    error::RenderError,
    march::{MarchConfig, Marcher},
    pixels::*,
    scene,
};

pub const DEFAULT_TILE_SIZE: u32 = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    /// Field of view in radians.
    pub fov: f32,
    pub tile_size: u32,
    pub march: MarchConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            width: 240,
            height: 135,
            fov: FRAC_PI_4,
            tile_size: DEFAULT_TILE_SIZE,
            march: MarchConfig::default(),
        }
    }
}

/// A finished tile, as pushed by [`Renderer::render_progressive`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileEvent {
    pub rect: TileRect,
    /// Row-major pixels of `rect`.
    pub pixels: Vec<Color>,
}

pub struct Renderer {
    camera: Camera,
    scene: Arc<SdfEntity>,
    config: MarchConfig,
    pixels: PixelBuffer,
    in_flight: Option<JoinHandle<PixelBuffer>>,
}

impl Renderer {
    /// Renderer over the built-in scene, seen from the built-in viewpoint.
    pub fn new(width: u32, height: u32, fov: f32) -> Result<Self, RenderError> {
        let camera = scene::default_camera(width, height, fov)?;
        Self::with_scene(camera, scene::default_scene(), MarchConfig::default())
    }

    pub fn from_config(config: &RendererConfig) -> Result<Self, RenderError> {
        TileGrid::new(config.width, config.height, config.tile_size)?;
        let camera = scene::default_camera(config.width, config.height, config.fov)?;
        Self::with_scene(camera, scene::default_scene(), config.march.clone())
    }

    pub fn with_scene(camera: Camera, scene: SdfEntity, config: MarchConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Renderer {
            pixels: PixelBuffer::new(camera.width(), camera.height()),
            camera,
            scene: Arc::new(scene),
            config,
            in_flight: None,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Last completed frame, or `None` while an async render owns the buffer.
    pub fn pixels(&self) -> Option<&PixelBuffer> {
        match self.in_flight {
            Some(_) => None,
            None => Some(&self.pixels),
        }
    }

    /// Renders the whole image, one parallel task per tile, and returns once every tile is done.
    pub fn render(&mut self, tile_size: u32) -> Result<&PixelBuffer, RenderError> {
        self.wait()?;
        let grid = TileGrid::new(self.camera.width(), self.camera.height(), tile_size)?;
        tracing::debug!(
            width = self.camera.width(),
            height = self.camera.height(),
            tile_size,
            tiles = grid.len(),
            "rendering"
        );

        let camera = &self.camera;
        let marcher = Marcher::new(&self.scene, &self.config);
        self.pixels
            .tiles_mut(&grid)
            .into_par_iter()
            .for_each(|mut tile| {
                tile.for_each_pixel(|x, y, pixel| {
                    *pixel = marcher.cast_ray(&camera.get_ray(x, y));
                });
            });

        Ok(&self.pixels)
    }

    /// Starts a sequential tile sweep on a background thread and returns immediately.
    ///
    /// `on_tile` runs on that thread after each tile, in grid order, with the
    /// finished tile's rectangle and the whole buffer. Call [`Renderer::wait`]
    /// to join the sweep and get the buffer back. An earlier in-flight render is
    /// waited for first; there is no way to cancel one.
    pub fn render_async<F>(&mut self, tile_size: u32, mut on_tile: F) -> Result<(), RenderError>
    where
        F: FnMut(TileRect, &PixelBuffer) + Send + 'static,
    {
        self.wait()?;
        let grid = TileGrid::new(self.camera.width(), self.camera.height(), tile_size)?;
        let camera = self.camera.clone();
        let scene = Arc::clone(&self.scene);
        let config = self.config.clone();
        let mut pixels = std::mem::take(&mut self.pixels);

        let worker = move || {
            let _span = tracing::debug_span!("render_async", tiles = grid.len()).entered();
            let marcher = Marcher::new(&scene, &config);
            for (index, rect) in grid.iter().enumerate() {
                for y in rect.y..rect.y + rect.height {
                    for x in rect.x..rect.x + rect.width {
                        pixels.set(x, y, marcher.cast_ray(&camera.get_ray(x, y)));
                    }
                }
                tracing::trace!(index, x = rect.x, y = rect.y, "tile done");
                on_tile(rect, &pixels);
            }
            tracing::debug!("sweep finished");
            pixels
        };

        match thread::Builder::new().name("sdf-render".into()).spawn(worker) {
            Ok(handle) => {
                self.in_flight = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.pixels = PixelBuffer::new(self.camera.width(), self.camera.height());
                Err(err.into())
            }
        }
    }

    /// Async render that reports each finished tile over a channel.
    ///
    /// The channel disconnects once the sweep is over.
    pub fn render_progressive(&mut self, tile_size: u32) -> Result<mpsc::Receiver<TileEvent>, RenderError> {
        let (sender, receiver) = mpsc::channel();
        self.render_async(tile_size, move |rect, pixels| {
            // A dropped receiver only means nobody is watching anymore.
            let _ = sender.send(TileEvent {
                rect,
                pixels: pixels.region(rect),
            });
        })?;
        Ok(receiver)
    }

    pub fn is_finished(&self) -> bool {
        self.in_flight
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Blocks until any in-flight async render completes and returns the buffer.
    pub fn wait(&mut self) -> Result<&PixelBuffer, RenderError> {
        if let Some(handle) = self.in_flight.take() {
            match handle.join() {
                Ok(pixels) => self.pixels = pixels,
                Err(_) => {
                    tracing::error!("render worker panicked, frame discarded");
                    self.pixels = PixelBuffer::new(self.camera.width(), self.camera.height());
                    return Err(RenderError::WorkerPanicked);
                }
            }
        }
        Ok(&self.pixels)
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            let _ = handle.join();
        }
    }
}
