//! # sdf
//!
//! CPU sphere tracer for scenes built from signed distance fields.
//!
//! A scene is an immutable tree of [`SdfEntity`] nodes: primitives
//! ([`SdfSphere`], [`SdfBox`]) joined by nearest-surface unions ([`SdfUnion`],
//! [`SdfUnion3`]). The [`Renderer`] shoots one ray per pixel through a
//! [`Camera`], marches it with a [`Marcher`] and bounces it off every surface it
//! hits, multiplying material colors along the way. Pixels are computed tile by
//! tile, either all at once on the rayon pool or progressively on a background
//! thread.
//!
//! ```rust,ignore
//! use sdf::Renderer;
//!
//! let mut renderer = Renderer::new(240, 135, std::f32::consts::FRAC_PI_4)?;
//! let pixels = renderer.render(32)?;
//! ```

pub mod builder;
pub mod camera;
pub mod component;
pub mod elements;
pub mod error;
pub mod handoff;
pub mod march;
pub mod pixels;
pub mod render;
pub mod scene;

pub use builder::SdfBuilder;
pub use camera::{Camera, Ray};
pub use component::{Color, Material, Surface};
pub use elements::{SdfBox, SdfElement, SdfEntity, SdfSphere, SdfUnion, SdfUnion3};
pub use error::RenderError;
pub use handoff::FrameHandoff;
pub use march::{MarchConfig, MarchOutcome, Marcher};
pub use pixels::{PixelBuffer, TileGrid, TileRect};
pub use render::{Renderer, RendererConfig, TileEvent, DEFAULT_TILE_SIZE};
