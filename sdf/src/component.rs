use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Linear RGB color. Values are not clamped.
pub type Color = Vector3<f32>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
}

impl Material {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Material {
            color: Vector3::new(r, g, b),
        }
    }
}

impl From<Color> for Material {
    fn from(color: Color) -> Self {
        Material { color }
    }
}

/// Result of a single distance query. Never stored past the query that made it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub distance: f32,
    pub material: Material,
}
