//! Sphere tracing with mirror-only shading.
//!
//! A ray advances by the distance the scene reports at its current position
//! until it lands within `epsilon` of a surface or travels past `max_depth`.
//! Hits reflect about the estimated normal and the material colors along the
//! chain of bounces are multiplied together.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use super::{
    camera::Ray,
    component::*,
    elements::{SdfElement, SdfEntity},
    error::RenderError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Hit threshold for the reported distance.
    pub epsilon: f32,
    /// Rays that travel this far are treated as escaped.
    pub max_depth: f32,
    pub max_reflections: u32,
    /// Start depth of a reflected ray, keeps it from re-hitting the surface it left.
    pub reflection_bias: f32,
    /// Offset used for finite-difference normals.
    pub normal_offset: f32,
    /// Upper bound on steps per march.
    pub max_steps: u32,
    pub background: Color,
}

impl Default for MarchConfig {
    fn default() -> Self {
        MarchConfig {
            epsilon: 1e-4,
            max_depth: 100.0,
            max_reflections: 5,
            reflection_bias: 0.01,
            normal_offset: 1e-4,
            max_steps: 4096,
            background: Vector3::repeat(0.99),
        }
    }
}

impl MarchConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.epsilon > 0.0) {
            return Err(RenderError::InvalidConfiguration("march epsilon must be positive"));
        }
        if !(self.max_depth > 0.0) {
            return Err(RenderError::InvalidConfiguration("march max depth must be positive"));
        }
        if !(self.normal_offset > 0.0) {
            return Err(RenderError::InvalidConfiguration("normal offset must be positive"));
        }
        if !(self.reflection_bias >= 0.0) {
            return Err(RenderError::InvalidConfiguration("reflection bias can't be negative"));
        }
        if self.max_steps == 0 {
            return Err(RenderError::InvalidConfiguration("march step cap must be non-zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarchOutcome {
    Hit {
        position: Point3<f32>,
        surface: Surface,
    },
    /// Travelled past `max_depth` without hitting anything.
    Escaped,
    /// Ran out of steps before either hitting or escaping.
    Exhausted,
}

pub struct Marcher<'a> {
    scene: &'a SdfEntity,
    config: &'a MarchConfig,
}

impl<'a> Marcher<'a> {
    pub fn new(scene: &'a SdfEntity, config: &'a MarchConfig) -> Self {
        Marcher { scene, config }
    }

    pub fn march(&self, origin: &Point3<f32>, direction: &Vector3<f32>, start_depth: f32) -> MarchOutcome {
        let mut depth = start_depth;
        for _ in 0..self.config.max_steps {
            if depth >= self.config.max_depth {
                return MarchOutcome::Escaped;
            }
            let position = origin + direction * depth;
            let surface = self.scene.surface_at(&position);
            if surface.distance < self.config.epsilon {
                return MarchOutcome::Hit { position, surface };
            }
            depth += surface.distance;
        }
        if depth >= self.config.max_depth {
            MarchOutcome::Escaped
        } else {
            MarchOutcome::Exhausted
        }
    }

    /// Forward-difference gradient of the field at `position`, where the field reads `distance`.
    ///
    /// Falls back to `fallback` when the gradient vanishes.
    pub fn normal_at(&self, position: &Point3<f32>, distance: f32, fallback: Vector3<f32>) -> Vector3<f32> {
        let offset = self.config.normal_offset;
        let sample = |step: Vector3<f32>| self.scene.distance_to(&(position + step));
        let gradient = (Vector3::new(
            sample(Vector3::new(offset, 0.0, 0.0)),
            sample(Vector3::new(0.0, offset, 0.0)),
            sample(Vector3::new(0.0, 0.0, offset)),
        ) - Vector3::repeat(distance)) / offset;
        gradient.try_normalize(0.0).unwrap_or(fallback)
    }

    pub fn cast_ray(&self, ray: &Ray) -> Color {
        self.trace(&ray.origin, &ray.direction, 0.0, 0)
    }

    pub fn trace(&self, origin: &Point3<f32>, direction: &Vector3<f32>, start_depth: f32, reflections: u32) -> Color {
        match self.march(origin, direction, start_depth) {
            MarchOutcome::Hit { position, surface } => {
                if reflections < self.config.max_reflections {
                    let normal = self.normal_at(&position, surface.distance, -direction);
                    let reflected = reflect(direction, &normal);
                    let bounced = self.trace(&position, &reflected, self.config.reflection_bias, reflections + 1);
                    surface.material.color.component_mul(&bounced)
                } else {
                    surface.material.color
                }
            }
            MarchOutcome::Escaped => self.config.background,
            MarchOutcome::Exhausted => {
                tracing::trace!(?origin, ?direction, "march hit the step cap");
                self.config.background
            }
        }
    }
}

pub fn reflect(incident: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}
