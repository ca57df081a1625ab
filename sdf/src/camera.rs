//! Pinhole camera mapping pixel coordinates to world-space rays.

use float_cmp::approx_eq;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use std::f32::consts::FRAC_PI_2;
use super::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit length.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    basis: Matrix3<f32>,
    fov_factor: f32,
    aspect_ratio: f32,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(
        width: u32,
        height: u32,
        fov: f32,
        position: Point3<f32>,
        rotation: Rotation3<f32>,
    ) -> Result<Self, RenderError> {
        Self::with_basis(width, height, fov, position, rotation.into_inner())
    }

    /// Like [`Camera::new`] but takes a raw 3x3 basis, which must be orthonormal.
    pub fn with_basis(
        width: u32,
        height: u32,
        fov: f32,
        position: Point3<f32>,
        basis: Matrix3<f32>,
    ) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfiguration("image dimensions must be non-zero"));
        }
        if !fov.is_finite() || fov <= 0.0 || fov >= FRAC_PI_2 {
            return Err(RenderError::InvalidConfiguration("field of view must lie in (0, pi/2) radians"));
        }
        let gram = basis.transpose() * basis;
        let orthonormal = (0..3).all(|row| {
            (0..3).all(|col| {
                let expected = if row == col { 1.0 } else { 0.0 };
                approx_eq!(f32, gram[(row, col)], expected, epsilon = 1e-4)
            })
        });
        if !orthonormal {
            return Err(RenderError::InvalidConfiguration("camera basis must be orthonormal"));
        }

        Ok(Camera {
            position,
            basis,
            fov_factor: 1.0 / fov.tan(),
            aspect_ratio: width as f32 / height as f32,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn fov_factor(&self) -> f32 {
        self.fov_factor
    }

    /// World-space direction of the ray through the center of the viewport.
    pub fn forward(&self) -> Vector3<f32> {
        (self.basis * Vector3::new(0.0, 0.0, self.fov_factor)).normalize()
    }

    pub fn get_ray(&self, x: u32, y: u32) -> Ray {
        let u = (x as f32 / self.width as f32) * 2.0 - 1.0;
        let v = (y as f32 / self.height as f32) * 2.0 - 1.0;
        let local = Vector3::new(u * self.aspect_ratio, v, self.fov_factor);
        Ray {
            origin: self.position,
            direction: (self.basis * local).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use nalgebra::{Matrix3, Point3, Rotation3, Vector3};
    use std::f32::consts::FRAC_PI_4;
    use crate::{
        camera::*,
        error::RenderError,
    };

    fn assert_vec_eq(a: Vector3<f32>, b: Vector3<f32>) {
        for (lhs, rhs) in a.iter().zip(b.iter()) {
            assert!(approx_eq!(f32, *lhs, *rhs, epsilon = 1e-6), "{} != {}", a, b);
        }
    }

    #[test]
    fn center_pixel_looks_forward() {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), 0.7)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), 0.48);
        let camera = Camera::new(240, 136, FRAC_PI_4, Point3::new(-6.0, 3.0, -6.0), rotation).unwrap();
        let ray = camera.get_ray(120, 68);
        assert_eq!(ray.origin, Point3::new(-6.0, 3.0, -6.0));
        assert_vec_eq(ray.direction, camera.forward());
        assert_vec_eq(camera.forward(), rotation * Vector3::z());
    }

    #[test]
    fn aspect_stretches_horizontal_axis_only() {
        let camera = Camera::new(8, 4, FRAC_PI_4, Point3::origin(), Rotation3::identity()).unwrap();
        assert!(approx_eq!(f32, camera.fov_factor(), 1.0, epsilon = 1e-6));
        // Top-left pixel maps to uv (-1, -1), scaled by aspect 2 horizontally
        let ray = camera.get_ray(0, 0);
        assert_vec_eq(ray.direction, Vector3::new(-2.0, -1.0, 1.0).normalize());
    }

    #[test]
    fn rays_are_unit_length() {
        let camera = Camera::new(17, 9, 0.3, Point3::new(1.0, 2.0, 3.0),
            Rotation3::from_euler_angles(0.1, 0.2, 0.3)).unwrap();
        for y in 0..9 {
            for x in 0..17 {
                let ray = camera.get_ray(x, y);
                assert!(approx_eq!(f32, ray.direction.norm(), 1.0, epsilon = 1e-5));
            }
        }
    }

    #[test]
    fn rejects_degenerate_configuration() {
        let position = Point3::origin();
        assert!(matches!(
            Camera::new(0, 4, FRAC_PI_4, position, Rotation3::identity()),
            Err(RenderError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Camera::new(4, 4, 0.0, position, Rotation3::identity()),
            Err(RenderError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Camera::new(4, 4, f32::NAN, position, Rotation3::identity()),
            Err(RenderError::InvalidConfiguration(_))
        ));
        let skewed = Matrix3::new(
            1.0, 0.5, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        );
        assert!(matches!(
            Camera::with_basis(4, 4, FRAC_PI_4, position, skewed),
            Err(RenderError::InvalidConfiguration(_))
        ));
    }
}
