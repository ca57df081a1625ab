//! The built-in room: two spheres inside six thin mirrored walls.

use nalgebra::{Point3, Rotation3, Vector3};
use super::{
    builder::SdfBuilder,
    camera::Camera,
    component::Material,
    elements::SdfEntity,
    error::RenderError,
};

const WALL_OFFSET: f32 = 20.0;
const WALL_HALF_SIZE: f32 = 5.0;
const WALL_HALF_THICKNESS: f32 = 0.001;

fn wall(center: Point3<f32>, thin_axis: usize, material: Material) -> SdfBuilder {
    let mut extents = Vector3::repeat(WALL_HALF_SIZE);
    extents[thin_axis] = WALL_HALF_THICKNESS;
    SdfBuilder::cuboid(center, extents, material)
}

pub fn default_scene() -> SdfEntity {
    let cyan = Material::new(0.9, 0.999, 0.999);
    let pink = Material::new(0.999, 0.9, 0.9);
    let yellow = Material::new(0.999, 0.999, 0.9);
    let blue = Material::new(0.9, 0.9, 0.999);

    let spheres = SdfBuilder::sphere(Point3::new(0.0, 0.0, -12.0), 7.0, cyan)
        .union(SdfBuilder::sphere(Point3::new(-1.5, 0.0, 0.0), 1.0, pink));

    let floor_and_ceiling = wall(Point3::new(0.0, WALL_OFFSET, 0.0), 1, yellow)
        .union(wall(Point3::new(0.0, -WALL_OFFSET, 0.0), 1, cyan));
    let far_walls = wall(Point3::new(-WALL_OFFSET, 0.0, 0.0), 0, yellow)
        .union3(
            wall(Point3::new(0.0, 0.0, -WALL_OFFSET), 2, cyan),
            floor_and_ceiling,
        );
    let walls = wall(Point3::new(WALL_OFFSET, 0.0, 0.0), 0, pink)
        .union3(
            wall(Point3::new(0.0, 0.0, WALL_OFFSET), 2, blue),
            far_walls,
        );

    spheres.union(walls).finalize()
}

pub fn default_camera_position() -> Point3<f32> {
    Point3::new(-6.0, 3.0, -6.0)
}

/// Yaw about +Y, then pitch about the yawed +X.
pub fn default_camera_rotation() -> Rotation3<f32> {
    Rotation3::from_axis_angle(&Vector3::y_axis(), 0.7)
        * Rotation3::from_axis_angle(&Vector3::x_axis(), 0.48)
}

pub fn default_camera(width: u32, height: u32, fov: f32) -> Result<Camera, RenderError> {
    Camera::new(width, height, fov, default_camera_position(), default_camera_rotation())
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_4;
    use crate::{
        component::Material,
        elements::SdfElement,
        scene::*,
    };

    #[test]
    fn default_scene_layout() {
        let scene = default_scene();

        // Inside the small sphere
        let inside = scene.surface_at(&Point3::new(-1.5, 0.0, 0.0));
        assert!(approx_eq!(f32, inside.distance, -1.0, epsilon = 1e-6));
        assert_eq!(inside.material, Material::new(0.999, 0.9, 0.9));

        // On the ceiling wall
        let ceiling = scene.surface_at(&Point3::new(0.0, 20.0 - 0.001, 0.0));
        assert!(approx_eq!(f32, ceiling.distance, 0.0, epsilon = 1e-5));
        assert_eq!(ceiling.material, Material::new(0.999, 0.999, 0.9));

        // Beside the +z wall
        let side = scene.surface_at(&Point3::new(0.0, 0.0, 19.0));
        assert!(approx_eq!(f32, side.distance, 1.0 - 0.001, epsilon = 1e-5));
        assert_eq!(side.material, Material::new(0.9, 0.9, 0.999));
    }

    #[test]
    fn default_camera_sits_outside_the_geometry() {
        let camera = default_camera(240, 135, FRAC_PI_4).unwrap();
        assert!(default_scene().distance_to(&camera.position()) > 0.0);
        // Looking down and in towards the spheres
        let forward = camera.forward();
        assert!(forward.x > 0.0 && forward.z > 0.0 && forward.y < 0.0);
    }
}
