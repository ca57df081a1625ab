use enum_dispatch::enum_dispatch;
use nalgebra::{Point3, Vector3};
use super::component::*;

#[enum_dispatch]
pub trait SdfElement {
    fn surface_at(&self, point: &Point3<f32>) -> Surface;

    fn distance_to(&self, point: &Point3<f32>) -> f32 {
        self.surface_at(point).distance
    }
}

/// Node of an immutable scene tree. Every combinator owns its children.
#[enum_dispatch(SdfElement)]
#[derive(Debug, Clone)]
pub enum SdfEntity {
    SdfSphere,
    SdfBox,
    SdfUnion,
    SdfUnion3,
}

// Primitives

#[derive(Debug, Clone)]
pub struct SdfSphere {
    pub center: Point3<f32>,
    pub radius: f32,
    pub material: Material,
}

impl SdfSphere {
    pub fn new(center: Point3<f32>, radius: f32, material: Material) -> Self {
        debug_assert!(radius >= 0.0, "Sphere radius can't be negative!");
        SdfSphere {
            center,
            radius,
            material,
        }
    }
}

impl SdfElement for SdfSphere {
    fn surface_at(&self, point: &Point3<f32>) -> Surface {
        Surface {
            distance: (point - self.center).norm() - self.radius,
            material: self.material,
        }
    }
}

/// Axis aligned box. `extents` are half-widths along each axis.
#[derive(Debug, Clone)]
pub struct SdfBox {
    pub center: Point3<f32>,
    pub extents: Vector3<f32>,
    pub material: Material,
}

impl SdfBox {
    pub fn new(center: Point3<f32>, extents: Vector3<f32>, material: Material) -> Self {
        debug_assert!(
            extents.iter().all(|extent| *extent >= 0.0),
            "Box extents can't be negative!"
        );
        SdfBox {
            center,
            extents,
            material,
        }
    }
}

impl SdfElement for SdfBox {
    fn surface_at(&self, point: &Point3<f32>) -> Surface {
        let q = (point - self.center).abs() - self.extents;
        let outside = q.sup(&Vector3::zeros()).norm();
        let inside = q.x.max(q.y.max(q.z)).min(0.0);
        Surface {
            distance: outside + inside,
            material: self.material,
        }
    }
}

// Operations

// Strict comparison: on an exact tie the later operand wins.
fn nearest(first: Surface, second: Surface) -> Surface {
    if first.distance < second.distance {
        first
    } else {
        second
    }
}

#[derive(Debug, Clone)]
pub struct SdfUnion {
    pub first: Box<SdfEntity>,
    pub second: Box<SdfEntity>,
}

impl SdfUnion {
    pub fn new(first: SdfEntity, second: SdfEntity) -> Self {
        SdfUnion {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl SdfElement for SdfUnion {
    fn surface_at(&self, point: &Point3<f32>) -> Surface {
        nearest(self.first.surface_at(point), self.second.surface_at(point))
    }
}

#[derive(Debug, Clone)]
pub struct SdfUnion3 {
    pub first: Box<SdfEntity>,
    pub second: Box<SdfEntity>,
    pub third: Box<SdfEntity>,
}

impl SdfUnion3 {
    pub fn new(first: SdfEntity, second: SdfEntity, third: SdfEntity) -> Self {
        SdfUnion3 {
            first: Box::new(first),
            second: Box::new(second),
            third: Box::new(third),
        }
    }
}

impl SdfElement for SdfUnion3 {
    fn surface_at(&self, point: &Point3<f32>) -> Surface {
        let first = self.first.surface_at(point);
        let second = self.second.surface_at(point);
        let third = self.third.surface_at(point);
        nearest(nearest(first, second), third)
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;
    use float_cmp::approx_eq;
    use nalgebra::{Point3, Vector3};
    use crate::{
        component::*,
        elements::*,
    };

    fn random_point(rng: &mut ThreadRng) -> Point3<f32> {
        Point3::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
        )
    }

    fn red() -> Material {
        Material::new(0.9, 0.1, 0.1)
    }

    fn blue() -> Material {
        Material::new(0.1, 0.1, 0.9)
    }

    fn green() -> Material {
        Material::new(0.1, 0.9, 0.1)
    }

    #[test]
    fn sphere_sign_matches_side() {
        let mut rng = thread_rng();
        let center = Point3::new(1.0, -2.0, 3.0);
        let sphere = SdfSphere::new(center, 4.0, red());
        for _ in 0..256 {
            let point = random_point(&mut rng);
            let offset = (point - center).norm();
            let distance = sphere.distance_to(&point);
            assert!(approx_eq!(f32, distance, offset - 4.0, epsilon = 1e-4),
                "Point: {}, distance: {}", point, distance);
            if offset > 4.0 + 1e-3 {
                assert!(distance > 0.0);
            } else if offset < 4.0 - 1e-3 {
                assert!(distance < 0.0);
            }
        }
    }

    #[test]
    fn sphere_surface_and_center() {
        let sphere = SdfSphere::new(Point3::origin(), 2.0, red());
        assert!(approx_eq!(f32, sphere.distance_to(&Point3::new(0.0, 2.0, 0.0)), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, sphere.distance_to(&Point3::origin()), -2.0, epsilon = 1e-6));
        assert_eq!(sphere.surface_at(&Point3::origin()).material, red());
    }

    #[test]
    fn box_faces_corners_and_center() {
        let cuboid = SdfBox::new(Point3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 2.0, 3.0), blue());

        // On each face
        for face in [
            Point3::new(2.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 4.0),
        ] {
            assert!(approx_eq!(f32, cuboid.distance_to(&face), 0.0, epsilon = 1e-6),
                "Face point {} not on surface!", face);
        }

        // Exactly at a corner, then one unit out along the diagonal
        let corner = Point3::new(2.0, 3.0, 4.0);
        assert!(approx_eq!(f32, cuboid.distance_to(&corner), 0.0, epsilon = 1e-6));
        let beyond = corner + Vector3::new(1.0, 1.0, 1.0);
        assert!(approx_eq!(f32, cuboid.distance_to(&beyond), 3_f32.sqrt(), epsilon = 1e-5));

        // Center sits min(extents) away from the closest face
        let center = cuboid.distance_to(&Point3::new(1.0, 1.0, 1.0));
        assert!(approx_eq!(f32, center, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn box_outside_points_are_positive() {
        let mut rng = thread_rng();
        let cuboid = SdfBox::new(Point3::origin(), Vector3::new(5.0, 0.5, 2.0), blue());
        for _ in 0..256 {
            let point = random_point(&mut rng);
            let outside = point.x.abs() > 5.0 || point.y.abs() > 0.5 || point.z.abs() > 2.0;
            let distance = cuboid.distance_to(&point);
            assert_eq!(outside, distance > 0.0, "Point: {}, distance: {}", point, distance);
        }
    }

    #[test]
    fn union_picks_nearest() {
        let mut rng = thread_rng();
        let first = SdfSphere::new(Point3::new(-3.0, 0.0, 0.0), 1.0, red());
        let second = SdfBox::new(Point3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0), blue());
        let union = SdfUnion::new(first.clone().into(), second.clone().into());
        for _ in 0..256 {
            let point = random_point(&mut rng);
            let expected = first.distance_to(&point).min(second.distance_to(&point));
            assert_eq!(union.distance_to(&point), expected);
        }
    }

    #[test]
    fn union_tie_goes_to_second() {
        let first = SdfSphere::new(Point3::new(-1.0, 0.0, 0.0), 1.5, red());
        let second = SdfSphere::new(Point3::new(1.0, 0.0, 0.0), 1.5, blue());
        let midpoint = Point3::origin();
        assert_eq!(first.distance_to(&midpoint), second.distance_to(&midpoint));

        let union = SdfUnion::new(first.clone().into(), second.clone().into());
        assert_eq!(union.surface_at(&midpoint).material, blue());

        let swapped = SdfUnion::new(second.into(), first.into());
        assert_eq!(swapped.surface_at(&midpoint).material, red());
    }

    #[test]
    fn union3_cascades_ties() {
        let left = SdfSphere::new(Point3::new(-1.0, 0.0, 0.0), 0.5, red());
        let right = SdfSphere::new(Point3::new(1.0, 0.0, 0.0), 0.5, blue());
        let far = SdfSphere::new(Point3::new(0.0, 10.0, 0.0), 0.5, green());
        let midpoint = Point3::origin();

        // First and second tie, second wins, far third loses
        let union = SdfUnion3::new(left.clone().into(), right.clone().into(), far.clone().into());
        assert_eq!(union.surface_at(&midpoint).material, blue());

        // Tie between the first-pair winner and the third resolves to the third
        let union = SdfUnion3::new(far.clone().into(), left.clone().into(), right.clone().into());
        assert_eq!(union.surface_at(&midpoint).material, blue());
        let union = SdfUnion3::new(left.clone().into(), far.into(), right.into());
        assert_eq!(union.surface_at(&midpoint).material, blue());
    }

    #[test]
    fn union3_picks_nearest() {
        let mut rng = thread_rng();
        let parts = [
            SdfSphere::new(Point3::new(-5.0, 0.0, 0.0), 1.0, red()),
            SdfSphere::new(Point3::new(0.0, 5.0, 0.0), 2.0, blue()),
            SdfSphere::new(Point3::new(0.0, 0.0, 5.0), 3.0, green()),
        ];
        let union = SdfUnion3::new(parts[0].clone().into(), parts[1].clone().into(), parts[2].clone().into());
        for _ in 0..256 {
            let point = random_point(&mut rng);
            let expected = parts.iter()
                .map(|part| part.distance_to(&point))
                .fold(f32::INFINITY, f32::min);
            assert_eq!(union.distance_to(&point), expected);
        }
    }

    #[test]
    fn nested_entities_dispatch() {
        let tree: SdfEntity = SdfUnion::new(
            SdfUnion3::new(
                SdfSphere::new(Point3::new(0.0, 0.0, 0.0), 1.0, red()).into(),
                SdfBox::new(Point3::new(4.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0), blue()).into(),
                SdfSphere::new(Point3::new(8.0, 0.0, 0.0), 1.0, green()).into(),
            ).into(),
            SdfSphere::new(Point3::new(0.0, 8.0, 0.0), 1.0, red()).into(),
        ).into();
        let surface = tree.surface_at(&Point3::new(4.0, 0.0, 2.0));
        assert!(approx_eq!(f32, surface.distance, 1.0, epsilon = 1e-6));
        assert_eq!(surface.material, blue());
    }
}
