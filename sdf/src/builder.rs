use nalgebra::{Point3, Vector3};
use super::{
    component::Material,
    elements::*,
};

/// Bottom-up construction of an [`SdfEntity`] tree.
///
/// Operand order is kept as written, so `a.union(b)` resolves exact ties to `b`.
pub struct SdfBuilder {
    root: SdfEntity,
}

impl SdfBuilder {
    pub fn primitive<T: Into<SdfEntity>>(prim: T) -> Self {
        SdfBuilder {
            root: prim.into(),
        }
    }

    pub fn sphere(center: Point3<f32>, radius: f32, material: Material) -> Self {
        Self::primitive(SdfSphere::new(center, radius, material))
    }

    pub fn cuboid(center: Point3<f32>, extents: Vector3<f32>, material: Material) -> Self {
        Self::primitive(SdfBox::new(center, extents, material))
    }

    pub fn union(self, other: SdfBuilder) -> Self {
        SdfBuilder {
            root: SdfUnion::new(self.root, other.root).into(),
        }
    }

    pub fn union3(self, second: SdfBuilder, third: SdfBuilder) -> Self {
        SdfBuilder {
            root: SdfUnion3::new(self.root, second.root, third.root).into(),
        }
    }

    pub fn finalize(self) -> SdfEntity {
        self.root
    }
}
