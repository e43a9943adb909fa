//! The result of a ray query: where the nearest surface was hit, its
//! orientation there, and which primitive was hit.

// sqtrace
use crate::core::geometry::{Normal3f, Point3f, Ray, Vector3f};
use crate::core::transform::Transform;
use crate::shapes::superquadric::Superquadric;

/// Surface hit stored as a ray: the origin is the hit point and the
/// direction is the unit surface normal, both expressed in the space
/// of whoever asked. A miss carries no primitive.
#[derive(Debug, Default, Copy, Clone)]
pub struct Intersection<'a> {
    pub location: Ray,
    pub primitive: Option<&'a Superquadric>,
}

impl<'a> Intersection<'a> {
    pub fn new(p: Point3f, n: Normal3f, primitive: &'a Superquadric) -> Self {
        Intersection {
            location: Ray::new(p, Vector3f::from(n)),
            primitive: Some(primitive),
        }
    }
    pub fn is_hit(&self) -> bool {
        self.primitive.is_some()
    }
    /// Hit point.
    pub fn p(&self) -> Point3f {
        self.location.o
    }
    /// Unit surface normal.
    pub fn n(&self) -> Normal3f {
        Normal3f::from(self.location.d)
    }
    /// Carry the hit from a child space into the parent space. The
    /// point goes through the full matrix, the normal through the
    /// inverse transpose and is renormalized afterwards.
    pub fn transformed(&self, local_to_parent: &Transform) -> Intersection<'a> {
        let p: Point3f = local_to_parent.transform_point(&self.location.o);
        let n: Normal3f = local_to_parent
            .transform_normal(&Normal3f::from(self.location.d))
            .normalize();
        Intersection {
            location: Ray::new(p, Vector3f::from(n)),
            primitive: self.primitive,
        }
    }
}
