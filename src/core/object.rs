//! An **Object** is the node type of the scene graph. It is either a
//! leaf **Superquadric** or an **Assembly** grouping other objects
//! under a shared transform list.
//!
//! Every object maps its own local space into the space of its
//! parent. Queries arrive in the parent space, get carried into local
//! space, are answered by the leaves in body space, and the answers
//! travel back out through each enclosing assembly.

// std
use std::sync::Arc;
// others
use smallvec::SmallVec;
// sqtrace
use crate::core::error::Result;
use crate::core::geometry::{Point3f, Ray};
use crate::core::interaction::Intersection;
use crate::core::sqtrace::Float;
use crate::core::transform::{compose_local_to_parent, Transform, Transformation};
use crate::shapes::superquadric::Superquadric;

#[derive(Debug, Clone)]
pub enum Object {
    Superquadric(Superquadric),
    Assembly(Assembly),
}

impl Object {
    /// Is the point (in the parent space) strictly inside any leaf?
    pub fn io_test(&self, point: &Point3f) -> bool {
        match self {
            Object::Superquadric(superquadric) => superquadric.io_test(point),
            Object::Assembly(assembly) => assembly.io_test(point),
        }
    }
    /// Nearest hit along a parent space ray, `Float::INFINITY` with an
    /// empty intersection if there is none.
    pub fn closest_intersection(&self, ray: &Ray) -> (Float, Intersection) {
        match self {
            Object::Superquadric(superquadric) => superquadric.closest_intersection(ray),
            Object::Assembly(assembly) => assembly.closest_intersection(ray),
        }
    }
    pub fn add_transform(&mut self, t: Transformation) -> Result<()> {
        match self {
            Object::Superquadric(superquadric) => superquadric.add_transform(t),
            Object::Assembly(assembly) => assembly.add_transform(t),
        }
    }
    pub fn transforms(&self) -> &[Transformation] {
        match self {
            Object::Superquadric(superquadric) => superquadric.transforms(),
            Object::Assembly(assembly) => assembly.transforms(),
        }
    }
    pub fn is_assembly(&self) -> bool {
        matches!(self, Object::Assembly(_))
    }
}

impl From<Superquadric> for Object {
    fn from(superquadric: Superquadric) -> Self {
        Object::Superquadric(superquadric)
    }
}

impl From<Assembly> for Object {
    fn from(assembly: Assembly) -> Self {
        Object::Assembly(assembly)
    }
}

/// Children are shared, the same object may appear under several
/// assemblies. The graph must stay acyclic.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    children: Vec<Arc<Object>>,
    transforms: SmallVec<[Transformation; 4]>,
    local_to_parent: Transform,
    parent_to_local: Transform,
}

impl Assembly {
    pub fn new() -> Self {
        Assembly::default()
    }
    pub fn add_child(&mut self, child: Arc<Object>) {
        self.children.push(child);
    }
    pub fn children(&self) -> &[Arc<Object>] {
        &self.children
    }
    pub fn add_transform(&mut self, t: Transformation) -> Result<()> {
        self.transforms.push(t);
        match compose_local_to_parent(&self.transforms) {
            Ok(l2p) => {
                self.local_to_parent = l2p;
                self.parent_to_local = Transform::inverse(&l2p);
                Ok(())
            }
            Err(err) => {
                self.transforms.pop();
                Err(err)
            }
        }
    }
    pub fn transforms(&self) -> &[Transformation] {
        &self.transforms
    }
    pub fn local_to_parent(&self) -> &Transform {
        &self.local_to_parent
    }
    pub fn parent_to_local(&self) -> &Transform {
        &self.parent_to_local
    }
    pub fn io_test(&self, point: &Point3f) -> bool {
        let p: Point3f = self.parent_to_local.transform_point(point);
        self.children.iter().any(|child| child.io_test(&p))
    }
    pub fn closest_intersection(&self, ray: &Ray) -> (Float, Intersection) {
        let local_ray: Ray = ray.transformed(&self.parent_to_local);
        let mut closest: (Float, Intersection) = (Float::INFINITY, Intersection::default());
        for child in &self.children {
            let (t, isect) = child.closest_intersection(&local_ray);
            // strict comparison, the first child wins ties
            if t < closest.0 {
                closest = (t, isect);
            }
        }
        if closest.0 == Float::INFINITY {
            return closest;
        }
        (closest.0, closest.1.transformed(&self.local_to_parent))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;

    fn sphere() -> Superquadric {
        Superquadric::new(1.0, 1.0).unwrap()
    }

    fn down_ray(z: Float) -> Ray {
        Ray::new(Point3f::new(0.0, 0.0, z), Vector3f::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn identity_assembly_delegates() {
        let leaf = Arc::new(Object::from(sphere()));
        let mut assembly = Assembly::new();
        assembly.add_child(leaf.clone());
        let rays = [
            down_ray(5.0),
            Ray::new(Point3f::new(0.2, -0.3, 4.0), Vector3f::new(0.0, 0.1, -1.0)),
            Ray::new(Point3f::new(3.0, 3.0, 3.0), Vector3f::new(1.0, 0.0, 0.0)),
        ];
        for ray in &rays {
            let (t0, i0) = leaf.closest_intersection(ray);
            let (t1, i1) = assembly.closest_intersection(ray);
            assert_eq!(t0, t1);
            assert!((i0.p() - i1.p()).length() < 1e-12);
            assert!((Vector3f::from(i0.n()) - Vector3f::from(i1.n())).length() < 1e-12);
            assert_eq!(i0.is_hit(), i1.is_hit());
        }
        let p = Point3f::new(0.5, 0.5, 0.0);
        assert_eq!(leaf.io_test(&p), assembly.io_test(&p));
    }

    #[test]
    fn scaled_assembly_keeps_ray_parameter() {
        let mut assembly = Assembly::new();
        assembly.add_child(Arc::new(Object::from(sphere())));
        assembly
            .add_transform(Transformation::scale(Vector3f::new(2.0, 2.0, 2.0)).unwrap())
            .unwrap();
        let (t, hit) = assembly.closest_intersection(&down_ray(10.0));
        assert!((t - 8.0).abs() < 1e-6, "t = {}", t);
        assert!((hit.p() - Point3f::new(0.0, 0.0, 2.0)).length() < 1e-6);
        assert!((hit.n().z - 1.0).abs() < 1e-9);
        assert!((hit.n().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nearest_child_wins_and_ties_keep_first() {
        let mut near = sphere();
        near.add_transform(Transformation::translate(Vector3f::new(0.0, 0.0, 2.0)))
            .unwrap();
        let far = sphere();
        let near = Arc::new(Object::from(near));
        let far = Arc::new(Object::from(far));
        let mut assembly = Assembly::new();
        assembly.add_child(far.clone());
        assembly.add_child(near.clone());
        let (t, hit) = assembly.closest_intersection(&down_ray(10.0));
        assert!((t - 7.0).abs() < 1e-6);
        assert!((hit.p().z - 3.0).abs() < 1e-6);
        // two identical children: the first one reports the hit
        let twin_a = Arc::new(Object::from(sphere()));
        let twin_b = Arc::new(Object::from(sphere()));
        let mut twins = Assembly::new();
        twins.add_child(twin_a.clone());
        twins.add_child(twin_b);
        let (_, hit) = twins.closest_intersection(&down_ray(5.0));
        match &*twin_a {
            Object::Superquadric(first) => {
                assert!(std::ptr::eq(hit.primitive.unwrap(), first))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn nested_assemblies_compose() {
        let mut inner = Assembly::new();
        inner.add_child(Arc::new(Object::from(sphere())));
        inner
            .add_transform(Transformation::translate(Vector3f::new(1.0, 0.0, 0.0)))
            .unwrap();
        let mut outer = Assembly::new();
        outer.add_child(Arc::new(Object::from(inner)));
        outer
            .add_transform(Transformation::rotate(Vector3f::new(0.0, 0.0, 1.0), 90.0).unwrap())
            .unwrap();
        // the sphere now sits at (0, 1, 0)
        assert!(outer.io_test(&Point3f::new(0.0, 1.5, 0.0)));
        assert!(!outer.io_test(&Point3f::new(1.5, 0.0, 0.0)));
        let ray = Ray::new(Point3f::new(0.0, 1.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let (t, hit) = outer.closest_intersection(&ray);
        assert!((t - 4.0).abs() < 1e-6);
        assert!((hit.p() - Point3f::new(0.0, 1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn empty_assembly_misses() {
        let mut assembly = Assembly::new();
        assembly
            .add_transform(Transformation::translate(Vector3f::new(1.0, 2.0, 3.0)))
            .unwrap();
        let (t, hit) = assembly.closest_intersection(&down_ray(5.0));
        assert_eq!(t, Float::INFINITY);
        assert!(!hit.is_hit());
        assert_eq!(hit.location, Ray::default());
        assert!(!assembly.io_test(&Point3f::default()));
    }
}
