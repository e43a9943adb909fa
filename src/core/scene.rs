//! # Scene
//!
//! As the scene file is parsed, objects are registered by name with a
//! **SceneBuilder**. Assemblies refer to their children by name, so
//! objects may be declared in any order; names are resolved once,
//! when the builder turns into an immutable **Scene**.
//!
//! ```rust
//! use rs_sqtrace::core::geometry::Point3f;
//! use rs_sqtrace::core::object::{Assembly, Object};
//! use rs_sqtrace::core::scene::SceneBuilder;
//! use rs_sqtrace::shapes::superquadric::Superquadric;
//!
//!     let mut builder = SceneBuilder::new();
//!     builder
//!         .add_object("group", Object::from(Assembly::new()), true)
//!         .unwrap();
//!     builder
//!         .add_object("ball", Object::from(Superquadric::new(1.0, 1.0).unwrap()), false)
//!         .unwrap();
//!     builder.add_child("group", "ball").unwrap();
//!     let scene = builder.build().unwrap();
//!     assert!(scene.io_test(&Point3f::default()));
//! ```

// std
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
// others
use log::debug;
// sqtrace
use crate::core::camera::Camera;
use crate::core::error::{Result, SqError};
use crate::core::geometry::{Point3f, Ray};
use crate::core::interaction::Intersection;
use crate::core::object::Object;
use crate::core::sqtrace::Float;
use crate::lights::point::PointLight;

struct Entry {
    object: Object,
    children: Vec<String>,
}

#[derive(Default)]
pub struct SceneBuilder {
    entries: HashMap<String, Entry>,
    // declaration order
    names: Vec<String>,
    roots: Vec<String>,
    lights: Vec<PointLight>,
    camera: Camera,
}

impl SceneBuilder {
    pub fn new() -> Self {
        SceneBuilder::default()
    }
    /// Register an object under a unique name. Root objects are the
    /// ones rays are traced against.
    pub fn add_object(&mut self, name: &str, object: Object, is_root: bool) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(SqError::DuplicateName(name.to_string()));
        }
        debug!("add object {:?} (root: {})", name, is_root);
        self.entries.insert(
            name.to_string(),
            Entry {
                object,
                children: Vec::new(),
            },
        );
        self.names.push(name.to_string());
        if is_root {
            self.roots.push(name.to_string());
        }
        Ok(())
    }
    /// Attach the object called *child* to the assembly called
    /// *assembly*. The child does not need to exist yet.
    pub fn add_child(&mut self, assembly: &str, child: &str) -> Result<()> {
        let entry = self
            .entries
            .get_mut(assembly)
            .ok_or_else(|| SqError::UnknownObject(assembly.to_string()))?;
        if !entry.object.is_assembly() {
            return Err(SqError::NotAnAssembly(assembly.to_string()));
        }
        entry.children.push(child.to_string());
        Ok(())
    }
    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }
    /// Resolve all child names and freeze the graph.
    pub fn build(mut self) -> Result<Scene> {
        let mut built: HashMap<String, Arc<Object>> = HashMap::new();
        let mut visiting: HashSet<String> = HashSet::new();
        let names = std::mem::take(&mut self.names);
        for name in &names {
            self.materialize(name, &mut built, &mut visiting)?;
        }
        let mut roots: Vec<Arc<Object>> = Vec::with_capacity(self.roots.len());
        for name in &self.roots {
            if let Some(object) = built.get(name) {
                roots.push(object.clone());
            }
        }
        debug!(
            "scene with {} object(s), {} root(s), {} light(s)",
            built.len(),
            roots.len(),
            self.lights.len()
        );
        Ok(Scene {
            roots,
            objects: built,
            lights: self.lights,
            camera: self.camera,
        })
    }
    fn materialize(
        &mut self,
        name: &str,
        built: &mut HashMap<String, Arc<Object>>,
        visiting: &mut HashSet<String>,
    ) -> Result<Arc<Object>> {
        if let Some(object) = built.get(name) {
            return Ok(object.clone());
        }
        if !visiting.insert(name.to_string()) {
            return Err(SqError::CyclicReference(name.to_string()));
        }
        let children: Vec<String> = match self.entries.get(name) {
            Some(entry) => entry.children.clone(),
            None => return Err(SqError::UnknownObject(name.to_string())),
        };
        let mut resolved: Vec<Arc<Object>> = Vec::with_capacity(children.len());
        for child in &children {
            if !self.entries.contains_key(child) && !built.contains_key(child) {
                return Err(SqError::MissingChildReference {
                    assembly: name.to_string(),
                    child: child.clone(),
                });
            }
            resolved.push(self.materialize(child, built, visiting)?);
        }
        let mut object: Object = match self.entries.remove(name) {
            Some(entry) => entry.object,
            None => return Err(SqError::UnknownObject(name.to_string())),
        };
        if let Object::Assembly(assembly) = &mut object {
            for child in resolved {
                assembly.add_child(child);
            }
        }
        visiting.remove(name);
        let object = Arc::new(object);
        built.insert(name.to_string(), object.clone());
        Ok(object)
    }
}

/// Immutable scene graph plus lights and camera; shared by all render
/// threads.
pub struct Scene {
    roots: Vec<Arc<Object>>,
    objects: HashMap<String, Arc<Object>>,
    lights: Vec<PointLight>,
    camera: Camera,
}

impl Scene {
    pub fn get_object(&self, name: &str) -> Option<&Arc<Object>> {
        self.objects.get(name)
    }
    pub fn get_camera(&self) -> &Camera {
        &self.camera
    }
    pub fn get_lights(&self) -> &[PointLight] {
        &self.lights
    }
    pub fn roots(&self) -> &[Arc<Object>] {
        &self.roots
    }
    /// Is the world space point inside any root object?
    pub fn io_test(&self, point: &Point3f) -> bool {
        self.roots.iter().any(|root| root.io_test(point))
    }
    /// Nearest hit over all roots, the earlier root wins ties.
    pub fn closest_intersection(&self, ray: &Ray) -> (Float, Intersection) {
        let mut closest: (Float, Intersection) = (Float::INFINITY, Intersection::default());
        for root in &self.roots {
            let (t, isect) = root.closest_intersection(ray);
            if t < closest.0 {
                closest = (t, isect);
            }
        }
        closest
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::core::object::Assembly;
    use crate::core::transform::Transformation;
    use crate::shapes::superquadric::Superquadric;

    fn sphere() -> Object {
        Object::from(Superquadric::new(1.0, 1.0).unwrap())
    }

    #[test]
    fn children_resolve_in_any_order() {
        let mut builder = SceneBuilder::new();
        let mut group = Object::from(Assembly::new());
        group
            .add_transform(Transformation::scale(Vector3f::new(2.0, 2.0, 2.0)).unwrap())
            .unwrap();
        builder.add_object("group", group, true).unwrap();
        builder.add_child("group", "ball").unwrap();
        builder.add_object("ball", sphere(), false).unwrap();
        let scene = builder.build().unwrap();
        assert_eq!(scene.roots().len(), 1);
        assert!(scene.get_object("ball").is_some());
        let ray = Ray::new(Point3f::new(0.0, 0.0, 10.0), Vector3f::new(0.0, 0.0, -1.0));
        let (t, hit) = scene.closest_intersection(&ray);
        assert!((t - 8.0).abs() < 1e-6);
        assert!(hit.is_hit());
        assert!(scene.io_test(&Point3f::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn shared_children_are_built_once() {
        let mut builder = SceneBuilder::new();
        builder.add_object("a", Object::from(Assembly::new()), true).unwrap();
        builder.add_object("b", Object::from(Assembly::new()), true).unwrap();
        builder.add_object("ball", sphere(), false).unwrap();
        builder.add_child("a", "ball").unwrap();
        builder.add_child("b", "ball").unwrap();
        let scene = builder.build().unwrap();
        let first = match &**scene.get_object("a").unwrap() {
            Object::Assembly(a) => a.children()[0].clone(),
            _ => unreachable!(),
        };
        let second = match &**scene.get_object("b").unwrap() {
            Object::Assembly(b) => b.children()[0].clone(),
            _ => unreachable!(),
        };
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_child_is_reported() {
        let mut builder = SceneBuilder::new();
        builder.add_object("group", Object::from(Assembly::new()), true).unwrap();
        builder.add_child("group", "ghost").unwrap();
        match builder.build() {
            Err(SqError::MissingChildReference { assembly, child }) => {
                assert_eq!(assembly, "group");
                assert_eq!(child, "ghost");
            }
            other => panic!("unexpected {:?}", other.err()),
        }
    }

    #[test]
    fn builder_rejects_bad_graphs() {
        let mut builder = SceneBuilder::new();
        builder.add_object("ball", sphere(), true).unwrap();
        assert!(matches!(
            builder.add_object("ball", sphere(), false),
            Err(SqError::DuplicateName(_))
        ));
        assert!(matches!(
            builder.add_child("ball", "x"),
            Err(SqError::NotAnAssembly(_))
        ));
        assert!(matches!(
            builder.add_child("nowhere", "ball"),
            Err(SqError::UnknownObject(_))
        ));
        let mut cyclic = SceneBuilder::new();
        cyclic.add_object("a", Object::from(Assembly::new()), true).unwrap();
        cyclic.add_object("b", Object::from(Assembly::new()), false).unwrap();
        cyclic.add_child("a", "b").unwrap();
        cyclic.add_child("b", "a").unwrap();
        assert!(matches!(cyclic.build(), Err(SqError::CyclicReference(_))));
    }

    #[test]
    fn empty_scene_misses_everything() {
        let scene = SceneBuilder::new().build().unwrap();
        let ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, -1.0));
        let (t, hit) = scene.closest_intersection(&ray);
        assert_eq!(t, Float::INFINITY);
        assert!(!hit.is_hit());
        assert!(!scene.io_test(&Point3f::default()));
        assert!(scene.get_lights().is_empty());
        assert_eq!(scene.get_camera().frustum.fov, 60.0);
    }
}
