//! Superquadrics are implicit surfaces controlled by two exponents.
//! In body space the unit superquadric is the zero set of the
//! inside-outside function
//!
//! ```text
//! f(x, y, z) = -1 + |z|^(2/n) + (|x|^(2/e) + |y|^(2/e))^(e/n)
//! ```
//!
//! where *e* shapes the east-west (xy) cross sections and *n* the
//! north-south profile. Points with `f < 0` are inside. With `e = n =
//! 1` the surface is the unit sphere, with small exponents (down to
//! `MIN_EXPONENT`) it approaches the cube [-1, 1]^3 and with `e = n = 2` it is an
//! octahedron.
//!
//! Rays are intersected in two steps. A bounding sphere of radius
//! sqrt(3) gives an initial parameter in front of the surface, then
//! Newton's method refines it on `g(t) = f(o + t d)`.
//!
//! ```rust
//! use rs_sqtrace::core::geometry::{Point3f, Ray, Vector3f};
//! use rs_sqtrace::shapes::superquadric::Superquadric;
//!
//!     let sphere = Superquadric::new(1.0, 1.0).unwrap();
//!     let ray = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
//!     let (t, hit) = sphere.closest_intersection(&ray);
//!     assert!((t - 4.0).abs() < 1e-6);
//!     assert!(hit.is_hit());
//! ```

// others
use smallvec::SmallVec;
// sqtrace
use crate::core::error::{Result, SqError};
use crate::core::geometry::{vec3_dot_vec3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::Intersection;
use crate::core::material::Material;
use crate::core::sqtrace::{quadratic, signed_pow, Float, BOUNDING_RADIUS_SQUARED};
use crate::core::transform::{compose_local_to_parent, Transform, Transformation};

/// Smallest accepted exponent. Below it the inside-outside function
/// overflows on the bounding sphere, where Newton's method starts.
pub const MIN_EXPONENT: Float = 0.01;

/// Newton's method settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolverSettings {
    /// Both `|g|` and `|g'|` below this value count as converged.
    pub epsilon: Float,
    /// Iteration cap. Reaching it with `|g| > epsilon` is a miss.
    pub max_iterations: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            epsilon: 1e-6,
            max_iterations: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Superquadric {
    /// east-west exponent
    pub e: Float,
    /// north-south exponent
    pub n: Float,
    pub material: Material,
    pub solver: SolverSettings,
    transforms: SmallVec<[Transformation; 4]>,
    // cached composition of `transforms`
    local_to_parent: Transform,
    parent_to_local: Transform,
}

impl Superquadric {
    pub fn new(e: Float, n: Float) -> Result<Superquadric> {
        if !(e >= MIN_EXPONENT && e.is_finite() && n >= MIN_EXPONENT && n.is_finite()) {
            return Err(SqError::InvalidExponent(e, n));
        }
        Ok(Superquadric {
            e,
            n,
            material: Material::default(),
            solver: SolverSettings::default(),
            transforms: SmallVec::new(),
            local_to_parent: Transform::default(),
            parent_to_local: Transform::default(),
        })
    }
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
    pub fn with_solver(mut self, solver: SolverSettings) -> Self {
        self.solver = solver;
        self
    }
    /// Append a transformation; it is applied after all previous ones
    /// when going from body space to the parent space.
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
    /// Evaluate the inside-outside function at a body space point.
    pub fn inside_outside(&self, p: &Point3f) -> Float {
        let xy: Float = p.x.abs().powf(2.0 / self.e) + p.y.abs().powf(2.0 / self.e);
        -1.0 + p.z.abs().powf(2.0 / self.n) + xy.powf(self.e / self.n)
    }
    /// Gradient of the inside-outside function at a body space point.
    /// Components whose coordinate is exactly zero are zero, which
    /// keeps the negative powers of small exponents finite.
    pub fn gradient(&self, p: &Point3f) -> Vector3f {
        let (e, n) = (self.e, self.n);
        let xy: Float = p.x.abs().powf(2.0 / e) + p.y.abs().powf(2.0 / e);
        let xy_term: Float = if xy == 0.0 {
            0.0
        } else {
            xy.powf(e / n - 1.0)
        };
        let partial_xy = |c: Float| -> Float {
            if c == 0.0 {
                0.0
            } else {
                2.0 * c * c.abs().powf(2.0 / e - 2.0) * xy_term / n
            }
        };
        let dz: Float = if p.z == 0.0 {
            0.0
        } else {
            2.0 * p.z * p.z.abs().powf(2.0 / n - 2.0) / n
        };
        Vector3f {
            x: partial_xy(p.x),
            y: partial_xy(p.y),
            z: dz,
        }
    }
    /// Unit outward normal at a body space point on the surface.
    pub fn normal(&self, p: &Point3f) -> Normal3f {
        let g: Vector3f = self.gradient(p);
        let length: Float = g.length();
        if length == 0.0 || !length.is_finite() {
            // only reachable at the origin, which is never on the surface
            return Normal3f::default();
        }
        Normal3f::from(g / length)
    }
    /// Parametric point of the unit surface in body space, *u* is the
    /// longitude in [-pi, pi] and *v* the latitude in [-pi/2, pi/2].
    pub fn surface_point(&self, u: Float, v: Float) -> Point3f {
        let cos_v: Float = signed_pow(v.cos(), self.n);
        Point3f {
            x: cos_v * signed_pow(u.cos(), self.e),
            y: cos_v * signed_pow(u.sin(), self.e),
            z: signed_pow(v.sin(), self.n),
        }
    }
    /// Starting parameter for Newton's method: where the body space
    /// ray enters the bounding sphere, or where it leaves the sphere
    /// when it starts inside. `None` if the sphere is missed or lies
    /// completely behind the origin.
    pub fn initial_guess(ray: &Ray) -> Option<Float> {
        let o = Vector3f::from(ray.o);
        let a: Float = vec3_dot_vec3f(&ray.d, &ray.d);
        let b: Float = 2.0 * vec3_dot_vec3f(&ray.d, &o);
        let c: Float = vec3_dot_vec3f(&o, &o) - BOUNDING_RADIUS_SQUARED;
        let mut t0: Float = 0.0;
        let mut t1: Float = 0.0;
        if !quadratic(a, b, c, &mut t0, &mut t1) {
            return None;
        }
        if t1 < 0.0 {
            None
        } else if t0 > 0.0 {
            Some(t0)
        } else {
            Some(t1)
        }
    }
    /// Refine the parameter of the first surface crossing along a body
    /// space ray.
    pub fn solve(&self, ray: &Ray) -> Option<Float> {
        let eps: Float = self.solver.epsilon;
        let mut t: Float = Superquadric::initial_guess(ray)?;
        let mut iterations: u32 = 0;
        loop {
            let p: Point3f = ray.position(t);
            let g: Float = self.inside_outside(&p);
            let dg: Float = vec3_dot_vec3f(&self.gradient(&p), &ray.d);
            if !g.is_finite() || !dg.is_finite() {
                return None;
            }
            let on_surface: bool = g.abs() <= eps;
            if on_surface && dg.abs() <= eps {
                break;
            }
            if iterations >= self.solver.max_iterations {
                if on_surface {
                    break;
                }
                return None;
            }
            if dg == 0.0 {
                return None;
            }
            let step: Float = g / dg;
            t -= step;
            iterations += 1;
            if !t.is_finite() {
                return None;
            }
            // once Newton stops moving on the surface, running out the
            // remaining iterations would end at the same parameter
            if on_surface && step.abs() <= 1e-12 * t.abs().max(1.0) {
                break;
            }
        }
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }
    /// Is the point (in the parent space) strictly inside the body?
    pub fn io_test(&self, point: &Point3f) -> bool {
        let p: Point3f = self.parent_to_local.transform_point(point);
        self.inside_outside(&p) < 0.0
    }
    /// Closest hit of a parent space ray, `(Float::INFINITY, miss)` if
    /// there is none. The distance is the ray parameter, so it is
    /// measured in multiples of the caller's direction vector.
    pub fn closest_intersection(&self, ray: &Ray) -> (Float, Intersection) {
        let body_ray: Ray = ray.transformed(&self.parent_to_local);
        match self.solve(&body_ray) {
            Some(t) => {
                let p: Point3f = body_ray.position(t);
                let n: Normal3f = self.normal(&p);
                let hit = Intersection::new(p, n, self).transformed(&self.local_to_parent);
                (t, hit)
            }
            None => (Float::INFINITY, Intersection::default()),
        }
    }
}
