//! The geometric classes of the ray tracer: points, vectors, normals
//! and rays, plus the integer points and bounds used to address
//! pixels and image tiles.
//!
//! # Points
//!
//! A **point** is a zero-dimensional location in 3D space, given by
//! its x, y, z coordinates with respect to a coordinate system. Points
//! are affected by translations, vectors are not.
//!
//! ```rust
//! use rs_sqtrace::core::geometry::Point3f;
//!
//!     let origin = Point3f::default();
//!     let p = Point3f::new(0.0, 0.0, 5.0);
//!     assert_eq!((p - origin).length(), 5.0);
//! ```
//!
//! # Vectors
//!
//! A **vector** is a direction with a magnitude. The direction of a
//! ray does not have to be normalized; the distance reported by an
//! intersection query is always measured in multiples of the ray's
//! own direction.
//!
//! # Normals
//!
//! A **surface normal** is perpendicular to a surface at a point. It
//! looks like a vector but transforms differently: with the
//! transpose of the inverse matrix instead of the matrix itself.
//!
//! # Rays
//!
//! A **ray** is a semi-infinite line specified by its origin and
//! direction.
//!
//! ```rust
//! use rs_sqtrace::core::geometry::{Point3f, Ray, Vector3f};
//!
//!     let ray = Ray {
//!         o: Point3f::new(0.0, 0.0, 5.0),
//!         d: Vector3f::new(0.0, 0.0, -1.0),
//!     };
//!     assert_eq!(ray.position(4.0), Point3f::new(0.0, 0.0, 1.0));
//! ```

// sqtrace
use std::ops;
use crate::core::sqtrace::Float;
use crate::core::transform::Transform;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Dot product of a vector and a normal.
pub fn vec3_dot_nrmf(v1: &Vector3f, n2: &Normal3f) -> Float {
    v1.x * n2.x + v1.y * n2.y + v1.z * n2.z
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Point3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// The distance between two points is the length of the vector
/// between them.
pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length()
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        *self / self.length()
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Normal3f, b: Float| -> Normal3f {
    Normal3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(/|a: &Normal3f, b: Float| -> Normal3f {
    let inv: Float = 1.0 as Float / b;
    Normal3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

/// Integer bounds of a pixel region, `p_max` is exclusive.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Bounds2i {
    pub p_min: Point2i,
    pub p_max: Point2i,
}

impl Bounds2i {
    pub fn new(p1: Point2i, p2: Point2i) -> Self {
        let p_min: Point2i = Point2i {
            x: std::cmp::min(p1.x, p2.x),
            y: std::cmp::min(p1.y, p2.y),
        };
        let p_max: Point2i = Point2i {
            x: std::cmp::max(p1.x, p2.x),
            y: std::cmp::max(p1.y, p2.y),
        };
        Bounds2i { p_min, p_max }
    }
    pub fn area(&self) -> i32 {
        (self.p_max.x - self.p_min.x) * (self.p_max.y - self.p_min.y)
    }
    pub fn is_empty(&self) -> bool {
        self.p_max.x <= self.p_min.x || self.p_max.y <= self.p_min.y
    }
}

pub struct Bounds2Iterator<'a> {
    p: Point2i,
    bounds: &'a Bounds2i,
}

impl<'a> Iterator for Bounds2Iterator<'a> {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.bounds.is_empty() {
            return None;
        }
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        if self.p.y == self.bounds.p_max.y {
            None
        } else {
            Some(self.p)
        }
    }
}

impl<'a> IntoIterator for &'a Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2Iterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Bounds2Iterator {
            // need to start 1 before p_min.x as next() will be called
            // to get the first element
            p: Point2i {
                x: self.p_min.x - 1,
                y: self.p_min.y,
            },
            bounds: self,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction
    pub d: Vector3f,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray { o, d }
    }
    /// Evaluate the ray at parameter *t*.
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    /// Normalize the direction in place and return its former length.
    pub fn normalize(&mut self) -> Float {
        let length: Float = self.d.length();
        if length > 0.0 as Float {
            self.d = self.d / length;
        }
        length
    }
    /// Return a copy of the ray carried into another space. The
    /// origin gets the full affine map, the direction only its linear
    /// part, and the direction is not renormalized.
    pub fn transformed(&self, t: &Transform) -> Ray {
        t.transform_ray(self)
    }
    /// Same as [`Ray::transformed`] but in place.
    pub fn transform(&mut self, t: &Transform) {
        *self = t.transform_ray(self);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ray_normalize_returns_length() {
        let mut ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 3.0, 4.0));
        let length = ray.normalize();
        assert_eq!(length, 5.0);
        assert!((ray.d.length() - 1.0).abs() < 1e-12);
        let mut degenerate = Ray::default();
        assert_eq!(degenerate.normalize(), 0.0);
        assert!(!degenerate.d.has_nans());
    }

    #[test]
    fn bounds_iterate_row_major() {
        let b = Bounds2i::new(Point2i { x: 2, y: 1 }, Point2i { x: 4, y: 3 });
        let pixels: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(pixels.len(), b.area() as usize);
        assert_eq!(pixels[0], Point2i { x: 2, y: 1 });
        assert_eq!(pixels[1], Point2i { x: 3, y: 1 });
        assert_eq!(pixels[3], Point2i { x: 3, y: 2 });
        let empty = Bounds2i::default();
        assert_eq!(empty.into_iter().count(), 0);
    }
}
