//! In general, transformations make it possible to work in the most
//! convenient coordinate space.
//!
//! ## 4 x 4 Matrices
//!
//! The **Matrix4x4** structure provides a low-level representation of
//! 4 x 4 matrices. It is an integral part of the **Transform** class.
//!
//! ## Transforms
//!
//! A **Transform** keeps a matrix together with its inverse, so that
//! going back and forth between two spaces never requires a matrix
//! inversion at query time. Multiplying two transforms composes the
//! matrices and the inverses in opposite order.
//!
//! ## Transformations
//!
//! A **Transformation** is one elementary operation as it appears in
//! a scene description: a rotation around an arbitrary axis (angle in
//! degrees), a translation, or a (possibly nonuniform) scale. Objects
//! keep an ordered list of them. The first entry of the list is
//! applied first when mapping from local space into the parent space:
//!
//! ```text
//! local_to_parent = T_k * ... * T_2 * T_1
//! parent_to_local = T_1^-1 * T_2^-1 * ... * T_k^-1
//! ```
//!
//! ```rust
//! use rs_sqtrace::core::geometry::{Point3f, Vector3f};
//! use rs_sqtrace::core::transform::{compose_local_to_parent, Transformation};
//!
//!     let list = vec![
//!         Transformation::scale(Vector3f::new(2.0, 2.0, 2.0)).unwrap(),
//!         Transformation::translate(Vector3f::new(1.0, 0.0, 0.0)),
//!     ];
//!     let m = compose_local_to_parent(&list).unwrap();
//!     // scale first, then translate
//!     let p = m.transform_point(&Point3f::new(1.0, 0.0, 0.0));
//!     assert_eq!(p, Point3f::new(3.0, 0.0, 0.0));
//! ```

// std
use std::ops::Mul;
// sqtrace
use crate::core::error::{Result, SqError};
use crate::core::geometry::{Normal3f, Point3f, Ray, Vector3f};
use crate::core::sqtrace::{radians, Float};

#[derive(Debug, Copy, Clone)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl Matrix4x4 {
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Matrix4x4 { m }
    }
    pub fn transpose(m: &Matrix4x4) -> Matrix4x4 {
        let mut r: Matrix4x4 = Matrix4x4::default();
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = m.m[j][i];
            }
        }
        r
    }
    /// Gauss-Jordan elimination with full pivoting. A singular matrix
    /// yields [`SqError::DegenerateTransform`].
    pub fn inverse(m: &Matrix4x4) -> Result<Matrix4x4> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_u8; 4];
        let mut minv: Matrix4x4 = *m;
        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for (k, item) in ipiv.iter().enumerate() {
                        if *item == 0 {
                            let abs: Float = minv.m[j][k].abs();
                            if abs >= big {
                                big = abs;
                                irow = j;
                                icol = k;
                            }
                        } else if *item > 1 {
                            return Err(SqError::DegenerateTransform(format!(
                                "singular matrix {:?}",
                                m.m
                            )));
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            // swap rows _irow_ and _icol_ for pivot
            if irow != icol {
                minv.m.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv.m[icol][icol] == 0.0 {
                return Err(SqError::DegenerateTransform(format!(
                    "singular matrix {:?}",
                    m.m
                )));
            }
            // set $m[icol][icol]$ to one by scaling row _icol_ appropriately
            let pivinv: Float = 1.0 / minv.m[icol][icol];
            minv.m[icol][icol] = 1.0;
            for j in 0..4 {
                minv.m[icol][j] *= pivinv;
            }
            // subtract this row from others to zero out their columns
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv.m[j][icol];
                    minv.m[j][icol] = 0.0;
                    for k in 0..4 {
                        minv.m[j][k] -= minv.m[icol][k] * save;
                    }
                }
            }
        }
        // swap columns to reflect permutation
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    minv.m[k].swap(indxr[j], indxc[j])
                }
            }
        }
        Ok(minv)
    }
    pub fn is_identity(&self, eps: Float) -> bool {
        let identity = Matrix4x4::default();
        for i in 0..4 {
            for j in 0..4 {
                // written so that NaN entries fail the test
                if !((self.m[i][j] - identity.m[i][j]).abs() <= eps) {
                    return false;
                }
            }
        }
        true
    }
}

impl PartialEq for Matrix4x4 {
    fn eq(&self, rhs: &Matrix4x4) -> bool {
        self.m == rhs.m
    }
}

/// The product of two matrices.
pub fn mtx_mul(m1: &Matrix4x4, m2: &Matrix4x4) -> Matrix4x4 {
    let mut r: Matrix4x4 = Matrix4x4::default();
    for i in 0..4 {
        for j in 0..4 {
            r.m[i][j] = m1.m[i][0] * m2.m[0][j]
                + m1.m[i][1] * m2.m[1][j]
                + m1.m[i][2] * m2.m[2][j]
                + m1.m[i][3] * m2.m[3][j];
        }
    }
    r
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Transform {
    /// Build a transform from an arbitrary matrix; fails if the matrix
    /// can't be inverted.
    pub fn new(m: Matrix4x4) -> Result<Transform> {
        let m_inv = Matrix4x4::inverse(&m)?;
        Ok(Transform { m, m_inv })
    }
    pub fn inverse(t: &Transform) -> Transform {
        Transform {
            m: t.m_inv,
            m_inv: t.m,
        }
    }
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform {
            m: Matrix4x4::new([
                [1.0, 0.0, 0.0, delta.x],
                [0.0, 1.0, 0.0, delta.y],
                [0.0, 0.0, 1.0, delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0, 0.0, 0.0, -delta.x],
                [0.0, 1.0, 0.0, -delta.y],
                [0.0, 0.0, 1.0, -delta.z],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }
    /// Callers make sure no factor is zero.
    pub fn scale(x: Float, y: Float, z: Float) -> Transform {
        Transform {
            m: Matrix4x4::new([
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            m_inv: Matrix4x4::new([
                [1.0 / x, 0.0, 0.0, 0.0],
                [0.0, 1.0 / y, 0.0, 0.0],
                [0.0, 0.0, 1.0 / z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }
    /// Rotation by *theta* degrees around the unit vector *a*.
    pub fn rotate(theta: Float, a: &Vector3f) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let mut m = Matrix4x4::default();
        // compute rotation of first basis vector
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        // compute rotations of second basis vectors
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        // compute rotations of third basis vectors
        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let x: Float = p.x;
        let y: Float = p.y;
        let z: Float = p.z;
        let xp: Float =
            self.m.m[0][0] * x + self.m.m[0][1] * y + self.m.m[0][2] * z + self.m.m[0][3];
        let yp: Float =
            self.m.m[1][0] * x + self.m.m[1][1] * y + self.m.m[1][2] * z + self.m.m[1][3];
        let zp: Float =
            self.m.m[2][0] * x + self.m.m[2][1] * y + self.m.m[2][2] * z + self.m.m[2][3];
        let wp: Float =
            self.m.m[3][0] * x + self.m.m[3][1] * y + self.m.m[3][2] * z + self.m.m[3][3];
        if wp == 1.0 as Float || wp == 0.0 as Float {
            Point3f {
                x: xp,
                y: yp,
                z: zp,
            }
        } else {
            let inv: Float = 1.0 as Float / wp;
            Point3f {
                x: inv * xp,
                y: inv * yp,
                z: inv * zp,
            }
        }
    }
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let x: Float = v.x;
        let y: Float = v.y;
        let z: Float = v.z;
        Vector3f {
            x: self.m.m[0][0] * x + self.m.m[0][1] * y + self.m.m[0][2] * z,
            y: self.m.m[1][0] * x + self.m.m[1][1] * y + self.m.m[1][2] * z,
            z: self.m.m[2][0] * x + self.m.m[2][1] * y + self.m.m[2][2] * z,
        }
    }
    /// Normals go through the transpose of the inverse. The result is
    /// not renormalized.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let x: Float = n.x;
        let y: Float = n.y;
        let z: Float = n.z;
        Normal3f {
            x: self.m_inv.m[0][0] * x + self.m_inv.m[1][0] * y + self.m_inv.m[2][0] * z,
            y: self.m_inv.m[0][1] * x + self.m_inv.m[1][1] * y + self.m_inv.m[2][1] * z,
            z: self.m_inv.m[0][2] * x + self.m_inv.m[1][2] * y + self.m_inv.m[2][2] * z,
        }
    }
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        Ray {
            o: self.transform_point(&r.o),
            d: self.transform_vector(&r.d),
        }
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: mtx_mul(&self.m, &rhs.m),
            m_inv: mtx_mul(&rhs.m_inv, &self.m_inv),
        }
    }
}

/// One elementary operation of an object's transform list.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Transformation {
    /// Rotation by `angle` degrees around the unit vector `axis`.
    Rotate { axis: Vector3f, angle: Float },
    Translate { delta: Vector3f },
    Scale { factors: Vector3f },
}

impl Transformation {
    /// The axis gets normalized; a zero (or non-finite) axis is
    /// rejected.
    pub fn rotate(axis: Vector3f, angle: Float) -> Result<Transformation> {
        let length: Float = axis.length();
        if length == 0.0 as Float || !length.is_finite() || !angle.is_finite() {
            return Err(SqError::DegenerateTransform(format!(
                "rotation axis {:?}, angle {}",
                axis, angle
            )));
        }
        Ok(Transformation::Rotate {
            axis: axis / length,
            angle,
        })
    }
    pub fn translate(delta: Vector3f) -> Transformation {
        Transformation::Translate { delta }
    }
    /// Any zero (or non-finite) scale factor is rejected.
    pub fn scale(factors: Vector3f) -> Result<Transformation> {
        let ok = |f: Float| f != 0.0 as Float && f.is_finite();
        if !(ok(factors.x) && ok(factors.y) && ok(factors.z)) {
            return Err(SqError::DegenerateTransform(format!(
                "scale factors {:?}",
                factors
            )));
        }
        Ok(Transformation::Scale { factors })
    }
    /// The homogeneous matrix of this operation. Rotations recompute
    /// their trigonometry on every call.
    pub fn get_matrix(&self) -> Matrix4x4 {
        self.to_transform().m
    }
    pub fn to_transform(&self) -> Transform {
        match self {
            Transformation::Rotate { axis, angle } => Transform::rotate(*angle, axis),
            Transformation::Translate { delta } => Transform::translate(delta),
            Transformation::Scale { factors } => {
                Transform::scale(factors.x, factors.y, factors.z)
            }
        }
    }
    /// Apply the operation directly to a point.
    pub fn apply_point(&self, p: &mut Point3f) {
        match self {
            Transformation::Translate { delta } => *p = *p + *delta,
            Transformation::Scale { factors } => {
                p.x *= factors.x;
                p.y *= factors.y;
                p.z *= factors.z;
            }
            Transformation::Rotate { .. } => *p = self.to_transform().transform_point(p),
        }
    }
    /// Apply the operation directly to a vector; translations leave it
    /// unchanged.
    pub fn apply_vector(&self, v: &mut Vector3f) {
        match self {
            Transformation::Translate { .. } => {}
            Transformation::Scale { factors } => {
                v.x *= factors.x;
                v.y *= factors.y;
                v.z *= factors.z;
            }
            Transformation::Rotate { .. } => *v = self.to_transform().transform_vector(v),
        }
    }
}

/// Combined local-to-parent transform of a transform list, the first
/// entry being applied first. An empty list gives the identity.
pub fn compose_local_to_parent(list: &[Transformation]) -> Result<Transform> {
    let combined: Transform = list
        .iter()
        .fold(Transform::default(), |acc, t| t.to_transform() * acc);
    // reject lists whose product underflowed or overflowed
    let check = mtx_mul(&combined.m, &combined.m_inv);
    if !check.is_identity(1e-6) {
        return Err(SqError::DegenerateTransform(format!(
            "transform list {:?} is numerically singular",
            list
        )));
    }
    Ok(combined)
}

/// Inverse of [`compose_local_to_parent`].
pub fn compose_parent_to_local(list: &[Transformation]) -> Result<Transform> {
    Ok(Transform::inverse(&compose_local_to_parent(list)?))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_list() -> Vec<Transformation> {
        vec![
            Transformation::scale(Vector3f::new(2.0, 0.5, 3.0)).unwrap(),
            Transformation::rotate(Vector3f::new(1.0, 1.0, 0.0), 30.0).unwrap(),
            Transformation::translate(Vector3f::new(-1.0, 4.0, 2.5)),
            Transformation::rotate(Vector3f::new(0.0, 0.0, 2.0), -75.0).unwrap(),
        ]
    }

    #[test]
    fn round_trip_is_identity() {
        let list = sample_list();
        let l2p = compose_local_to_parent(&list).unwrap();
        let p2l = compose_parent_to_local(&list).unwrap();
        let product = mtx_mul(&p2l.m, &l2p.m);
        assert!(product.is_identity(1e-9), "{:?}", product);
        // the cached inverse agrees with an explicit inversion
        let inverted = Matrix4x4::inverse(&l2p.m).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert!((inverted.m[i][j] - p2l.m.m[i][j]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn list_order_applies_first_entry_first() {
        let list = vec![
            Transformation::translate(Vector3f::new(1.0, 0.0, 0.0)),
            Transformation::rotate(Vector3f::new(0.0, 0.0, 1.0), 90.0).unwrap(),
        ];
        let l2p = compose_local_to_parent(&list).unwrap();
        // translate to (1,0,0) then rotate about z to (0,1,0)
        let p = l2p.transform_point(&Point3f::default());
        assert!(p.x.abs() < 1e-12 && (p.y - 1.0).abs() < 1e-12 && p.z.abs() < 1e-12);
        // the in-place application agrees with the matrices
        let mut q = Point3f::default();
        for t in &list {
            t.apply_point(&mut q);
        }
        assert!((q - p).length() < 1e-12);
    }

    #[test]
    fn in_place_vectors_ignore_translation() {
        let list = sample_list();
        let l2p = compose_local_to_parent(&list).unwrap();
        let v = Vector3f::new(0.5, -1.0, 2.0);
        let mut w = v;
        for t in &list {
            t.apply_vector(&mut w);
        }
        assert!((w - l2p.transform_vector(&v)).length() < 1e-12);
        let mut p = Point3f::new(0.5, -1.0, 2.0);
        for t in &list {
            t.apply_point(&mut p);
        }
        assert!((p - l2p.transform_point(&Point3f::new(0.5, -1.0, 2.0))).length() < 1e-12);
        let mut u = v;
        Transformation::translate(Vector3f::new(3.0, -4.0, 5.0)).apply_vector(&mut u);
        assert_eq!(u, v);
        let mut s = v;
        Transformation::scale(Vector3f::new(2.0, 3.0, -1.0))
            .unwrap()
            .apply_vector(&mut s);
        assert_eq!(s, Vector3f::new(1.0, -3.0, -2.0));
    }

    #[test]
    fn ray_inverse_law() {
        let list = sample_list();
        let l2p = compose_local_to_parent(&list).unwrap();
        let p2l = compose_parent_to_local(&list).unwrap();
        let ray = Ray::new(Point3f::new(0.3, -2.0, 7.0), Vector3f::new(0.1, 0.2, -1.0));
        let back = ray.transformed(&l2p).transformed(&p2l);
        assert!((back.o - ray.o).length() < 1e-9);
        assert!((back.d - ray.d).length() < 1e-9);
        // translations do not move directions
        let mut moved = ray;
        moved.transform(&Transform::translate(&Vector3f::new(5.0, 5.0, 5.0)));
        assert_eq!(moved.d, ray.d);
        assert!((moved.o - Point3f::new(5.3, 3.0, 12.0)).length() < 1e-12);
    }

    #[test]
    fn normals_use_inverse_transpose() {
        let t = Transformation::scale(Vector3f::new(1.0, 4.0, 1.0))
            .unwrap()
            .to_transform();
        // plane x + y = 0 has normal (1, 1, 0); after stretching y by 4
        // the plane becomes x + y/4 = 0 with normal (1, 1/4, 0)
        let n = t.transform_normal(&Normal3f::new(1.0, 1.0, 0.0));
        assert!((n.x - 1.0).abs() < 1e-12);
        assert!((n.y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn degenerate_transforms_are_rejected() {
        assert!(matches!(
            Transformation::scale(Vector3f::new(1.0, 0.0, 1.0)),
            Err(SqError::DegenerateTransform(_))
        ));
        assert!(matches!(
            Transformation::rotate(Vector3f::default(), 45.0),
            Err(SqError::DegenerateTransform(_))
        ));
        let singular = Matrix4x4::new([
            [1.0, 2.0, 0.0, 0.0],
            [2.0, 4.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(Transform::new(singular).is_err());
    }

    #[test]
    fn rotation_axis_is_normalized() {
        match Transformation::rotate(Vector3f::new(0.0, 3.0, 4.0), 10.0).unwrap() {
            Transformation::Rotate { axis, angle } => {
                assert!((axis.length() - 1.0).abs() < 1e-12);
                assert_eq!(angle, 10.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        let m = Transformation::rotate(Vector3f::new(0.0, 0.0, 1.0), 90.0)
            .unwrap()
            .get_matrix();
        assert!((m.m[1][0] - 1.0).abs() < 1e-12);
        assert!((m.m[0][1] + 1.0).abs() < 1e-12);
    }
}
