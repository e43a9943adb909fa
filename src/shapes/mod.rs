//! Geometric primitives. The renderer traces a single kind of shape,
//! the superquadric, whose family covers spheres, ellipsoids,
//! rounded boxes, cylinders and octahedra by varying two exponents.
//!
//! - Superquadric
//!
//! ## Superquadrics
//!
//! A superquadric is given implicitly by its inside-outside function
//! in body space. Placement, orientation and size come from the
//! object's transform list; the body itself always fits into the cube
//! [-1, 1]^3.

pub mod superquadric;
