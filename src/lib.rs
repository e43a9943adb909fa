//! # sqtrace
//!
//! Ray tracer for superquadrics arranged in a transform-composed scene
//! graph. Objects are either leaf superquadrics or assemblies of other
//! objects, each carrying its own list of rotations, translations and
//! scales. Rays are intersected with the implicit surfaces by Newton's
//! method, started from a bounding sphere, and shaded with direct
//! Phong lighting from point lights.
//!
//! The main render loop can be found [here].
//!
//! [here]: integrators/fn.render.html

#[macro_use]
extern crate impl_ops;

pub mod blockqueue;
pub mod core;
pub mod integrators;
pub mod lights;
pub mod shapes;
