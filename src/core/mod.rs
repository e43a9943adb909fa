//! Core types of the ray tracer: geometry, transforms, the scene
//! graph, camera, film and the scene file loader.

pub mod camera;
pub mod error;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod material;
pub mod object;
pub mod parser;
pub mod scene;
pub mod spectrum;
pub mod sqtrace;
pub mod transform;
