//! Light sources. Only point lights exist; each contributes diffuse
//! and specular terms to the Phong lighting model.

pub mod point;
