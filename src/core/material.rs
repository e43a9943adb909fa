//! Surface appearance of a superquadric under the Phong lighting
//! model.

// sqtrace
use crate::core::sqtrace::{Float, Spectrum};

/// Reflection coefficients, each channel in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Spectrum,
    pub diffuse: Spectrum,
    pub specular: Spectrum,
    /// Phong exponent, >= 0.
    pub shininess: Float,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Spectrum::new(0.2),
            diffuse: Spectrum::new(0.6),
            specular: Spectrum::new(0.4),
            shininess: 10.0,
        }
    }
}

impl Material {
    pub fn new(ambient: Spectrum, diffuse: Spectrum, specular: Spectrum, shininess: Float) -> Self {
        Material {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}
