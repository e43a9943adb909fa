// sqtrace
use crate::core::geometry::{pnt3_distancef, Point3f, Vector3f};
use crate::core::sqtrace::{Float, Spectrum};

/// Isotropic point light whose intensity falls off as `1 / (1 + k d)`
/// with the distance *d* from the light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub p_light: Point3f,
    pub color: Spectrum,
    /// attenuation coefficient *k*
    pub attenuation: Float,
}

impl PointLight {
    pub fn new(p_light: Point3f, color: Spectrum, attenuation: Float) -> Self {
        PointLight {
            p_light,
            color,
            attenuation,
        }
    }
    /// Unit direction from *p* towards the light together with the
    /// attenuated light color arriving at *p*. The direction is zero
    /// if *p* coincides with the light.
    pub fn sample_li(&self, p: &Point3f) -> (Vector3f, Spectrum) {
        let l: Vector3f = self.p_light - *p;
        let distance: Float = pnt3_distancef(&self.p_light, p);
        let wi: Vector3f = if distance > 0.0 as Float {
            l / distance
        } else {
            Vector3f::default()
        };
        (wi, self.color / (1.0 as Float + self.attenuation * distance))
    }
}
