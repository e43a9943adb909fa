// others
use num::Zero;
// sqtrace
use crate::core::geometry::{vec3_dot_nrmf, Normal3f, Point3f, Ray, Vector3f};
use crate::core::material::Material;
use crate::core::scene::Scene;
use crate::core::sqtrace::{Float, Spectrum};
use crate::lights::point::PointLight;

/// Direct Phong lighting from point lights, no shadows.
pub struct PhongIntegrator {
    /// color of rays leaving the scene
    pub background: Spectrum,
}

impl Default for PhongIntegrator {
    fn default() -> Self {
        PhongIntegrator {
            background: Spectrum::zero(),
        }
    }
}

impl PhongIntegrator {
    /// Color seen along a world space camera ray, plus whether the ray
    /// hit anything.
    pub fn li(&self, ray: &Ray, scene: &Scene) -> (Spectrum, bool) {
        let (_t, isect) = scene.closest_intersection(ray);
        match isect.primitive {
            Some(primitive) => {
                let l = lighting(
                    &isect.p(),
                    &isect.n(),
                    &primitive.material,
                    scene.get_lights(),
                    &scene.get_camera().position(),
                );
                (l, true)
            }
            None => (self.background, false),
        }
    }
}

/// Phong lighting at point *p* with unit normal *n*, seen from
/// *eye*. Each channel of the result is capped at one.
pub fn lighting(
    p: &Point3f,
    n: &Normal3f,
    material: &Material,
    lights: &[PointLight],
    eye: &Point3f,
) -> Spectrum {
    let e_dir: Vector3f = safe_normalize(&(*eye - *p));
    let mut diffuse_sum: Spectrum = Spectrum::zero();
    let mut specular_sum: Spectrum = Spectrum::zero();
    for light in lights {
        let (l_dir, li) = light.sample_li(p);
        let diffuse: Float = vec3_dot_nrmf(&l_dir, n).max(0.0);
        diffuse_sum += li * diffuse;
        let h: Vector3f = safe_normalize(&(e_dir + l_dir));
        let specular: Float = vec3_dot_nrmf(&h, n).max(0.0).powf(material.shininess);
        specular_sum += li * specular;
    }
    (material.ambient + diffuse_sum * material.diffuse + specular_sum * material.specular)
        .min(1.0)
}

fn safe_normalize(v: &Vector3f) -> Vector3f {
    let length: Float = v.length();
    if length > 0.0 {
        *v / length
    } else {
        Vector3f::default()
    }
}
