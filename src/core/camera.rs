//! A pinhole camera placed by a translation and a rotation.
//!
//! The pair works like a view matrix: `world_to_camera = translate *
//! rotate`, so a camera with translation `(0, 0, -5)` and no rotation
//! sits at `(0, 0, 5)`. In camera space the camera looks down the
//! negative z axis with y pointing up.

// sqtrace
use crate::core::error::Result;
use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::core::sqtrace::{radians, Float};
use crate::core::transform::{compose_local_to_parent, Transform, Transformation};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    /// vertical field of view in degrees
    pub fov: Float,
    pub aspect: Float,
    pub near: Float,
    pub far: Float,
}

impl Default for Frustum {
    fn default() -> Self {
        Frustum {
            fov: 60.0,
            aspect: 1.0,
            near: 1.0,
            far: 20.0,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub translate: Vector3f,
    /// rotation axis and angle in degrees
    pub rotate: (Vector3f, Float),
    pub frustum: Frustum,
    camera_to_world: Transform,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            translate: Vector3f::default(),
            rotate: (Vector3f::new(0.0, 0.0, 1.0), 0.0),
            frustum: Frustum::default(),
            camera_to_world: Transform::default(),
        }
    }
}

impl Camera {
    pub fn new(translate: Vector3f, axis: Vector3f, angle: Float, frustum: Frustum) -> Result<Self> {
        // the rotation acts first on world points, then the translation
        let world_to_camera: Transform = compose_local_to_parent(&[
            Transformation::rotate(axis, angle)?,
            Transformation::translate(translate),
        ])?;
        Ok(Camera {
            translate,
            rotate: (axis, angle),
            frustum,
            camera_to_world: Transform::inverse(&world_to_camera),
        })
    }
    /// World space position of the eye.
    pub fn position(&self) -> Point3f {
        self.camera_to_world.transform_point(&Point3f::default())
    }
    pub fn camera_to_world(&self) -> &Transform {
        &self.camera_to_world
    }
    /// World space ray through the center of pixel *(i, j)*, counted
    /// from the top left corner. The direction has unit length.
    pub fn generate_ray(&self, i: u32, j: u32, xres: u32, yres: u32) -> Ray {
        let height: Float = 2.0 * self.frustum.near * (radians(self.frustum.fov) / 2.0).tan();
        let width: Float = self.frustum.aspect * height;
        let x: Float = ((i as Float + 0.5) / xres as Float - 0.5) * width;
        let y: Float = (0.5 - (j as Float + 0.5) / yres as Float) * height;
        let d: Vector3f = Vector3f::new(x, y, -self.frustum.near);
        let mut ray = Ray::new(Point3f::default(), d).transformed(&self.camera_to_world);
        ray.normalize();
        ray
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn position_is_negated_translation() {
        let camera = Camera::new(
            Vector3f::new(0.0, 0.0, -5.0),
            Vector3f::new(0.0, 1.0, 0.0),
            0.0,
            Frustum::default(),
        )
        .unwrap();
        assert!((camera.position() - Point3f::new(0.0, 0.0, 5.0)).length() < 1e-12);
    }

    #[test]
    fn center_ray_looks_down_negative_z() {
        let camera = Camera::new(
            Vector3f::new(0.0, 0.0, -5.0),
            Vector3f::new(0.0, 1.0, 0.0),
            0.0,
            Frustum::default(),
        )
        .unwrap();
        // odd resolution puts a pixel center on the optical axis
        let ray = camera.generate_ray(2, 2, 5, 5);
        assert!((ray.d - Vector3f::new(0.0, 0.0, -1.0)).length() < 1e-12);
        // top left pixel points up and to the left
        let corner = camera.generate_ray(0, 0, 5, 5);
        assert!(corner.d.x < 0.0 && corner.d.y > 0.0);
        assert!((corner.d.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotated_camera_turns_view_direction() {
        // rotating the world by -90 degrees about y makes the camera
        // look down the negative x axis
        let camera = Camera::new(
            Vector3f::default(),
            Vector3f::new(0.0, 1.0, 0.0),
            -90.0,
            Frustum::default(),
        )
        .unwrap();
        let ray = camera.generate_ray(0, 0, 1, 1);
        assert!((ray.d - Vector3f::new(-1.0, 0.0, 0.0)).length() < 1e-9, "{:?}", ray.d);
    }
}
