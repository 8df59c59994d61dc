//! Figure wrapped in an affine transform.
//!
//! Rays are moved into the wrapped figure's object space with the inverse
//! matrix, intersected there and the hit is carried back to world space.

use crate::{Figure, HitRegister, Material, RenderError};
use lux_math::{Bounds3d, Mat4, Mat4Ext, Ray};
use std::sync::Arc;

/// A figure placed in the world by a 4x4 matrix.
pub struct TransformedFigure {
    figure: Arc<dyn Figure>,
    to_object: Mat4,
    normal_to_world: Mat4,
    material: Option<Material>,
    bounds: Bounds3d,
}

impl TransformedFigure {
    /// Wrap `figure` with the object-to-world matrix `transform`.
    ///
    /// Fails if the matrix has no inverse.
    pub fn new(figure: Arc<dyn Figure>, transform: Mat4) -> Result<Self, RenderError> {
        let to_object = transform.try_inverse()?;
        let normal_to_world = to_object.transpose();
        let bounds = transform.transform_bounds(&figure.bounds());

        Ok(Self {
            figure,
            to_object,
            normal_to_world,
            material: None,
            bounds,
        })
    }

    /// Builder: override the wrapped figure's material on every hit.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

impl Figure for TransformedFigure {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        let local_direction = self.to_object.transform_vector3(ray.direction());
        let scale = local_direction.length();
        if scale == 0.0 {
            return None;
        }

        let local_ray = Ray::new(self.to_object.transform_point3(ray.origin()), local_direction);
        let local = self.figure.intersect(&local_ray)?;

        // Object-space distances shrink or grow with the transform
        let t = local.t / scale;
        let normal = self
            .normal_to_world
            .transform_vector3(local.normal)
            .normalize_or_zero();

        Some(HitRegister {
            t,
            t_max: local.t_max / scale,
            point: ray.at(t),
            normal,
            front_face: local.front_face,
            material: self.material.unwrap_or(local.material),
        })
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
