//! Ellipsoid as a scaled unit sphere.

use crate::{Figure, HitRegister, Material, RenderError, Sphere, TransformedFigure};
use lux_math::{Bounds3d, Mat4, Ray, Vec3};
use std::sync::Arc;

/// Axis-aligned ellipsoid with semi-axes `radii`.
pub struct Ellipsoid {
    inner: TransformedFigure,
}

impl Ellipsoid {
    /// Fails if any semi-axis is zero, which leaves the scale singular.
    pub fn new(center: Vec3, radii: Vec3, material: Material) -> Result<Self, RenderError> {
        let sphere: Arc<dyn Figure> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, material));
        let transform = Mat4::from_translation(center) * Mat4::from_scale(radii);
        Ok(Self {
            inner: TransformedFigure::new(sphere, transform)?,
        })
    }
}

impl Figure for Ellipsoid {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        self.inner.intersect(ray)
    }

    fn bounds(&self) -> Bounds3d {
        self.inner.bounds()
    }
}
