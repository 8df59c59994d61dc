//! Sphere primitive.

use crate::{stats, Figure, HitRegister, Material, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bounds: Bounds3d,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bounds = Bounds3d::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bounds,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Figure for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        // Direction is unit length, so the quadratic's leading coefficient is one
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = h - sqrtd;
        let far = h + sqrtd;

        let t = if near > HIT_EPSILON {
            near
        } else if far > HIT_EPSILON {
            far
        } else {
            return None;
        };

        let outward_normal = (ray.at(t) - self.center) / self.radius;
        Some(HitRegister::new(ray, t, outward_normal, self.material).with_t_max(far))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
