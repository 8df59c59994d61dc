//! Flat circular disk.

use crate::{stats, Figure, HitRegister, Material, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};

/// Disk of `radius` around `center`, facing along `normal`.
pub struct Disk {
    center: Vec3,
    normal: Vec3,
    radius: f32,
    material: Material,
    bounds: Bounds3d,
}

impl Disk {
    pub fn new(center: Vec3, normal: Vec3, radius: f32, material: Material) -> Self {
        let normal = normal.normalize_or_zero();
        let radius = radius.max(0.0);

        // Half extent along each axis of a circle tilted by `normal`
        let extent = (Vec3::ONE - normal * normal).max(Vec3::ZERO).powf(0.5) * radius;
        let bounds = Bounds3d::from_points(center - extent, center + extent);

        Self {
            center,
            normal,
            radius,
            material,
            bounds,
        }
    }
}

impl Figure for Disk {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = self.normal.dot(self.center - ray.origin()) / denom;
        if t <= HIT_EPSILON {
            return None;
        }
        if ray.at(t).distance_squared(self.center) > self.radius * self.radius {
            return None;
        }

        Some(HitRegister::new(ray, t, self.normal, self.material))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
