//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{stats, Figure, HitRegister, Material, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};

/// A triangle primitive.
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Material,
    bounds: Bounds3d,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        // from_points pads flat axes, axis-aligned triangles are common
        let bounds = Bounds3d::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            edge1,
            edge2,
            normal,
            material,
            bounds,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Figure for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        if t <= HIT_EPSILON {
            return None;
        }

        Some(HitRegister::new(ray, t, self.normal, self.material))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
