//! Plane primitive: every point `p` with `p·n + d = 0`.

use crate::{stats, Figure, HitRegister, Material, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};

/// An infinite plane, optionally clipped to a box.
pub struct Plane {
    normal: Vec3,
    distance: f32,
    material: Material,
    bounds: Bounds3d,
}

impl Plane {
    /// Create the plane `p·normal + distance = 0`.
    pub fn new(distance: f32, normal: Vec3, material: Material) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
            material,
            bounds: Bounds3d::UNBOUNDED,
        }
    }

    /// Builder: keep only the part of the plane inside the box spanned by `a` and `b`.
    ///
    /// Infinite planes would make every BVH box unbounded, so area lights
    /// and walls meant for an accelerator should be clipped.
    pub fn with_bounds(mut self, a: Vec3, b: Vec3) -> Self {
        self.bounds = Bounds3d::from_points(a, b);
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Figure for Plane {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        let denom = self.normal.dot(ray.direction());
        // Ray is parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = -(self.distance + self.normal.dot(ray.origin())) / denom;
        if t <= HIT_EPSILON {
            return None;
        }

        let hit = HitRegister::new(ray, t, self.normal, self.material);
        if self.bounds != Bounds3d::UNBOUNDED && !self.bounds.contains_point(hit.point) {
            return None;
        }

        Some(hit)
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::Color;

    fn floor() -> Plane {
        // y = -1
        Plane::new(1.0, Vec3::Y, Material::diffuse(Color::splat(0.6)))
    }

    #[test]
    fn test_plane_hit() {
        let hit = floor().intersect(&Ray::new(Vec3::ZERO, -Vec3::Y)).unwrap();

        assert!((hit.t - 1.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);
        assert!(hit.front_face);
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        assert!(floor().intersect(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
        assert!(floor().intersect(&Ray::new(Vec3::ZERO, Vec3::Y)).is_none());
    }

    #[test]
    fn test_plane_back_face() {
        let hit = floor()
            .intersect(&Ray::new(Vec3::new(0.0, -3.0, 0.0), Vec3::Y))
            .unwrap();
        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::Y);
    }

    #[test]
    fn test_plane_is_unbounded_by_default() {
        assert_eq!(floor().bounds(), Bounds3d::UNBOUNDED);
    }

    #[test]
    fn test_bounded_plane_clips_hits() {
        let tile = floor().with_bounds(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, -1.0, 1.0));
        assert!(!tile.bounds().is_empty());

        assert!(tile.intersect(&Ray::new(Vec3::ZERO, -Vec3::Y)).is_some());
        assert!(tile
            .intersect(&Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::Y))
            .is_none());
    }
}
