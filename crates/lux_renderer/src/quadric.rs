//! Open cones and cylinders around a vertical axis.
//!
//! Both are capless surfaces hanging below a top point along -Z; place them
//! elsewhere with a [`TransformedFigure`](crate::TransformedFigure).

use crate::{stats, Figure, HitRegister, Material, HIT_EPSILON};
use lux_math::{Bounds3d, Ray, Vec3};

/// Real roots of `a t² + b t + c`, smaller first.
fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a.abs() < 1e-8 {
        if b.abs() < 1e-8 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);
    Some((t0.min(t1), t0.max(t1)))
}

/// Nearest and farthest roots in front of the ray whose height lies in `[bottom, top]`.
fn clip_roots(ray: &Ray, roots: (f32, f32), bottom: f32, top: f32) -> Option<(f32, f32)> {
    let valid = |t: f32| t > HIT_EPSILON && (bottom..=top).contains(&ray.at(t).z);
    match (valid(roots.0), valid(roots.1)) {
        (true, true) => Some(roots),
        (true, false) => Some((roots.0, roots.0)),
        (false, true) => Some((roots.1, roots.1)),
        (false, false) => None,
    }
}

/// Cone with its apex on top, widening to `radius` at `height` below it.
pub struct Cone {
    apex: Vec3,
    height: f32,
    /// Squared ratio of radius to height
    slope2: f32,
    material: Material,
    bounds: Bounds3d,
}

impl Cone {
    pub fn new(apex: Vec3, height: f32, radius: f32, material: Material) -> Self {
        let height = height.max(0.0);
        let radius = radius.max(0.0);
        let slope2 = if height > 0.0 { (radius / height).powi(2) } else { 0.0 };
        let bounds = Bounds3d::from_points(
            apex - Vec3::new(radius, radius, height),
            apex + Vec3::new(radius, radius, 0.0),
        );

        Self {
            apex,
            height,
            slope2,
            material,
            bounds,
        }
    }
}

impl Figure for Cone {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        let o = ray.origin() - self.apex;
        let d = ray.direction();
        let k = self.slope2;

        let a = d.x * d.x + d.y * d.y - k * d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.y * d.y - k * o.z * d.z);
        let c = o.x * o.x + o.y * o.y - k * o.z * o.z;

        let roots = solve_quadratic(a, b, c)?;
        // The quadric is a double cone; keep the nappe below the apex
        let (t, t_max) = clip_roots(ray, roots, self.apex.z - self.height, self.apex.z)?;

        let p = ray.at(t) - self.apex;
        let outward_normal = Vec3::new(p.x, p.y, -k * p.z).normalize_or_zero();
        Some(HitRegister::new(ray, t, outward_normal, self.material).with_t_max(t_max))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}

/// Cylinder wall of `radius`, hanging `height` below the centre of its top rim.
pub struct Cylinder {
    top: Vec3,
    radius: f32,
    height: f32,
    material: Material,
    bounds: Bounds3d,
}

impl Cylinder {
    pub fn new(top: Vec3, radius: f32, height: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let height = height.max(0.0);
        let bounds = Bounds3d::from_points(
            top - Vec3::new(radius, radius, height),
            top + Vec3::new(radius, radius, 0.0),
        );

        Self {
            top,
            radius,
            height,
            material,
            bounds,
        }
    }
}

impl Figure for Cylinder {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        stats::count_figure_test();

        let o = ray.origin() - self.top;
        let d = ray.direction();

        // Rays along the axis never cross the wall
        let a = d.x * d.x + d.y * d.y;
        if a < 1e-8 {
            return None;
        }
        let b = 2.0 * (o.x * d.x + o.y * d.y);
        let c = o.x * o.x + o.y * o.y - self.radius * self.radius;

        let roots = solve_quadratic(a, b, c)?;
        let (t, t_max) = clip_roots(ray, roots, self.top.z - self.height, self.top.z)?;

        let p = ray.at(t) - self.top;
        let outward_normal = Vec3::new(p.x, p.y, 0.0) / self.radius;
        Some(HitRegister::new(ray, t, outward_normal, self.material).with_t_max(t_max))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
