//! Figure trait and HitRegister for ray-figure intersection.

use crate::Material;
use lux_math::{Bounds3d, Ray, Vec3};
use std::sync::Arc;

/// Hits closer than this to the ray origin are ignored, so secondary rays
/// leaving a surface do not report the surface they start on.
pub const HIT_EPSILON: f32 = 1e-4;

/// Record of a ray-figure intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegister {
    /// Parameter t of the reported intersection
    pub t: f32,
    /// Parameter where the ray leaves the solid; equals `t` for surfaces
    pub t_max: f32,
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always facing against the ray
    pub normal: Vec3,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: Material,
}

impl HitRegister {
    /// Build a register at parameter `t` of `ray`, orienting the normal against the ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: Material) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            t,
            t_max: t,
            point: ray.at(t),
            normal,
            front_face,
            material,
        }
    }

    /// Builder: record where the ray leaves the solid.
    pub fn with_t_max(mut self, t_max: f32) -> Self {
        self.t_max = t_max;
        self
    }

    /// Builder: replace the material while keeping the geometry.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Surface frame as a ray: origin at the hit point, direction along the normal.
    pub fn surface(&self) -> Ray {
        Ray::new(self.point, self.normal)
    }

    /// Parametric span `[enter, exit]` the ray spends inside the solid.
    ///
    /// A ray that starts inside only has an exit, so the span opens at zero.
    pub fn inside_span(&self) -> (f32, f32) {
        if self.front_face {
            (self.t, self.t_max)
        } else {
            (0.0, self.t_max)
        }
    }
}

/// Anything a ray can be tested against: primitives, wrappers and aggregates.
pub trait Figure: Send + Sync {
    /// Nearest intersection in front of the ray origin, if any.
    fn intersect(&self, ray: &Ray) -> Option<HitRegister>;

    /// Axis-aligned box enclosing the figure.
    fn bounds(&self) -> Bounds3d;

    /// Operands of binary aggregates (BVH nodes and CSG combinators).
    fn children(&self) -> Option<[&dyn Figure; 2]> {
        None
    }
}

/// Keep whichever hit is closer.
#[inline]
pub fn nearest(a: Option<HitRegister>, b: Option<HitRegister>) -> Option<HitRegister> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Linear-scan aggregate: the scene without an accelerator.
pub struct FigureList {
    figures: Vec<Arc<dyn Figure>>,
    bounds: Bounds3d,
}

impl FigureList {
    /// Create a new empty figure list.
    pub fn new() -> Self {
        Self {
            figures: Vec::new(),
            bounds: Bounds3d::EMPTY,
        }
    }

    /// Add a figure to the list.
    pub fn add(&mut self, figure: Arc<dyn Figure>) {
        self.bounds = self.bounds.union(&figure.bounds());
        self.figures.push(figure);
    }

    /// Get the number of figures.
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

impl Default for FigureList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Arc<dyn Figure>> for FigureList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Figure>>>(iter: I) -> Self {
        let mut list = FigureList::new();
        for figure in iter {
            list.add(figure);
        }
        list
    }
}

impl Figure for FigureList {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        self.figures
            .iter()
            .fold(None, |closest, figure| nearest(closest, figure.intersect(ray)))
    }

    fn bounds(&self) -> Bounds3d {
        self.bounds
    }
}
