//! Constructive solid geometry combinators.
//!
//! Both operate on the parametric span a ray spends inside each operand
//! (`HitRegister::inside_span`), so operands should be closed solids.

use crate::{nearest, Figure, HitRegister};
use lux_math::{Bounds3d, Ray};
use std::sync::Arc;

/// Union of two solids.
pub struct CsgUnion {
    a: Arc<dyn Figure>,
    b: Arc<dyn Figure>,
}

impl CsgUnion {
    pub fn new(a: Arc<dyn Figure>, b: Arc<dyn Figure>) -> Self {
        Self { a, b }
    }
}

impl Figure for CsgUnion {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        let a = self.a.intersect(ray);
        let b = self.b.intersect(ray);
        let t_max = match (a, b) {
            (Some(a), Some(b)) => a.t_max.max(b.t_max),
            _ => return nearest(a, b),
        };
        nearest(a, b).map(|hit| hit.with_t_max(t_max))
    }

    fn bounds(&self) -> Bounds3d {
        self.a.bounds().union(&self.b.bounds())
    }

    fn children(&self) -> Option<[&dyn Figure; 2]> {
        Some([self.a.as_ref(), self.b.as_ref()])
    }
}

/// Solid `a` with solid `b` carved out of it.
pub struct CsgDifference {
    a: Arc<dyn Figure>,
    b: Arc<dyn Figure>,
}

impl CsgDifference {
    pub fn new(a: Arc<dyn Figure>, b: Arc<dyn Figure>) -> Self {
        Self { a, b }
    }

    /// Hit where the ray leaves `b` inside `a`, seen as a wall of the carved cavity.
    fn cavity_wall(&self, ray: &Ray, a: &HitRegister, b_span: (f32, f32)) -> Option<HitRegister> {
        // Restart from the middle of b's span so only its exit is found
        let step = 0.5 * (b_span.0 + b_span.1);
        let inner = Ray::new(ray.at(step), ray.direction());
        let mut hit = self.b.intersect(&inner)?;
        hit.t += step;
        hit.t_max = a.t_max;
        hit.front_face = true;
        Some(hit)
    }
}

impl Figure for CsgDifference {
    fn intersect(&self, ray: &Ray) -> Option<HitRegister> {
        let a = self.a.intersect(ray)?;
        let Some(b) = self.b.intersect(ray) else {
            return Some(a);
        };

        let (b_enter, b_exit) = b.inside_span();
        if a.t < b_enter || a.t > b_exit {
            return Some(a);
        }

        // a's surface is inside b; visible only if b ends before a does
        if b_exit < a.t_max {
            self.cavity_wall(ray, &a, (b_enter, b_exit))
        } else {
            None
        }
    }

    fn bounds(&self) -> Bounds3d {
        self.a.bounds().union(&self.b.bounds())
    }

    fn children(&self) -> Option<[&dyn Figure; 2]> {
        Some([self.a.as_ref(), self.b.as_ref()])
    }
}
