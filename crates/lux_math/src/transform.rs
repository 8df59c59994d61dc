// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse();
// this adds the checked inverse and box transform transformed figures rely on.

use glam::{Mat4, Vec3};
use crate::{Bounds3d, MathError};

/// Determinants below this magnitude are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse of the matrix, or `MathError::SingularMatrix` if none exists.
    fn try_inverse(&self) -> Result<Mat4, MathError>;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_bounds(&self, bounds: &Bounds3d) -> Bounds3d;
}

impl Mat4Ext for Mat4 {
    fn try_inverse(&self) -> Result<Mat4, MathError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(MathError::SingularMatrix(det));
        }
        Ok(self.inverse())
    }

    fn transform_bounds(&self, bounds: &Bounds3d) -> Bounds3d {
        // Unbounded boxes stay unbounded, transforming f32::MAX corners only overflows
        if *bounds == Bounds3d::UNBOUNDED || bounds.is_empty() {
            return *bounds;
        }

        let (lo, hi) = (bounds.p_min, bounds.p_max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];

        corners
            .iter()
            .fold(Bounds3d::EMPTY, |acc, &corner| acc.union_point(self.transform_point3(corner)))
    }
}
