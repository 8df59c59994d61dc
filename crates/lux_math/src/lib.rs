// Re-export glam for convenience
pub use glam::*;

mod bounds;
mod error;
mod interval;
mod ray;
mod transform;

pub use bounds::Bounds3d;
pub use error::MathError;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// RGB triple used for radiance, flux, power and material coefficients.
pub type Color = Vec3;

/// Largest of the three channels of a color.
#[inline]
pub fn max_channel(c: Color) -> f32 {
    c.max_element()
}
