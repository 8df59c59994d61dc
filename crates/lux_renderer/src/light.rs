//! Point lights.

use lux_math::{Color, Vec3};

/// An isotropic point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub center: Vec3,
    /// Radiant power per channel
    pub power: Color,
}

impl PointLight {
    pub fn new(center: Vec3, power: Color) -> Self {
        Self { center, power }
    }
}
