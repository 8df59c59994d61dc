use crate::{Color, Vec3};

/// A ray in 3D space with origin, unit direction and the flux it carries.
///
/// Flux is only meaningful while scattering photons, where it records the
/// power of the light the walk started from. Camera and shadow rays carry
/// zero flux.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    flux: Color,
}

impl Ray {
    /// Create a new ray. The direction is normalized; a zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_flux(origin, direction, Color::ZERO)
    }

    /// Create a ray carrying `flux`.
    pub fn with_flux(origin: Vec3, direction: Vec3, flux: Color) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            flux,
        }
    }

    /// Same origin and direction, different flux.
    #[inline]
    pub fn carrying(self, flux: Color) -> Self {
        Self { flux, ..self }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn flux(&self) -> Color {
        self.flux
    }

    /// True when the direction has zero length (e.g. after total internal reflection).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
            flux: Color::ZERO,
        }
    }
}
