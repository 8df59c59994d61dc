//! Surface response coefficients.
//!
//! Every figure carries a [`Material`] and copies it into each
//! [`HitRegister`](crate::HitRegister) it produces. The integrators pick
//! one lobe per interaction by Russian roulette over the max channel of
//! each coefficient, so `diffuse + specular + refractive` should not exceed
//! one in any channel.

use lux_math::Color;

/// Index of refraction of air, used on the outside of every refractive surface.
pub const AIR_REFRACTION_INDEX: f32 = 1.000_277_17;

/// Lobe coefficients and emission of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Lambertian reflectance
    pub diffuse: Color,
    /// Perfect mirror reflectance
    pub specular: Color,
    /// Transmittance through a dielectric boundary
    pub refractive: Color,
    /// Radiance emitted by area lights
    pub emission: Color,
    /// Index of refraction of the inside of the surface
    pub refraction_index: f32,
    /// Area lights end every path that hits them
    pub area_light: bool,
}

impl Material {
    /// Material that absorbs everything.
    pub const BLACK: Material = Material {
        diffuse: Color::ZERO,
        specular: Color::ZERO,
        refractive: Color::ZERO,
        emission: Color::ZERO,
        refraction_index: 1.0,
        area_light: false,
    };

    /// Material with all three scattering lobes.
    pub fn new(diffuse: Color, specular: Color, refractive: Color, refraction_index: f32) -> Self {
        Self {
            diffuse,
            specular,
            refractive,
            refraction_index,
            ..Self::BLACK
        }
    }

    /// Purely Lambertian surface.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            diffuse: albedo,
            ..Self::BLACK
        }
    }

    /// Purely specular surface.
    pub fn mirror(reflectance: Color) -> Self {
        Self {
            specular: reflectance,
            ..Self::BLACK
        }
    }

    /// Dielectric with a refractive lobe and an optional specular coat.
    pub fn glass(refractive: Color, specular: Color, refraction_index: f32) -> Self {
        Self::new(Color::ZERO, specular, refractive, refraction_index)
    }

    /// Emissive surface that terminates paths.
    pub fn area_light(emission: Color) -> Self {
        Self {
            emission,
            area_light: true,
            ..Self::BLACK
        }
    }

    /// Builder: add a specular lobe.
    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::BLACK
    }
}
