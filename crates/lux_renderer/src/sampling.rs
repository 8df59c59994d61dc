//! Interaction sampling shared by the path tracer and the photon mapper.
//!
//! Russian roulette picks one lobe per interaction with probability equal
//! to the max channel of its coefficient; [`material_properties`] divides
//! the coefficient by that probability so estimates stay unbiased.

use crate::{HitRegister, Material, AIR_REFRACTION_INDEX};
use lux_math::{max_channel, Color, Ray, Vec3};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Refracted rays start this far along their direction, past the surface they cross.
const REFRACTION_OFFSET: f32 = 0.01;

/// Outcome of Russian roulette at a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Diffuse,
    Specular,
    Refraction,
    Absorption,
}

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Choose the interaction at a surface.
pub fn russian_roulette(material: &Material, rng: &mut dyn RngCore) -> Event {
    let p_d = max_channel(material.diffuse);
    let p_s = max_channel(material.specular);
    let p_t = max_channel(material.refractive);
    let u = gen_f32(rng);

    if u < p_d {
        Event::Diffuse
    } else if u < p_d + p_s {
        Event::Specular
    } else if u < p_d + p_s + p_t {
        Event::Refraction
    } else {
        Event::Absorption
    }
}

/// Coefficient of the chosen lobe divided by its selection probability.
pub fn material_properties(event: Event, material: &Material) -> Color {
    let coefficient = match event {
        Event::Diffuse => material.diffuse,
        Event::Specular => material.specular,
        Event::Refraction => material.refractive,
        Event::Absorption => return Color::ZERO,
    };

    let p = max_channel(coefficient);
    if p > 0.0 {
        coefficient / p
    } else {
        Color::ZERO
    }
}

/// Outgoing ray for `event` at `hit`, reached along `incoming`.
///
/// Returns `None` for absorption and for total internal reflection, where
/// nothing leaves the surface.
pub fn generate_wi(event: Event, hit: &HitRegister, incoming: &Ray, rng: &mut dyn RngCore) -> Option<Ray> {
    match event {
        Event::Absorption => None,
        Event::Diffuse => Some(Ray::new(hit.point, cosine_hemisphere(hit.normal, rng))),
        Event::Specular => Some(Ray::new(hit.point, reflect(incoming.direction(), hit.normal))),
        Event::Refraction => {
            let (n_in, n_out) = if hit.front_face {
                (AIR_REFRACTION_INDEX, hit.material.refraction_index)
            } else {
                (hit.material.refraction_index, AIR_REFRACTION_INDEX)
            };
            let direction = refract(incoming.direction(), hit.normal, n_in / n_out)?;
            Some(Ray::new(hit.point + REFRACTION_OFFSET * direction, direction))
        }
    }
}

/// Mirror `direction` about `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// Snell refraction of a unit `direction` through a surface whose unit
/// `normal` faces against it, with `eta = n_in / n_out`.
///
/// Returns `None` on total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = (-direction.dot(normal)).clamp(-1.0, 1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((eta * direction + (eta * cos_i - k.sqrt()) * normal).normalize())
}

/// Cosine-weighted direction on the hemisphere around a unit `normal`.
pub fn cosine_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let theta = (1.0 - gen_f32(rng)).sqrt().acos();
    let phi = 2.0 * PI * gen_f32(rng);

    let (tangent, bitangent) = normal.any_orthonormal_pair();
    let local = spherical_to_cartesian(theta, phi);
    tangent * local.x + bitangent * local.y + normal * local.z
}

/// Uniformly distributed unit vector.
pub fn uniform_sphere(rng: &mut dyn RngCore) -> Vec3 {
    let theta = (2.0 * gen_f32(rng) - 1.0).acos();
    let phi = 2.0 * PI * gen_f32(rng);
    spherical_to_cartesian(theta, phi)
}

#[inline]
fn spherical_to_cartesian(theta: f32, phi: f32) -> Vec3 {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_with(material: Material, front_face: bool) -> HitRegister {
        HitRegister {
            t: 1.0,
            t_max: 1.0,
            point: Vec3::ZERO,
            normal: Vec3::Y,
            front_face,
            material,
        }
    }

    #[test]
    fn test_russian_roulette_frequencies() {
        let material = Material::new(Color::splat(0.5), Color::splat(0.2), Color::splat(0.1), 1.5);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 100_000;

        let mut counts = [0usize; 4];
        for _ in 0..n {
            let idx = match russian_roulette(&material, &mut rng) {
                Event::Diffuse => 0,
                Event::Specular => 1,
                Event::Refraction => 2,
                Event::Absorption => 3,
            };
            counts[idx] += 1;
        }

        let freq = counts.map(|c| c as f32 / n as f32);
        assert!((freq[0] - 0.5).abs() < 0.01);
        assert!((freq[1] - 0.2).abs() < 0.01);
        assert!((freq[2] - 0.1).abs() < 0.01);
        assert!((freq[3] - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_black_material_always_absorbs() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let event = russian_roulette(&Material::BLACK, &mut rng);
            assert!(matches!(event, Event::Absorption | Event::Diffuse));
            assert_eq!(material_properties(event, &Material::BLACK), Color::ZERO);
        }
    }

    #[test]
    fn test_material_properties_scale_by_max_channel() {
        let material = Material::diffuse(Color::new(0.8, 0.4, 0.2));
        assert_eq!(
            material_properties(Event::Diffuse, &material),
            Color::new(1.0, 0.5, 0.25)
        );
        assert_eq!(material_properties(Event::Absorption, &material), Color::ZERO);
    }

    #[test]
    fn test_cosine_hemisphere_stays_above_surface() {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();

        let mut mean_cos = 0.0;
        let n = 20_000;
        for _ in 0..n {
            let d = cosine_hemisphere(normal, &mut rng);
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(normal) >= -1e-6);
            mean_cos += d.dot(normal);
        }
        // E[cos] under a cosine-weighted density is 2/3
        assert!((mean_cos / n as f32 - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_uniform_sphere_is_centered() {
        let mut rng = StdRng::seed_from_u64(42);
        let n = 50_000;
        let sum: Vec3 = (0..n).map(|_| uniform_sphere(&mut rng)).sum();
        assert!((sum / n as f32).length() < 0.02);
    }

    #[test]
    fn test_specular_reflection() {
        let mut rng = StdRng::seed_from_u64(0);
        let hit = hit_with(Material::mirror(Color::ONE), true);
        let incoming = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let out = generate_wi(Event::Specular, &hit, &incoming, &mut rng).unwrap();
        assert!((out.direction() - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_refraction_bends_towards_normal_when_entering() {
        let mut rng = StdRng::seed_from_u64(0);
        let hit = hit_with(Material::glass(Color::ONE, Color::ZERO, 1.5), true);
        let incoming = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let out = generate_wi(Event::Refraction, &hit, &incoming, &mut rng).unwrap();
        let sin_in = incoming.direction().x;
        let sin_out = out.direction().x;
        assert!(out.direction().y < 0.0);
        assert!((sin_in * AIR_REFRACTION_INDEX - sin_out * 1.5).abs() < 1e-4);
        // Origin is pushed through the surface
        assert!(out.origin().y < 0.0);
    }

    #[test]
    fn test_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(0);
        // Leaving glass at a grazing angle
        let hit = hit_with(Material::glass(Color::ONE, Color::ZERO, 1.5), false);
        let incoming = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.2, 0.0));

        assert!(generate_wi(Event::Refraction, &hit, &incoming, &mut rng).is_none());
        assert!(generate_wi(Event::Absorption, &hit, &incoming, &mut rng).is_none());
    }

    #[test]
    fn test_head_on_refraction_goes_straight() {
        let refracted = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5).unwrap();
        assert!((refracted - (-Vec3::Y)).length() < 1e-5);
    }
}
