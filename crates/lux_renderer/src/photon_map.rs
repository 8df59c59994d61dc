//! Photon mapping: forward scattering from the lights and density
//! estimation at the first diffuse surface seen from the camera.

use crate::pathtracer::direct_light;
use crate::sampling::{generate_wi, material_properties, russian_roulette, uniform_sphere, Event};
use crate::{stats, Photon, PhotonMap, PointLight, World};
use lux_math::{max_channel, Color, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Weighting applied to the neighbours of a shading point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    Box,
    NormalizedBox,
    Gaussian,
    NormalizedGaussian,
    #[default]
    Cone,
}

const GAUSSIAN_ALPHA: f32 = 1.728;
const GAUSSIAN_BETA: f32 = 1.953;
const CONE_SLOPE: f32 = 1.1;

impl Kernel {
    /// Weight of a photon at distance `d` inside a gather radius `r`.
    pub fn weight(self, d: f32, r: f32) -> f32 {
        match self {
            Kernel::Box | Kernel::NormalizedBox => 1.0,
            Kernel::Gaussian | Kernel::NormalizedGaussian => {
                let falloff = 1.0 - (-GAUSSIAN_BETA * d * d / (2.0 * r * r)).exp();
                GAUSSIAN_ALPHA * (1.0 - falloff / (1.0 - (-GAUSSIAN_BETA).exp()))
            }
            Kernel::Cone => 1.0 - d / (CONE_SLOPE * r),
        }
    }

    /// Divisor applied to the weighted sum for a gather radius `r`.
    pub fn normalization(self, r: f32) -> f32 {
        let disc = PI * r * r;
        match self {
            Kernel::Box | Kernel::Gaussian => 1.0,
            Kernel::NormalizedBox | Kernel::NormalizedGaussian => disc,
            Kernel::Cone => (1.0 - 2.0 / (3.0 * CONE_SLOPE)) * disc,
        }
    }

    /// Weighted, normalized flux of photons given as `(distance, flux)` pairs.
    pub fn estimate(self, neighbours: &[(f32, Color)], radius: f32) -> Color {
        if neighbours.is_empty() || radius <= 0.0 {
            return Color::ZERO;
        }

        let sum: Color = neighbours
            .iter()
            .map(|&(d, flux)| flux * self.weight(d, radius))
            .sum();
        sum / self.normalization(radius)
    }
}

/// Where direct lighting comes from in the photon-mapped image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectLightMethod {
    /// Shadow rays to the point lights; photons are only stored after a bounce.
    #[default]
    NextEventEstimation,
    /// Photons are stored on the first hit too and carry direct lighting.
    StoreAllPhotons,
}

/// Split `walks` among `lights` in proportion to the max channel of their power.
///
/// Counts are truncated, so the total can fall a few walks short.
pub fn allocate_walks(lights: &[PointLight], walks: usize) -> Vec<(PointLight, usize)> {
    let total_power: f32 = lights.iter().map(|light| max_channel(light.power)).sum();
    if total_power <= 0.0 {
        return Vec::new();
    }

    lights
        .iter()
        .map(|light| {
            let share = max_channel(light.power) / total_power;
            (*light, (walks as f64 * share as f64) as usize)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// Ray leaving `light` in a uniformly random direction, carrying its power.
pub fn emit(light: &PointLight, rng: &mut dyn RngCore) -> Ray {
    Ray::with_flux(light.center, uniform_sphere(rng), light.power)
}

/// Follow one photon walk and return the photons it deposits.
///
/// A photon is stored at every diffuse interaction, except the first
/// surface hit when direct lighting is estimated with shadow rays.
pub fn trace_photon_walk(
    world: &World,
    emitted: &Ray,
    max_bounces: u32,
    method: DirectLightMethod,
    rng: &mut dyn RngCore,
) -> Vec<Photon> {
    let mut photons = Vec::new();
    let mut throughput = Color::ONE;
    let mut ray = *emitted;

    for bounce in 0..=max_bounces {
        stats::count_ray_traced();

        let Some(hit) = world.intersect(&ray) else {
            break;
        };
        if hit.material.area_light {
            break;
        }

        let event = russian_roulette(&hit.material, rng);
        if event == Event::Diffuse && (bounce > 0 || method == DirectLightMethod::StoreAllPhotons) {
            photons.push(Photon::new(hit.point, ray.direction(), ray.flux() * throughput));
        }

        let Some(next) = generate_wi(event, &hit, &ray, rng) else {
            break;
        };
        throughput *= material_properties(event, &hit.material);
        ray = next.carrying(ray.flux());
    }

    photons
}

/// Scale every photon's flux by `4π / walks`.
pub fn normalize_photons(photons: &mut [Photon], walks: usize) {
    if walks == 0 {
        return;
    }
    let scale = 4.0 * PI / walks as f32;
    for photon in photons {
        photon.flux *= scale;
    }
}

/// Density estimate of the radiance leaving a diffuse point.
///
/// The gather radius is the distance to the farthest of the neighbours found.
pub fn photon_density(photons: &PhotonMap, point: Vec3, nearest: usize, kernel: Kernel) -> Color {
    let neighbours: Vec<(f32, Color)> = photons
        .nearest(point, nearest)
        .into_iter()
        .map(|(photon, distance)| (distance, photon.flux))
        .collect();
    let radius = neighbours.iter().map(|&(d, _)| d).fold(0.0, f32::max);

    kernel.estimate(&neighbours, radius)
}

/// Parameters of the gathering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatherSettings {
    pub kernel: Kernel,
    pub nearest_photons: usize,
    pub direct_light: DirectLightMethod,
    pub max_bounces: u32,
}

/// Estimate the radiance arriving along a camera ray from the photon map.
///
/// Specular and refractive bounces are followed like in the path tracer;
/// the first diffuse hit ends the walk with a density estimate.
pub fn gather(
    world: &World,
    photons: &PhotonMap,
    ray: &Ray,
    settings: &GatherSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..=settings.max_bounces {
        stats::count_ray_traced();

        let Some(hit) = world.intersect(&ray) else {
            return Color::ZERO;
        };
        if hit.material.area_light {
            return throughput * hit.material.emission;
        }

        let event = russian_roulette(&hit.material, rng);
        if event == Event::Diffuse {
            let brdf = hit.material.diffuse / PI;
            let mut radiance = photon_density(photons, hit.point, settings.nearest_photons, settings.kernel) * brdf;
            if settings.direct_light == DirectLightMethod::NextEventEstimation {
                radiance += direct_light(world, &hit);
            }
            return throughput * radiance;
        }

        let Some(next) = generate_wi(event, &hit, &ray, rng) else {
            return Color::ZERO;
        };
        throughput *= material_properties(event, &hit.material);
        ray = next;
    }

    Color::ZERO
}
