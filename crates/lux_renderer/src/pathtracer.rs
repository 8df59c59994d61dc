//! Backward path tracing with Russian roulette and next-event estimation.

use crate::sampling::{generate_wi, material_properties, russian_roulette, Event};
use crate::{stats, HitRegister, World};
use lux_math::{Color, Ray};
use rand::RngCore;
use std::f32::consts::PI;

/// Estimate the radiance arriving along `ray`.
///
/// `bounce` is the depth `ray` starts at; nothing is traced once it
/// exceeds `max_bounces`. Every surface reached adds direct lighting from
/// the point lights unless it reflects specularly, then the walk continues
/// through the lobe chosen by Russian roulette.
pub fn sample_radiance(world: &World, ray: &Ray, bounce: u32, max_bounces: u32, rng: &mut dyn RngCore) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in bounce..=max_bounces {
        stats::count_ray_traced();

        let Some(hit) = world.intersect(&ray) else {
            break;
        };

        if hit.material.area_light {
            radiance += throughput * hit.material.emission;
            break;
        }

        let event = russian_roulette(&hit.material, rng);
        if event != Event::Specular {
            radiance += throughput * direct_light(world, &hit);
        }

        let Some(next) = generate_wi(event, &hit, &ray, rng) else {
            break;
        };
        throughput *= material_properties(event, &hit.material);
        ray = next;
    }

    radiance
}

/// Lambertian contribution of every unoccluded point light at `hit`.
pub fn direct_light(world: &World, hit: &HitRegister) -> Color {
    let brdf = hit.material.diffuse / PI;
    if brdf == Color::ZERO {
        return Color::ZERO;
    }

    world
        .lights()
        .iter()
        .filter(|light| world.visible(hit.point, light.center))
        .map(|light| {
            let to_light = light.center - hit.point;
            let distance_squared = to_light.length_squared();
            let cos_theta = hit.normal.dot(to_light.normalize_or_zero()).max(0.0);
            light.power / distance_squared * brdf * cos_theta
        })
        .sum()
}
