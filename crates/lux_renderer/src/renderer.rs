//! Render drivers and the image buffer they fill.
//!
//! Both integrators share the same outer loop: build the accelerator, then
//! dispatch one job per pixel through a [`WorkerPool`]. Each job returns
//! its pixel index and averaged radiance, and the calling thread writes it
//! into the image.

use crate::config::RenderConfig;
use crate::pathtracer::sample_radiance;
use crate::photon_map::{allocate_walks, emit, gather, normalize_photons, trace_photon_walk};
use crate::{stats, Camera, Photon, PhotonMap, RenderError, Scene, ThreadSafeCounter, WorkerPool, World};
use image::RgbaImage;
use lux_math::{Color, Ray};
use rand::rngs::SmallRng;
use std::path::Path;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Row-major buffer of linear radiance values.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width * height],
        }
    }

    /// Wrap existing pixels, which must number `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, RenderError> {
        if pixels.len() != width * height {
            return Err(RenderError::DimensionMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Get the pixel at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Color {
        self.pixels[row * self.width + col]
    }

    /// Set the pixel at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, color: Color) {
        self.pixels[row * self.width + col] = color;
    }

    pub fn set_index(&mut self, index: usize, color: Color) {
        self.pixels[index] = color;
    }

    /// Apply `f` to every pixel.
    pub fn map(&self, f: impl Fn(Color) -> Color) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Convert to RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage, RenderError> {
        let width = u32::try_from(self.width)
            .map_err(|_| RenderError::InvalidConfig(format!("image width {} too large", self.width)))?;
        let height = u32::try_from(self.height)
            .map_err(|_| RenderError::InvalidConfig(format!("image height {} too large", self.height)))?;

        RgbaImage::from_raw(width, height, self.to_rgba()).ok_or(RenderError::DimensionMismatch {
            expected: self.width * self.height * 4,
            actual: self.pixels.len() * 4,
        })
    }

    /// Write the image as an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.to_rgba_image()?.save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Render `scene` with the path tracer.
///
/// The scene's figures are moved into the accelerator chosen in `config`.
pub fn render_path_traced(scene: &mut Scene, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    let (pool, samples) = prepare(scene, config)?;
    let world = scene.build_world(config.accelerator, pool.threads())?;
    stats::log_statistics("Acceleration structure");

    stats::reset();
    let image = render_pixels(&scene.camera, &pool, samples, |ray, rng| {
        sample_radiance(&world, ray, 0, config.max_bounces, rng)
    });
    stats::log_statistics("Path tracing");

    Ok(image)
}

/// Render `scene` with the photon mapper: scatter photons, then gather per pixel.
pub fn render_photon_mapped(scene: &mut Scene, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    let (pool, samples) = prepare(scene, config)?;
    let world = scene.build_world(config.accelerator, pool.threads())?;
    stats::log_statistics("Acceleration structure");

    stats::reset();
    let scattered = scatter_photons_pass(&world, config, &pool);
    stats::log_statistics("Photon scattering");

    let photons = PhotonMap::build(scattered.photons);
    let settings = config.gather_settings();

    stats::reset();
    let image = render_pixels(&scene.camera, &pool, samples, |ray, rng| {
        gather(&world, &photons, ray, &settings, rng)
    });
    stats::log_statistics("Photon gathering");

    Ok(image)
}

/// Photons left by the scattering pass.
#[derive(Debug, Clone, Default)]
pub struct ScatterResult {
    /// Normalized photons, at most `max_photons` of them
    pub photons: Vec<Photon>,
    /// Walks actually traced; the normalization divides by this
    pub walks: usize,
}

/// Trace photon walks from every light until `max_walks` are done or
/// roughly `max_photons` photons are stored.
///
/// Workers stop tracing once the shared counter reaches the ceiling, but
/// walks already running finish. The collector keeps whole walks only: the
/// first walk that would overflow `max_photons` closes the map, and neither
/// it nor any later walk is counted in the normalization.
pub fn scatter_photons_pass(world: &World, config: &RenderConfig, pool: &WorkerPool) -> ScatterResult {
    let settings = &config.photon;
    let allocation = allocate_walks(world.lights(), settings.max_walks);
    for (light, walks) in &allocation {
        log::debug!("Light at {}: {walks} photon walks", light.center);
    }

    let stored = ThreadSafeCounter::new();
    let ceiling = settings.max_photons as u64;
    let jobs = allocation
        .iter()
        .flat_map(|&(light, walks)| std::iter::repeat(light).take(walks));

    let mut result = ScatterResult::default();
    let mut dropped_walks = 0usize;
    pool.run(
        "Photon scattering",
        jobs,
        |light, rng| {
            if stored.get() >= ceiling {
                return None;
            }
            let emitted = emit(&light, rng);
            let photons = trace_photon_walk(world, &emitted, config.max_bounces, settings.direct_light, rng);
            stored.add(photons.len() as u64);
            Some(photons)
        },
        |photons| {
            let Some(photons) = photons else {
                return;
            };
            if dropped_walks > 0 || result.photons.len() + photons.len() > settings.max_photons {
                dropped_walks += 1;
                return;
            }
            result.walks += 1;
            result.photons.extend(photons);
        },
    );

    if dropped_walks > 0 {
        log::debug!("Dropped {dropped_walks} walks above the photon ceiling");
    }
    normalize_photons(&mut result.photons, result.walks);
    log::info!("Stored {} photons from {} walks", result.photons.len(), result.walks);

    result
}

fn prepare(scene: &Scene, config: &RenderConfig) -> Result<(WorkerPool, usize), RenderError> {
    config.validate()?;

    let camera = &scene.camera;
    if camera.width == 0 || camera.height == 0 {
        return Err(RenderError::InvalidConfig(format!(
            "image resolution {}x{} is empty",
            camera.width, camera.height
        )));
    }

    let samples = config.samples_per_pixel.unwrap_or(camera.rays_per_pixel);
    if samples == 0 {
        return Err(RenderError::InvalidConfig("camera casts no rays per pixel".into()));
    }

    let pool = WorkerPool::new(config.threads, config.seed);
    log::info!(
        "Rendering {}x{} at {samples} samples per pixel on {} threads",
        camera.width,
        camera.height,
        pool.threads()
    );
    Ok((pool, samples))
}

/// Average `samples` radiance estimates through every pixel.
fn render_pixels<F>(camera: &Camera, pool: &WorkerPool, samples: usize, radiance: F) -> ImageBuffer
where
    F: Fn(&Ray, &mut SmallRng) -> Color + Sync,
{
    let mut image = ImageBuffer::new(camera.width, camera.height);
    let jobs = (0..camera.height).flat_map(|row| (0..camera.width).map(move |col| (row, col)));

    pool.run(
        "Rendering",
        jobs,
        |(row, col), rng| {
            let mut color = Color::ZERO;
            for _ in 0..samples {
                let ray = camera.get_ray(row, col, rng);
                color += radiance(&ray, &mut *rng);
            }
            (camera.pixel_index(row, col), color / samples as f32)
        },
        |(index, color)| image.set_index(index, color),
    );

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photon_map::DirectLightMethod;
    use crate::{Material, Plane, PointLight, Sphere};
    use lux_math::Vec3;

    fn camera(width: usize, height: usize) -> Camera {
        Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, width, height, 2, 40.0)
    }

    fn lit_sphere_scene() -> Scene {
        let mut scene = Scene::new(camera(8, 6));
        scene.add(Sphere::new(Vec3::ZERO, 1.0, Material::diffuse(Color::splat(0.8))));
        scene.add_light(PointLight::new(Vec3::new(0.0, 4.0, 4.0), Color::splat(20.0)));
        scene
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(0.25, 4.0, -1.0)), [127, 255, 0, 255]);
    }

    #[test]
    fn test_image_buffer_indexing() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(1, 2, Color::ONE);
        assert_eq!(image.get(1, 2), Color::ONE);
        assert_eq!(image.pixels()[5], Color::ONE);
        assert_eq!(image.to_rgba().len(), 3 * 2 * 4);

        let rgba = image.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(2, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        let err = ImageBuffer::from_pixels(2, 2, vec![Color::ZERO; 3]).unwrap_err();
        assert!(matches!(err, RenderError::DimensionMismatch { expected: 4, actual: 3 }));
    }

    #[test]
    fn test_empty_resolution_is_rejected() {
        let mut scene = Scene::new(camera(0, 4));
        let result = render_path_traced(&mut scene, &RenderConfig::default());
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_single_thread_render_is_deterministic() {
        let config = RenderConfig {
            threads: 1,
            seed: 7,
            ..Default::default()
        };

        let a = render_path_traced(&mut lit_sphere_scene(), &config).unwrap();
        let b = render_path_traced(&mut lit_sphere_scene(), &config).unwrap();
        assert_eq!(a, b);
        assert!(a.pixels().iter().any(|c| c.max_element() > 0.0));
    }

    #[test]
    fn test_scatter_without_lights() {
        let mut scene = lit_sphere_scene();
        scene.lights.clear();
        let world = scene.build_world(Default::default(), 1).unwrap();

        let result = scatter_photons_pass(&world, &RenderConfig::default(), &WorkerPool::new(2, 0));
        assert!(result.photons.is_empty());
        assert_eq!(result.walks, 0);
    }

    #[test]
    fn test_scatter_respects_photon_ceiling() {
        let mut scene = Scene::new(camera(4, 4));
        scene.add(Plane::new(1.0, Vec3::Y, Material::diffuse(Color::splat(0.9))));
        scene.add_light(PointLight::new(Vec3::ZERO, Color::ONE));
        let world = scene.build_world(Default::default(), 1).unwrap();

        let mut config = RenderConfig::default();
        config.photon.max_walks = 2000;
        config.photon.max_photons = 50;
        config.photon.direct_light = DirectLightMethod::StoreAllPhotons;

        let result = scatter_photons_pass(&world, &config, &WorkerPool::new(4, 3));
        assert!(!result.photons.is_empty() && result.photons.len() <= 50);
        assert!(result.walks >= result.photons.len() && result.walks < 2000);
    }

    #[test]
    fn test_scatter_keeps_whole_walks() {
        // A white closed sphere around the light: every walk stores one photon per bounce
        let mut scene = Scene::new(camera(4, 4));
        scene.add(Sphere::new(Vec3::ZERO, 2.0, Material::diffuse(Color::ONE)));
        scene.add_light(PointLight::new(Vec3::ZERO, Color::ONE));
        let world = scene.build_world(Default::default(), 1).unwrap();

        let mut config = RenderConfig {
            max_bounces: 6,
            ..Default::default()
        };
        config.photon.max_walks = 100;
        config.photon.max_photons = 50;
        config.photon.direct_light = DirectLightMethod::StoreAllPhotons;

        let result = scatter_photons_pass(&world, &config, &WorkerPool::new(4, 11));

        // Seven photons per walk; an eighth walk would overflow the ceiling
        assert_eq!(result.walks, 7);
        assert_eq!(result.photons.len(), 49);

        // Each photon carries the full light power scaled by 4π / walks
        let expected = 4.0 * std::f32::consts::PI / 7.0;
        for photon in &result.photons {
            assert!((photon.flux - Color::splat(expected)).abs().max_element() < 1e-4);
        }
    }

    #[test]
    fn test_photon_mapped_render() {
        let mut scene = Scene::new(camera(4, 4));
        scene.add(Plane::new(1.0, Vec3::Y, Material::diffuse(Color::splat(0.7))));
        scene.add_light(PointLight::new(Vec3::ZERO, Color::splat(10.0)));

        let mut config = RenderConfig {
            threads: 2,
            ..Default::default()
        };
        config.photon.max_walks = 5000;

        let image = render_photon_mapped(&mut scene, &config).unwrap();
        assert_eq!(image.pixels().len(), 16);
        assert!(image.pixels().iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
    }
}
