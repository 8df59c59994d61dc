//! Pinhole camera.
//!
//! The image plane is spanned by `left` and `up` around `origin + forward`.
//! Row 0 is the top of the image and column 0 its `left` edge; pixel
//! `(row, col)` lives at index `row * width + col`.

use crate::sampling::gen_f32;
use lux_math::{Ray, Vec3};
use rand::RngCore;

/// Largest jitter applied to a sample, in pixels.
const PIXEL_JITTER: f32 = 0.49;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Vec3,
    left: Vec3,
    up: Vec3,
    forward: Vec3,
    pub width: usize,
    pub height: usize,
    pub rays_per_pixel: usize,
}

impl Camera {
    /// Create a camera from its basis, deriving `left` from the aspect ratio.
    ///
    /// `left` is perpendicular to `forward` and `up`, as long as the image
    /// is wide relative to `up`.
    pub fn new(origin: Vec3, up: Vec3, forward: Vec3, width: usize, height: usize, rays_per_pixel: usize) -> Self {
        let aspect = width as f32 / height.max(1) as f32;
        let left = forward.cross(up).normalize_or_zero() * up.length() * aspect;
        Self::from_basis(origin, left, up, forward, width, height, rays_per_pixel)
    }

    /// Create a camera from an explicit basis.
    pub fn from_basis(
        origin: Vec3,
        left: Vec3,
        up: Vec3,
        forward: Vec3,
        width: usize,
        height: usize,
        rays_per_pixel: usize,
    ) -> Self {
        let camera = Self {
            origin,
            left,
            up,
            forward,
            width,
            height,
            rays_per_pixel,
        };
        log::debug!(
            "Camera: vertical fov {:.1}°, horizontal fov {:.1}°",
            camera.vertical_fov(),
            camera.horizontal_fov()
        );
        camera
    }

    /// Camera at `origin` looking at `target` with a vertical field of view in degrees.
    pub fn look_at(
        origin: Vec3,
        target: Vec3,
        width: usize,
        height: usize,
        rays_per_pixel: usize,
        vfov: f32,
    ) -> Self {
        let forward = target - origin;
        let mut side = forward.cross(Vec3::Y);
        if side.length_squared() < 1e-12 {
            // Looking straight up or down
            side = forward.cross(Vec3::Z);
        }
        let side = side.normalize_or_zero();
        let up_dir = side.cross(forward).normalize_or_zero();

        let half_height = (vfov.to_radians() / 2.0).tan() * forward.length();
        let aspect = width as f32 / height.max(1) as f32;

        Self::from_basis(
            origin,
            side * half_height * aspect,
            up_dir * half_height,
            forward,
            width,
            height,
            rays_per_pixel,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major index of pixel `(row, col)`.
    #[inline]
    pub fn pixel_index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Generate a ray through pixel `(row, col)`, jittered inside the pixel.
    pub fn get_ray(&self, row: usize, col: usize, rng: &mut dyn RngCore) -> Ray {
        let i = row as f32 + 0.5 + jitter(rng);
        let j = col as f32 + 0.5 + jitter(rng);

        let direction = self.up + self.forward + self.left
            - (2.0 * self.left / self.width as f32) * j
            - (2.0 * self.up / self.height as f32) * i;

        Ray::new(self.origin, direction)
    }

    /// Vertical field of view in degrees.
    pub fn vertical_fov(&self) -> f32 {
        2.0 * (self.up.length() / self.forward.length()).atan().to_degrees()
    }

    /// Horizontal field of view in degrees.
    pub fn horizontal_fov(&self) -> f32 {
        2.0 * (self.left.length() / self.forward.length()).atan().to_degrees()
    }
}

fn jitter(rng: &mut dyn RngCore) -> f32 {
    (gen_f32(rng) * 2.0 - 1.0) * PIXEL_JITTER
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, -3.5), Vec3::Y, Vec3::Z * 3.0, 100, 100, 4)
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = square_camera();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = camera.get_ray(50, 50, &mut rng);

        assert_eq!(ray.origin(), Vec3::new(0.0, 0.0, -3.5));
        assert!(ray.direction().dot(Vec3::Z) > 0.999);
    }

    #[test]
    fn test_corners_span_the_image_plane() {
        let camera = square_camera();
        let mut rng = StdRng::seed_from_u64(42);

        let top_left = camera.get_ray(0, 0, &mut rng).direction();
        let bottom_right = camera.get_ray(99, 99, &mut rng).direction();

        assert!(top_left.y > 0.0);
        assert!(bottom_right.y < 0.0);
        // Column 0 sits on the left vector, which is F x U = -X here
        assert!(top_left.x < 0.0);
        assert!(bottom_right.x > 0.0);
    }

    #[test]
    fn test_jitter_stays_inside_pixel() {
        let camera = square_camera();
        let mut rng = StdRng::seed_from_u64(7);
        let pixel_angle = camera.vertical_fov().to_radians() / 100.0;

        let center = Ray::new(camera.origin(), camera.forward).direction();
        for _ in 0..100 {
            let d = camera.get_ray(50, 50, &mut rng).direction();
            // Pixel (50, 50) is centered half a pixel off the axis
            assert!(d.angle_between(center) < 2.0 * pixel_angle);
        }
    }

    #[test]
    fn test_aspect_ratio_widens_left_vector() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Y, Vec3::Z, 200, 100, 1);
        assert!((camera.left.length() - 2.0).abs() < 1e-5);
        assert!(camera.horizontal_fov() > camera.vertical_fov());
    }

    #[test]
    fn test_look_at() {
        let camera = Camera::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 64, 64, 1, 90.0);
        assert!((camera.vertical_fov() - 90.0).abs() < 1e-3);

        let mut rng = StdRng::seed_from_u64(1);
        let d = camera.get_ray(32, 32, &mut rng).direction();
        assert!(d.z > 0.99);

        let looking_down = Camera::look_at(Vec3::ZERO, -Vec3::Y, 10, 10, 1, 60.0);
        assert!(looking_down.left.length() > 0.0);
    }

    #[test]
    fn test_pixel_index_is_row_major() {
        let camera = Camera::new(Vec3::ZERO, Vec3::Y, Vec3::Z, 8, 4, 1);
        assert_eq!(camera.pixel_index(0, 0), 0);
        assert_eq!(camera.pixel_index(1, 0), 8);
        assert_eq!(camera.pixel_index(3, 7), 31);
        assert_eq!(camera.pixel_count(), 32);
    }
}
