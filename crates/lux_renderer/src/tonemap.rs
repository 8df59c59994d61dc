//! Tone mapping from radiance to displayable values in `[0, 1]`.
//!
//! Output goes through `color_to_rgba`, which applies gamma 2.0, so these
//! only need to bring the dynamic range down.

use crate::ImageBuffer;
use lux_math::Color;

/// Largest channel value in the image.
pub fn max_value(image: &ImageBuffer) -> f32 {
    image
        .pixels()
        .iter()
        .map(|c| c.max_element())
        .fold(0.0, f32::max)
}

/// Divide every channel by the image's largest channel value.
pub fn equalize(image: &ImageBuffer) -> ImageBuffer {
    let max = max_value(image);
    if max <= 0.0 {
        return image.clone();
    }
    image.map(|c| c / max)
}

/// Cap every channel at `value`.
pub fn clamp(image: &ImageBuffer, value: f32) -> ImageBuffer {
    image.map(|c| c.min(Color::splat(value)))
}

/// Clamp at `fraction` of the brightest channel, then equalize.
///
/// Lets a few very bright pixels saturate instead of darkening the rest.
pub fn clamp_and_equalize(image: &ImageBuffer, fraction: f32) -> ImageBuffer {
    equalize(&clamp(image, max_value(image) * fraction))
}

/// Clamp at `fraction` of the brightest channel, equalize, then raise
/// every channel to `gamma`.
///
/// A `gamma` below one lifts the shadows.
pub fn clamp_and_gamma_curve(image: &ImageBuffer, fraction: f32, gamma: f32) -> ImageBuffer {
    clamp_and_equalize(image, fraction).map(|c| c.max(Color::ZERO).powf(gamma))
}
