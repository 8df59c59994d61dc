//! Error type for scene construction and rendering.

use lux_math::MathError;
use thiserror::Error;

/// Errors that can occur while preparing or running a render.
///
/// Intersection and integration never fail; degenerate geometry simply
/// reports no hit. Everything here happens before or after the sampling loop.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("geometry error: {0}")]
    Math(#[from] MathError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image buffer holds {actual} pixels but {expected} were expected")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to load mesh: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
