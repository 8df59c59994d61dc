use thiserror::Error;

/// Errors raised by matrix and geometry utilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("attempted to invert a singular matrix (determinant {0})")]
    SingularMatrix(f32),
}
