use thiserror::Error;

/// Errors that stop a stereo reconstruction.
///
/// A match that fails the geometric checks is not an error. It is reported as a
/// [`Rejection`](crate::Rejection) and left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    #[error("focal length must be positive and finite, got {0}")]
    InvalidFocalLength(f64),
    #[error("principal point must be finite, got ({0}, {1})")]
    InvalidPrincipalPoint(f64, f64),
    #[error("baseline must be positive and finite, got {0}")]
    InvalidBaseline(f64),
    #[error("row tolerance must be positive and finite, got {0}")]
    InvalidRowTolerance(f64),
    #[error("disparity range must satisfy min < max, got [{min}, {max}]")]
    InvalidDisparityRange { min: f64, max: f64 },
    #[error("pixel (row {row}, col {col}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        row: i64,
        col: i64,
        width: u32,
        height: u32,
    },
}

impl Error {
    /// Returns `true` if the error comes from invalid parameters rather than from the data.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Error::PixelOutOfBounds { .. })
    }
}
