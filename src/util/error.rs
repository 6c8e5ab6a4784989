//! Error types for gmsmatch.

use thiserror::Error;

/// Result alias for gmsmatch operations.
pub type GmsResult<T> = std::result::Result<T, GmsError>;

/// Errors that can occur when filtering matches.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GmsError {
    /// An image size has a zero dimension.
    #[error("invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },
    /// A match references a keypoint that does not exist.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// A keypoint lies outside the image it was detected on.
    #[error("{context} keypoint {index} at ({x}, {y}) lies outside {width}x{height}")]
    KeypointOutOfBounds {
        index: usize,
        x: f32,
        y: f32,
        width: u32,
        height: u32,
        context: &'static str,
    },
    /// The threshold factor is negative or not finite.
    #[error("invalid threshold factor {value}: must be finite and >= 0")]
    InvalidThresholdFactor { value: f64 },
    /// Failed to read an image from disk.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

impl GmsError {
    /// Returns true for errors caused by inconsistent keypoints, matches or sizes.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GmsError::InvalidImageSize { .. }
                | GmsError::IndexOutOfBounds { .. }
                | GmsError::KeypointOutOfBounds { .. }
        )
    }

    /// Returns true for errors caused by invalid filter parameters.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, GmsError::InvalidThresholdFactor { .. })
    }
}
