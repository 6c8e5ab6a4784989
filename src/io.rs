//! Image size helpers backed by the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::feature::ImageSize;
use crate::util::{GmsError, GmsResult};
use std::path::Path;

/// Reads the dimensions of an image file without decoding pixel data.
pub fn image_size<P: AsRef<Path>>(path: P) -> GmsResult<ImageSize> {
    let (width, height) =
        image::image_dimensions(path).map_err(|err| GmsError::ImageIo {
            reason: err.to_string(),
        })?;
    ImageSize::new(width, height)
}
