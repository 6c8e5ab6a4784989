//! Keypoints, matches and image sizes consumed by the filter.
//!
//! These are plain value types. Detection and descriptor matching happen
//! elsewhere; the filter only reads keypoint positions and match indices.

use crate::util::{GmsError, GmsResult};

/// Width and height of an image in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Creates a size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> GmsResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub(crate) fn validate(&self) -> GmsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GmsError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Returns true if `(x, y)` lies inside the closed image rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= 0.0
            && y >= 0.0
            && x <= self.width as f32
            && y <= self.height as f32
    }
}

/// A detected image feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Column coordinate in pixels.
    pub x: f32,
    /// Row coordinate in pixels.
    pub y: f32,
    /// Diameter of the meaningful neighborhood.
    pub size: f32,
    /// Orientation in degrees, or -1 when not computed.
    pub angle: f32,
}

impl Keypoint {
    /// Creates a keypoint with unit size and no orientation.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            size: 1.0,
            angle: -1.0,
        }
    }

    /// Returns a copy with the given size and orientation.
    pub fn with_shape(self, size: f32, angle: f32) -> Self {
        Self { size, angle, ..self }
    }
}

/// A candidate correspondence produced by a nearest-neighbor matcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DMatch {
    /// Index into the first keypoint set.
    pub query_idx: usize,
    /// Index into the second keypoint set.
    pub train_idx: usize,
    /// Descriptor distance; not used by the filter.
    pub distance: f32,
}

impl DMatch {
    pub fn new(query_idx: usize, train_idx: usize, distance: f32) -> Self {
        Self {
            query_idx,
            train_idx,
            distance,
        }
    }
}

/// Checks that every keypoint lies inside its image.
pub(crate) fn validate_keypoints(
    keypoints: &[Keypoint],
    size: ImageSize,
    context: &'static str,
) -> GmsResult<()> {
    for (index, kp) in keypoints.iter().enumerate() {
        if !size.contains(kp.x, kp.y) {
            return Err(GmsError::KeypointOutOfBounds {
                index,
                x: kp.x,
                y: kp.y,
                width: size.width,
                height: size.height,
                context,
            });
        }
    }
    Ok(())
}

/// Checks that every match references existing keypoints.
pub(crate) fn validate_matches(matches: &[DMatch], len1: usize, len2: usize) -> GmsResult<()> {
    for m in matches {
        if m.query_idx >= len1 {
            return Err(GmsError::IndexOutOfBounds {
                index: m.query_idx,
                len: len1,
                context: "query_idx",
            });
        }
        if m.train_idx >= len2 {
            return Err(GmsError::IndexOutOfBounds {
                index: m.train_idx,
                len: len2,
                context: "train_idx",
            });
        }
    }
    Ok(())
}
