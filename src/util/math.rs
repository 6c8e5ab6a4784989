//! Small numeric helpers shared by the grid and transform modules.

/// Wraps an angle in degrees to the range [-180, 180).
pub(crate) fn wrap_deg(angle_deg: f32) -> f32 {
    let mut wrapped = angle_deg % 360.0;
    if wrapped < -180.0 {
        wrapped += 360.0;
    }
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Floors `value` into an integer cell index, returning `None` below zero.
pub(crate) fn floor_index(value: f64) -> Option<usize> {
    let floored = value.floor();
    if floored < 0.0 || !floored.is_finite() {
        return None;
    }
    Some(floored as usize)
}

/// Rounds half away from zero, matching the grid-size rounding used for scale ratios.
pub(crate) fn round_cells(value: f64) -> usize {
    value.round().max(1.0) as usize
}
