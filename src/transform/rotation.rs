//! Neighbor pairing patterns for discrete rotation hypotheses.

/// NB9 positions of the 8-neighbor ring, clockwise on screen from top-left.
const RING: [usize; 8] = [0, 1, 2, 5, 8, 7, 6, 3];

/// Number of rotation hypotheses (45 degree steps).
pub const ROTATION_STEPS: usize = 8;

/// Angular distance between neighboring rotation hypotheses.
pub const ROTATION_STEP_DEG: f32 = 360.0 / ROTATION_STEPS as f32;

/// Maps each NB9 position of a left cell to the NB9 position of the paired
/// right cell under a rotation of `steps * 45` degrees.
///
/// Rotations are measured in pixel coordinates (y down), so a positive step
/// turns the right neighbor of a cell towards its bottom-right neighbor.
pub fn neighbor_pattern(steps: usize) -> [usize; 9] {
    let mut pattern = [4usize; 9];
    for (ring_idx, &pos) in RING.iter().enumerate() {
        pattern[pos] = RING[(ring_idx + steps) % ROTATION_STEPS];
    }
    pattern
}
