//! Line-of-sight calculation with terrain occlusion.
//!
//! Uses stepped ray traversal against the ground-height source.
//! Points not covered by the height source never occlude.

use sortie_core::constants::TERRAIN_LOS_SAMPLE_INTERVAL;
use sortie_core::types::Position;

use crate::grid::GroundHeight;

/// Check line-of-sight between two world points.
///
/// Returns true if no ground sample along the segment rises above the ray.
pub fn has_line_of_sight(ground: &dyn GroundHeight, from: &Position, to: &Position) -> bool {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dz = to.z - from.z;
    let horiz_dist = (dx * dx + dz * dz).sqrt();

    if horiz_dist < TERRAIN_LOS_SAMPLE_INTERVAL {
        return true; // Too close for terrain to matter
    }

    let num_samples = ((horiz_dist / TERRAIN_LOS_SAMPLE_INTERVAL).ceil() as usize).max(2);

    for i in 1..num_samples {
        let t = i as f64 / num_samples as f64;
        let ray_height = from.y + dy * t;
        let Some(ground_height) = ground.height_at(from.x + dx * t, from.z + dz * t) else {
            continue;
        };
        if ground_height > ray_height {
            return false;
        }
    }

    true
}
