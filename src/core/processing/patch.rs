//! Patch placement helpers for random cropping.
use std::ops::Range;

use crate::error::Result;
use crate::random::RandomState;

/// Clamp `patch_size` to `dims`; a zero entry means the whole dimension.
pub fn get_valid_patch_size(dims: &[usize], patch_size: &[usize]) -> Vec<usize> {
    dims.iter()
        .zip(patch_size)
        .map(|(&d, &p)| if p == 0 { d } else { d.min(p) })
        .collect()
}

/// Random placement of `patch_size` inside `dims`, one range per dimension.
///
/// The minimal corner of each dimension is drawn from `[0, dim - patch)` when the
/// patch is smaller than the dimension, and pinned to 0 otherwise.
pub fn get_random_patch(
    dims: &[usize],
    patch_size: &[usize],
    rng: &mut RandomState,
) -> Result<Vec<Range<usize>>> {
    let mut slices = Vec::with_capacity(dims.len());
    for (&d, &p) in dims.iter().zip(patch_size) {
        let corner = if d > p { rng.draw(0, (d - p) as i64)? as usize } else { 0 };
        slices.push(corner..corner + p);
    }
    Ok(slices)
}
