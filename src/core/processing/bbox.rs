use std::sync::Arc;

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Element;

/// Foreground selection: maps an array to a boolean mask of the same shape.
pub type SelectFn<A> = Arc<dyn Fn(&ArrayViewD<'_, A>) -> ArrayD<bool> + Send + Sync>;

pub fn select_fn<A, F>(f: F) -> SelectFn<A>
where
    F: Fn(&ArrayViewD<'_, A>) -> ArrayD<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Selects values strictly greater than zero.
pub fn positive<A: Element>() -> SelectFn<A> {
    select_fn(|x| x.mapv(|v: A| v.is_positive()))
}

/// Bounding box `(start, end)` of every spatial position where `select_fn` holds
/// on any of the chosen channels, grown by `margin` and clamped to the array.
///
/// `channel_indices` of `None` evaluates all channels. Fails with
/// [`Error::NoForeground`] when nothing is selected.
pub fn generate_spatial_bounding_box<A: Clone>(
    img: &ArrayViewD<'_, A>,
    select_fn: &SelectFn<A>,
    channel_indices: Option<&[usize]>,
    margin: usize,
) -> Result<(Vec<i64>, Vec<i64>)> {
    if img.ndim() < 2 {
        return Err(Error::argument("image ndim", img.ndim()));
    }

    let data = match channel_indices {
        Some(indices) => {
            let channels = img.len_of(Axis(0));
            if let Some(bad) = indices.iter().find(|&&c| c >= channels) {
                return Err(Error::argument("channel index", *bad));
            }
            img.select(Axis(0), indices).into_shared()
        }
        None => img.to_shared(),
    };

    let mask = select_fn(&data.view());
    if mask.shape() != data.shape() {
        return Err(Error::config(format!(
            "selection function returned shape {:?}, expected {:?}",
            mask.shape(),
            data.shape()
        )));
    }

    // OR over the channel axis.
    let spatial_shape = &mask.shape()[1..];
    let mut any = ArrayD::<bool>::from_elem(IxDyn(spatial_shape), false);
    for channel in mask.axis_iter(Axis(0)) {
        Zip::from(&mut any).and(&channel).for_each(|a, &m| *a |= m);
    }

    let ndim = spatial_shape.len();
    let mut lo = vec![usize::MAX; ndim];
    let mut hi = vec![0usize; ndim];
    let mut found = false;
    for (idx, &hit) in any.indexed_iter() {
        if !hit {
            continue;
        }
        found = true;
        for d in 0..ndim {
            lo[d] = lo[d].min(idx[d]);
            hi[d] = hi[d].max(idx[d]);
        }
    }
    if !found {
        return Err(Error::NoForeground);
    }

    let box_start: Vec<i64> = lo.iter().map(|&l| l.saturating_sub(margin) as i64).collect();
    let box_end: Vec<i64> = hi
        .iter()
        .zip(spatial_shape)
        .map(|(&h, &s)| h.saturating_add(margin).saturating_add(1).min(s) as i64)
        .collect();

    debug!(
        "Foreground bounding box: start={:?}, end={:?}, margin={}",
        box_start, box_end, margin
    );
    Ok((box_start, box_end))
}
