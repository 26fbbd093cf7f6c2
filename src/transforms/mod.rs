//! Crop and pad transforms over channel-first arrays `[C, d1, ..., dn]`.
//!
//! Axis 0 is the channel axis and is never padded or cropped. The number of
//! spatial dimensions is taken from the input at call time.
pub mod crop;
pub mod foreground;
pub mod pad;
pub mod random;

use ndarray::ArrayD;

use crate::error::{Error, Result};
use crate::random::Randomizable;

/// A step of a transform pipeline.
pub trait Transform<A> {
    type Output;

    fn transform(&mut self, img: ArrayD<A>) -> Result<Self::Output>;

    /// Randomized transforms expose their random state here so pipelines can reseed them.
    fn as_randomizable(&mut self) -> Option<&mut dyn Randomizable> {
        None
    }
}

/// Spatial part of a channel-first shape.
pub(crate) fn spatial_shape(shape: &[usize]) -> Result<&[usize]> {
    match shape.split_first() {
        Some((_, spatial)) => Ok(spatial),
        None => Err(Error::argument("image ndim", 0)),
    }
}
