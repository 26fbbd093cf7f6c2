//! Randomized cropping: `RandSpatialCrop` and `RandSpatialCropSamples`.
use std::ops::Range;

use ndarray::{ArrayD, ArrayViewD, Axis, Slice};
use tracing::debug;

use crate::core::processing::patch::{get_random_patch, get_valid_patch_size};
use crate::error::{Error, Result};
use crate::random::{RandomState, Randomizable};
use crate::transforms::crop::CenterSpatialCrop;
use crate::transforms::{Transform, spatial_shape};
use crate::types::SpatialSize;

/// Parameters drawn by the most recent call of a [`RandSpatialCrop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandCropParams {
    /// Resolved ROI size, one entry per spatial dimension.
    pub size: Vec<usize>,
    /// Patch ranges when the center is random; `None` means a center crop.
    pub slices: Option<Vec<Range<usize>>>,
}

/// Crops a random or fixed-size ROI at a random position or at the image center.
///
/// With `random_size`, `roi_size` is the minimum size and each dimension's size
/// is drawn from `[roi_size, img_size]`. Without it, `roi_size` is the exact size.
#[derive(Debug, Clone)]
pub struct RandSpatialCrop {
    roi_size: SpatialSize,
    random_center: bool,
    random_size: bool,
    rng: RandomState,
    last: Option<RandCropParams>,
}

impl RandSpatialCrop {
    pub fn new(roi_size: impl Into<SpatialSize>) -> Self {
        Self {
            roi_size: roi_size.into(),
            random_center: true,
            random_size: true,
            rng: RandomState::default(),
            last: None,
        }
    }

    pub fn with_random_center(mut self, random_center: bool) -> Self {
        self.random_center = random_center;
        self
    }

    pub fn with_random_size(mut self, random_size: bool) -> Self {
        self.random_size = random_size;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.rng.set_seed(seed);
        self
    }

    pub fn last_params(&self) -> Option<&RandCropParams> {
        self.last.as_ref()
    }

    /// Draw size and placement for an image of spatial shape `img_size`.
    /// The previous parameters are replaced only if every draw succeeds.
    pub fn randomize(&mut self, img_size: &[usize]) -> Result<&RandCropParams> {
        let mut size = self.roi_size.resolve(img_size.len())?;
        if self.random_size {
            for (s, &limit) in size.iter_mut().zip(img_size) {
                *s = self.rng.draw(*s as i64, limit as i64 + 1)? as usize;
            }
        }

        let slices = if self.random_center {
            let valid_size = get_valid_patch_size(img_size, &size);
            Some(get_random_patch(img_size, &valid_size, &mut self.rng)?)
        } else {
            None
        };

        debug!(
            "RandSpatialCrop: img_size={:?}, size={:?}, slices={:?}",
            img_size, size, slices
        );
        Ok(self.last.insert(RandCropParams { size, slices }))
    }

    pub fn apply<A: Clone>(&mut self, img: &ArrayViewD<'_, A>) -> Result<ArrayD<A>> {
        let params = self.randomize(spatial_shape(img.shape())?)?;
        match &params.slices {
            Some(slices) => {
                let mut view = img.view();
                for (dim, range) in slices.iter().enumerate() {
                    view.slice_axis_inplace(Axis(dim + 1), Slice::from(range.clone()));
                }
                Ok(view.to_owned())
            }
            None => CenterSpatialCrop::new(params.size.clone()).apply(img),
        }
    }
}

impl Randomizable for RandSpatialCrop {
    fn random_state_mut(&mut self) -> &mut RandomState {
        &mut self.rng
    }
}

impl<A: Clone> Transform<A> for RandSpatialCrop {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(&img.view())
    }

    fn as_randomizable(&mut self) -> Option<&mut dyn Randomizable> {
        Some(self)
    }
}

/// Draws `num_samples` independent random crops from the same image.
#[derive(Debug, Clone)]
pub struct RandSpatialCropSamples {
    num_samples: usize,
    cropper: RandSpatialCrop,
}

impl RandSpatialCropSamples {
    pub fn new(
        roi_size: impl Into<SpatialSize>,
        num_samples: usize,
        random_center: bool,
        random_size: bool,
    ) -> Result<Self> {
        if num_samples < 1 {
            return Err(Error::config("number of samples must be greater than 0"));
        }
        Ok(Self {
            num_samples,
            cropper: RandSpatialCrop::new(roi_size)
                .with_random_center(random_center)
                .with_random_size(random_size),
        })
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.cropper.rng.set_seed(seed);
        self
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Randomization happens per sample inside the wrapped cropper.
    pub fn randomize(&mut self) {}

    pub fn apply<A: Clone>(&mut self, img: &ArrayViewD<'_, A>) -> Result<Vec<ArrayD<A>>> {
        (0..self.num_samples)
            .map(|_| self.cropper.apply(img))
            .collect()
    }
}

impl Randomizable for RandSpatialCropSamples {
    fn random_state_mut(&mut self) -> &mut RandomState {
        self.cropper.random_state_mut()
    }
}

impl<A: Clone> Transform<A> for RandSpatialCropSamples {
    type Output = Vec<ArrayD<A>>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<Vec<ArrayD<A>>> {
        self.apply(&img.view())
    }

    fn as_randomizable(&mut self) -> Option<&mut dyn Randomizable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    fn ramp(shape: &[usize]) -> ArrayD<u16> {
        let n: usize = shape.iter().product();
        Array::from_shape_vec(IxDyn(shape), (0..n as u16).collect()).unwrap()
    }

    #[test]
    fn fixed_size_random_center() {
        let img = ramp(&[1, 10, 12]);
        let mut crop = RandSpatialCrop::new([4usize, 5])
            .with_random_size(false)
            .with_seed(Some(123));
        for _ in 0..20 {
            let out = crop.apply(&img.view()).unwrap();
            assert_eq!(out.shape(), &[1, 4, 5]);
            let slices = crop.last_params().unwrap().slices.clone().unwrap();
            assert!(slices[0].end <= 10 && slices[1].end <= 12);
        }
    }

    #[test]
    fn random_size_stays_between_roi_and_image() {
        let img = ramp(&[2, 8, 9]);
        let mut crop = RandSpatialCrop::new(3usize).with_seed(Some(5));
        for _ in 0..50 {
            let out = crop.apply(&img.view()).unwrap();
            let params = crop.last_params().unwrap();
            assert_eq!(&out.shape()[1..], params.size.as_slice());
            assert!((3..=8).contains(&params.size[0]));
            assert!((3..=9).contains(&params.size[1]));
        }
    }

    #[test]
    fn fixed_center_uses_center_crop() {
        let img = ramp(&[1, 6, 6]);
        let mut crop = RandSpatialCrop::new([2usize, 4])
            .with_random_center(false)
            .with_random_size(false);
        let out = crop.apply(&img.view()).unwrap();
        let expected = CenterSpatialCrop::new(vec![2usize, 4]).apply(&img.view()).unwrap();
        assert_eq!(out, expected);
        assert!(crop.last_params().unwrap().slices.is_none());
    }

    #[test]
    fn reseeding_reproduces_the_crop() {
        let img = ramp(&[1, 16, 16]);
        let mut crop = RandSpatialCrop::new([4usize, 4]);
        crop.set_random_state(Some(99));
        let first = crop.apply(&img.view()).unwrap();
        crop.set_random_state(Some(99));
        let second = crop.apply(&img.view()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn roi_larger_than_image_keeps_previous_params() {
        let img = ramp(&[1, 6, 6]);
        let mut crop = RandSpatialCrop::new([4usize, 4]).with_seed(Some(1));
        crop.apply(&img.view()).unwrap();
        let before = crop.last_params().cloned();

        let small = ramp(&[1, 3, 3]);
        assert!(matches!(
            crop.apply(&small.view()),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(crop.last_params().cloned(), before);
    }

    #[test]
    fn samples_have_requested_cardinality() {
        let img = ramp(&[1, 12, 12]);
        let mut samples = RandSpatialCropSamples::new([4usize, 4], 5, true, false)
            .unwrap()
            .with_seed(Some(0));
        let out = samples.apply(&img.view()).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|c| c.shape() == [1, 4, 4]));
    }

    #[test]
    fn zero_samples_is_rejected() {
        assert!(matches!(
            RandSpatialCropSamples::new(4usize, 0, true, true),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
