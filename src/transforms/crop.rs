//! Region-of-interest cropping: `SpatialCrop` and `CenterSpatialCrop`.
use ndarray::{ArrayD, ArrayViewD, Axis, Slice};
use tracing::debug;

use crate::error::{Error, Result};
use crate::transforms::{Transform, spatial_shape};
use crate::types::{Roi, SpatialSize};

/// General purpose cropper producing an axis-aligned sub-volume.
///
/// The ROI is given as center and size or as start and end; the region must sit
/// inside the image. Spatial dimensions beyond the ROI's length are kept whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialCrop {
    roi: Roi,
}

impl SpatialCrop {
    /// Center and size take precedence over start and end when both pairs are given.
    pub fn new(
        roi_center: Option<&[i64]>,
        roi_size: Option<&[i64]>,
        roi_start: Option<&[i64]>,
        roi_end: Option<&[i64]>,
    ) -> Result<Self> {
        match (roi_center, roi_size, roi_start, roi_end) {
            (Some(center), Some(size), _, _) => Self::from_center_size(center, size),
            (_, _, Some(start), Some(end)) => Self::from_start_end(start, end),
            _ => Err(Error::config(
                "either roi_center and roi_size or roi_start and roi_end must be provided",
            )),
        }
    }

    pub fn from_center_size(roi_center: &[i64], roi_size: &[i64]) -> Result<Self> {
        if roi_center.len() != roi_size.len() {
            return Err(Error::config(format!(
                "roi_center has {} entries but roi_size has {}",
                roi_center.len(),
                roi_size.len()
            )));
        }
        Self::from_roi(Roi::from_center_size(roi_center, roi_size))
    }

    pub fn from_start_end(roi_start: &[i64], roi_end: &[i64]) -> Result<Self> {
        if roi_start.len() != roi_end.len() {
            return Err(Error::config(format!(
                "roi_start has {} entries but roi_end has {}",
                roi_start.len(),
                roi_end.len()
            )));
        }
        Self::from_roi(Roi {
            start: roi_start.to_vec(),
            end: roi_end.to_vec(),
        })
    }

    fn from_roi(roi: Roi) -> Result<Self> {
        let reason = if roi.start.iter().any(|&s| s < 0) {
            Some("roi_start must be non-negative")
        } else if roi.end.iter().any(|&e| e <= 0) {
            Some("roi_end must be positive")
        } else if roi.end.iter().zip(&roi.start).any(|(e, s)| e < s) {
            Some("roi_end must not precede roi_start")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(Error::InvalidRoi {
                reason,
                start: roi.start,
                end: roi.end,
            }),
            None => Ok(Self { roi }),
        }
    }

    pub fn roi(&self) -> &Roi {
        &self.roi
    }

    /// Copy the ROI out of `img`, validating it against the live spatial shape.
    pub fn apply<A: Clone>(&self, img: &ArrayViewD<'_, A>) -> Result<ArrayD<A>> {
        let max_end = spatial_shape(img.shape())?;
        let sd = self.roi.start.len().min(max_end.len());

        for dim in 0..sd {
            let (start, end, size) = (self.roi.start[dim], self.roi.end[dim], max_end[dim]);
            if start > size as i64 || end > size as i64 {
                return Err(Error::OutOfBounds {
                    dim,
                    start,
                    end,
                    size,
                });
            }
        }

        debug!(
            "SpatialCrop: shape={:?}, start={:?}, end={:?}",
            img.shape(),
            &self.roi.start[..sd],
            &self.roi.end[..sd]
        );

        let mut view = img.view();
        for dim in 0..sd {
            let slice = Slice::from(self.roi.start[dim] as usize..self.roi.end[dim] as usize);
            view.slice_axis_inplace(Axis(dim + 1), slice);
        }
        Ok(view.to_owned())
    }
}

impl<A: Clone> Transform<A> for SpatialCrop {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(&img.view())
    }
}

/// Crops a fixed-size ROI around the center of the image.
///
/// A scalar or single-entry size applies to every spatial dimension; a longer
/// size covers its leading dimensions and the rest are kept whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterSpatialCrop {
    roi_size: SpatialSize,
}

impl CenterSpatialCrop {
    pub fn new(roi_size: impl Into<SpatialSize>) -> Self {
        Self {
            roi_size: roi_size.into(),
        }
    }

    pub fn roi_size(&self) -> &SpatialSize {
        &self.roi_size
    }

    /// ROI size for an image with `ndim` spatial dimensions.
    fn size_for(&self, ndim: usize) -> Vec<i64> {
        match &self.roi_size {
            SpatialSize::Scalar(s) => vec![*s as i64; ndim],
            SpatialSize::PerDim(v) if v.len() == 1 => vec![v[0] as i64; ndim],
            SpatialSize::PerDim(v) => v.iter().take(ndim).map(|&s| s as i64).collect(),
        }
    }

    pub fn apply<A: Clone>(&self, img: &ArrayViewD<'_, A>) -> Result<ArrayD<A>> {
        let center: Vec<i64> = spatial_shape(img.shape())?
            .iter()
            .map(|&s| (s / 2) as i64)
            .collect();
        let size = self.size_for(center.len());
        SpatialCrop::from_center_size(&center[..size.len()], &size)?.apply(img)
    }
}

impl<A: Clone> Transform<A> for CenterSpatialCrop {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(&img.view())
    }
}
