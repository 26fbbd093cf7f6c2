//! Padding transforms: `SpatialPad`, `BorderPad` and `DivisiblePad`.
use ndarray::ArrayD;
use tracing::debug;

use crate::core::processing::padding::{PadMode, pad_array};
use crate::error::{Error, Result};
use crate::transforms::{Transform, spatial_shape};
use crate::types::{Element, PadMethod, SpatialSize};

/// Pads every spatial dimension up to `spatial_size`. Never shrinks.
#[derive(Debug, Clone)]
pub struct SpatialPad<A> {
    spatial_size: SpatialSize,
    method: PadMethod,
    mode: PadMode<A>,
}

impl<A: Element> SpatialPad<A> {
    pub fn new(spatial_size: impl Into<SpatialSize>) -> Self {
        Self {
            spatial_size: spatial_size.into(),
            method: PadMethod::Symmetric,
            mode: PadMode::default(),
        }
    }

    pub fn with_method(mut self, method: PadMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_mode(mut self, mode: impl Into<PadMode<A>>) -> Self {
        self.mode = mode.into();
        self
    }

    /// `(before, after)` per spatial dimension for an input of `spatial_shape`.
    pub fn pad_width(&self, spatial_shape: &[usize]) -> Result<Vec<(usize, usize)>> {
        let target = self.spatial_size.resolve(spatial_shape.len())?;
        let widths = target
            .iter()
            .zip(spatial_shape)
            .map(|(&t, &s)| {
                let width = t.saturating_sub(s);
                match self.method {
                    PadMethod::Symmetric => (width / 2, width - width / 2),
                    PadMethod::End => (0, width),
                }
            })
            .collect();
        Ok(widths)
    }

    pub fn apply(&self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply_with_mode(img, None)
    }

    /// Pad with `mode` taking precedence over the configured one.
    /// Returns `img` itself when no dimension needs padding.
    pub fn apply_with_mode(&self, img: ArrayD<A>, mode: Option<&PadMode<A>>) -> Result<ArrayD<A>> {
        let data_pad_width = self.pad_width(spatial_shape(img.shape())?)?;
        if data_pad_width.iter().all(|&(b, a)| b == 0 && a == 0) {
            debug!("SpatialPad: shape {:?} already satisfies target", img.shape());
            return Ok(img);
        }

        let mut all_pad_width = Vec::with_capacity(data_pad_width.len() + 1);
        all_pad_width.push((0, 0));
        all_pad_width.extend(data_pad_width);
        pad_array(img.view(), &all_pad_width, mode.unwrap_or(&self.mode))
    }
}

impl<A: Element> Transform<A> for SpatialPad<A> {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(img)
    }
}

/// Pads every spatial border by an explicit amount.
///
/// `spatial_border` takes one of three shapes:
/// - one value, applied to both sides of every spatial dimension;
/// - one value per spatial dimension, applied to both of its sides;
/// - two values per spatial dimension, `(before, after)` in dimension order.
///
/// For an image of shape `[1, 4, 4]`, `[2, 1]` yields `[1, 8, 6]` and
/// `[1, 2, 3, 4]` yields `[1, 7, 11]`.
#[derive(Debug, Clone)]
pub struct BorderPad<A> {
    spatial_border: Vec<i64>,
    mode: PadMode<A>,
}

impl<A: Element> BorderPad<A> {
    pub fn new(spatial_border: impl Into<Vec<i64>>) -> Self {
        Self {
            spatial_border: spatial_border.into(),
            mode: PadMode::default(),
        }
    }

    pub fn uniform(border: i64) -> Self {
        Self::new(vec![border])
    }

    pub fn with_mode(mut self, mode: impl Into<PadMode<A>>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn pad_width(&self, ndim: usize) -> Result<Vec<(usize, usize)>> {
        if let Some(&bad) = self.spatial_border.iter().find(|&&b| b < 0) {
            return Err(Error::argument("spatial_border", bad));
        }
        let border: Vec<usize> = self.spatial_border.iter().map(|&b| b as usize).collect();

        match border.len() {
            1 => Ok(vec![(border[0], border[0]); ndim]),
            len if len == ndim => Ok(border.iter().map(|&b| (b, b)).collect()),
            len if len == 2 * ndim => Ok(border.chunks(2).map(|p| (p[0], p[1])).collect()),
            len => Err(Error::config(format!(
                "unsupported length of spatial_border definition: {len} for {ndim} spatial dims"
            ))),
        }
    }

    pub fn apply(&self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply_with_mode(img, None)
    }

    pub fn apply_with_mode(&self, img: ArrayD<A>, mode: Option<&PadMode<A>>) -> Result<ArrayD<A>> {
        let data_pad_width = self.pad_width(spatial_shape(img.shape())?.len())?;
        let mut all_pad_width = vec![(0, 0)];
        all_pad_width.extend(data_pad_width);
        pad_array(img.view(), &all_pad_width, mode.unwrap_or(&self.mode))
    }
}

impl<A: Element> Transform<A> for BorderPad<A> {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(img)
    }
}

/// Pads each spatial dimension symmetrically up to the next multiple of `k`.
/// Dimensions whose `k` is zero or negative keep their size.
#[derive(Debug, Clone)]
pub struct DivisiblePad<A> {
    k: Vec<i64>,
    mode: PadMode<A>,
}

impl<A: Element> DivisiblePad<A> {
    pub fn new(k: i64) -> Self {
        Self::per_dim(vec![k])
    }

    pub fn per_dim(k: impl Into<Vec<i64>>) -> Self {
        Self {
            k: k.into(),
            mode: PadMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: impl Into<PadMode<A>>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn target_size(&self, spatial_shape: &[usize]) -> Result<Vec<usize>> {
        let ndim = spatial_shape.len();
        let k = match self.k.len() {
            1 => vec![self.k[0]; ndim],
            len if len == ndim => self.k.clone(),
            len => {
                return Err(Error::config(format!(
                    "k has {len} entries for {ndim} spatial dims"
                )));
            }
        };
        Ok(k.iter()
            .zip(spatial_shape)
            .map(|(&k, &dim)| {
                if k > 0 {
                    dim.div_ceil(k as usize) * k as usize
                } else {
                    dim
                }
            })
            .collect())
    }

    pub fn apply(&self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply_with_mode(img, None)
    }

    pub fn apply_with_mode(&self, img: ArrayD<A>, mode: Option<&PadMode<A>>) -> Result<ArrayD<A>> {
        let new_size = self.target_size(spatial_shape(img.shape())?)?;
        debug!("DivisiblePad: {:?} -> {:?}", img.shape(), new_size);
        SpatialPad::new(new_size)
            .with_method(PadMethod::Symmetric)
            .with_mode(mode.unwrap_or(&self.mode).clone())
            .apply(img)
    }
}

impl<A: Element> Transform<A> for DivisiblePad<A> {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(img)
    }
}
