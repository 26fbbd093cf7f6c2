use ndarray::{ArrayD, ArrayViewD};

use crate::core::processing::bbox::{SelectFn, generate_spatial_bounding_box, positive, select_fn};
use crate::error::Result;
use crate::transforms::Transform;
use crate::transforms::crop::SpatialCrop;
use crate::types::Element;

/// Crops an image to the bounding box of its foreground.
///
/// Foreground is whatever `select_fn` marks on the chosen channels (all of them
/// by default); `margin` grows the box in every spatial direction. For example,
/// with `select_fn = x > 1` and no margin,
///
/// ```text
/// [[[0, 0, 0, 0, 0],
///   [0, 1, 2, 1, 0],          [[[2, 1],
///   [0, 1, 3, 2, 0],   --->     [3, 2],
///   [0, 1, 2, 1, 0],            [2, 1]]]
///   [0, 0, 0, 0, 0]]]
/// ```
#[derive(Clone)]
pub struct CropForeground<A> {
    select_fn: SelectFn<A>,
    channel_indices: Option<Vec<usize>>,
    margin: usize,
}

impl<A: Element> CropForeground<A> {
    pub fn new() -> Self {
        Self {
            select_fn: positive(),
            channel_indices: None,
            margin: 0,
        }
    }

    pub fn with_select_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ArrayViewD<'_, A>) -> ArrayD<bool> + Send + Sync + 'static,
    {
        self.select_fn = select_fn(f);
        self
    }

    pub fn with_channel_indices(mut self, channel_indices: impl Into<Vec<usize>>) -> Self {
        self.channel_indices = Some(channel_indices.into());
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn apply(&self, img: &ArrayViewD<'_, A>) -> Result<ArrayD<A>> {
        let (box_start, box_end) = generate_spatial_bounding_box(
            img,
            &self.select_fn,
            self.channel_indices.as_deref(),
            self.margin,
        )?;
        SpatialCrop::from_start_end(&box_start, &box_end)?.apply(img)
    }
}

impl<A: Element> Default for CropForeground<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for CropForeground<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropForeground")
            .field("channel_indices", &self.channel_indices)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

impl<A: Element> Transform<A> for CropForeground<A> {
    type Output = ArrayD<A>;

    fn transform(&mut self, img: ArrayD<A>) -> Result<ArrayD<A>> {
        self.apply(&img.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::{IxDyn, array};

    #[test]
    fn crops_to_selected_values() {
        let img = array![[
            [0, 0, 0, 0, 0],
            [0, 1, 2, 1, 0],
            [0, 1, 3, 2, 0],
            [0, 1, 2, 1, 0],
            [0, 0, 0, 0, 0]
        ]]
        .into_dyn();
        let cropper = CropForeground::<i32>::new().with_select_fn(|x| x.mapv(|v| v > 1));
        let out = cropper.apply(&img.view()).unwrap();
        assert_eq!(out, array![[[2, 1], [3, 2], [2, 1]]].into_dyn());
    }

    #[test]
    fn margin_and_channel_subset() {
        let img = array![
            [[0.0f32, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 5.0]],
            [[0.0, 0.0, 0.0, 0.0], [0.0, 7.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]]
        ]
        .into_dyn();
        let out = CropForeground::new()
            .with_channel_indices(vec![1])
            .with_margin(1)
            .apply(&img.view())
            .unwrap();
        // box around (1, 1) grown by one: rows 0..3, cols 0..3, both channels kept
        assert_eq!(out.shape(), &[2, 3, 3]);

        let out = CropForeground::new().apply(&img.view()).unwrap();
        assert_eq!(out.shape(), &[2, 2, 3]);
    }

    #[test]
    fn background_only_image_fails() {
        let img = ArrayD::<u8>::zeros(IxDyn(&[1, 3, 3]));
        assert!(matches!(
            CropForeground::new().apply(&img.view()),
            Err(Error::NoForeground)
        ));
    }
}
