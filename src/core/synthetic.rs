//! Synthetic 2D test images: random discs on a zero background plus a label map.
use ndarray::{Array2, ArrayD, Axis, Zip};
use tracing::debug;

use crate::error::{Error, Result};
use crate::random::RandomState;

/// Parameters for [`create_test_image_2d`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticParams {
    pub height: usize,
    pub width: usize,
    pub num_objs: usize,
    pub rad_max: usize,
    pub noise_max: f32,
    pub num_seg_classes: usize,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
            num_objs: 12,
            rad_max: 30,
            noise_max: 0.0,
            num_seg_classes: 5,
        }
    }
}

/// Channel-first `[1, H, W]` image and its integer label map.
#[derive(Debug, Clone)]
pub struct SyntheticImage {
    pub image: ArrayD<f32>,
    pub label: ArrayD<i32>,
}

const RAD_MIN: usize = 5;

/// Draw `num_objs` discs of radius in `[5, rad_max)` fully inside the image.
///
/// With more than one class each disc carries a class in `1..=num_seg_classes`,
/// otherwise an intensity in `[0.5, 1)`. The label is the ceiling of the clean
/// image. Uniform noise in `[0, num_seg_classes * noise_max)` is merged with a
/// per-pixel maximum and the result rescaled to `[0, 1]`.
pub fn create_test_image_2d(
    params: &SyntheticParams,
    rng: &mut RandomState,
) -> Result<SyntheticImage> {
    let SyntheticParams {
        height,
        width,
        num_objs,
        rad_max,
        noise_max,
        num_seg_classes,
    } = *params;

    if rad_max <= RAD_MIN {
        return Err(Error::argument("rad_max", rad_max));
    }
    if height <= 2 * rad_max || width <= 2 * rad_max {
        return Err(Error::argument("image size", (height, width)));
    }

    let mut image = Array2::<f32>::zeros((height, width));
    for _ in 0..num_objs {
        let cy = rng.draw(rad_max as i64, (height - rad_max) as i64)?;
        let cx = rng.draw(rad_max as i64, (width - rad_max) as i64)?;
        let rad = rng.draw(RAD_MIN as i64, rad_max as i64)?;
        let value = if num_seg_classes > 1 {
            (rng.draw_unit() * num_seg_classes as f64).ceil().max(1.0) as f32
        } else {
            (rng.draw_unit() * 0.5 + 0.5) as f32
        };

        for ((y, x), px) in image.indexed_iter_mut() {
            let dy = y as i64 - cy;
            let dx = x as i64 - cx;
            if dy * dy + dx * dx <= rad * rad {
                *px = value;
            }
        }
    }

    let label = image.mapv(|v| v.ceil() as i32);

    let noise_scale = num_seg_classes.max(1) as f64 * noise_max as f64;
    if noise_scale > 0.0 {
        image.mapv_inplace(|v| v.max((rng.draw_unit() * noise_scale) as f32));
    }
    rescale(&mut image);

    debug!(
        "Synthetic image: {}x{}, objs={}, classes={}",
        height, width, num_objs, num_seg_classes
    );

    Ok(SyntheticImage {
        image: image.insert_axis(Axis(0)).into_dyn(),
        label: label.insert_axis(Axis(0)).into_dyn(),
    })
}

fn rescale(image: &mut Array2<f32>) {
    let (min, max) = image
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range > 0.0 {
        Zip::from(image).for_each(|v| *v = (*v - min) / range);
    } else {
        image.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_matches_discs() {
        let mut rng = RandomState::new(Some(0));
        let params = SyntheticParams {
            height: 64,
            width: 48,
            num_objs: 4,
            rad_max: 10,
            ..SyntheticParams::default()
        };
        let out = create_test_image_2d(&params, &mut rng).unwrap();
        assert_eq!(out.image.shape(), &[1, 64, 48]);
        assert_eq!(out.label.shape(), &[1, 64, 48]);
        assert!(out.label.iter().any(|&l| l > 0));
        assert!(out.label.iter().all(|&l| (0..=5).contains(&l)));
        // without noise, foreground in the image is exactly the labelled area
        Zip::from(&out.image)
            .and(&out.label)
            .for_each(|&v, &l| assert_eq!(v > 0.0, l > 0));
    }

    #[test]
    fn same_seed_same_image() {
        let params = SyntheticParams {
            noise_max: 0.5,
            ..SyntheticParams::default()
        };
        let a = create_test_image_2d(&params, &mut RandomState::new(Some(9))).unwrap();
        let b = create_test_image_2d(&params, &mut RandomState::new(Some(9))).unwrap();
        assert_eq!(a.image, b.image);
        assert!(a.image.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn image_too_small_for_radius() {
        let params = SyntheticParams {
            height: 20,
            width: 20,
            rad_max: 10,
            ..SyntheticParams::default()
        };
        assert!(create_test_image_2d(&params, &mut RandomState::new(Some(1))).is_err());
    }
}
