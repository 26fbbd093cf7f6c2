#![doc = r#"
CROPPAD — crop and pad transforms for channel-first N-dimensional image arrays.

This crate implements the spatial crop/pad family used in medical image
preprocessing: padding up to a size, by a border, or to a multiple; cropping a
region of interest, the image center, random (multi-)patches, or the bounding
box of the foreground. Arrays are `ndarray::ArrayD<A>` laid out as
`[C, d1, ..., dn]`; axis 0 is the channel axis and is never touched.

Stability
---------
The public library API is experimental in initial releases and may evolve.

Add dependency
--------------
```toml
[dependencies]
croppad = "0.1"
```

Padding
-------
```rust
use ndarray::{ArrayD, IxDyn};
use croppad::{BorderPad, DivisiblePad, FillMode, PadMethod, SpatialPad};

fn main() -> croppad::Result<()> {
    let img = ArrayD::<f32>::ones(IxDyn(&[1, 5, 7]));

    let padded = SpatialPad::new(vec![8usize, 8]).apply(img.clone())?;
    assert_eq!(padded.shape(), &[1, 8, 8]);

    let padded = SpatialPad::new(8usize)
        .with_method(PadMethod::End)
        .with_mode(FillMode::Reflect)
        .apply(img.clone())?;
    assert_eq!(padded.shape(), &[1, 8, 8]);

    let padded = BorderPad::new(vec![1i64, 2, 3, 4]).apply(img.clone())?;
    assert_eq!(padded.shape(), &[1, 8, 14]);

    let padded = DivisiblePad::new(4).apply(img)?;
    assert_eq!(padded.shape(), &[1, 8, 8]);
    Ok(())
}
```

Cropping
--------
```rust
use ndarray::{ArrayD, IxDyn};
use croppad::{CenterSpatialCrop, CropForeground, RandSpatialCrop, SpatialCrop};

fn main() -> croppad::Result<()> {
    let img = ArrayD::<i32>::ones(IxDyn(&[2, 10, 10]));

    let roi = SpatialCrop::from_start_end(&[2, 3], &[6, 9])?.apply(&img.view())?;
    assert_eq!(roi.shape(), &[2, 4, 6]);

    let center = CenterSpatialCrop::new(vec![4usize, 4]).apply(&img.view())?;
    assert_eq!(center.shape(), &[2, 4, 4]);

    let mut rand_crop = RandSpatialCrop::new(vec![3usize, 3])
        .with_random_size(false)
        .with_seed(Some(0));
    assert_eq!(rand_crop.apply(&img.view())?.shape(), &[2, 3, 3]);

    let fg = CropForeground::new().with_margin(1).apply(&img.view())?;
    assert_eq!(fg.shape(), &[2, 10, 10]);
    Ok(())
}
```

Same random crop on image and label
-----------------------------------
Randomized transforms own a seedable [`RandomState`]. Reseeding through
[`Randomizable::set_random_state`] before each call replays the same draws, so
an image and its label mask get the same geometry. [`Compose`] forwards a
reseed to every randomized step.

```rust
use ndarray::{ArrayD, IxDyn};
use croppad::{RandSpatialCrop, Randomizable};

fn main() -> croppad::Result<()> {
    let image = ArrayD::<f32>::zeros(IxDyn(&[1, 32, 32]));
    let label = ArrayD::<u8>::zeros(IxDyn(&[1, 32, 32]));
    let mut crop = RandSpatialCrop::new(vec![8usize, 8]);

    crop.set_random_state(Some(42));
    let image = crop.apply(&image.view())?;
    let first = crop.last_params().cloned();
    crop.set_random_state(Some(42));
    let label = crop.apply(&label.view())?;

    assert_eq!(first.as_ref(), crop.last_params());
    assert_eq!(image.shape(), label.shape());
    Ok(())
}
```

Error handling
--------------
All fallible functions return `croppad::Result<T>`; match on `croppad::Error`
to handle specific cases.

```rust
use ndarray::{ArrayD, IxDyn};
use croppad::{CropForeground, Error};

let img = ArrayD::<u8>::zeros(IxDyn(&[1, 4, 4]));
match CropForeground::new().apply(&img.view()) {
    Ok(_) => unreachable!(),
    Err(Error::NoForeground) => {}
    Err(other) => panic!("unexpected: {other}"),
}
```

Useful modules
--------------
- [`transforms`] — the crop and pad transforms and the `Transform` trait.
- [`core`] — padding, bounding box and patch primitives, pipelines, synthetic data.
- [`types`] — enums and core types (e.g. `FillMode`, `PadMethod`, `SpatialSize`).
- [`io`] — JSON array files used by the CLI.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod core;
pub mod error;
pub mod io;
pub mod random;
pub mod transforms;
pub mod types;

// Curated public API surface
// Types
pub use error::{Error, Result};
pub use random::{RandomState, Randomizable};
pub use types::{Element, FillMode, PadMethod, Roi, SpatialSize};

// Primitives
pub use crate::core::processing::bbox::{SelectFn, generate_spatial_bounding_box, positive, select_fn};
pub use crate::core::processing::padding::{PadFn, PadMode, pad_array};
pub use crate::core::processing::patch::{get_random_patch, get_valid_patch_size};
pub use crate::core::processing::pipeline::Compose;
pub use crate::core::synthetic::{SyntheticImage, SyntheticParams, create_test_image_2d};

// Transforms
pub use transforms::Transform;
pub use transforms::crop::{CenterSpatialCrop, SpatialCrop};
pub use transforms::foreground::CropForeground;
pub use transforms::pad::{BorderPad, DivisiblePad, SpatialPad};
pub use transforms::random::{RandCropParams, RandSpatialCrop, RandSpatialCropSamples};
