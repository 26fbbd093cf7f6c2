use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::{ArrayD, ArrayView1, ArrayViewD, ArrayViewMut1, Axis, IxDyn, Zip};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Element, FillMode};

/// User fill function: receives the unpadded array and the full pad width
/// (channel axis included) and returns the padded array.
pub type PadFn<A> = Arc<dyn Fn(ArrayViewD<'_, A>, &[(usize, usize)]) -> ArrayD<A> + Send + Sync>;

/// Padding policy: a named fill strategy or a caller-supplied function.
#[derive(Clone)]
pub enum PadMode<A> {
    Fill(FillMode),
    Custom(PadFn<A>),
}

impl<A> PadMode<A> {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(ArrayViewD<'_, A>, &[(usize, usize)]) -> ArrayD<A> + Send + Sync + 'static,
    {
        PadMode::Custom(Arc::new(f))
    }
}

impl<A> Default for PadMode<A> {
    fn default() -> Self {
        PadMode::Fill(FillMode::Constant)
    }
}

impl<A> From<FillMode> for PadMode<A> {
    fn from(mode: FillMode) -> Self {
        PadMode::Fill(mode)
    }
}

impl<A> FromStr for PadMode<A> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<FillMode>().map(PadMode::Fill)
    }
}

impl<A> fmt::Debug for PadMode<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadMode::Fill(mode) => write!(f, "Fill({})", mode),
            PadMode::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

impl<A> fmt::Display for PadMode<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadMode::Fill(mode) => write!(f, "{}", mode),
            PadMode::Custom(_) => write!(f, "custom"),
        }
    }
}

/// Pad `img` by `pad_width` (one `(before, after)` pair per axis, channel included).
/// Always allocates a new array.
pub fn pad_array<A: Element>(
    img: ArrayViewD<'_, A>,
    pad_width: &[(usize, usize)],
    mode: &PadMode<A>,
) -> Result<ArrayD<A>> {
    if pad_width.len() != img.ndim() {
        return Err(Error::config(format!(
            "pad width has {} entries for a {}-d array",
            pad_width.len(),
            img.ndim()
        )));
    }

    let expected: Vec<usize> = img
        .shape()
        .iter()
        .zip(pad_width)
        .map(|(&s, &(b, a))| s + b + a)
        .collect();

    debug!(
        "Padding: shape={:?}, pad_width={:?}, mode={}",
        img.shape(),
        pad_width,
        mode
    );

    match mode {
        PadMode::Custom(f) => {
            let padded = f(img, pad_width);
            if padded.shape() != expected.as_slice() {
                return Err(Error::config(format!(
                    "custom pad function returned shape {:?}, expected {:?}",
                    padded.shape(),
                    expected
                )));
            }
            Ok(padded)
        }
        PadMode::Fill(fill) => {
            let mut out = img.to_owned();
            // Axis by axis, so corners see values already padded along earlier axes.
            for (axis, &(before, after)) in pad_width.iter().enumerate() {
                if before == 0 && after == 0 {
                    continue;
                }
                out = pad_axis(out.view(), Axis(axis), before, after, *fill)?;
            }
            Ok(out)
        }
    }
}

fn pad_axis<A: Element>(
    src: ArrayViewD<'_, A>,
    axis: Axis,
    before: usize,
    after: usize,
    mode: FillMode,
) -> Result<ArrayD<A>> {
    let n = src.len_of(axis);
    if n == 0 && !matches!(mode, FillMode::Constant | FillMode::Empty) {
        return Err(Error::argument("pad mode on empty axis", mode.as_str()));
    }

    let mut shape = src.shape().to_vec();
    shape[axis.index()] = n + before + after;
    let mut out = ArrayD::<A>::default(IxDyn(&shape));

    Zip::from(out.lanes_mut(axis))
        .and(src.lanes(axis))
        .for_each(|dst, lane| fill_lane(lane, dst, before, after, mode));

    Ok(out)
}

fn fill_lane<A: Element>(
    src: ArrayView1<'_, A>,
    mut dst: ArrayViewMut1<'_, A>,
    before: usize,
    after: usize,
    mode: FillMode,
) {
    let n = src.len();
    for (i, v) in src.iter().enumerate() {
        dst[before + i] = *v;
    }

    match mode {
        // Output starts zeroed.
        FillMode::Constant | FillMode::Empty => {}
        FillMode::Edge | FillMode::Reflect | FillMode::Symmetric | FillMode::Wrap => {
            for j in 0..before {
                let i = j as isize - before as isize;
                dst[j] = src[map_index(i, n, mode)];
            }
            for j in 0..after {
                let i = (n + j) as isize;
                dst[before + n + j] = src[map_index(i, n, mode)];
            }
        }
        FillMode::Maximum | FillMode::Minimum | FillMode::Mean | FillMode::Median => {
            let v = lane_stat(&src, mode);
            for j in 0..before {
                dst[j] = v;
            }
            for j in 0..after {
                dst[before + n + j] = v;
            }
        }
        FillMode::LinearRamp => {
            let first = src[0].to_f64();
            let last = src[n - 1].to_f64();
            // Ramp from zero at the outer border toward the edge value, edge excluded.
            for k in 0..before {
                dst[k] = A::from_f64(first * k as f64 / before as f64);
            }
            for j in 0..after {
                let k = after - 1 - j;
                dst[before + n + j] = A::from_f64(last * k as f64 / after as f64);
            }
        }
    }
}

/// Source index for a virtual position `i` outside `[0, n)`; `n` must be non-zero.
fn map_index(i: isize, n: usize, mode: FillMode) -> usize {
    let len = n as isize;
    match mode {
        FillMode::Wrap => i.rem_euclid(len) as usize,
        FillMode::Reflect => {
            if n == 1 {
                return 0;
            }
            let period = 2 * len - 2;
            let r = i.rem_euclid(period);
            if r < len { r as usize } else { (period - r) as usize }
        }
        FillMode::Symmetric => {
            let period = 2 * len;
            let r = i.rem_euclid(period);
            if r < len {
                r as usize
            } else {
                (period - 1 - r) as usize
            }
        }
        _ => i.clamp(0, len - 1) as usize,
    }
}

fn lane_stat<A: Element>(src: &ArrayView1<'_, A>, mode: FillMode) -> A {
    let n = src.len();
    match mode {
        FillMode::Maximum => src
            .iter()
            .copied()
            .fold(src[0], |m, v| if v > m { v } else { m }),
        FillMode::Minimum => src
            .iter()
            .copied()
            .fold(src[0], |m, v| if v < m { v } else { m }),
        FillMode::Mean => {
            let mean = src.iter().map(|v| v.to_f64()).sum::<f64>() / n as f64;
            round_if_integral::<A>(mean)
        }
        _ => {
            let mut sorted: Vec<f64> = src.iter().map(|v| v.to_f64()).collect();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            let median = if n % 2 == 1 {
                sorted[n / 2]
            } else {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
            };
            round_if_integral::<A>(median)
        }
    }
}

fn round_if_integral<A: Element>(v: f64) -> A {
    if A::INTEGRAL {
        A::from_f64(v.round_ties_even())
    } else {
        A::from_f64(v)
    }
}
