//! Shared types used across croppad.
//! Includes the padding enums (`PadMethod`, `FillMode`), the `SpatialSize`
//! broadcastable size, the `Roi` region, and the `Element` numeric bound.
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where the padding of a dimension goes.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PadMethod {
    /// Split evenly, the odd extra unit goes to the trailing side.
    #[default]
    Symmetric,
    /// Everything on the trailing side.
    End,
}

impl std::fmt::Display for PadMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PadMethod::Symmetric => write!(f, "symmetric"),
            PadMethod::End => write!(f, "end"),
        }
    }
}

impl FromStr for PadMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "symmetric" => Ok(PadMethod::Symmetric),
            "end" => Ok(PadMethod::End),
            other => Err(Error::config(format!("unsupported padding method: {other}"))),
        }
    }
}

/// Named fill strategies for padded borders.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    Constant,
    Edge,
    #[value(name = "linear_ramp")]
    LinearRamp,
    Maximum,
    Mean,
    Median,
    Minimum,
    Reflect,
    Symmetric,
    Wrap,
    Empty,
}

impl FillMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FillMode::Constant => "constant",
            FillMode::Edge => "edge",
            FillMode::LinearRamp => "linear_ramp",
            FillMode::Maximum => "maximum",
            FillMode::Mean => "mean",
            FillMode::Median => "median",
            FillMode::Minimum => "minimum",
            FillMode::Reflect => "reflect",
            FillMode::Symmetric => "symmetric",
            FillMode::Wrap => "wrap",
            FillMode::Empty => "empty",
        }
    }
}

impl std::fmt::Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FillMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mode = match s {
            "constant" => FillMode::Constant,
            "edge" => FillMode::Edge,
            "linear_ramp" => FillMode::LinearRamp,
            "maximum" => FillMode::Maximum,
            "mean" => FillMode::Mean,
            "median" => FillMode::Median,
            "minimum" => FillMode::Minimum,
            "reflect" => FillMode::Reflect,
            "symmetric" => FillMode::Symmetric,
            "wrap" => FillMode::Wrap,
            "empty" => FillMode::Empty,
            other => return Err(Error::config(format!("unsupported padding mode: {other}"))),
        };
        Ok(mode)
    }
}

/// A spatial size given either as one value for every dimension or per dimension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpatialSize {
    Scalar(usize),
    PerDim(Vec<usize>),
}

impl SpatialSize {
    /// Expand to exactly `ndim` entries.
    pub fn resolve(&self, ndim: usize) -> Result<Vec<usize>> {
        match self {
            SpatialSize::Scalar(v) => Ok(vec![*v; ndim]),
            SpatialSize::PerDim(v) if v.len() == ndim => Ok(v.clone()),
            SpatialSize::PerDim(v) => Err(Error::config(format!(
                "spatial size {:?} does not match {} spatial dims",
                v, ndim
            ))),
        }
    }
}

impl From<usize> for SpatialSize {
    fn from(v: usize) -> Self {
        SpatialSize::Scalar(v)
    }
}

impl From<Vec<usize>> for SpatialSize {
    fn from(v: Vec<usize>) -> Self {
        SpatialSize::PerDim(v)
    }
}

impl From<&[usize]> for SpatialSize {
    fn from(v: &[usize]) -> Self {
        SpatialSize::PerDim(v.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for SpatialSize {
    fn from(v: [usize; N]) -> Self {
        SpatialSize::PerDim(v.to_vec())
    }
}

/// Axis-aligned region of interest, half-open `[start, end)` per spatial dim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub start: Vec<i64>,
    pub end: Vec<i64>,
}

impl Roi {
    /// `start = center - size / 2`, `end = start + size`.
    pub fn from_center_size(center: &[i64], size: &[i64]) -> Self {
        let start: Vec<i64> = center
            .iter()
            .zip(size)
            .map(|(&c, &s)| c - s.div_euclid(2))
            .collect();
        let end = start.iter().zip(size).map(|(&b, &s)| b + s).collect();
        Roi { start, end }
    }

    pub fn size(&self) -> Vec<i64> {
        self.end.iter().zip(&self.start).map(|(e, s)| e - s).collect()
    }
}

/// Numeric element types the statistical fill modes can work with.
pub trait Element: Copy + PartialOrd + Default + Send + Sync + 'static {
    /// Integer types round statistics and truncate ramps.
    const INTEGRAL: bool;

    fn to_f64(self) -> f64;

    /// Cast back, truncating toward zero (and saturating) for integer types.
    fn from_f64(v: f64) -> Self;

    fn is_positive(self) -> bool {
        self > Self::default()
    }
}

macro_rules! impl_element {
    ($integral:expr => $($t:ty),*) => {
        $(
            impl Element for $t {
                const INTEGRAL: bool = $integral;

                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn from_f64(v: f64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_element!(true => u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_element!(false => f32, f64);
