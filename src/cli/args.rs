use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use croppad::{FillMode, PadMethod};

/// Transform applied by a CLI run.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    SpatialPad,
    BorderPad,
    DivisiblePad,
    SpatialCrop,
    CenterCrop,
    RandCrop,
    RandCropSamples,
    CropForeground,
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransformKind::SpatialPad => "spatial-pad",
            TransformKind::BorderPad => "border-pad",
            TransformKind::DivisiblePad => "divisible-pad",
            TransformKind::SpatialCrop => "spatial-crop",
            TransformKind::CenterCrop => "center-crop",
            TransformKind::RandCrop => "rand-crop",
            TransformKind::RandCropSamples => "rand-crop-samples",
            TransformKind::CropForeground => "crop-foreground",
        };
        write!(f, "{}", name)
    }
}

#[derive(Parser, Debug)]
#[command(name = "croppad", version, about = "Crop and pad channel-first arrays")]
pub struct CliArgs {
    /// Transform to apply
    #[arg(short, long, value_enum)]
    pub transform: TransformKind,

    /// Input image as a JSON array file ({"shape": [...], "data": [...]}).
    /// When omitted a synthetic 2D image and label are generated.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Optional label JSON array file, transformed with the same geometry as the image
    #[arg(long)]
    pub label: Option<PathBuf>,

    /// Output filename for the transformed image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output filename for the transformed label
    #[arg(long)]
    pub label_output: Option<PathBuf>,

    /// Optional JSON report of the run
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Spatial size: one value for all dims or a comma separated list (e.g. 64,64)
    #[arg(long, value_delimiter = ',')]
    pub size: Vec<usize>,

    /// Border for border-pad: 1, ndim or 2*ndim comma separated values
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub border: Vec<i64>,

    /// Divisor for divisible-pad: one value or one per spatial dim
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub k: Vec<i64>,

    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub roi_center: Vec<i64>,

    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub roi_size: Vec<i64>,

    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub roi_start: Vec<i64>,

    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub roi_end: Vec<i64>,

    /// Where padding goes (symmetric or end)
    #[arg(long, value_enum, default_value_t = PadMethod::Symmetric)]
    pub method: PadMethod,

    /// Fill mode for padded borders of the image. Labels are always zero padded.
    #[arg(long, value_enum, default_value_t = FillMode::Constant)]
    pub mode: FillMode,

    /// Foreground bounding box margin
    #[arg(long, default_value_t = 0)]
    pub margin: usize,

    /// Channels evaluated for the foreground (default: all)
    #[arg(long, value_delimiter = ',')]
    pub channels: Vec<usize>,

    /// Number of random crops for rand-crop-samples
    #[arg(long, default_value_t = 1)]
    pub num_samples: usize,

    /// Crop at the image center instead of a random position
    #[arg(long, default_value_t = false)]
    pub fixed_center: bool,

    /// Use --size as the exact crop size instead of the minimum
    #[arg(long, default_value_t = false)]
    pub fixed_size: bool,

    /// Seed for random transforms and synthetic data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Synthetic image height
    #[arg(long, default_value_t = 128)]
    pub height: usize,

    /// Synthetic image width
    #[arg(long, default_value_t = 128)]
    pub width: usize,

    /// Number of synthetic objects
    #[arg(long, default_value_t = 12)]
    pub num_objs: usize,

    /// Maximum synthetic object radius
    #[arg(long, default_value_t = 30)]
    pub rad_max: usize,

    /// Synthetic noise amplitude
    #[arg(long, default_value_t = 0.0)]
    pub noise: f32,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
