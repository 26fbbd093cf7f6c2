//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Every transform validates its configuration and the live input shape before
//! allocating, and reports failures through one of the variants below. I/O and
//! JSON errors from the array file layer are converted as well.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Invalid ROI ({reason}): start={start:?}, end={end:?}")]
    InvalidRoi {
        reason: &'static str,
        start: Vec<i64>,
        end: Vec<i64>,
    },

    #[error("ROI out of image space at spatial dim {dim}: start={start}, end={end}, size={size}")]
    OutOfBounds {
        dim: usize,
        start: i64,
        end: i64,
        size: usize,
    },

    #[error("No foreground found by the selection function")]
    NoForeground,

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    pub fn argument<V: std::fmt::Debug>(arg: &'static str, value: V) -> Self {
        Error::InvalidArgument {
            arg,
            value: format!("{:?}", value),
        }
    }
}
