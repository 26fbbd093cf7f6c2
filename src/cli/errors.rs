use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Label shape {label:?} does not match image shape {image:?} in spatial dims")]
    LabelShape {
        image: Vec<usize>,
        label: Vec<usize>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transform error: {0}")]
    Transform(#[from] croppad::Error),
}

impl AppError {
    pub fn missing(arg: &str) -> Self {
        AppError::MissingArgument {
            arg: arg.to_string(),
        }
    }
}
