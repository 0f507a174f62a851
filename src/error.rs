//! Error types for the classification service.

/// Errors produced while loading assets or serving predictions.
#[derive(Debug, thiserror::Error)]
pub enum CookError {
    // Per-request pipeline errors
    /// The uploaded bytes are not a supported image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("inference failed: {0}")]
    Inference(String),

    /// The model produced something that is not a usable distribution.
    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Startup errors
    /// Label manifest and model output layer disagree on the class count.
    #[error("label set has {labels} entries but the model produces {outputs} outputs")]
    LabelMismatch { labels: usize, outputs: usize },

    #[error("recipe store error: {0}")]
    RecipeStore(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    // Wrapped errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Client-side errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl CookError {
    /// Whether the error was caused by the caller rather than the service.
    ///
    /// The HTTP layer maps these to 400 and everything else to 500.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidInput(_) => true,
            Self::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

impl From<image::ImageError> for CookError {
    fn from(err: image::ImageError) -> Self {
        CookError::Decode(err.to_string())
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, CookError>;
