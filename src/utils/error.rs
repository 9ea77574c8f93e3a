use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("No matching release: {message}")]
    NotFound { message: String },

    #[error("Discogs request failed: {message}")]
    Upstream { message: String },

    #[error("PDF rendering failed: {message}")]
    Render { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("PDF write error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("Image decode error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl LabelError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LabelError>;
