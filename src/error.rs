//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Text decoding error: {0}")]
    Decode(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Missing input: {0}")]
    InputMissing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Summary error: {0}")]
    Summary(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl From<reqwest::Error> for ScreenerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScreenerError::Summary(format!("request timed out: {}", err))
        } else {
            ScreenerError::Summary(err.to_string())
        }
    }
}

impl ScreenerError {
    /// Whether this error only concerns a single resume and the batch can continue
    pub fn is_per_resume(&self) -> bool {
        matches!(
            self,
            ScreenerError::Io(_)
                | ScreenerError::PdfExtraction(_)
                | ScreenerError::Decode(_)
                | ScreenerError::UnsupportedFormat(_)
        )
    }
}
