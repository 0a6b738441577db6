//! Input manager for loading resume uploads and routing them to extractors

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{PdfExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;
use tokio::fs;

/// A single uploaded file: its name and raw contents
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_filename(&self.filename)
    }
}

/// File name shown in reports for a path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a file from disk into an upload named after its file name
    pub async fn load(&self, path: &Path) -> Result<Upload> {
        let bytes = fs::read(path).await?;
        Ok(Upload {
            filename: display_name(path),
            bytes,
        })
    }

    /// Read a plain-text job description from disk
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        if FileType::from_filename(&path.to_string_lossy()) != FileType::Text {
            return Err(ScreenerError::UnsupportedFormat(
                format!("Job description must be a .txt file: {}", path.display())
            ));
        }
        let upload = self.load(path).await?;
        PlainTextExtractor.extract(&upload.bytes)
    }

    pub fn extract_text(&self, upload: &Upload) -> Result<String> {
        match upload.file_type() {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", upload.filename);
                PdfExtractor.extract(&upload.bytes)
            }
            FileType::Text => {
                info!("Reading plain text file: {}", upload.filename);
                PlainTextExtractor.extract(&upload.bytes)
            }
            FileType::Unknown => Err(ScreenerError::UnsupportedFormat(
                format!("Unsupported file type for: {}", upload.filename)
            )),
        }
    }
}
