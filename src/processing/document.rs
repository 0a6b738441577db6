//! Document structures

use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub name: String,
    pub document_type: DocumentType,
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Resume,
    JobDescription,
}

impl Document {
    /// Build a document from raw extracted text, normalizing it on the way in
    pub fn new(
        raw_text: &str,
        name: impl Into<String>,
        document_type: DocumentType,
        processor: &TextProcessor,
    ) -> Self {
        let content = processor.normalize(raw_text);
        let word_count = content.split_whitespace().count();

        Self {
            content,
            name: name.into(),
            document_type,
            word_count,
        }
    }

    pub fn job_description(raw_text: &str, processor: &TextProcessor) -> Self {
        Self::new(raw_text, "job description", DocumentType::JobDescription, processor)
    }

    pub fn resume(raw_text: &str, filename: &str, processor: &TextProcessor) -> Self {
        Self::new(raw_text, filename, DocumentType::Resume, processor)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
