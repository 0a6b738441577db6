//! Screening report structures

use crate::processing::ranking::ScoreRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything produced by one screening run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Skills found in the job description
    pub job_skills: Vec<String>,

    /// Scored resumes, highest match first
    pub ranked: Vec<ScoreRecord>,

    /// Resumes whose text could not be extracted, in upload order
    pub failures: Vec<ExtractionFailure>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub resumes_received: usize,
    /// Set when the run was stopped before every resume was processed
    pub cancelled: bool,
    /// Resumes skipped because of cancellation, in upload order
    #[serde(default)]
    pub not_processed: Vec<String>,
}

impl ScreeningReport {
    /// Ordered (filename, score %) rows for the results table
    pub fn table(&self) -> Vec<(&str, f64)> {
        self.ranked
            .iter()
            .map(|record| (record.filename.as_str(), record.final_score_percent))
            .collect()
    }

    pub fn top(&self) -> Option<&ScoreRecord> {
        self.ranked.first()
    }

    pub fn processed_count(&self) -> usize {
        self.ranked.len() + self.failures.len()
    }
}
