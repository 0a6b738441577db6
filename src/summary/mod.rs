//! Optional per-resume summaries
//!
//! A summarizer never fails: problems are reported inside the returned text
//! so ranking is never blocked on a summary.

pub mod openai;
pub mod prompts;

pub use openai::OpenAiSummarizer;

/// Returned when no credential was supplied for the run
pub const NO_SUMMARY: &str = "No summary";

/// Returned when the summary integration exists but has nothing to authenticate with
pub const SUMMARY_UNAVAILABLE: &str = "GPT summary not available. No API key provided.";

pub trait Summarizer {
    fn summarize(&self, text: &str) -> impl std::future::Future<Output = String> + Send;
}

/// Used when summaries are disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSummary;

impl Summarizer for NoSummary {
    async fn summarize(&self, _text: &str) -> String {
        NO_SUMMARY.to_string()
    }
}
