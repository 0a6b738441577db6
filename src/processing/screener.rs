//! Screening pipeline: extraction, scoring, summaries and ranking for a batch

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::input::manager::display_name;
use crate::input::{InputManager, Upload};
use crate::output::report::{ExtractionFailure, ReportMetadata, ScreeningReport};
use crate::processing::document::Document;
use crate::processing::ranking::{RankAggregator, ResumeScore, ScoreRecord};
use crate::processing::similarity::SimilarityScorer;
use crate::processing::skills::SkillExtractor;
use crate::processing::text_processor::TextProcessor;
use crate::summary::Summarizer;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared stop signal checked between resumes
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Coordinates all pipeline components for one job description
pub struct Screener<S: Summarizer> {
    input_manager: InputManager,
    text_processor: TextProcessor,
    skill_extractor: SkillExtractor,
    similarity_scorer: SimilarityScorer,
    aggregator: RankAggregator,
    summarizer: S,
    show_progress: bool,
}

impl<S: Summarizer> Screener<S> {
    pub fn new(config: &Config, summarizer: S) -> Result<Self> {
        Ok(Self {
            input_manager: InputManager::new(),
            text_processor: TextProcessor::new(),
            skill_extractor: SkillExtractor::new()?,
            similarity_scorer: SimilarityScorer::new(),
            aggregator: RankAggregator::new(&config.scoring),
            summarizer,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Screen every upload against the job description.
    ///
    /// Fails only when the job description or the upload list is empty.
    /// Extraction problems are recorded per resume and the batch continues.
    pub async fn screen(
        &self,
        job_description: &str,
        uploads: &[Upload],
        cancel: &CancellationFlag,
    ) -> Result<ScreeningReport> {
        let pending = uploads.iter().map(Ok).collect();
        self.run(job_description, pending, cancel).await
    }

    /// Read resumes from disk and screen them. Unreadable files are reported
    /// as failures in their upload position.
    pub async fn screen_paths(
        &self,
        job_description: &str,
        paths: &[PathBuf],
        cancel: &CancellationFlag,
    ) -> Result<ScreeningReport> {
        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            let entry = self.input_manager.load(path).await.map_err(|e| {
                warn!("Could not read {}: {}", path.display(), e);
                ExtractionFailure {
                    filename: display_name(path),
                    reason: e.to_string(),
                }
            });
            loaded.push(entry);
        }

        let pending = loaded
            .iter()
            .map(|entry| entry.as_ref().map_err(Clone::clone))
            .collect();
        self.run(job_description, pending, cancel).await
    }

    async fn run(
        &self,
        job_description: &str,
        pending: Vec<std::result::Result<&Upload, ExtractionFailure>>,
        cancel: &CancellationFlag,
    ) -> Result<ScreeningReport> {
        let start_time = Instant::now();

        let job = Document::job_description(job_description, &self.text_processor);
        if job.is_empty() || pending.is_empty() {
            return Err(ScreenerError::InputMissing(
                "Please upload resumes and enter a job description.".to_string(),
            ));
        }

        debug!("{:?} '{}': {} words", job.document_type, job.name, job.word_count);
        let job_skills = self.skill_extractor.extract(&job.content);
        info!(
            "Screening {} resume(s); job description skills: [{}]",
            pending.len(),
            job_skills.join(", ")
        );

        let progress = self.progress_bar(pending.len());
        let mut records: Vec<ScoreRecord> = Vec::with_capacity(pending.len());
        let mut failures = Vec::new();
        let mut not_processed = Vec::new();

        for (index, entry) in pending.iter().enumerate() {
            if cancel.is_cancelled() {
                not_processed = pending[index..]
                    .iter()
                    .map(|entry| match entry {
                        Ok(upload) => upload.filename.clone(),
                        Err(failure) => failure.filename.clone(),
                    })
                    .collect();
                warn!(
                    "Screening cancelled; {} resume(s) not processed: {}",
                    not_processed.len(),
                    not_processed.join(", ")
                );
                break;
            }

            let upload = match entry {
                Ok(upload) => *upload,
                Err(failure) => {
                    failures.push(failure.clone());
                    progress.inc(1);
                    continue;
                }
            };

            progress.set_message(upload.filename.clone());
            match self.score_upload(&job, &job_skills, upload).await {
                Ok(record) => records.push(record),
                Err(e) if e.is_per_resume() => {
                    warn!("Skipping {}: {}", upload.filename, e);
                    failures.push(ExtractionFailure {
                        filename: upload.filename.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        let ranked = self.aggregator.rank(records);

        Ok(ScreeningReport {
            job_skills,
            ranked,
            failures,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
                resumes_received: pending.len(),
                cancelled: !not_processed.is_empty(),
                not_processed,
            },
        })
    }

    async fn score_upload(&self, job: &Document, job_skills: &[String], upload: &Upload) -> Result<ScoreRecord> {
        let raw_text = self.input_manager.extract_text(upload)?;
        let resume = Document::resume(&raw_text, &upload.filename, &self.text_processor);
        debug!("{:?} '{}': {} words", resume.document_type, resume.name, resume.word_count);

        let resume_skills = self.skill_extractor.extract(&resume.content);
        let raw_similarity = self.similarity_scorer.similarity(&job.content, &resume.content);
        let summary = self.summarizer.summarize(&resume.content).await;

        let record = self.aggregator.score(
            job_skills,
            ResumeScore {
                filename: upload.filename.clone(),
                raw_similarity,
                resume_skills,
                summary,
            },
        );

        debug!(
            "{}: similarity {:.4}, boost {:.2}, final {:.2}%",
            record.filename, record.raw_similarity, record.boost, record.final_score_percent
        );
        Ok(record)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}
