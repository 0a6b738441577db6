//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use crate::output::report::ScreeningReport;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
}

/// Ranked table and summary panels for the terminal
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn score_color(percent: f64) -> Color {
        match percent {
            p if p >= 70.0 => Color::Green,
            p if p >= 40.0 => Color::Yellow,
            _ => Color::Red,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        if report.job_skills.is_empty() {
            output.push_str("Job skills: (none detected)\n");
        } else {
            output.push_str(&format!("Job skills: {}\n", report.job_skills.join(", ")));
        }
        if report.metadata.cancelled {
            output.push_str(&self.colorize(
                &format!(
                    "Cancelled: {} of {} resume(s) processed\n",
                    report.processed_count(),
                    report.metadata.resumes_received
                ),
                Color::Yellow,
            ));
            if !report.metadata.not_processed.is_empty() {
                output.push_str(&format!("Not processed: {}\n", report.metadata.not_processed.join(", ")));
            }
        }

        output.push_str(&self.format_header("Ranking", 2));
        let name_width = report
            .ranked
            .iter()
            .map(|r| r.filename.chars().count())
            .max()
            .unwrap_or(0)
            .max("Resume".len());

        output.push_str(&format!("{:>4}  {:<width$}  {:>15}\n", "#", "Resume", "Match Score (%)", width = name_width));
        for (i, record) in report.ranked.iter().enumerate() {
            let score = format!("{:>15.2}", record.final_score_percent);
            output.push_str(&format!(
                "{:>4}  {:<width$}  {}\n",
                i + 1,
                record.filename,
                self.colorize(&score, Self::score_color(record.final_score_percent)),
                width = name_width
            ));
            if self.detailed {
                output.push_str(&format!(
                    "      similarity {:.4} + boost {:.2} | skills: {}\n",
                    record.raw_similarity,
                    record.boost,
                    if record.matched_skills.is_empty() {
                        "-".to_string()
                    } else {
                        record.matched_skills.join(", ")
                    }
                ));
            }
        }

        output.push_str(&self.format_header("Resume Summaries", 2));
        for record in &report.ranked {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("▸", Color::Cyan),
                self.colorize(
                    &format!("{} (Score: {:.2}%)", record.filename, record.final_score_percent),
                    Color::White
                )
            ));
            for line in record.summary.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("Not Scored", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    self.colorize("✗", Color::Red),
                    failure.filename,
                    failure.reason
                ));
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::from("# Resume Screening Results\n\n");

        if !report.job_skills.is_empty() {
            output.push_str(&format!("**Job skills:** {}\n\n", report.job_skills.join(", ")));
        }

        output.push_str("| Rank | Resume | Match Score (%) |\n");
        output.push_str("|-----:|--------|----------------:|\n");
        for (i, (filename, percent)) in report.table().into_iter().enumerate() {
            output.push_str(&format!("| {} | {} | {:.2} |\n", i + 1, Self::escape_cell(filename), percent));
        }

        output.push_str("\n## Resume Summaries\n");
        for record in &report.ranked {
            output.push_str(&format!(
                "\n<details>\n<summary>{} (Score: {:.2}%)</summary>\n\n{}\n\n</details>\n",
                record.filename, record.final_score_percent, record.summary
            ));
        }

        if !report.failures.is_empty() {
            output.push_str("\n## Not Scored\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- `{}`: {}\n", failure.filename, failure.reason));
            }
        }

        if !report.metadata.not_processed.is_empty() {
            output.push_str("\n## Not Processed\n\nScreening was cancelled before these resumes were scored.\n\n");
            for filename in &report.metadata.not_processed {
                output.push_str(&format!("- `{}`\n", filename));
            }
        }

        if self.include_metadata {
            output.push_str(&format!(
                "\n---\n*Generated {} in {}ms from {} resume(s){}.*\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.resumes_received,
                if report.metadata.cancelled { ", cancelled early" } else { "" }
            ));
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content).map_err(|e| {
        ScreenerError::OutputFormatting(format!("Failed to write report to '{}': {}", file_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{ExtractionFailure, ReportMetadata};
    use crate::processing::ranking::ScoreRecord;
    use chrono::Utc;

    fn record(filename: &str, percent: f64, summary: &str) -> ScoreRecord {
        ScoreRecord {
            filename: filename.to_string(),
            raw_similarity: percent / 100.0,
            boost: 0.0,
            final_score: percent / 100.0,
            final_score_percent: percent,
            matched_skills: vec!["python".to_string()],
            summary: summary.to_string(),
        }
    }

    fn sample_report() -> ScreeningReport {
        ScreeningReport {
            job_skills: vec!["python".to_string(), "sql".to_string()],
            ranked: vec![record("alice.pdf", 72.5, "Strong backend profile"), record("bob.txt", 42.0, "No summary")],
            failures: vec![ExtractionFailure {
                filename: "broken.txt".to_string(),
                reason: "Text decoding error: File is not valid UTF-8".to_string(),
            }],
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: 12,
                resumes_received: 3,
                cancelled: false,
                not_processed: Vec::new(),
            },
        }
    }

    #[test]
    fn test_console_lists_ranking_and_panels() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();

        let alice = output.find("alice.pdf").unwrap();
        let bob = output.find("bob.txt").unwrap();
        assert!(alice < bob);
        assert!(output.contains("72.50"));
        assert!(output.contains("alice.pdf (Score: 72.50%)"));
        assert!(output.contains("Strong backend profile"));
        assert!(output.contains("broken.txt"));
    }

    #[test]
    fn test_json_round_trips() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let parsed: ScreeningReport = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed.ranked.len(), 2);
        assert_eq!(parsed.ranked[0].filename, "alice.pdf");
        assert_eq!(parsed.failures[0].filename, "broken.txt");
    }

    #[test]
    fn test_markdown_table() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("| 1 | alice.pdf | 72.50 |"));
        assert!(output.contains("| 2 | bob.txt | 42.00 |"));
        assert!(output.contains("<summary>bob.txt (Score: 42.00%)</summary>"));
        assert!(!output.contains("Generated"));
    }

    #[test]
    fn test_cancelled_run_lists_skipped_resumes() {
        let mut report = sample_report();
        report.metadata.cancelled = true;
        report.metadata.resumes_received = 4;
        report.metadata.not_processed = vec!["carol.pdf".to_string()];

        let console = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(console.contains("Cancelled: 3 of 4 resume(s) processed"));
        assert!(console.contains("Not processed: carol.pdf"));

        let markdown = MarkdownFormatter::new(false).format_report(&report).unwrap();
        assert!(markdown.contains("## Not Processed"));
        assert!(markdown.contains("- `carol.pdf`"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, true);
        let json = generator.generate_report(&sample_report(), &OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }

    #[test]
    fn test_save_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        save_report_to_file("# hi", &path).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi");
    }
}
