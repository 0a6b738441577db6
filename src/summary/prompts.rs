//! Prompt text for resume summaries

const SUMMARY_TEMPLATE: &str = "Summarize this resume in 3 lines:\n{resume}";

/// Build the summary prompt from at most `max_chars` characters of the resume
pub fn render_summary_prompt(resume: &str, max_chars: usize) -> String {
    let excerpt: String = resume.chars().take(max_chars).collect();
    SUMMARY_TEMPLATE.replace("{resume}", &excerpt)
}
