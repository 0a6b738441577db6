//! Fixed-vocabulary skill detection

use crate::error::{Result, ScreenerError};
use aho_corasick::AhoCorasick;

/// Skills recognised in job descriptions and resumes, in reporting order
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "c#",
    "machine learning",
    "tensorflow",
    "django",
    "flask",
    "sql",
    "react",
    "html",
    "css",
    "pandas",
    "numpy",
    "git",
    "api",
];

/// Substring matcher over the skill vocabulary.
///
/// Matching is plain containment on lower-cased text, not whole-word, so
/// `java` is found inside `javascript` and `api` inside `rapid`.
pub struct SkillExtractor {
    matcher: AhoCorasick,
    vocabulary: Vec<String>,
}

impl SkillExtractor {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SKILL_VOCABULARY.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_vocabulary(vocabulary: Vec<String>) -> Result<Self> {
        let vocabulary: Vec<String> = vocabulary.into_iter().map(|s| s.to_lowercase()).collect();
        let matcher = AhoCorasick::new(&vocabulary)
            .map_err(|e| ScreenerError::Configuration(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self { matcher, vocabulary })
    }

    /// Skills contained in `text`, in vocabulary order
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut found = vec![false; self.vocabulary.len()];

        // Overlapping search so a term inside another match is still reported
        for mat in self.matcher.find_overlapping_iter(&lowered) {
            found[mat.pattern().as_usize()] = true;
        }

        self.vocabulary
            .iter()
            .zip(found)
            .filter(|(_, hit)| *hit)
            .map(|(skill, _)| skill.clone())
            .collect()
    }
}

/// Number of distinct skills present in both sets
pub fn shared_skill_count(job_skills: &[String], resume_skills: &[String]) -> usize {
    let mut shared: Vec<&String> = job_skills
        .iter()
        .filter(|skill| resume_skills.contains(skill))
        .collect();
    shared.sort();
    shared.dedup();
    shared.len()
}
