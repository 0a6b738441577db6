//! Boosted scoring and ordering of resumes

use crate::config::ScoringConfig;
use crate::processing::skills::shared_skill_count;
use serde::{Deserialize, Serialize};

/// Final scoring outcome for one resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub filename: String,
    /// TF-IDF cosine similarity in [0, 1]
    pub raw_similarity: f64,
    pub boost: f64,
    /// min(raw_similarity + boost, max_score)
    pub final_score: f64,
    /// final_score as a percentage, rounded to two decimals
    pub final_score_percent: f64,
    pub matched_skills: Vec<String>,
    pub summary: String,
}

/// Inputs for a single resume, collected by the screener
#[derive(Debug, Clone)]
pub struct ResumeScore {
    pub filename: String,
    pub raw_similarity: f64,
    pub resume_skills: Vec<String>,
    pub summary: String,
}

pub struct RankAggregator {
    boost_per_skill: f64,
    max_score: f64,
}

impl Default for RankAggregator {
    fn default() -> Self {
        Self {
            boost_per_skill: 0.05,
            max_score: 1.0,
        }
    }
}

impl RankAggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            boost_per_skill: config.boost_per_skill,
            max_score: config.max_score,
        }
    }

    pub fn boost(&self, job_skills: &[String], resume_skills: &[String]) -> f64 {
        shared_skill_count(job_skills, resume_skills) as f64 * self.boost_per_skill
    }

    pub fn score(&self, job_skills: &[String], input: ResumeScore) -> ScoreRecord {
        let boost = self.boost(job_skills, &input.resume_skills);
        let raw_similarity = input.raw_similarity.clamp(0.0, 1.0);
        let final_score = (raw_similarity + boost).min(self.max_score);
        let matched_skills = job_skills
            .iter()
            .filter(|skill| input.resume_skills.contains(skill))
            .cloned()
            .collect();

        ScoreRecord {
            filename: input.filename,
            raw_similarity,
            boost,
            final_score,
            final_score_percent: to_percent(final_score),
            matched_skills,
            summary: input.summary,
        }
    }

    /// Sort highest first. The sort is stable so equal percentages keep upload order.
    pub fn rank(&self, mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
        records.sort_by(|a, b| b.final_score_percent.total_cmp(&a.final_score_percent));
        records
    }
}

/// Score as a percentage rounded to two decimals.
///
/// Rounds the exact binary value of `score * 100` with ties to even, which is
/// what decimal formatting does, instead of scaling by another 100 and
/// rounding half away from zero.
pub fn to_percent(score: f64) -> f64 {
    round_to_hundredths(score * 100.0)
}

fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value)
        .parse()
        .unwrap_or_else(|_| (value * 100.0).round() / 100.0)
}
