//! TF-IDF cosine similarity over a two-document corpus

use crate::processing::text_processor::TextProcessor;
use std::collections::BTreeMap;

/// Sparse term -> weight vector. Ordered so sums are reproducible.
pub type TermVector = BTreeMap<String, f64>;

pub struct SimilarityScorer {
    processor: TextProcessor,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self {
            processor: TextProcessor::new(),
        }
    }

    /// Similarity of `resume` to `job` in [0, 1].
    ///
    /// IDF weights come only from this pair, so scores for different resumes
    /// are each computed against their own corpus.
    pub fn similarity(&self, job: &str, resume: &str) -> f64 {
        let vectors = self.fit_transform(&[job, resume]);
        cosine_similarity(&vectors[0], &vectors[1])
    }

    /// TF-IDF vectors for each document, L2-normalized.
    ///
    /// Term frequency is the raw count; idf(t) = ln((1 + n) / (1 + df(t))) + 1.
    pub fn fit_transform(&self, documents: &[&str]) -> Vec<TermVector> {
        let counts: Vec<BTreeMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for token in self.processor.tokenize(doc) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: BTreeMap<&str, f64> = document_frequency
            .into_iter()
            .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        counts
            .iter()
            .map(|tf| {
                let mut vector: TermVector = tf
                    .iter()
                    .map(|(term, &count)| (term.clone(), count as f64 * idf[term.as_str()]))
                    .collect();
                l2_normalize(&mut vector);
                vector
            })
            .collect()
    }
}

fn l2_normalize(vector: &mut TermVector) {
    let norm = l2_norm(vector);
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

fn l2_norm(vector: &TermVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Cosine of the angle between two sparse vectors; 0.0 when either is empty
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let norm_product = l2_norm(a) * l2_norm(b);
    if norm_product == 0.0 || !norm_product.is_finite() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();

    (dot / norm_product).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "Looking for a Python developer with SQL and Git experience";
    const RESUME: &str = "Experienced Python developer. Skills: SQL, Git, Django.";

    #[test]
    fn test_strong_overlap_scores_high() {
        let scorer = SimilarityScorer::new();
        let score = scorer.similarity(JOB, RESUME);

        assert!(score > 0.3, "score was {}", score);
        assert!(score < 1.0);
    }

    #[test]
    fn test_identical_documents() {
        let scorer = SimilarityScorer::new();
        let score = scorer.similarity(RESUME, RESUME);

        assert!((score - 1.0).abs() < 1e-9);
        assert!(score >= scorer.similarity(RESUME, JOB));
    }

    #[test]
    fn test_idempotent() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.similarity(JOB, RESUME), scorer.similarity(JOB, RESUME));
    }

    #[test]
    fn test_no_overlap() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.similarity(JOB, "Forklift operator, night shift warehouse"), 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.similarity("", RESUME), 0.0);
        assert_eq!(scorer.similarity(JOB, ""), 0.0);
        assert_eq!(scorer.similarity("and the of", "with a the"), 0.0);
    }

    #[test]
    fn test_shared_terms_get_lower_idf() {
        let scorer = SimilarityScorer::new();
        let vectors = scorer.fit_transform(&["python rust", "python golang"]);

        // "python" appears in both documents and weighs less than "rust"
        assert!(vectors[0]["python"] < vectors[0]["rust"]);
        let norm: f64 = vectors[0].values().map(|w| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_of_empty_vectors() {
        assert_eq!(cosine_similarity(&TermVector::new(), &TermVector::new()), 0.0);
    }
}
