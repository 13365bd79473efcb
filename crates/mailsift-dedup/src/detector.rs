//! Near-duplicate detection over a batch of texts

use crate::similarity::SimilarityMatrix;
use crate::vectorizer::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pairs scoring strictly above this similarity are reported
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Reason attached to every reported pair
pub const DUPLICATE_REASON: &str = "High text similarity";

/// Two documents judged to be near-duplicates
///
/// `first < second` always holds; both are positions in the input batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimilarityPair {
    /// Index of the earlier document
    pub first: usize,

    /// Index of the later document
    pub second: usize,

    /// Why the pair was flagged
    pub reason: String,
}

impl SimilarityPair {
    fn new(first: usize, second: usize) -> Self {
        Self {
            first,
            second,
            reason: DUPLICATE_REASON.to_string(),
        }
    }
}

/// Stateless TF-IDF / cosine duplicate detector
///
/// Each [`detect`](DuplicateDetector::detect) call fits its own vocabulary, so
/// one detector can be shared freely across threads and requests.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateDetector {
    threshold: f64,
    vectorizer: TfidfVectorizer,
}

impl DuplicateDetector {
    /// Create a detector with the default threshold
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            vectorizer: TfidfVectorizer::new(),
        }
    }

    /// Use a different similarity threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Similarity threshold in use
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Full pairwise similarity matrix for `documents`
    pub fn similarity_matrix<S: AsRef<str>>(&self, documents: &[S]) -> SimilarityMatrix {
        let tfidf = self.vectorizer.fit_transform(documents);
        debug!(
            "Fitted TF-IDF over {} documents, vocabulary size {}",
            tfidf.len(),
            tfidf.vocabulary().len()
        );
        SimilarityMatrix::from_tfidf(&tfidf)
    }

    /// Report every pair `(i, j)`, `i < j`, whose similarity exceeds the threshold
    ///
    /// Pairs come out in row-major order over the upper triangle. Fewer than
    /// two documents yield an empty result.
    pub fn detect<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SimilarityPair> {
        if documents.len() < 2 {
            return Vec::new();
        }

        let matrix = self.similarity_matrix(documents);
        let mut pairs = Vec::new();
        for i in 0..matrix.len() {
            for j in (i + 1)..matrix.len() {
                if matrix.get(i, j) > self.threshold {
                    pairs.push(SimilarityPair::new(i, j));
                }
            }
        }

        debug!("Flagged {} duplicate pairs among {} documents", pairs.len(), documents.len());
        pairs
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect duplicates with the default detector
pub fn detect_duplicates<S: AsRef<str>>(documents: &[S]) -> Vec<SimilarityPair> {
    DuplicateDetector::new().detect(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        let detector = DuplicateDetector::default();
        assert_eq!(detector.threshold(), DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_pair_reason() {
        let pair = SimilarityPair::new(0, 3);
        assert_eq!(pair.reason, "High text similarity");
    }

    #[test]
    fn test_custom_threshold() {
        // alpha-beta vs beta-gamma score well below 0.8 but above 0.2
        let docs = ["alpha beta", "beta gamma"];
        assert!(DuplicateDetector::new().detect(&docs).is_empty());

        let pairs = DuplicateDetector::new().with_threshold(0.2).detect(&docs);
        assert_eq!(pairs, vec![SimilarityPair::new(0, 1)]);
    }

    #[test]
    fn test_accepts_owned_strings() {
        let docs = vec!["same words here".to_string(), "same words here".to_string()];
        assert_eq!(detect_duplicates(&docs).len(), 1);
    }

    #[test]
    fn test_pair_serializes_with_field_names() {
        let json = serde_json::to_value(SimilarityPair::new(1, 2)).unwrap();
        assert_eq!(json["first"], 1);
        assert_eq!(json["second"], 2);
        assert_eq!(json["reason"], DUPLICATE_REASON);
    }
}
