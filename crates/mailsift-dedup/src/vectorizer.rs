//! TF-IDF weighting over a single batch of documents

use crate::tokenizer::tokenize;
use std::collections::{BTreeMap, HashMap};

/// Sparse weight vector, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(term index, weight)` entries in any order
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        Self { entries }
    }

    /// Non-zero entries, ascending by term index
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// True when the vector has no non-zero weight
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// TF-IDF model fitted to one batch
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl TfidfMatrix {
    /// Term → column index, in lexicographic term order
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// IDF weight per column
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// One L2-normalized row per input document
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when fitted on an empty batch
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds TF-IDF rows using the batch itself as the reference corpus
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    /// Create a vectorizer with the fixed tokenization policy
    pub fn new() -> Self {
        Self
    }

    /// Fit vocabulary and IDF on `documents` and return their weight rows
    ///
    /// An empty vocabulary is not an error: every row is then the zero vector.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> TfidfMatrix {
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for token in tokenize(doc.as_ref()) {
                    *tf.entry(token).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let rows = counts
            .iter()
            .map(|tf| {
                let entries = tf
                    .iter()
                    .map(|(term, count)| {
                        let idx = vocabulary[term.as_str()];
                        (idx, *count as f64 * idf[idx])
                    })
                    .collect();
                let mut row = SparseVector::from_entries(entries);
                row.normalize();
                row
            })
            .collect();

        TfidfMatrix {
            vocabulary,
            idf,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_vocabulary_is_union_of_batch() {
        let matrix = TfidfVectorizer::new().fit_transform(&["alpha beta", "beta gamma"]);
        let terms: Vec<_> = matrix.vocabulary().keys().cloned().collect();
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
        assert_eq!(matrix.vocabulary()["gamma"], 2);
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_smoothed_idf() {
        let matrix = TfidfVectorizer::new().fit_transform(&["alpha beta", "beta gamma"]);
        // beta appears in both documents, alpha in one
        assert_close(matrix.idf()[1], 1.0);
        assert_close(matrix.idf()[0], (3.0f64 / 2.0).ln() + 1.0);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let matrix = TfidfVectorizer::new().fit_transform(&["alpha alpha beta", "gamma"]);
        for row in matrix.rows() {
            assert_close(row.norm(), 1.0);
        }
    }

    #[test]
    fn test_term_frequency_is_raw_count() {
        let matrix = TfidfVectorizer::new().fit_transform(&["alpha alpha beta"]);
        let row = &matrix.rows()[0];
        // single document: idf is 1 for every term, so weights are 2:1 before normalizing
        let (alpha, beta) = (row.entries()[0].1, row.entries()[1].1);
        assert_close(alpha / beta, 2.0);
    }

    #[test]
    fn test_empty_document_is_zero_row() {
        let matrix = TfidfVectorizer::new().fit_transform(&["", "alpha beta"]);
        assert!(matrix.rows()[0].is_zero());
        assert!(matrix.rows()[0].entries().is_empty());
        assert!(!matrix.rows()[1].is_zero());
    }

    #[test]
    fn test_empty_vocabulary_does_not_fail() {
        let matrix = TfidfVectorizer::new().fit_transform(&["", "a", "!?"]);
        assert!(matrix.vocabulary().is_empty());
        assert_eq!(matrix.len(), 3);
        assert!(matrix.rows().iter().all(SparseVector::is_zero));
    }

    #[test]
    fn test_empty_batch() {
        let docs: [&str; 0] = [];
        let matrix = TfidfVectorizer::new().fit_transform(&docs);
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_entries(vec![(3, 2.0), (0, 1.0)]);
        let b = SparseVector::from_entries(vec![(0, 4.0), (1, 5.0), (3, 0.5)]);
        assert_close(a.dot(&b), 5.0);
        assert_close(b.dot(&a), 5.0);
    }
}
