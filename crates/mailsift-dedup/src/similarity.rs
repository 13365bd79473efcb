//! Pairwise cosine similarity

use crate::vectorizer::{SparseVector, TfidfMatrix};

/// Cosine similarity of two weight vectors
///
/// Returns `0.0` when either vector is the zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(b) / denominator
}

/// Symmetric N×N similarity matrix with `1.0` on the diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every pairwise similarity of the rows of `matrix`
    pub fn from_tfidf(matrix: &TfidfMatrix) -> Self {
        let rows = matrix.rows();
        let size = rows.len();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let sim = cosine_similarity(&rows[i], &rows[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }

        Self { size, values }
    }

    /// Similarity of documents `i` and `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index out of bounds");
        self.values[i * self.size + j]
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.size
    }

    /// True for a matrix over zero documents
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
