//! Mailsift Duplicate Detection
//!
//! Flags near-duplicate emails in a batch by lexical similarity.
//!
//! # Overview
//!
//! Every call builds a TF-IDF model from the batch it is given, computes the
//! cosine similarity of every pair of documents, and reports the pairs whose
//! similarity exceeds [`DEFAULT_SIMILARITY_THRESHOLD`]. Nothing is cached
//! between calls, so the result for a batch never depends on earlier batches.
//!
//! ```text
//! texts → tokenize → TF-IDF rows → cosine matrix → upper triangle > 0.8 → pairs
//! ```
//!
//! # Vectorization policy
//!
//! - lowercase the whole document
//! - tokens match `\b\w\w+\b` (two or more Unicode word characters)
//! - raw term counts, smoothed IDF `ln((1 + n) / (1 + df)) + 1`
//! - rows are L2-normalized; a document without tokens is the zero vector
//! - cosine with a zero vector is `0.0`, so empty documents never pair up
//!
//! # Example
//!
//! ```
//! use mailsift_dedup::{detect_duplicates, DUPLICATE_REASON};
//!
//! let pairs = detect_duplicates(&["the cat sat on the mat", "the cat sat on the mat"]);
//! assert_eq!(pairs.len(), 1);
//! assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
//! assert_eq!(pairs[0].reason, DUPLICATE_REASON);
//! ```

#![warn(missing_docs)]

mod detector;
mod similarity;
mod tokenizer;
mod vectorizer;

pub use detector::{
    detect_duplicates, DuplicateDetector, SimilarityPair, DEFAULT_SIMILARITY_THRESHOLD,
    DUPLICATE_REASON,
};
pub use similarity::{cosine_similarity, SimilarityMatrix};
pub use tokenizer::tokenize;
pub use vectorizer::{SparseVector, TfidfMatrix, TfidfVectorizer};
