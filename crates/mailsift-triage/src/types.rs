//! Batch processing results

use mailsift_dedup::SimilarityPair;
use mailsift_domain::EmailReport;
use std::path::{Path, PathBuf};

/// A successfully triaged file
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// File the email was read from
    pub source: PathBuf,

    /// Triage outcome
    pub report: EmailReport,
}

/// A file that could not be triaged
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// File the email was read from
    pub source: PathBuf,

    /// Why it failed
    pub reason: String,
}

/// Result of triaging a batch of files
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Successful files, in input order
    pub entries: Vec<BatchEntry>,

    /// Failed files, in input order
    pub failures: Vec<BatchFailure>,

    /// Near-duplicate pairs; indices refer to `entries`
    pub duplicates: Vec<SimilarityPair>,
}

impl BatchReport {
    /// Duplicate pairs resolved to their source files
    pub fn duplicate_sources(&self) -> impl Iterator<Item = (&Path, &Path, &str)> {
        self.duplicates.iter().filter_map(|pair| {
            let first = self.entries.get(pair.first)?;
            let second = self.entries.get(pair.second)?;
            Some((first.source.as_path(), second.source.as_path(), pair.reason.as_str()))
        })
    }

    /// Whether any duplicates were found
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}
