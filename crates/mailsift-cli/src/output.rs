//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use mailsift_dedup::SimilarityPair;
use mailsift_triage::BatchReport;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest cell shown in tables before truncation.
const MAX_CELL_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a processed batch: per-email results plus duplicates by file.
    pub fn format_batch(&self, batch: &BatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_batch_json(batch),
            OutputFormat::Table => Ok(self.format_batch_table(batch)),
            OutputFormat::Quiet => Ok(self.format_batch_quiet(batch)),
        }
    }

    /// Format index-based duplicate pairs.
    pub fn format_duplicates(&self, pairs: &[SimilarityPair]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let duplicates: Vec<serde_json::Value> = pairs
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "email1_index": p.first,
                            "email2_index": p.second,
                            "reason": p.reason,
                        })
                    })
                    .collect();
                let output = serde_json::json!({
                    "duplicate_emails_detected": !pairs.is_empty(),
                    "duplicates": duplicates,
                });
                Ok(serde_json::to_string_pretty(&output)?)
            }
            OutputFormat::Table => {
                if pairs.is_empty() {
                    return Ok(self.info("No duplicate emails detected."));
                }
                let rows = pairs
                    .iter()
                    .map(|p| [p.first.to_string(), p.second.to_string(), p.reason.clone()]);
                Ok(build_table(["Email 1", "Email 2", "Reason"], rows))
            }
            OutputFormat::Quiet => Ok(pairs
                .iter()
                .map(|p| format!("{} {}", p.first, p.second))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_batch_json(&self, batch: &BatchReport) -> Result<String> {
        let duplicates: Vec<serde_json::Value> = batch
            .duplicate_sources()
            .map(|(first, second, reason)| {
                serde_json::json!({
                    "email1": first.display().to_string(),
                    "email2": second.display().to_string(),
                    "reason": reason,
                })
            })
            .collect();

        let emails: Vec<serde_json::Value> = batch
            .entries
            .iter()
            .map(|entry| {
                let r = &entry.report;
                serde_json::json!({
                    "email": entry.source.display().to_string(),
                    "sender": r.sender,
                    "subject": r.subject,
                    "classification": r.classification,
                    "request_type": r.request_type,
                    "primary_intent": r.primary_intent,
                    "extracted_data": r.extracted_data,
                })
            })
            .collect();

        let failures: Vec<serde_json::Value> = batch
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "email": f.source.display().to_string(),
                    "error": f.reason,
                })
            })
            .collect();

        let output = serde_json::json!({
            "duplicate_emails_detected": batch.has_duplicates(),
            "duplicates": duplicates,
            "emails": emails,
            "failures": failures,
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_batch_table(&self, batch: &BatchReport) -> String {
        let mut sections = Vec::new();

        if batch.entries.is_empty() {
            sections.push(self.warning("No emails processed."));
        } else {
            let rows = batch.entries.iter().map(|entry| {
                let r = &entry.report;
                [
                    entry.source.display().to_string(),
                    r.sender.clone().unwrap_or_default(),
                    truncate(r.subject.as_deref().unwrap_or_default()),
                    r.request_type.clone().unwrap_or_else(|| "-".to_string()),
                    truncate(r.primary_intent.as_deref().unwrap_or("-")),
                ]
            });
            sections.push(build_table(
                ["Email", "Sender", "Subject", "Request Type", "Primary Intent"],
                rows,
            ));
        }

        if batch.has_duplicates() {
            let rows = batch.duplicate_sources().map(|(first, second, reason)| {
                [first.display().to_string(), second.display().to_string(), reason.to_string()]
            });
            sections.push(build_table(["Email 1", "Email 2", "Reason"], rows));
        } else {
            sections.push(self.info("No duplicate emails detected."));
        }

        for failure in &batch.failures {
            sections.push(self.error(&format!("{}: {}", failure.source.display(), failure.reason)));
        }

        sections.join("\n")
    }

    fn format_batch_quiet(&self, batch: &BatchReport) -> String {
        batch
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "{}\t{}",
                    entry.source.display(),
                    entry.report.request_type.as_deref().unwrap_or("-")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn build_table<const N: usize>(header: [&str; N], rows: impl Iterator<Item = [String; N]>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Single-line, length-capped cell text.
fn truncate(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsift_domain::EmailReport;
    use mailsift_triage::{BatchEntry, BatchFailure};
    use std::path::PathBuf;

    fn create_test_batch() -> BatchReport {
        let report = |subject: &str| EmailReport {
            sender: Some("agent@bank.example".to_string()),
            subject: Some(subject.to_string()),
            classification: "Fee Payment".to_string(),
            request_type: Some("Fee Payment".to_string()),
            primary_intent: Some("Pay the fee".to_string()),
            extracted_data: None,
            email_text: "Pay the fee".to_string(),
        };

        BatchReport {
            entries: vec![
                BatchEntry {
                    source: PathBuf::from("in/email1.eml"),
                    report: report("Fee"),
                },
                BatchEntry {
                    source: PathBuf::from("in/email2.eml"),
                    report: report("Fwd: Fee"),
                },
            ],
            failures: vec![BatchFailure {
                source: PathBuf::from("in/broken.eml"),
                reason: "Invalid email: message has no headers".to_string(),
            }],
            duplicates: vec![SimilarityPair {
                first: 0,
                second: 1,
                reason: "High text similarity".to_string(),
            }],
        }
    }

    #[test]
    fn test_batch_json_keys_duplicates_by_file() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_batch(&create_test_batch()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["duplicate_emails_detected"], true);
        assert_eq!(value["duplicates"][0]["email1"], "in/email1.eml");
        assert_eq!(value["duplicates"][0]["email2"], "in/email2.eml");
        assert_eq!(value["duplicates"][0]["reason"], "High text similarity");
        assert_eq!(value["emails"].as_array().unwrap().len(), 2);
        assert_eq!(value["emails"][1]["subject"], "Fwd: Fee");
        assert!(value["emails"][0]["extracted_data"].is_null());
        assert_eq!(value["failures"][0]["email"], "in/broken.eml");
    }

    #[test]
    fn test_batch_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_batch(&create_test_batch()).unwrap();
        assert!(output.contains("Request Type"));
        assert!(output.contains("High text similarity"));
        assert!(output.contains("✗ in/broken.eml"));
    }

    #[test]
    fn test_batch_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_batch(&create_test_batch()).unwrap();
        assert_eq!(output, "in/email1.eml\tFee Payment\nin/email2.eml\tFee Payment");
    }

    #[test]
    fn test_duplicates_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_duplicates(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value, serde_json::json!({"duplicate_emails_detected": false, "duplicates": []}));
    }

    #[test]
    fn test_duplicates_table_empty() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_duplicates(&[]).unwrap();
        assert!(output.contains("No duplicate emails detected"));
    }

    #[test]
    fn test_duplicates_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let pairs = create_test_batch().duplicates;
        assert_eq!(formatter.format_duplicates(&pairs).unwrap(), "0 1");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short\ntext"), "short text");
        let long = "x".repeat(100);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
    }
}
