//! Core triage pipeline

use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::prompt;
use crate::types::{BatchEntry, BatchFailure, BatchReport};
use mailsift_dedup::{DuplicateDetector, SimilarityPair};
use mailsift_domain::{find_request_type, EmailReport, LlmProvider, LlmRequest, ParsedEmail};
use mailsift_parser::{extract_attachment_text, parse_email};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs emails through parsing, LLM classification, intent detection and
/// field extraction
pub struct Triage<L> {
    llm: L,
    config: TriageConfig,
    detector: DuplicateDetector,
}

impl<L> Triage<L>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    /// Create a new pipeline
    pub fn new(llm: L, config: TriageConfig) -> Self {
        let detector = DuplicateDetector::new().with_threshold(config.duplicate_threshold);
        Self { llm, config, detector }
    }

    /// Active configuration
    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Model answering LLM calls
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Classify `text` into one of the configured request types
    ///
    /// Returns the raw LLM answer (request type, sub-request type, reasoning
    /// and confidence).
    pub async fn classify(&self, text: &str) -> Result<String, TriageError> {
        let request = prompt::classification(text, &self.config.request_types);
        let classification = self.call_llm("classification", &request).await?;
        if classification.trim().is_empty() {
            return Err(TriageError::EmptyClassification);
        }
        Ok(classification)
    }

    /// Describe the primary intent of `text`
    pub async fn detect_intent(&self, text: &str) -> Result<String, TriageError> {
        self.call_llm("intent detection", &prompt::primary_intent(text)).await
    }

    /// Extract the configured fields from `text`
    pub async fn extract_fields(&self, text: &str, request_type: &str) -> Result<String, TriageError> {
        let request = prompt::extraction(text, request_type, &self.config.extract_fields);
        self.call_llm("field extraction", &request).await
    }

    /// Read and triage an `.eml` file
    ///
    /// Attachments are written under `attachment_dir`.
    pub async fn process_email(
        &self,
        path: impl AsRef<Path>,
        attachment_dir: impl AsRef<Path>,
    ) -> Result<EmailReport, TriageError> {
        let path = path.as_ref();
        debug!("Reading email from {}", path.display());
        let raw = tokio::fs::read(path).await.map_err(mailsift_parser::ParserError::from)?;
        self.process_email_bytes(raw, attachment_dir).await
    }

    /// Triage raw MIME bytes
    pub async fn process_email_bytes(
        &self,
        raw: Vec<u8>,
        attachment_dir: impl AsRef<Path>,
    ) -> Result<EmailReport, TriageError> {
        let attachment_dir = attachment_dir.as_ref().to_path_buf();

        // PDF extraction is CPU-bound and may panic on malformed input.
        let (parsed, email_text) = tokio::task::spawn_blocking(move || {
            let parsed = parse_email(&raw, &attachment_dir)?;
            let text = compose_email_text(&parsed);
            Ok::<_, TriageError>((parsed, text))
        })
        .await??;

        self.triage_parsed(parsed, email_text).await
    }

    async fn triage_parsed(&self, parsed: ParsedEmail, email_text: String) -> Result<EmailReport, TriageError> {
        let length = email_text.chars().count();
        if length > self.config.max_text_length {
            return Err(TriageError::TextTooLong(length, self.config.max_text_length));
        }

        info!(
            "Triaging email {:?} ({} chars)",
            parsed.subject.as_deref().unwrap_or(""),
            length
        );

        let classification = self.classify(&email_text).await?;

        let primary_intent = match self.detect_intent(&email_text).await {
            Ok(intent) => Some(intent),
            Err(e) => {
                warn!("Primary intent unavailable: {}", e);
                None
            }
        };

        let request_type =
            find_request_type(&classification, &self.config.request_types).map(str::to_string);
        if request_type.is_none() {
            debug!("Classification names no configured request type");
        }

        let extraction_target = request_type.as_deref().unwrap_or(&classification);
        let extracted_data = match self.extract_fields(&email_text, extraction_target).await {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Field extraction unavailable: {}", e);
                None
            }
        };

        info!("Triage complete, request type {:?}", request_type.as_deref().unwrap_or("unknown"));

        Ok(EmailReport {
            sender: parsed.sender,
            subject: parsed.subject,
            classification,
            request_type,
            primary_intent,
            extracted_data,
            email_text,
        })
    }

    /// Triage several files, then look for near-duplicates among them
    ///
    /// Each file's attachments go to their own sub-directory of
    /// `attachment_root`. A file that fails is recorded in
    /// [`BatchReport::failures`] and does not stop the batch.
    pub async fn process_batch(&self, paths: &[PathBuf], attachment_root: impl AsRef<Path>) -> BatchReport {
        let attachment_root = attachment_root.as_ref();
        let mut report = BatchReport::default();

        for (idx, path) in paths.iter().enumerate() {
            debug!("Processing email {}/{}", idx + 1, paths.len());
            let attachment_dir = attachment_root.join(batch_subdir(idx, path));

            match self.process_email(path, &attachment_dir).await {
                Ok(email) => report.entries.push(BatchEntry {
                    source: path.clone(),
                    report: email,
                }),
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    report.failures.push(BatchFailure {
                        source: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let texts: Vec<&str> = report.entries.iter().map(|e| e.report.email_text.as_str()).collect();
        report.duplicates = self.detect_duplicates(&texts);

        info!(
            "Batch complete: {} processed, {} failed, {} duplicate pair(s)",
            report.entries.len(),
            report.failures.len(),
            report.duplicates.len()
        );
        report
    }

    /// Near-duplicate pairs among `texts` at the configured threshold
    pub fn detect_duplicates<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SimilarityPair> {
        self.detector.detect(texts)
    }

    async fn call_llm(&self, stage: &'static str, request: &LlmRequest) -> Result<String, TriageError> {
        debug!("{} prompt length: {} chars", stage, request.prompt.len());

        let response = timeout(self.config.llm_timeout(), self.llm.generate(request))
            .await
            .map_err(|_| TriageError::Timeout(stage))?
            .map_err(|e| TriageError::Llm {
                stage,
                message: e.to_string(),
            })?;

        debug!("{} response length: {} chars", stage, response.len());
        Ok(response)
    }
}

/// Body followed by the text of each PDF/DOCX attachment
///
/// Each attachment's text is appended after a single space. Attachments that
/// fail to extract are logged and skipped.
pub fn compose_email_text(email: &ParsedEmail) -> String {
    let mut text = email.body.clone();

    for attachment in email.text_attachments() {
        match extract_attachment_text(attachment) {
            Ok(Some(extracted)) => {
                text.push(' ');
                text.push_str(&extracted);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping attachment {}: {}", attachment.filename, e),
        }
    }

    text
}

fn batch_subdir(idx: usize, path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("email");
    format!("{:03}-{}", idx, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsift_domain::Attachment;
    use mailsift_llm::MockProvider;

    #[test]
    fn test_compose_without_attachments() {
        let email = ParsedEmail {
            body: "Hello there".to_string(),
            ..ParsedEmail::default()
        };
        assert_eq!(compose_email_text(&email), "Hello there");
    }

    #[test]
    fn test_compose_skips_unreadable_and_other_attachments() {
        let email = ParsedEmail {
            body: "Body".to_string(),
            attachments: vec![
                Attachment::new("missing.pdf", "/nonexistent/missing.pdf"),
                Attachment::new("photo.png", "/nonexistent/photo.png"),
            ],
            ..ParsedEmail::default()
        };
        assert_eq!(compose_email_text(&email), "Body");
    }

    #[test]
    fn test_batch_subdir() {
        assert_eq!(batch_subdir(3, Path::new("/in/email1.eml")), "003-email1");
        assert_eq!(batch_subdir(0, Path::new("/")), "000-email");
    }

    #[tokio::test]
    async fn test_text_too_long() {
        let config = TriageConfig {
            max_text_length: 5,
            ..TriageConfig::default()
        };
        let triage = Triage::new(MockProvider::default(), config);
        let email = ParsedEmail::default();

        let result = triage.triage_parsed(email, "abcdefgh".to_string()).await;
        assert!(matches!(result, Err(TriageError::TextTooLong(8, 5))));
    }

    #[tokio::test]
    async fn test_empty_classification_is_fatal() {
        let triage = Triage::new(MockProvider::new("   "), TriageConfig::default());
        let result = triage.classify("text").await;
        assert!(matches!(result, Err(TriageError::EmptyClassification)));
    }
}
