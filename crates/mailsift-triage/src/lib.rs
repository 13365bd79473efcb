//! Mailsift Triage
//!
//! Turns an `.eml` file into an [`EmailReport`](mailsift_domain::EmailReport)
//! using an LLM, and flags near-duplicate emails within a batch.
//!
//! # Architecture
//!
//! ```text
//! .eml → Parser → body + attachment text → LLM classify → LLM intent
//!                                         → request type → LLM extract → EmailReport
//! batch of EmailReports → DuplicateDetector → duplicate pairs
//! ```
//!
//! Classification failure fails the email. Intent detection and field
//! extraction failures are logged and leave the matching report field empty.
//!
//! # Example Usage
//!
//! ```no_run
//! use mailsift_llm::MockProvider;
//! use mailsift_triage::{Triage, TriageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let triage = Triage::new(MockProvider::new("Fee Payment"), TriageConfig::default());
//! let report = triage.process_email("inbox/email1.eml", "attachments/email1").await?;
//!
//! println!("Request type: {:?}", report.request_type);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod prompt;
mod triage;
mod types;

pub use config::TriageConfig;
pub use error::TriageError;
pub use triage::{compose_email_text, Triage};
pub use types::{BatchEntry, BatchFailure, BatchReport};
