//! Mailsift Domain Layer
//!
//! Core vocabulary of the email-triage pipeline. This crate has no external
//! dependencies and defines the value objects and trait interfaces that the
//! parser, LLM, triage, server and CLI layers depend upon.
//!
//! ## Key Concepts
//!
//! - **ParsedEmail**: sender, subject, plain-text body and saved attachments
//! - **Attachment**: a file written out of a MIME part, tagged by kind
//! - **EmailReport**: the triage outcome for one email
//! - **Request types**: the business categories an email is classified into
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure data and trait definitions only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod email;
pub mod report;
pub mod request_type;
pub mod traits;

// Re-exports for convenience
pub use email::{Attachment, AttachmentKind, ParsedEmail};
pub use report::EmailReport;
pub use request_type::{default_extract_fields, default_request_types, find_request_type};
pub use traits::{LlmProvider, LlmRequest};
