//! Mailsift Parser
//!
//! Turns raw `.eml` files into [`ParsedEmail`](mailsift_domain::ParsedEmail)
//! values and pulls plain text out of PDF and DOCX attachments.
//!
//! # Architecture
//!
//! ```text
//! .eml bytes → MIME parse → sender / subject / body
//!                         → attachments written to a caller-owned directory
//!                                      → PDF / DOCX text
//! ```
//!
//! The caller owns the attachment directory. The HTTP server hands in a
//! request-scoped temporary directory so concurrent requests never share files.

#![warn(missing_docs)]

mod document;
mod email;
mod error;

pub use document::{docx_xml_to_text, extract_attachment_text, extract_docx_text, extract_pdf_text};
pub use email::{parse_email, read_email};
pub use error::ParserError;
