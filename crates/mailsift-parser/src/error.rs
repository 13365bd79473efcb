//! Error types for the parser

use thiserror::Error;

/// Errors that can occur while reading emails or attachments
#[derive(Error, Debug)]
pub enum ParserError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a parseable MIME message
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// PDF text extraction failed
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// DOCX text extraction failed
    #[error("DOCX extraction error: {0}")]
    Docx(String),
}
