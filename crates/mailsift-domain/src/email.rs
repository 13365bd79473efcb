//! Parsed email and attachment model

use std::path::{Path, PathBuf};

/// Kind of an attachment, decided by its filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Portable Document Format (`.pdf`)
    Pdf,

    /// Office Open XML word document (`.docx`)
    Docx,

    /// Anything else; saved but never read for text
    Other,
}

impl AttachmentKind {
    /// Classify a filename by its extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => AttachmentKind::Pdf,
            Some("docx") => AttachmentKind::Docx,
            _ => AttachmentKind::Other,
        }
    }

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentKind::Pdf => "pdf",
            AttachmentKind::Docx => "docx",
            AttachmentKind::Other => "other",
        }
    }

    /// Whether text can be extracted from this kind
    pub fn has_text(&self) -> bool {
        !matches!(self, AttachmentKind::Other)
    }
}

/// An attachment that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename as declared in the MIME part (after sanitizing)
    pub filename: String,

    /// Location the contents were written to
    pub path: PathBuf,

    /// Kind derived from the filename
    pub kind: AttachmentKind,
}

impl Attachment {
    /// Create a new attachment record, deriving its kind from the filename
    pub fn new(filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let filename = filename.into();
        let kind = AttachmentKind::from_filename(&filename);
        Self {
            filename,
            path: path.into(),
            kind,
        }
    }
}

/// The parts of an email the triage pipeline cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEmail {
    /// Rendered `From` header, if present
    pub sender: Option<String>,

    /// `Subject` header, if present
    pub subject: Option<String>,

    /// First `text/plain` body part (empty when the email has none)
    pub body: String,

    /// Attachments written to disk, in MIME order
    pub attachments: Vec<Attachment>,
}

impl ParsedEmail {
    /// Attachments whose text can be extracted
    pub fn text_attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.kind.has_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(AttachmentKind::from_filename("invoice.pdf"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_filename("NOTICE.PDF"), AttachmentKind::Pdf);
        assert_eq!(AttachmentKind::from_filename("terms.docx"), AttachmentKind::Docx);
        assert_eq!(AttachmentKind::from_filename("terms.doc"), AttachmentKind::Other);
        assert_eq!(AttachmentKind::from_filename("README"), AttachmentKind::Other);
    }

    #[test]
    fn test_text_attachments_skips_other() {
        let email = ParsedEmail {
            attachments: vec![
                Attachment::new("a.pdf", "/tmp/a.pdf"),
                Attachment::new("b.png", "/tmp/b.png"),
                Attachment::new("c.docx", "/tmp/c.docx"),
            ],
            ..Default::default()
        };

        let names: Vec<_> = email.text_attachments().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "c.docx"]);
    }
}
