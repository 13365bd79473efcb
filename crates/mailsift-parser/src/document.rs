//! Attachment text extraction (PDF, DOCX)

use crate::error::ParserError;
use mailsift_domain::{Attachment, AttachmentKind};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::any::Any;
use std::fs::File;
use std::io::Read;
use std::panic;
use std::path::Path;
use tracing::{debug, warn};

/// Extract text from a PDF, page by page
///
/// Page texts are joined with a single space and the result is trimmed.
/// Pages with no extractable text are logged and skipped.
pub fn extract_pdf_text(path: impl AsRef<Path>) -> Result<String, ParserError> {
    let path = path.as_ref();
    // pdf-extract panics on some malformed documents (e.g. a page without a MediaBox)
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_by_pages(path))
        .map_err(|payload| ParserError::Pdf(format!("{}: {}", path.display(), panic_message(&*payload))))?
        .map_err(|e| ParserError::Pdf(format!("{}: {}", path.display(), e)))?;

    let mut text = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let page = page.trim();
        if page.is_empty() {
            warn!("No text from page {} in {}", idx + 1, path.display());
            continue;
        }
        text.push_str(page);
        text.push(' ');
    }

    debug!("Extracted {} chars from {} PDF page(s)", text.len(), pages.len());
    Ok(text.trim().to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("extraction panicked")
}

/// Extract text from a DOCX file's main document part
pub fn extract_docx_text(path: impl AsRef<Path>) -> Result<String, ParserError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ParserError::Docx(format!("{}: {}", path.display(), e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ParserError::Docx(format!("{}: {}", path.display(), e)))?
        .read_to_string(&mut xml)?;

    let text = docx_xml_to_text(&xml)?;
    debug!("Extracted {} chars from {}", text.len(), path.display());
    Ok(text)
}

/// Convert WordprocessingML to plain text
///
/// Paragraphs end with `\n`, `<w:tab/>` inside a run becomes `\t`, and `<w:br/>` /
/// `<w:cr/>` become `\n`. Only text inside `<w:t>` runs is kept.
pub fn docx_xml_to_text(xml: &str) -> Result<String, ParserError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // tab stops in <w:pPr><w:tabs> are also <w:tab/>
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let unescaped = t
                    .unescape()
                    .map_err(|e| ParserError::Docx(format!("bad text run: {}", e)))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParserError::Docx(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}

/// Extract text from an attachment according to its kind
///
/// Returns `Ok(None)` for kinds that carry no extractable text.
pub fn extract_attachment_text(attachment: &Attachment) -> Result<Option<String>, ParserError> {
    match attachment.kind {
        AttachmentKind::Pdf => extract_pdf_text(&attachment.path).map(Some),
        AttachmentKind::Docx => extract_docx_text(&attachment.path).map(Some),
        AttachmentKind::Other => Ok(None),
    }
}
