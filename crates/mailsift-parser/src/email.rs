//! `.eml` parsing and attachment saving

use crate::error::ParserError;
use mail_parser::{Message, MessageParser, MimeHeaders};
use mailsift_domain::{Attachment, ParsedEmail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read and parse an `.eml` file, saving attachments into `attachment_dir`
pub fn read_email(path: impl AsRef<Path>, attachment_dir: impl AsRef<Path>) -> Result<ParsedEmail, ParserError> {
    let path = path.as_ref();
    debug!("Reading email from {}", path.display());

    let raw = fs::read(path)?;
    parse_email(&raw, attachment_dir)
}

/// Parse raw MIME bytes, saving attachments into `attachment_dir`
///
/// The body is the first text body of the message. When the message has only
/// an HTML body, its text rendering is used. Attachments without a filename
/// are skipped.
pub fn parse_email(raw: &[u8], attachment_dir: impl AsRef<Path>) -> Result<ParsedEmail, ParserError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| ParserError::InvalidEmail("not a MIME message".to_string()))?;

    if message.headers().is_empty() {
        return Err(ParserError::InvalidEmail("message has no headers".to_string()));
    }

    let sender = render_sender(&message);
    let subject = message.subject().map(str::to_string);
    let body = message
        .body_text(0)
        .map(|text| text.into_owned())
        .unwrap_or_default();

    let attachments = save_attachments(&message, attachment_dir.as_ref())?;

    info!(
        "Parsed email {:?} from {:?} with {} attachment(s)",
        subject.as_deref().unwrap_or(""),
        sender.as_deref().unwrap_or(""),
        attachments.len()
    );

    Ok(ParsedEmail {
        sender,
        subject,
        body,
        attachments,
    })
}

/// Render the first `From` address as `Name <address>`
fn render_sender(message: &Message<'_>) -> Option<String> {
    let addr = message.from()?.first()?;
    match (addr.name(), addr.address()) {
        (Some(name), Some(address)) => Some(format!("{} <{}>", name, address)),
        (None, Some(address)) => Some(address.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

fn save_attachments(message: &Message<'_>, dir: &Path) -> Result<Vec<Attachment>, ParserError> {
    let mut saved = Vec::new();

    for part in message.attachments() {
        let Some(declared) = part.attachment_name() else {
            debug!("Skipping attachment without a filename");
            continue;
        };

        let Some(filename) = sanitize_filename(declared) else {
            warn!("Skipping attachment with unusable filename {:?}", declared);
            continue;
        };

        if saved.is_empty() {
            fs::create_dir_all(dir)?;
        }

        let path = unique_path(dir, &filename);
        fs::write(&path, part.contents())?;
        debug!("Saved attachment {} ({} bytes)", path.display(), part.contents().len());

        saved.push(Attachment::new(filename, path));
    }

    Ok(saved)
}

/// Strip directory components so a filename cannot escape the target directory
fn sanitize_filename(declared: &str) -> Option<String> {
    let normalized = declared.replace('\\', "/");
    let name = Path::new(&normalized).file_name()?.to_str()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Pick `dir/name`, or `dir/stem (n).ext` when that already exists
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(filename);
    let stem = as_path.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    let extension = as_path.extension().and_then(|e| e.to_str());

    (1..)
        .map(|n| match extension {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
