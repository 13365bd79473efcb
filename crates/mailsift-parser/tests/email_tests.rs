//! Integration tests for email parsing and attachment extraction

use mailsift_domain::AttachmentKind;
use mailsift_parser::{extract_attachment_text, extract_docx_text, parse_email, read_email, ParserError};
use std::fs::{self, File};
use std::io::Write;

const MULTIPART_EMAIL: &str = "From: Jane Agent <jane@bank.example>\r\n\
To: ops@bank.example\r\n\
Subject: Fee Payment for Alpha Fund\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
Please process the quarterly fee payment for Alpha Fund.\r\n\
--XYZ\r\n\
Content-Type: text/plain; name=\"notes.txt\"\r\n\
Content-Disposition: attachment; filename=\"notes.txt\"\r\n\
\r\n\
internal notes\r\n\
--XYZ\r\n\
Content-Type: application/octet-stream\r\n\
Content-Disposition: attachment; filename=\"../../escape.docx\"\r\n\
\r\n\
not really a docx\r\n\
--XYZ--\r\n";

const SIMPLE_EMAIL: &str = "From: ops@bank.example\r\n\
Subject: Closing Notice\r\n\
\r\n\
The facility closes on Friday.\r\n";

#[test]
fn test_parse_multipart_email() {
    let dir = tempfile::tempdir().unwrap();
    let email = parse_email(MULTIPART_EMAIL.as_bytes(), dir.path()).unwrap();

    assert_eq!(email.sender.as_deref(), Some("Jane Agent <jane@bank.example>"));
    assert_eq!(email.subject.as_deref(), Some("Fee Payment for Alpha Fund"));
    assert!(email.body.contains("quarterly fee payment"));
    assert!(!email.body.contains("internal notes"));

    assert_eq!(email.attachments.len(), 2);
    assert_eq!(email.attachments[0].filename, "notes.txt");
    assert_eq!(email.attachments[0].kind, AttachmentKind::Other);
    assert_eq!(email.attachments[1].filename, "escape.docx");
    assert_eq!(email.attachments[1].kind, AttachmentKind::Docx);

    // attachments land inside the target directory
    for attachment in &email.attachments {
        assert!(attachment.path.starts_with(dir.path()));
        assert!(attachment.path.exists());
    }
    let notes = fs::read_to_string(&email.attachments[0].path).unwrap();
    assert!(notes.contains("internal notes"));
}

#[test]
fn test_broken_attachment_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let email = parse_email(MULTIPART_EMAIL.as_bytes(), dir.path()).unwrap();

    let result = extract_attachment_text(&email.attachments[1]);
    assert!(matches!(result, Err(ParserError::Docx(_))));
}

#[test]
fn test_read_simple_email_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simple.eml");
    fs::write(&path, SIMPLE_EMAIL).unwrap();

    let email = read_email(&path, dir.path().join("attachments")).unwrap();
    assert_eq!(email.sender.as_deref(), Some("ops@bank.example"));
    assert_eq!(email.subject.as_deref(), Some("Closing Notice"));
    assert!(email.body.contains("closes on Friday"));
    assert!(email.attachments.is_empty());
    // no attachments, so the directory is never created
    assert!(!dir.path().join("attachments").exists());
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_email(dir.path().join("nope.eml"), dir.path());
    assert!(matches!(result, Err(ParserError::Io(_))));
}

#[test]
fn test_extract_docx_from_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("terms.docx");

    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(
            br#"<w:document><w:body><w:p><w:r><w:t>Expiration Date: 2025-06-30</w:t></w:r></w:p></w:body></w:document>"#,
        )
        .unwrap();
    writer.finish().unwrap();

    let text = extract_docx_text(&path).unwrap();
    assert_eq!(text, "Expiration Date: 2025-06-30");
}

#[test]
fn test_docx_without_document_part() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.docx");

    let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
    writer
        .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<w:styles/>").unwrap();
    writer.finish().unwrap();

    assert!(matches!(extract_docx_text(&path), Err(ParserError::Docx(_))));
}
