//! PDF export of the rendered resume.
//!
//! Rasterisation is delegated to a `PdfExporter`; this module only decides what is
//! handed over (the HTML document, its capture target and page frame) and what the
//! download is called.

pub mod handlers;
pub mod pdf;

use thiserror::Error;

pub use pdf::{CommandPdfExporter, ExportJob, PdfExporter, UnconfiguredExporter};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF export is not configured (set PDF_RENDER_COMMAND)")]
    NotConfigured,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF command failed ({status}): {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("PDF command timed out after {0}s")]
    Timeout(u64),

    #[error("PDF command produced no output")]
    EmptyOutput,
}

/// `resume-<full name>.pdf`, or `resume-builder.pdf` when the name is blank.
/// Path separators and other filename-hostile characters become `_`.
pub fn export_filename(full_name: &str) -> String {
    let name = full_name.trim();
    let name = if name.is_empty() { "builder" } else { name };
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("resume-{cleaned}.pdf")
}

/// `Content-Disposition` value with an ASCII fallback and the RFC 5987 UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Ada Lovelace"), "resume-Ada Lovelace.pdf");
        assert_eq!(export_filename(""), "resume-builder.pdf");
        assert_eq!(export_filename("   "), "resume-builder.pdf");
        assert_eq!(export_filename("a/b\\c"), "resume-a_b_c.pdf");
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        let value = content_disposition("resume-José.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"resume-Jos_.pdf\"; filename*=UTF-8''resume-Jos%C3%A9.pdf"
        );
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
    }
}
