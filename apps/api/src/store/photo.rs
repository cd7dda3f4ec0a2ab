//! Profile photo intake: uploaded images become data URLs, linked images are
//! stored as given.

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Url;
use thiserror::Error;

/// Largest accepted upload request, multipart framing included.
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum PhotoError {
    #[error("Please upload an image file (got '{0}')")]
    NotAnImage(String),

    #[error("Uploaded image is empty")]
    Empty,

    #[error("Photo URL must be an http(s) link or an image data URL")]
    InvalidUrl,
}

/// Encodes an uploaded image as `data:<type>;base64,<payload>`.
/// Anything whose media type is not `image/*` is refused.
pub fn to_data_url(content_type: Option<&str>, bytes: &[u8]) -> Result<String, PhotoError> {
    let content_type = content_type.unwrap_or_default().trim();
    if !content_type.starts_with("image/") {
        return Err(PhotoError::NotAnImage(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    Ok(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}

/// Accepts an `http`/`https` link or an inline `data:image/...` URL.
pub fn validate_url(url: &str) -> Result<String, PhotoError> {
    let url = url.trim();
    if url.starts_with("data:image/") {
        return Ok(url.to_string());
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.to_string()),
        _ => Err(PhotoError::InvalidUrl),
    }
}
