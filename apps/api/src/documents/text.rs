//! PDF → plain text.
//!
//! `pdf_extract` is synchronous and CPU-bound, so extraction runs inside
//! `tokio::task::spawn_blocking` against a temp file.

use std::io::Write;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not stage PDF for extraction: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_to_text(&bytes)).await??;

        if text.trim().is_empty() {
            warn!("PDF of {size} bytes yielded no text");
        } else {
            info!("Extracted {} chars from PDF of {size} bytes", text.len());
        }
        Ok(text)
    }
}

/// Synchronous extraction; runs inside `spawn_blocking`.
fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut staged = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    staged.write_all(bytes)?;
    staged.flush()?;

    pdf_extract::extract_text(staged.path()).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_an_error() {
        let result = PdfTextExtractor
            .extract_text(Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert!(result.is_err());
    }
}
