//! Document extraction
//!
//! A separate code path from the compositor: scrape text out of an
//! uploaded PDF, then ask a language model to pull structured fields out
//! of that text. Failures here are their own domain and surface with the
//! upstream message; they are never translated into the document-rendering
//! error taxonomy.

mod gemini;
mod pdf_text;

pub use gemini::FieldExtractor;
pub use pdf_text::{extract_pdf_text, ExtractedDocument};

use thiserror::Error;

/// Extraction error type
#[derive(Debug, Error)]
pub enum ExtractError {
    /// PDF parsing or text scraping failed
    #[error("PDF processing failed: {0}")]
    Pdf(String),

    /// The language model call failed
    #[error("AI extraction failed: {0}")]
    Api(String),

    /// The model answered with something that is not a JSON object
    #[error("Invalid response format: {0}")]
    Parse(String),

    /// No API key configured
    #[error("Extractor not configured: {0}")]
    NotConfigured(String),
}
