//! PDF text scraping
//!
//! Pulls the raw text and page count out of an uploaded PDF. Blocking CPU
//! work; callers run it through `spawn_blocking`.

use lopdf::Document;

use super::ExtractError;

/// Scraped document content
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: usize,
}

/// Extract all text from an in-memory PDF.
///
/// A parseable PDF with no text at all is an error: it is almost certainly
/// a scanned document the text pipeline cannot serve.
pub fn extract_pdf_text(data: &[u8]) -> Result<ExtractedDocument, ExtractError> {
    let document = Document::load_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let pages = page_numbers.len();

    let text = document
        .extract_text(&page_numbers)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractError::Pdf(
            "No text found in PDF. This might be a scanned document.".to_string(),
        ));
    }

    Ok(ExtractedDocument { text, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a one-page PDF with a single text run.
    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn extracts_text_and_page_count() {
        let pdf = sample_pdf("Invoice No 12345");
        let extracted = extract_pdf_text(&pdf).unwrap();
        assert_eq!(extracted.pages, 1);
        assert!(extracted.text.contains("Invoice No 12345"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let result = extract_pdf_text(b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }
}
