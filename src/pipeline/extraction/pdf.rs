use std::panic;

use super::sanitize::flatten_text;
use super::types::DocumentTextSource;
use super::ExtractionError;

/// How far into the file the `%PDF-` marker may appear. Readers accept a
/// short preamble before the header.
const HEADER_SCAN_LEN: usize = 1024;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned reports yield
/// little or no text and fail later at the mandatory-field check.
pub struct PdfTextExtractor;

impl DocumentTextSource for PdfTextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        if !has_pdf_header(pdf_bytes) {
            return Err(ExtractionError::PdfParsing(
                "no PDF header in the first 1 KiB".into(),
            ));
        }

        // pdf-extract panics on some malformed pages (e.g. a font missing
        // from the page resources).
        let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes))
            .map_err(|_| {
                tracing::warn!(bytes = pdf_bytes.len(), "PDF text extraction panicked");
                ExtractionError::PdfParsing("malformed PDF content".into())
            })?
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        tracing::debug!(
            bytes = pdf_bytes.len(),
            chars = text.len(),
            "Extracted PDF text layer"
        );

        Ok(flatten_text(&text))
    }
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(HEADER_SCAN_LEN)]
        .windows(5)
        .any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    use lopdf::dictionary;
    use lopdf::{Dictionary, Document, Object, Stream};

    /// Page resources for the generated test PDF.
    enum Resources {
        Helvetica,
        Empty,
        Missing,
    }

    /// Generate a valid PDF with text using lopdf (the library that pdf-extract uses internally).
    fn make_test_pdf(text: &str) -> Vec<u8> {
        make_pdf(text, Resources::Helvetica)
    }

    /// One-page PDF whose content draws `text` with font `/F1`.
    fn make_pdf(text: &str, resources: Resources) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(content_stream);

        let mut page = dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        };
        match resources {
            Resources::Helvetica => {
                let font_id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => "Helvetica",
                });
                page.set(
                    "Resources",
                    dictionary! {
                        "Font" => dictionary! {
                            "F1" => font_id,
                        },
                    },
                );
            }
            Resources::Empty => page.set("Resources", Dictionary::new()),
            Resources::Missing => {}
        }
        let page_id = doc.add_object(page);

        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });

        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });

        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let pdf_bytes = make_test_pdf("Max Values VO2 47.3");
        let text = PdfTextExtractor.extract_text(&pdf_bytes).unwrap();
        assert!(
            text.contains("VO2") || text.contains("47.3"),
            "Expected text to contain the report line, got: {text}"
        );
    }

    #[test]
    fn extracted_text_is_flattened() {
        let pdf_bytes = make_test_pdf("Resting HR 58");
        let text = PdfTextExtractor.extract_text(&pdf_bytes).unwrap();
        assert!(!text.contains('\n'));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn non_pdf_returns_error() {
        let result = PdfTextExtractor.extract_text(b"not a pdf");
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))));
    }

    #[test]
    fn font_without_page_resources_is_parse_error() {
        let pdf_bytes = make_pdf("Resting HR 58", Resources::Missing);
        let result = PdfTextExtractor.extract_text(&pdf_bytes);
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))), "{result:?}");
    }

    #[test]
    fn font_missing_from_empty_resources_is_parse_error() {
        let pdf_bytes = make_pdf("Resting HR 58", Resources::Empty);
        let result = PdfTextExtractor.extract_text(&pdf_bytes);
        assert!(matches!(result, Err(ExtractionError::PdfParsing(_))), "{result:?}");
    }

    #[test]
    fn header_found_after_preamble() {
        let mut bytes = b"\r\n\x00junk before header\n".to_vec();
        bytes.extend_from_slice(b"%PDF-1.4\n");
        assert!(has_pdf_header(&bytes));
        assert!(has_pdf_header(b"%PDF-1.7"));
    }

    #[test]
    fn header_beyond_scan_window_is_rejected() {
        let mut bytes = vec![b' '; HEADER_SCAN_LEN];
        bytes.extend_from_slice(b"%PDF-1.4");
        assert!(!has_pdf_header(&bytes));
        assert!(!has_pdf_header(b"%PD"));
    }

    #[test]
    fn preamble_does_not_trip_header_check() {
        let mut bytes = b"\r\n".to_vec();
        bytes.extend_from_slice(&make_test_pdf("Max Values VO2 47.3"));
        match PdfTextExtractor.extract_text(&bytes) {
            Ok(_) => {}
            Err(ExtractionError::PdfParsing(msg)) => assert!(!msg.contains("PDF header"), "{msg}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
