use super::ExtractionError;

/// Turns a report's bytes into its plain text layer.
///
/// The pattern extractor only ever sees the string this returns, so tests
/// and alternative backends plug in here.
pub trait DocumentTextSource {
    fn extract_text(&self, document_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Text source that ignores its input and returns fixed text.
/// Useful for feeding already-extracted report text through the pipeline.
pub struct StaticTextSource(pub String);

impl DocumentTextSource for StaticTextSource {
    fn extract_text(&self, _document_bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.0.clone())
    }
}
