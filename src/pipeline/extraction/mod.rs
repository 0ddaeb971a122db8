pub mod types;
pub mod sanitize;
pub mod pdf;
pub mod tabular;
pub mod patterns;

pub use types::*;
pub use sanitize::*;
pub use pdf::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The tabular reader could not make sense of the file at all.
    #[error("Could not parse lab file: {0}")]
    Parse(String),

    /// A mandatory field was not located in the report text.
    #[error("{0} not found")]
    MissingField(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
