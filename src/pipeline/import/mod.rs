pub mod format;

pub use format::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: '{file_name}' cannot be imported as '{category}' (expected {expected})")]
    UnsupportedFormat {
        file_name: String,
        category: String,
        expected: String,
    },

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb}MB limit")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("File is empty: {0}")]
    EmptyFile(String),
}
