use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImportError;
use crate::config::MAX_FILE_SIZE;
use crate::models::Category;

/// Spreadsheet flavours the lab extractor reads
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

/// Which extractor an upload is dispatched to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Route {
    /// Wide lab panel (metrics as rows, draw dates as columns).
    Tabular(TabularFormat),
    /// Free-text report run through the pattern table for this category.
    Document(Category),
}

impl Route {
    /// Category the extracted records are appended to.
    pub fn category(&self) -> Category {
        match self {
            Self::Tabular(_) => Category::Labs,
            Self::Document(category) => *category,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tabular(TabularFormat::Csv) => "tabular_csv",
            Self::Tabular(TabularFormat::Xlsx) => "tabular_xlsx",
            Self::Document(_) => "document_pdf",
        }
    }
}

/// Select an extractor from the declared category and the file name.
///
/// The extension is the only thing inspected; content is never sniffed here.
/// Any category/extension combination outside the table is rejected before
/// an extractor can run.
pub fn route(file_name: &str, declared_category: &str) -> Result<Route, ImportError> {
    let unsupported = |expected: &str| ImportError::UnsupportedFormat {
        file_name: file_name.to_string(),
        category: declared_category.to_string(),
        expected: expected.to_string(),
    };

    let Ok(category) = declared_category.parse::<Category>() else {
        return Err(unsupported("a category of labs, dexa or vo2max"));
    };

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match (category, extension.as_deref()) {
        (Category::Labs, Some("csv")) => Ok(Route::Tabular(TabularFormat::Csv)),
        (Category::Labs, Some("xlsx")) => Ok(Route::Tabular(TabularFormat::Xlsx)),
        (Category::Labs, _) => Err(unsupported(".csv or .xlsx")),
        (Category::Dexa | Category::Vo2max, Some("pdf")) => Ok(Route::Document(category)),
        (Category::Dexa | Category::Vo2max, _) => Err(unsupported(".pdf")),
    }
}

/// Reject empty and oversized payloads before they reach an extractor.
pub fn check_payload(file_name: &str, size_bytes: u64) -> Result<(), ImportError> {
    if size_bytes == 0 {
        return Err(ImportError::EmptyFile(file_name.to_string()));
    }
    if size_bytes > MAX_FILE_SIZE {
        return Err(ImportError::FileTooLarge {
            size_mb: size_bytes as f64 / (1024.0 * 1024.0),
            max_mb: MAX_FILE_SIZE / (1024 * 1024),
        });
    }
    Ok(())
}

/// Sanitize a filename: strip path components, limit length
pub fn sanitize_filename(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    let clean: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .take(255)
        .collect();

    if clean.is_empty() {
        "document".to_string()
    } else {
        clean
    }
}
