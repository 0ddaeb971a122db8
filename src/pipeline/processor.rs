//! Ingestion boundary.
//!
//! Drives one uploaded file through route → payload check → extract →
//! transactional append. Every failure leaves the in-memory store and the
//! persisted blob exactly as they were.
//!
//! The text layer of PDF reports and the blob backend are injected as trait
//! objects so the whole path is testable without files or real PDFs.

use std::path::Path;

use serde::Serialize;

use crate::models::{Category, MetricRecord};
use crate::pipeline::extraction::{patterns, tabular, DocumentTextSource, ExtractionError, PdfTextExtractor};
use crate::pipeline::import::{check_payload, route, sanitize_filename, ImportError, Route, TabularFormat};
use crate::pipeline::storage::{BlobStore, FileBlobStore, HealthStore, StorageError};

/// Errors that can occur while ingesting a file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Summary of a completed ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub category: Category,
    pub file_name: String,
    pub records_added: usize,
    /// Date keys of the appended records, in extraction order.
    pub dates: Vec<String>,
}

impl IngestOutcome {
    pub fn status_message(&self) -> String {
        match self.records_added {
            0 => format!(
                "No {} data found in {}",
                self.category.label(),
                self.file_name
            ),
            1 => format!(
                "Added 1 {} record ({}) from {}",
                self.category.label(),
                self.dates.join(", "),
                self.file_name
            ),
            n => format!(
                "Added {n} {} records ({}) from {}",
                self.category.label(),
                self.dates.join(", "),
                self.file_name
            ),
        }
    }
}

pub struct Ingestor {
    store: HealthStore,
    blob: Box<dyn BlobStore + Send + Sync>,
    text_source: Box<dyn DocumentTextSource + Send + Sync>,
}

impl Ingestor {
    /// Build an ingestor over `blob`, restoring whatever state it holds.
    ///
    /// Fails when the blob cannot be read at all; absent or corrupt state
    /// starts an empty store.
    pub fn new(
        blob: Box<dyn BlobStore + Send + Sync>,
        text_source: Box<dyn DocumentTextSource + Send + Sync>,
    ) -> Result<Self, StorageError> {
        let store = HealthStore::restore(&*blob)?;
        Ok(Self {
            store,
            blob,
            text_source,
        })
    }

    /// File-backed ingestor with the PDF text extractor.
    pub fn open(data_dir: &Path) -> Result<Self, IngestError> {
        let blob = FileBlobStore::open(data_dir)?;
        Ok(Self::new(Box::new(blob), Box::new(PdfTextExtractor))?)
    }

    pub fn store(&self) -> &HealthStore {
        &self.store
    }

    /// Run the extractor selected by `route` over raw file bytes.
    pub fn extract(&self, route: Route, bytes: &[u8]) -> Result<Vec<MetricRecord>, ExtractionError> {
        match route {
            Route::Tabular(TabularFormat::Csv) => tabular::extract_csv(bytes),
            Route::Tabular(TabularFormat::Xlsx) => tabular::extract_xlsx(bytes),
            Route::Document(category) => {
                let text = self.text_source.extract_text(bytes)?;
                Ok(patterns::extract(category, &text)?.into_iter().collect())
            }
        }
    }

    /// Ingest one file's bytes under a declared category.
    ///
    /// On success the new records are both persisted and visible through
    /// [`Ingestor::store`]. An extraction that yields no records is a
    /// success with `records_added == 0` and writes nothing.
    pub fn ingest(
        &mut self,
        file_name: &str,
        category: &str,
        bytes: &[u8],
    ) -> Result<IngestOutcome, IngestError> {
        tracing::info!(file = %file_name, category, bytes = bytes.len(), "Ingestion started");

        let route = route(file_name, category)?;
        check_payload(file_name, bytes.len() as u64)?;

        let records = self.extract(route, bytes)?;
        let category = route.category();
        let dates: Vec<String> = records.iter().map(|r| r.date.clone()).collect();
        let records_added = records.len();

        if records_added > 0 {
            self.commit(category, records)?;
        }

        tracing::info!(
            file = %file_name,
            category = category.as_str(),
            records = records_added,
            route = route.as_str(),
            "Ingestion complete"
        );

        Ok(IngestOutcome {
            category,
            file_name: file_name.to_string(),
            records_added,
            dates,
        })
    }

    /// Read a file from disk and ingest it under its sanitized file name.
    pub fn ingest_path(&mut self, path: &Path, category: &str) -> Result<IngestOutcome, IngestError> {
        let file_name = sanitize_filename(&path.to_string_lossy());

        // Oversized files are rejected before they are read into memory.
        route(&file_name, category)?;
        let size = std::fs::metadata(path).map_err(ImportError::from)?.len();
        check_payload(&file_name, size)?;

        let bytes = std::fs::read(path).map_err(ImportError::from)?;
        self.ingest(&file_name, category, &bytes)
    }

    /// [`Ingestor::ingest`] reduced to the line shown to the user.
    pub fn ingest_with_status(&mut self, file_name: &str, category: &str, bytes: &[u8]) -> String {
        match self.ingest(file_name, category, bytes) {
            Ok(outcome) => outcome.status_message(),
            Err(e) => status_for_error(file_name, &e),
        }
    }

    /// Compute the next state, persist it, then swap it in.
    fn commit(&mut self, category: Category, records: Vec<MetricRecord>) -> Result<(), StorageError> {
        let next = self.store.with_appended(category, records);
        next.persist(&*self.blob)?;
        self.store = next;
        Ok(())
    }
}

pub fn status_for_error(file_name: &str, error: &IngestError) -> String {
    tracing::warn!(file = %file_name, error = %error, "Ingestion failed");
    format!("Could not import {file_name}: {error}")
}
