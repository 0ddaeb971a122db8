//! Command handlers behind the `healthlog` binary.
//!
//! Each handler resolves its own state from a [`Context`], prints to stdout
//! (a table or, with `--json`, a JSON document) and returns a
//! [`CommandError`] for the binary to report.

pub mod export;
pub mod import;
pub mod report;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::{self, ConfigError};
use crate::models::{Category, Metric, UnknownVariant};
use crate::pipeline::processor::IngestError;
use crate::pipeline::storage::{FileBlobStore, HealthStore, StorageError};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Carries the user-facing status line for the failed ingestion.
    #[error("{status}")]
    Ingest {
        status: String,
        #[source]
        source: IngestError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownName(#[from] UnknownVariant),

    #[error("'{metric}' is not a {category} metric (expected one of {expected})")]
    MetricCategory {
        metric: Metric,
        category: Category,
        expected: String,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn new(data_dir: Option<PathBuf>, json: bool) -> Result<Self, CommandError> {
        let data_dir = config::resolve_data_dir(data_dir)?;
        tracing::debug!(data_dir = %data_dir.display(), "Data directory resolved");
        Ok(Self { data_dir, json })
    }

    /// Current persisted state (empty when nothing was ingested yet).
    pub fn load_store(&self) -> Result<HealthStore, CommandError> {
        let blob = FileBlobStore::open(&self.data_dir)?;
        Ok(HealthStore::restore(&blob)?)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
