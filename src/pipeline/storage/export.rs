use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::store::HealthStore;
use super::StorageError;

#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: String,
    pub records: usize,
    pub bytes: usize,
}

/// `health-metrics-<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("health-metrics-{}.json", date.format("%Y-%m-%d"))
}

/// Write the whole store, pretty-printed, into `dir` under today's
/// (local) export name. An existing export from the same day is replaced.
pub fn export_to(store: &HealthStore, dir: &Path) -> Result<ExportResult, StorageError> {
    export_dated(store, dir, Local::now().date_naive())
}

pub fn export_dated(
    store: &HealthStore,
    dir: &Path,
    date: NaiveDate,
) -> Result<ExportResult, StorageError> {
    std::fs::create_dir_all(dir)?;

    let path: PathBuf = dir.join(export_file_name(date));
    let json = store.to_json_pretty()?;
    std::fs::write(&path, &json)?;

    tracing::info!(
        path = %path.display(),
        records = store.record_count(),
        "Health data exported"
    );

    Ok(ExportResult {
        path: path.to_string_lossy().into_owned(),
        records: store.record_count(),
        bytes: json.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Metric, MetricRecord};

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "health-metrics-2024-03-07.json");
    }

    #[test]
    fn export_writes_pretty_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HealthStore::new();
        store.append(
            Category::Labs,
            vec![MetricRecord::new("2024-01").with(Metric::Hdl, 55.0)],
        );

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let result = export_dated(&store, dir.path(), date).unwrap();

        let expected = dir.path().join("health-metrics-2024-05-01.json");
        assert_eq!(result.path, expected.to_string_lossy());
        assert_eq!(result.records, 1);

        let written = std::fs::read_to_string(&expected).unwrap();
        assert!(written.contains('\n'));
        assert_eq!(written.len(), result.bytes);
        assert_eq!(HealthStore::from_json(written.as_bytes()).unwrap(), store);
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let result = export_to(&HealthStore::new(), &target).unwrap();
        assert!(Path::new(&result.path).exists());
        assert_eq!(result.records, 0);
    }
}
