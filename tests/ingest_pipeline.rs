use std::sync::Arc;

use healthlog::config::STORE_KEY;
use healthlog::models::{Category, Metric};
use healthlog::pipeline::extraction::{DocumentTextSource, ExtractionError};
use healthlog::pipeline::processor::{IngestError, Ingestor};
use healthlog::pipeline::storage::{BlobStore, FileBlobStore, HealthStore, MemoryBlobStore};
use healthlog::trends::{format_trend, trend};

/// Treats the payload bytes as the report's text layer.
struct ScriptedReports;

impl DocumentTextSource for ScriptedReports {
    fn extract_text(&self, document_bytes: &[u8]) -> Result<String, ExtractionError> {
        String::from_utf8(document_bytes.to_vec())
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }
}

const LABS_2023: &str = ",1/15/2023,6/20/2023\n\
    Cholesterol S/P,201,195\n\
    Triglycerides,150,140\n\
    LDL,130,121\n\
    HDL,48,51\n\
    Glucose,99,97\n\
    HGB A1C,5.8,5.7\n\
    Sodium,140,139\n";

const LABS_2024: &str = ",1/10/24\nCholesterol S/P,180\nLDL,108\nHGB A1C,5.5\n";

const DEXA_TEXT: &str = "DXA Body Composition Measured: 02/03/2024\n\
    Total Body Fat % 22.0 Lean Tissue (lbs) 140.0 Fat Tissue (lbs) 40.0\n\
    Visceral Fat Area (cm²): 80.5 T-Score 0.3";

const DEXA_TEXT_LATER: &str = "Measured: 08/03/2024 Total Body Fat % 19.8";

const VO2_TEXT: &str = "CPET 03/09/2024 Max Values VO2 (ml/kg/min) 44.0 HR max 181 Resting HR 52";

fn memory_ingestor() -> (Ingestor, Arc<MemoryBlobStore>) {
    let blob = Arc::new(MemoryBlobStore::new());
    let ingestor = Ingestor::new(Box::new(Arc::clone(&blob)), Box::new(ScriptedReports)).unwrap();
    (ingestor, blob)
}

#[test]
fn mixed_sources_build_one_longitudinal_record() {
    let (mut ingestor, blob) = memory_ingestor();

    ingestor.ingest("labs-2024.csv", "labs", LABS_2024.as_bytes()).unwrap();
    ingestor.ingest("labs-2023.CSV", "labs", LABS_2023.as_bytes()).unwrap();
    ingestor.ingest("dexa.pdf", "dexa", DEXA_TEXT.as_bytes()).unwrap();
    ingestor.ingest("dexa-2.pdf", "dexa", DEXA_TEXT_LATER.as_bytes()).unwrap();
    ingestor.ingest("cpet.pdf", "vo2max", VO2_TEXT.as_bytes()).unwrap();

    let store = ingestor.store();
    let lab_dates: Vec<&str> = store.labs.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(lab_dates, ["2023-01", "2023-06", "2024-01"]);
    assert_eq!(store.labs[0].metric_count(), 6);
    assert_eq!(store.labs[2].get(Metric::Hdl), None);

    assert_eq!(store.dexa.len(), 2);
    let lean = store.dexa[0].get(Metric::LeanMass).unwrap();
    assert!((lean - 140.0 / 2.205).abs() < 1e-9);

    assert_eq!(store.vo2max[0].get(Metric::RestingHr), Some(52.0));

    // LDL 121 -> 108
    assert_eq!(trend(&store.labs, Metric::Ldl), -10.7);
    assert_eq!(trend(&store.dexa, Metric::BodyFat), -10.0);
    assert!(trend(&store.dexa, Metric::LeanMass).is_nan());
    assert_eq!(trend(&store.vo2max, Metric::Vo2max), 0.0);
    assert_eq!(format_trend(trend(&store.labs, Metric::Ldl)), "10.7%");

    let persisted = HealthStore::from_json(&blob.read(STORE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(&persisted, store);
}

#[test]
fn failed_ingestion_changes_nothing() {
    let (mut ingestor, blob) = memory_ingestor();
    ingestor.ingest("labs.csv", "labs", LABS_2024.as_bytes()).unwrap();
    let before = blob.read(STORE_KEY).unwrap();

    let failures = [
        ("cpet.pdf", "vo2max", "03/09/2024 HR max 181"),
        ("dexa.pdf", "dexa", "Total Body Fat % 20"),
        ("labs.txt", "labs", "anything"),
        ("labs.pdf", "labs", "anything"),
        ("labs.csv", "lipids", "anything"),
    ];
    for (name, category, body) in failures {
        let err = ingestor.ingest(name, category, body.as_bytes()).unwrap_err();
        assert!(
            matches!(err, IngestError::Import(_) | IngestError::Extraction(_)),
            "{name}: {err}"
        );
    }

    assert_eq!(ingestor.store().record_count(), 1);
    assert_eq!(blob.read(STORE_KEY).unwrap(), before);
}

#[test]
fn file_backed_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let blob = FileBlobStore::open(dir.path()).unwrap();
        let mut ingestor = Ingestor::new(Box::new(blob), Box::new(ScriptedReports)).unwrap();
        ingestor.ingest("labs.csv", "labs", LABS_2023.as_bytes()).unwrap();
        ingestor.ingest("cpet.pdf", "vo2max", VO2_TEXT.as_bytes()).unwrap();
    }

    let reopened = Ingestor::open(dir.path()).unwrap();
    assert_eq!(reopened.store().labs.len(), 2);
    assert_eq!(reopened.store().series(Category::Vo2max).len(), 1);
    assert!(dir.path().join(format!("{STORE_KEY}.json")).exists());
}

#[test]
fn corrupt_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{STORE_KEY}.json")), "[1, 2").unwrap();

    let mut ingestor = Ingestor::open(dir.path()).unwrap();
    assert!(ingestor.store().is_empty());

    ingestor.ingest("labs.csv", "labs", LABS_2024.as_bytes()).unwrap();
    let reopened = Ingestor::open(dir.path()).unwrap();
    assert_eq!(reopened.store().labs.len(), 1);
}

#[test]
fn status_line_reports_outcome() {
    let (mut ingestor, _) = memory_ingestor();
    let status = ingestor.ingest_with_status("cpet.pdf", "vo2max", VO2_TEXT.as_bytes());
    assert_eq!(status, "Added 1 Cardio Fitness record (2024-03) from cpet.pdf");

    let status = ingestor.ingest_with_status("scan.png", "dexa", b"png");
    assert!(status.starts_with("Could not import scan.png: Import failed: Unsupported file format"));
}
