//! Wide lab-panel reader.
//!
//! Lab portals export panels transposed: row 0 holds the draw dates
//! (`["", d1, d2, ...]`) and every following row is `[label, v1, v2, ...]`.
//! Each date column becomes one record.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::ExtractionError;
use crate::models::{Metric, MetricRecord};
use crate::pipeline::dates::{is_canonical, normalize};

/// Row labels recognized in lab exports (exact match after trimming).
const LAB_LABELS: [(&str, Metric); 6] = [
    ("Cholesterol S/P", Metric::Cholesterol),
    ("Triglycerides", Metric::Triglycerides),
    ("LDL", Metric::Ldl),
    ("HDL", Metric::Hdl),
    ("Glucose", Metric::Glucose),
    ("HGB A1C", Metric::Hba1c),
];

pub fn metric_for_label(label: &str) -> Option<Metric> {
    let label = label.trim();
    LAB_LABELS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, metric)| *metric)
}

/// Parse a CSV lab export.
pub fn extract_csv(bytes: &[u8]) -> Result<Vec<MetricRecord>, ExtractionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractionError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(extract_rows(&rows))
}

/// Parse the first worksheet of an XLSX (or other spreadsheet) lab export.
pub fn extract_xlsx(bytes: &[u8]) -> Result<Vec<MetricRecord>, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractionError::Parse("workbook has no worksheets".into()))?
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    // Rows are relative to the used range, so a panel placed below or to the
    // right of A1 reads the same as one anchored there.
    if let Some((row, col)) = range.start() {
        tracing::debug!(row, col, "Worksheet used range located");
    }

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(extract_rows(&rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        // Date-formatted header cells go straight to the canonical key.
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Build one record per non-empty date column of an already-split grid.
///
/// Unknown labels and non-numeric cells are skipped; a date column that
/// gains no metric produces no record.
pub fn extract_rows(rows: &[Vec<String>]) -> Vec<MetricRecord> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    let metric_rows: Vec<(Metric, &[String])> = body
        .iter()
        .filter_map(|row| {
            let (label, values) = row.split_first()?;
            metric_for_label(label).map(|metric| (metric, values))
        })
        .collect();

    let records: Vec<MetricRecord> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, date_cell)| !date_cell.trim().is_empty())
        .filter_map(|(col, date_cell)| {
            let date = normalize(date_cell.trim());
            if !is_canonical(&date) {
                tracing::warn!(date = %date, column = col, "Unrecognized date cell kept verbatim");
            }
            let mut record = MetricRecord::new(date);
            for (metric, values) in &metric_rows {
                if let Some(value) = values.get(col - 1).and_then(|cell| parse_value(cell)) {
                    record.set(*metric, value);
                }
            }
            record.has_metrics().then_some(record)
        })
        .collect();

    tracing::debug!(
        date_columns = header.len().saturating_sub(1),
        metric_rows = metric_rows.len(),
        records = records.len(),
        "Lab panel parsed"
    );

    records
}

fn parse_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
