use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::Metric;

/// One test or report event: a month-resolution date key plus the metrics
/// that were actually extracted. Absent metrics are omitted, never zeroed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Canonical `YYYY-MM` key, or the raw string when it could not be normalized.
    pub date: String,
    #[serde(flatten)]
    values: BTreeMap<Metric, f64>,
}

/// One category's records in ascending date order.
pub type TimeSeries = Vec<MetricRecord>;

impl MetricRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder form of [`MetricRecord::set`].
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, value);
        self
    }

    /// Store a value. Non-finite values are dropped so the record never
    /// carries a missing-value sentinel.
    pub fn set(&mut self, metric: Metric, value: f64) {
        if value.is_finite() {
            self.values.insert(metric, value);
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn has_metrics(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn metric_count(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_with_date() {
        let record = MetricRecord::new("2024-01")
            .with(Metric::Cholesterol, 190.0)
            .with(Metric::Ldl, 110.5);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2024-01", "cholesterol": 190.0, "ldl": 110.5})
        );
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let record = MetricRecord::new("2024-02").with(Metric::Vo2max, 41.2);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("null"));
        assert!(!json.contains("restingHR"));
    }

    #[test]
    fn non_finite_values_dropped() {
        let mut record = MetricRecord::new("2024-03");
        record.set(Metric::Glucose, f64::NAN);
        record.set(Metric::Hdl, f64::INFINITY);
        assert!(!record.has_metrics());
        assert_eq!(record.get(Metric::Glucose), None);
    }

    #[test]
    fn deserializes_integer_values() {
        let record: MetricRecord =
            serde_json::from_str(r#"{"date":"2023-06","bodyFat":24,"boneDensity":-1.1}"#).unwrap();
        assert_eq!(record.date, "2023-06");
        assert_eq!(record.get(Metric::BodyFat), Some(24.0));
        assert_eq!(record.get(Metric::BoneDensity), Some(-1.1));
        assert_eq!(record.metric_count(), 2);
    }

    #[test]
    fn unknown_field_rejected() {
        let result = serde_json::from_str::<MetricRecord>(r#"{"date":"2023-06","weight":80}"#);
        assert!(result.is_err());
    }
}
