//! Period-over-period change for one metric of a series.

use serde::Serialize;

use crate::models::{Category, Metric, MetricRecord};
use crate::pipeline::storage::HealthStore;

/// Percent change between the last two records, rounded to one decimal.
///
/// The comparison is positional: it uses the last two records of the
/// series whatever their dates, so a re-ingested month compares against
/// itself. Fewer than two records gives `0.0`. If either record lacks the
/// metric the result is `NaN`. A zero previous value gives `±∞` (or `NaN`
/// for 0 → 0); callers render those through [`format_trend`].
pub fn trend(series: &[MetricRecord], metric: Metric) -> f64 {
    let [.., previous, latest] = series else {
        return 0.0;
    };

    let (Some(previous), Some(latest)) = (previous.get(metric), latest.get(metric)) else {
        return f64::NAN;
    };

    round_tenth((latest - previous) / previous * 100.0)
}

fn round_tenth(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
    Undefined,
}

impl TrendDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Flat => "→",
            Self::Undefined => "?",
        }
    }
}

pub fn direction(value: f64) -> TrendDirection {
    if value.is_nan() {
        TrendDirection::Undefined
    } else if value > 0.0 {
        TrendDirection::Up
    } else if value < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    }
}

/// Magnitude only; the sign is carried by [`direction`].
pub fn format_trend(value: f64) -> String {
    if value.is_nan() {
        "NaN%".to_string()
    } else if value.is_infinite() {
        "∞%".to_string()
    } else {
        format!("{:.1}%", value.abs())
    }
}

/// Latest value and trend of one metric, for summaries.
#[derive(Debug, Clone, Serialize)]
pub struct MetricSnapshot {
    pub metric: Metric,
    pub unit: &'static str,
    pub latest: Option<f64>,
    /// Date of the record `latest` came from.
    pub date: Option<String>,
    #[serde(serialize_with = "serialize_trend")]
    pub trend: f64,
    pub direction: TrendDirection,
}

/// JSON has no NaN/∞; emit those as the display string.
fn serialize_trend<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_trend(*value))
    }
}

/// One snapshot per metric of `category`.
pub fn snapshot(store: &HealthStore, category: Category) -> Vec<MetricSnapshot> {
    let series = store.series(category);
    category
        .metrics()
        .iter()
        .map(|&metric| {
            let latest = series
                .iter()
                .rev()
                .find_map(|r| r.get(metric).map(|v| (v, r.date.clone())));
            let trend = trend(series, metric);
            MetricSnapshot {
                metric,
                unit: metric.unit(),
                latest: latest.as_ref().map(|(v, _)| *v),
                date: latest.map(|(_, d)| d),
                trend,
                direction: direction(trend),
            }
        })
        .collect()
}
