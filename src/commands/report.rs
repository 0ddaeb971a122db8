use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use super::{print_json, CommandError, Context};
use crate::models::{Category, Metric, MetricRecord};
use crate::pipeline::storage::HealthStore;
use crate::trends::{self, direction, format_trend, MetricSnapshot, TrendDirection};

const DATE_WIDTH: usize = 9;
const MIN_COLUMN_WIDTH: usize = 8;

fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Fixed-width table of one category's records, oldest first.
pub fn render_series(category: Category, series: &[MetricRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", category.label(), category.as_str());

    if series.is_empty() {
        let _ = writeln!(out, "No records.");
        return out;
    }

    let metrics = category.metrics();
    let widths: Vec<usize> = metrics
        .iter()
        .map(|m| m.as_str().len().max(MIN_COLUMN_WIDTH))
        .collect();

    let _ = write!(out, "{:<DATE_WIDTH$}", "Date");
    for (metric, width) in metrics.iter().zip(widths.iter().copied()) {
        let _ = write!(out, " {:>width$}", metric.as_str());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(DATE_WIDTH + widths.iter().map(|w| w + 1).sum::<usize>()));

    for record in series {
        let _ = write!(out, "{:<DATE_WIDTH$}", record.date);
        for (metric, width) in metrics.iter().zip(widths.iter().copied()) {
            let _ = write!(out, " {:>width$}", format_value(record.get(*metric)));
        }
        let _ = writeln!(out);
    }

    out
}

/// Latest value and trend per metric, skipping categories with no records.
pub fn render_summary(store: &HealthStore) -> String {
    let mut out = String::new();

    for category in Category::ALL {
        if store.series(*category).is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", category.label());
        let _ = writeln!(
            out,
            "{:<14} {:>10} {:<10} {:<DATE_WIDTH$} {:>9}",
            "Metric", "Latest", "Unit", "Date", "Trend"
        );
        let _ = writeln!(out, "{}", "-".repeat(58));

        for snap in trends::snapshot(store, *category) {
            let _ = writeln!(
                out,
                "{:<14} {:>10} {:<10} {:<DATE_WIDTH$} {:>9}",
                snap.metric.as_str(),
                format_value(snap.latest),
                snap.unit,
                snap.date.as_deref().unwrap_or("-"),
                format!("{} {}", snap.direction.arrow(), format_trend(snap.trend)),
            );
        }
        let _ = writeln!(out);
    }

    if out.is_empty() {
        out.push_str("No health data yet. Ingest a file with `healthlog ingest`.\n");
    }
    out
}

/// Trend of one metric, rejecting metrics from another category.
pub fn trend_for(store: &HealthStore, category: Category, metric: Metric) -> Result<f64, CommandError> {
    if metric.category() != category {
        return Err(CommandError::MetricCategory {
            metric,
            category,
            expected: category
                .metrics()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    Ok(trends::trend(store.series(category), metric))
}

/// `healthlog show [category]`
pub fn show(ctx: &Context, category: Option<Category>) -> Result<(), CommandError> {
    let store = ctx.load_store()?;

    match (category, ctx.json) {
        (Some(category), true) => print_json(store.series(category)),
        (None, true) => print_json(&store),
        (Some(category), false) => {
            print!("{}", render_series(category, store.series(category)));
            Ok(())
        }
        (None, false) => {
            for category in Category::ALL {
                println!("{}", render_series(*category, store.series(*category)));
            }
            Ok(())
        }
    }
}

/// `healthlog summary`
pub fn summary(ctx: &Context) -> Result<(), CommandError> {
    let store = ctx.load_store()?;

    if ctx.json {
        let snapshots: BTreeMap<Category, Vec<MetricSnapshot>> = Category::ALL
            .iter()
            .map(|c| (*c, trends::snapshot(&store, *c)))
            .collect();
        print_json(&snapshots)
    } else {
        print!("{}", render_summary(&store));
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TrendReport {
    category: Category,
    metric: Metric,
    trend: String,
    direction: TrendDirection,
}

/// `healthlog trend <category> <field>`
pub fn trend(ctx: &Context, category: Category, metric: Metric) -> Result<(), CommandError> {
    let store = ctx.load_store()?;
    let value = trend_for(&store, category, metric)?;

    if ctx.json {
        print_json(&TrendReport {
            category,
            metric,
            trend: format_trend(value),
            direction: direction(value),
        })
    } else {
        println!("{} {}", direction(value).arrow(), format_trend(value));
        Ok(())
    }
}
