//! Rule tables for free-text report extraction.
//!
//! Each document category is a [`DocumentProfile`]: date patterns plus one
//! [`FieldRule`] per metric. Rules are evaluated uniformly, so supporting a
//! new report layout means adding a pattern alternative, not new code.

use std::sync::LazyLock;

use regex::Regex;

use super::sanitize::flatten_text;
use super::ExtractionError;
use crate::models::{Category, Metric, MetricRecord};
use crate::pipeline::dates::normalize;

/// Lean tissue is reported in pounds; the store keeps kilograms.
pub const LBS_PER_KG: f64 = 2.205;

/// Stored when a cardio-fitness report carries no resting heart rate.
pub const DEFAULT_RESTING_HR: f64 = 60.0;

/// What happens when none of a rule's patterns match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    /// The field is simply omitted from the record.
    Optional,
    /// The whole extraction fails; the string names the missing field.
    Required(&'static str),
    /// The field is stored with this value instead.
    DefaultTo(f64),
}

/// One metric's extraction rule.
pub struct FieldRule {
    pub metric: Metric,
    /// Alternatives tried in order; the first that matches wins.
    patterns: Vec<Regex>,
    pub requirement: Requirement,
    postprocess: fn(f64) -> f64,
}

/// Extraction rules for one report category.
pub struct DocumentProfile {
    pub category: Category,
    date_patterns: Vec<Regex>,
    fields: Vec<FieldRule>,
}

static BODY_COMPOSITION: LazyLock<DocumentProfile> = LazyLock::new(|| DocumentProfile {
    category: Category::Dexa,
    date_patterns: vec![
        regex(r"(?i)\bmeasured\b[^0-9]{0,20}?(\d{1,2}/\d{1,2}/\d{2,4})"),
        regex(r"(?i)\bdate\b[^0-9]{0,20}?(\d{1,2}/\d{1,2}/\d{2,4})"),
    ],
    fields: vec![
        rule(
            Metric::BodyFat,
            &[r"(?i)total\s+body\s+fat\s*(?:%|percent(?:age)?)?\s*:?\s*(\d+(?:\.\d+)?)"],
            Requirement::Optional,
            identity,
        ),
        rule(
            Metric::LeanMass,
            &[r"(?i)lean\s+tissue\s*\(lbs?\)\s*:?\s*(\d+(?:\.\d+)?)"],
            Requirement::Optional,
            pounds_to_kilograms,
        ),
        rule(
            Metric::FatTissue,
            &[r"(?i)fat\s+tissue\s*\(lbs?\)\s*:?\s*(\d+(?:\.\d+)?)"],
            Requirement::Optional,
            identity,
        ),
        rule(
            Metric::VisceralFat,
            &[r"(?i)visceral\s+fat(?:\s+area)?(?:\s*\((?:cm²|cm2)\))?\s*:?\s*(\d+(?:\.\d+)?)"],
            Requirement::Optional,
            identity,
        ),
        rule(
            Metric::BoneDensity,
            &[r"(?i)\bt-?\s?score\s*:?\s*(-?\d+(?:\.\d+)?)"],
            Requirement::Optional,
            identity,
        ),
    ],
});

static CARDIO_FITNESS: LazyLock<DocumentProfile> = LazyLock::new(|| DocumentProfile {
    category: Category::Vo2max,
    date_patterns: vec![regex(r"(\d{1,2}/\d{1,2}/\d{4})")],
    fields: vec![
        rule(
            Metric::Vo2max,
            &[
                // "Max Values ... VO2 N" summary block
                r"(?is)max\s+values.*?vo2(?:\s*max)?\s*(?:\([^)]*\))?\s*:?\s*(\d+(?:\.\d+)?)",
                // bare "VO2 N"
                r"(?i)vo2(?:\s*max)?\s*(?:\([^)]*\))?\s*:?\s*(\d+(?:\.\d+)?)",
            ],
            Requirement::Required("VO2 value"),
            identity,
        ),
        rule(
            Metric::HeartRateMax,
            &[
                r"(?i)max(?:imum)?\s+heart\s+rate\s*(?:\(bpm\))?\s*:?\s*(\d+(?:\.\d+)?)",
                r"(?i)\bhr\s*max\s*(?:\(bpm\))?\s*:?\s*(\d+(?:\.\d+)?)",
            ],
            Requirement::Optional,
            identity,
        ),
        rule(
            Metric::RestingHr,
            &[r"(?i)resting\s+(?:heart\s+rate|hr)\s*(?:\(bpm\))?\s*:?\s*(\d+(?:\.\d+)?)"],
            Requirement::DefaultTo(DEFAULT_RESTING_HR),
            identity,
        ),
    ],
});

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid report extraction regex")
}

fn rule(
    metric: Metric,
    patterns: &[&str],
    requirement: Requirement,
    postprocess: fn(f64) -> f64,
) -> FieldRule {
    FieldRule {
        metric,
        patterns: patterns.iter().map(|p| regex(p)).collect(),
        requirement,
        postprocess,
    }
}

fn identity(value: f64) -> f64 {
    value
}

pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    pounds / LBS_PER_KG
}

/// Rule table for a report category. Lab panels are tabular and have none.
pub fn profile_for(category: Category) -> Option<&'static DocumentProfile> {
    match category {
        Category::Dexa => Some(&*BODY_COMPOSITION),
        Category::Vo2max => Some(&*CARDIO_FITNESS),
        Category::Labs => None,
    }
}

/// Extract at most one record from a report's text.
pub fn extract(category: Category, raw_text: &str) -> Result<Option<MetricRecord>, ExtractionError> {
    profile_for(category)
        .ok_or(ExtractionError::UnsupportedFormat)?
        .extract(raw_text)
}

/// First capture group of the first pattern that matches.
fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

impl DocumentProfile {
    pub fn fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter()
    }

    /// Run every rule over the flattened text.
    ///
    /// Returns `Ok(None)` when the date is present but no metric matched,
    /// and an error when a required field (always including the date) is
    /// missing.
    pub fn extract(&self, raw_text: &str) -> Result<Option<MetricRecord>, ExtractionError> {
        let text = flatten_text(raw_text);

        let date = first_capture(&self.date_patterns, &text)
            .ok_or_else(|| ExtractionError::MissingField("date".into()))?;

        let mut record = MetricRecord::new(normalize(date));

        for field in &self.fields {
            let value = first_capture(&field.patterns, &text)
                .and_then(|m| m.parse::<f64>().ok())
                .map(field.postprocess);

            match (value, field.requirement) {
                (Some(value), _) => {
                    tracing::debug!(field = field.metric.as_str(), value, "Report field matched");
                    record.set(field.metric, value);
                }
                (None, Requirement::Optional) => {}
                (None, Requirement::Required(name)) => {
                    return Err(ExtractionError::MissingField(name.into()));
                }
                (None, Requirement::DefaultTo(default)) => {
                    tracing::warn!(
                        field = field.metric.as_str(),
                        default,
                        "Report field absent; storing default"
                    );
                    record.set(field.metric, default);
                }
            }
        }

        if !record.has_metrics() {
            tracing::info!(
                category = self.category.as_str(),
                date = %record.date,
                "Report date found but no metrics matched"
            );
            return Ok(None);
        }

        Ok(Some(record))
    }
}
