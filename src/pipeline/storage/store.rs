use serde::{Deserialize, Serialize};

use super::blob::BlobStore;
use super::StorageError;
use crate::config::STORE_KEY;
use crate::models::{Category, MetricRecord, TimeSeries};

/// All persisted health data: one ascending series per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStore {
    #[serde(default)]
    pub labs: TimeSeries,
    #[serde(default)]
    pub dexa: TimeSeries,
    #[serde(default)]
    pub vo2max: TimeSeries,
}

impl HealthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, category: Category) -> &TimeSeries {
        match category {
            Category::Labs => &self.labs,
            Category::Dexa => &self.dexa,
            Category::Vo2max => &self.vo2max,
        }
    }

    fn series_mut(&mut self, category: Category) -> &mut TimeSeries {
        match category {
            Category::Labs => &mut self.labs,
            Category::Dexa => &mut self.dexa,
            Category::Vo2max => &mut self.vo2max,
        }
    }

    /// Concatenate `records` onto the category's series, then stable-sort by
    /// date key. Equal keys keep insertion order, so re-ingesting a month
    /// adds a second record after the first rather than replacing it.
    pub fn append(&mut self, category: Category, records: Vec<MetricRecord>) {
        let series = self.series_mut(category);
        series.extend(records);
        series.sort_by(|a, b| a.date.cmp(&b.date));
    }

    /// The state after appending, leaving `self` untouched.
    pub fn with_appended(&self, category: Category, records: Vec<MetricRecord>) -> Self {
        let mut next = self.clone();
        next.append(category, records);
        next
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.series(*c).is_empty())
    }

    pub fn record_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.series(*c).len()).sum()
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &[u8]) -> Result<Self, StorageError> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Serialize the whole store under [`STORE_KEY`].
    pub fn persist(&self, blob: &dyn BlobStore) -> Result<(), StorageError> {
        let json = self.to_json()?;
        blob.write(STORE_KEY, json.as_bytes())?;
        tracing::debug!(records = self.record_count(), "Health store persisted");
        Ok(())
    }

    /// Load the persisted store.
    ///
    /// Absent state yields an empty store. Corrupt state also yields an empty
    /// store, with a warning. A failed read is an error: starting empty there
    /// would let the next persist overwrite data that still exists.
    pub fn restore(blob: &dyn BlobStore) -> Result<Self, StorageError> {
        let Some(bytes) = blob.read(STORE_KEY)? else {
            tracing::info!("No persisted health data; starting empty");
            return Ok(Self::default());
        };

        match Self::from_json(&bytes) {
            Ok(store) => {
                tracing::info!(records = store.record_count(), "Health data restored");
                Ok(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted health data is corrupt; starting empty");
                Ok(Self::default())
            }
        }
    }
}
