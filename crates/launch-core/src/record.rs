//! Host-delivered launch record.
//!
//! The platform hands over app-control data as an ordered list of
//! `{"key": "...", "value": ["..."]}` pairs. Keys are not unique and an entry
//! may carry no values at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid launch record json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One key with its values, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchEntry {
    pub key: String,
    #[serde(rename = "value", alias = "values", default)]
    pub values: Vec<String>,
}

impl LaunchEntry {
    pub fn new(key: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// First value, which is the only one the resolver looks at.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Ordered launch record for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchRecord {
    entries: Vec<LaunchEntry>,
}

impl LaunchRecord {
    pub fn new(entries: Vec<LaunchEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_entry(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.entries.push(LaunchEntry::new(key, values));
        self
    }

    pub fn entries(&self) -> &[LaunchEntry] {
        &self.entries
    }
}

impl FromIterator<LaunchEntry> for LaunchRecord {
    fn from_iter<I: IntoIterator<Item = LaunchEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
