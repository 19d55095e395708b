// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sample and series definitions for the replay dataset.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer};

/// One timestamped record holding a value per tracked series.
///
/// Values are kept as an ordered list of name/value pairs; a series name
/// absent from a sample is not an error and reads as `0.0`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sample {
    /// Timestamp in milliseconds since the Unix epoch
    pub time: f64,
    /// Series values recorded at this timestamp
    #[serde(deserialize_with = "lenient_pairs")]
    pub values: Vec<(String, f64)>,
}

impl Sample {
    /// Create a new sample
    pub fn new(time: f64, values: impl Into<Vec<(String, f64)>>) -> Self {
        Self {
            time,
            values: values.into(),
        }
    }

    /// Look up the value recorded for a series by exact name match.
    ///
    /// A missing entry reads as `0.0`. This makes sparse samples legal and
    /// is indistinguishable from a recorded zero, which is part of the
    /// upstream data contract.
    pub fn value_of(&self, name: &str) -> f64 {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0.0, |(_, v)| *v)
    }

    /// Min/max over the values present in this sample.
    ///
    /// Returns `None` for a sample with no values, so it contributes no
    /// extreme to the dataset-wide reduction.
    pub fn extremes(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .map(|(_, v)| *v)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Numeric values may arrive as JSON numbers or as numeric text; unparsable
/// text degrades to `0.0` instead of failing the whole dataset.
fn lenient_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Number(f64),
        Text(String),
    }

    let raw: Vec<(String, RawValue)> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                RawValue::Number(v) => v,
                RawValue::Text(s) => s.trim().parse().unwrap_or(0.0),
            };
            (name, value)
        })
        .collect())
}

/// The ordered list of series names selected for display.
///
/// Independent of which names actually occur in the data: a registered name
/// with no recorded values renders flat at the fallback value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesRegistry {
    names: Vec<String>,
}

impl SeriesRegistry {
    /// Create a registry from an explicit ordered name list
    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive a registry from the samples themselves: every series name in
    /// first-appearance order, duplicates collapsed.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut names = IndexSet::new();
        for sample in samples {
            for (name, _) in &sample.values {
                names.insert(name.clone());
            }
        }
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Registered names in display order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered series
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no series are registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
