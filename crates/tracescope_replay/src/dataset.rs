// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataset container and derived chart statistics.

use crate::sample::Sample;

/// Error decoding raw dataset text.
///
/// The `Display` form doubles as the user-visible diagnostic; decode
/// failure is recoverable and leaves the viewer operating on an empty
/// dataset.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Malformed dataset text
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// Statistics derived from a dataset in one pass at load time.
///
/// These fix the chart axis scales for the whole session and are never
/// mutated incrementally; loading a new dataset recomputes them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DatasetStats {
    /// Global minimum over all series values across all samples
    pub value_min: f64,
    /// Global maximum over all series values across all samples
    pub value_max: f64,
    /// Timestamp of the first sample
    pub time_min: f64,
    /// Timestamp of the last sample
    pub time_max: f64,
    /// Number of samples
    pub count: usize,
    /// Average inter-sample interval, `(time_max - time_min) / count`.
    ///
    /// `0.0` for an empty dataset; never infinite.
    pub step: f64,
}

impl DatasetStats {
    /// Compute statistics from an ordered sample sequence.
    ///
    /// An empty sequence degrades every figure to `0`. Samples without any
    /// values contribute nothing to the value extremes.
    pub fn from_samples(samples: &[Sample]) -> Self {
        let count = samples.len();
        if count == 0 {
            return Self::default();
        }

        let mut extremes: Option<(f64, f64)> = None;
        for sample in samples {
            if let Some((lo, hi)) = sample.extremes() {
                extremes = Some(match extremes {
                    None => (lo, hi),
                    Some((min, max)) => (min.min(lo), max.max(hi)),
                });
            }
        }
        let (value_min, value_max) = extremes.unwrap_or((0.0, 0.0));

        let time_min = samples[0].time;
        let time_max = samples[count - 1].time;

        Self {
            value_min,
            value_max,
            time_min,
            time_max,
            count,
            step: (time_max - time_min) / count as f64,
        }
    }
}

/// The full ordered sequence of samples for one loaded session.
///
/// Immutable after construction; replacing the data means building a new
/// `Dataset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
    stats: DatasetStats,
}

impl Dataset {
    /// Build a dataset and its statistics from decoded samples
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let stats = DatasetStats::from_samples(&samples);
        Self { samples, stats }
    }

    /// Decode a dataset from JSON text: an array of samples, each with a
    /// `time` field and a `values` list of name/value pairs.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let samples: Vec<Sample> = serde_json::from_str(text)?;
        tracing::info!("Decoded dataset with {} samples", samples.len());
        Ok(Self::from_samples(samples))
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Derived statistics
    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(values: &[(&str, f64)]) -> Vec<(String, f64)> {
        values.iter().map(|(n, v)| (n.to_string(), *v)).collect()
    }

    /// Seven samples spanning 1645899285000..=1645899291000 at one-second
    /// spacing, mirroring a short real capture.
    fn seven_samples() -> Vec<Sample> {
        (0..7)
            .map(|i| {
                Sample::new(
                    1_645_899_285_000.0 + f64::from(i) * 1_000.0,
                    pairs(&[("a", 100.0 + f64::from(i)), ("b", 50.0 - f64::from(i))]),
                )
            })
            .collect()
    }

    #[test]
    fn test_stats_seven_samples() {
        let stats = DatasetStats::from_samples(&seven_samples());
        assert_eq!(stats.count, 7);
        assert_eq!(stats.time_min, 1_645_899_285_000.0);
        assert_eq!(stats.time_max, 1_645_899_291_000.0);
        assert!((stats.step - 6_000.0 / 7.0).abs() < 1e-9);
        assert_eq!(stats.value_min, 44.0);
        assert_eq!(stats.value_max, 106.0);
        assert!(stats.value_min <= stats.value_max);
        assert!(stats.time_min <= stats.time_max);
    }

    #[test]
    fn test_stats_empty_dataset() {
        let stats = DatasetStats::from_samples(&[]);
        assert_eq!(stats, DatasetStats::default());
        assert_eq!(stats.step, 0.0);
        assert!(stats.step.is_finite());
    }

    #[test]
    fn test_valueless_sample_skipped_in_extremes() {
        let samples = vec![
            Sample::new(0.0, pairs(&[("a", 5.0)])),
            Sample::new(1.0, vec![]),
            Sample::new(2.0, pairs(&[("a", -5.0)])),
        ];
        let stats = DatasetStats::from_samples(&samples);
        assert_eq!(stats.value_min, -5.0);
        assert_eq!(stats.value_max, 5.0);
    }

    #[test]
    fn test_decode_json() {
        let text = r#"[
            { "time": 10, "values": [["a", 1.0]] },
            { "time": 20, "values": [["a", 2.0], ["b", "3"]] }
        ]"#;
        let dataset = Dataset::from_json(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples()[1].value_of("b"), 3.0);
        assert_eq!(dataset.stats().count, 2);
    }

    #[test]
    fn test_decode_failure_has_diagnostic() {
        let err = Dataset::from_json("not json").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
