// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in demo dataset for preview mode.

use tracescope_replay::{Dataset, Sample};

/// A short altitude capture of three tracked units, used when no dataset
/// file is configured.
pub fn demo_dataset() -> Dataset {
    let base = 1_645_899_285_000.0;
    let altitudes: [(&str, [f64; 7]); 3] = [
        ("unit-alpha", [12.0, 45.0, 90.0, 140.0, 170.0, 185.0, 190.0]),
        ("unit-bravo", [160.0, 150.0, 132.0, 110.0, 84.0, 60.0, 42.0]),
        ("unit-charlie", [80.0, 95.0, 70.0, 105.0, 88.0, 120.0, 96.0]),
    ];

    let samples = (0..7usize)
        .map(|i| {
            let values = altitudes
                .iter()
                // unit-charlie drops out mid-flight; the viewer reads the
                // missing entries as zero.
                .filter(|(name, _)| !(*name == "unit-charlie" && (i == 3 || i == 4)))
                .map(|(name, curve)| ((*name).to_string(), curve[i]))
                .collect::<Vec<_>>();
            Sample::new(base + i as f64 * 1_000.0, values)
        })
        .collect();

    Dataset::from_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_shape() {
        let dataset = demo_dataset();
        let stats = dataset.stats();
        assert_eq!(stats.count, 7);
        assert_eq!(stats.time_min, 1_645_899_285_000.0);
        assert_eq!(stats.time_max, 1_645_899_291_000.0);
        assert!((stats.step - 6_000.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_demo_sparse_entries_read_zero() {
        let dataset = demo_dataset();
        assert_eq!(dataset.samples()[3].value_of("unit-charlie"), 0.0);
        assert_eq!(dataset.samples()[5].value_of("unit-charlie"), 120.0);
    }
}
