// SPDX-License-Identifier: MIT OR Apache-2.0
//! Projection from replay state to a renderable chart description.

use crate::dataset::Dataset;
use crate::playback::PlaybackController;
use crate::sample::Sample;

/// Timeline slider projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderView {
    /// Lower slider bound; one sample is the minimum meaningful reveal
    pub min: usize,
    /// Upper slider bound, the sample count
    pub max: usize,
    /// Current slider position, the truncated playhead
    pub value: usize,
}

/// Everything the chart needs for one frame, derived from current state.
///
/// A borrow-based pure function of the model: no widget or renderer state
/// leaks back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView<'a> {
    /// The revealed prefix of the dataset, in time order
    pub visible: &'a [Sample],
    /// Horizontal axis bounds, fixed to the full dataset time range
    pub time_range: [f64; 2],
    /// Vertical axis bounds, fixed to the full dataset value range
    pub value_range: [f64; 2],
    /// Horizontal position of the hover cursor line, when hovering
    pub cursor_x: Option<f64>,
    /// Timeline slider bounds and position
    pub slider: SliderView,
    /// Currently selected speed multiplier
    pub speed_factor: u32,
}

impl<'a> ChartView<'a> {
    /// Project the current state.
    ///
    /// The visible slice is always a prefix: the animation reveals data
    /// left to right and never discards earlier samples. Truncating the
    /// playhead and clamping to the sample count keeps the slice in bounds
    /// even when the playhead overshoots the end.
    pub fn project(dataset: &'a Dataset, playback: &PlaybackController) -> Self {
        let stats = dataset.stats();
        let shown = playback.displayed.trunc().clamp(0.0, stats.count as f64) as usize;

        Self {
            visible: &dataset.samples()[..shown],
            time_range: [stats.time_min, stats.time_max],
            value_range: [stats.value_min, stats.value_max],
            cursor_x: playback.hovering.then_some(playback.hover_point[0]),
            slider: SliderView {
                min: 1,
                max: stats.count,
                value: shown,
            },
            speed_factor: playback.speed_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackEvent;

    fn dataset() -> Dataset {
        let samples = (0..7)
            .map(|i| {
                Sample::new(
                    1_645_899_285_000.0 + f64::from(i) * 1_000.0,
                    vec![("a".to_string(), 100.0 + f64::from(i))],
                )
            })
            .collect();
        Dataset::from_samples(samples)
    }

    #[test]
    fn test_visible_slice_is_truncated_prefix() {
        let dataset = dataset();
        let mut playback = PlaybackController::new(dataset.stats());
        playback.apply(PlaybackEvent::SliderMoved(3.9), dataset.stats());

        let view = ChartView::project(&dataset, &playback);
        assert_eq!(view.visible.len(), 3);
        assert_eq!(view.visible[0].time, dataset.samples()[0].time);
        assert_eq!(view.slider.value, 3);
    }

    #[test]
    fn test_overshoot_clamps_to_count() {
        let dataset = dataset();
        let mut playback = PlaybackController::new(dataset.stats());
        playback.displayed = 9.0;

        let view = ChartView::project(&dataset, &playback);
        assert_eq!(view.visible.len(), 7);
        assert_eq!(view.slider.value, 7);
    }

    #[test]
    fn test_axis_ranges_ignore_visible_slice() {
        let dataset = dataset();
        let mut playback = PlaybackController::new(dataset.stats());
        playback.apply(PlaybackEvent::SliderMoved(2.0), dataset.stats());

        let view = ChartView::project(&dataset, &playback);
        assert_eq!(view.time_range, [1_645_899_285_000.0, 1_645_899_291_000.0]);
        assert_eq!(view.value_range, [100.0, 106.0]);
    }

    #[test]
    fn test_cursor_only_while_hovering() {
        let dataset = dataset();
        let mut playback = PlaybackController::new(dataset.stats());
        let stats = *dataset.stats();

        playback.apply(PlaybackEvent::PointerMoved { x: 120.0, y: 40.0 }, &stats);
        assert_eq!(ChartView::project(&dataset, &playback).cursor_x, Some(120.0));

        playback.apply(PlaybackEvent::PointerLeft, &stats);
        assert_eq!(ChartView::project(&dataset, &playback).cursor_x, None);
    }

    #[test]
    fn test_slider_bounds() {
        let dataset = dataset();
        let playback = PlaybackController::new(dataset.stats());
        let view = ChartView::project(&dataset, &playback);
        assert_eq!(view.slider.min, 1);
        assert_eq!(view.slider.max, 7);
    }

    #[test]
    fn test_empty_dataset_projects_inert_view() {
        let dataset = Dataset::default();
        let playback = PlaybackController::new(dataset.stats());
        let view = ChartView::project(&dataset, &playback);
        assert!(view.visible.is_empty());
        assert_eq!(view.slider.max, 0);
        assert_eq!(view.time_range, [0.0, 0.0]);
    }
}
