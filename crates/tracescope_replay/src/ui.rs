// SPDX-License-Identifier: MIT OR Apache-2.0
//! Replay panel UI rendering.
//!
//! Features:
//! - Toolbar with play control, speed selector and playhead readout
//! - Animated line chart with fixed axis bounds
//! - Hover cursor line with per-series value readout
//! - Timeline slider for scrubbing

use crate::dataset::{Dataset, DecodeError};
use crate::playback::{PlaybackController, PlaybackEvent, SPEED_FACTORS};
use crate::sample::{Sample, SeriesRegistry};
use crate::view::ChartView;
use chrono::{Local, TimeZone};
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints, VLine};

const TOOLBAR_TIME_FORMAT: &str = "%H:%M:%S%.3f";
const AXIS_TIME_FORMAT: &str = "%H:%M:%S";
const MIN_CHART_HEIGHT: f32 = 120.0;
const CURSOR_COLOR: Color32 = Color32::from_rgb(0, 220, 220);
const DIAGNOSTIC_COLOR: Color32 = Color32::from_rgb(240, 100, 100);

/// Line colors assigned to series in registry order
const SERIES_COLORS: [Color32; 8] = [
    Color32::from_rgb(86, 156, 214),
    Color32::from_rgb(220, 160, 60),
    Color32::from_rgb(120, 200, 120),
    Color32::from_rgb(214, 100, 140),
    Color32::from_rgb(160, 130, 220),
    Color32::from_rgb(100, 200, 200),
    Color32::from_rgb(220, 120, 80),
    Color32::from_rgb(180, 180, 100),
];

/// Replay panel: one loaded dataset plus its playback state.
///
/// The panel follows the update/ui split of an embedded editor panel: the
/// host calls [`ReplayPanel::update`] once per frame with the frame delta,
/// then [`ReplayPanel::ui`] to render. Widget interactions are collected as
/// [`PlaybackEvent`]s during the frame and folded through the reducer
/// afterwards, so widgets never mutate playback state directly.
pub struct ReplayPanel {
    dataset: Dataset,
    registry: SeriesRegistry,
    playback: PlaybackController,
    /// Series names pinned by configuration; empty means derive from data
    configured_series: Vec<String>,
    /// User-visible reason the last load failed, if it did
    diagnostic: Option<String>,
}

impl ReplayPanel {
    /// Create a panel for a loaded dataset
    pub fn new(dataset: Dataset, configured_series: Vec<String>, speed_factor: u32) -> Self {
        let registry = resolve_registry(&dataset, &configured_series);
        let playback = PlaybackController::with_speed(dataset.stats(), speed_factor);
        Self {
            dataset,
            registry,
            playback,
            configured_series,
            diagnostic: None,
        }
    }

    /// Create a panel from a decode attempt.
    ///
    /// On failure the panel holds an empty dataset and the failure reason as
    /// diagnostic text; every control stays functional, inertly.
    pub fn from_result(
        result: Result<Dataset, DecodeError>,
        configured_series: Vec<String>,
        speed_factor: u32,
    ) -> Self {
        match result {
            Ok(dataset) => Self::new(dataset, configured_series, speed_factor),
            Err(error) => {
                tracing::error!("Dataset load failed: {error}");
                let mut panel = Self::new(Dataset::default(), configured_series, speed_factor);
                panel.diagnostic = Some(error.to_string());
                panel
            }
        }
    }

    /// Create an inert panel carrying a diagnostic, for load failures that
    /// happen before decoding (e.g. the dataset file cannot be read).
    pub fn empty_with_diagnostic(
        reason: impl Into<String>,
        configured_series: Vec<String>,
        speed_factor: u32,
    ) -> Self {
        let mut panel = Self::new(Dataset::default(), configured_series, speed_factor);
        panel.diagnostic = Some(reason.into());
        panel
    }

    /// Replace the loaded dataset, e.g. after the data file changed on disk.
    ///
    /// Behaves exactly like a fresh load: playhead at full reveal, animation
    /// stopped. The selected speed factor survives the swap.
    pub fn replace_dataset(&mut self, result: Result<Dataset, DecodeError>) {
        let speed_factor = self.playback.speed_factor;
        *self = Self::from_result(
            result,
            std::mem::take(&mut self.configured_series),
            speed_factor,
        );
    }

    /// Advance playback (call each frame).
    ///
    /// Clock ticks are delivered only while the controller wants them; a
    /// stopped panel consumes none.
    pub fn update(&mut self, delta_seconds: f32) {
        if !self.playback.wants_ticks() {
            return;
        }
        let elapsed_ms = f64::from(delta_seconds) * 1_000.0;
        let stats = *self.dataset.stats();
        self.playback.apply(PlaybackEvent::Tick { elapsed_ms }, &stats);
    }

    /// Whether the host loop should keep scheduling animation frames
    pub fn wants_ticks(&self) -> bool {
        self.playback.wants_ticks()
    }

    /// The loaded dataset
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Current playback state
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Diagnostic text from the last failed load, if any
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Render the full panel UI
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let mut events = Vec::new();

        if let Some(diagnostic) = &self.diagnostic {
            ui.label(
                RichText::new(format!("\u{26a0} {diagnostic}"))
                    .color(DIAGNOSTIC_COLOR)
                    .strong(),
            );
            ui.separator();
        }

        let view = ChartView::project(&self.dataset, &self.playback);

        self.render_toolbar(ui, &view, &mut events);
        self.render_slider(ui, &view, &mut events);
        ui.separator();
        self.render_chart(ui, &view, &mut events);

        drop(view);
        let stats = *self.dataset.stats();
        for event in events {
            self.playback.apply(event, &stats);
        }
    }

    /// Render toolbar with playback controls
    fn render_toolbar(&self, ui: &mut egui::Ui, view: &ChartView<'_>, events: &mut Vec<PlaybackEvent>) {
        ui.horizontal(|ui| {
            if ui
                .button("\u{25b6}")
                .on_hover_text("Replay (restarts when the playhead is at the end)")
                .clicked()
            {
                events.push(PlaybackEvent::PlayPressed);
            }

            ui.separator();

            ui.label("Speed:");
            egui::ComboBox::from_id_salt("speed_selector")
                .selected_text(format!("{}\u{d7}", view.speed_factor))
                .width(64.0)
                .show_ui(ui, |ui| {
                    for factor in SPEED_FACTORS {
                        let selected = view.speed_factor == factor;
                        if ui
                            .selectable_label(selected, format!("{factor}\u{d7}"))
                            .clicked()
                        {
                            events.push(PlaybackEvent::SpeedSelected(factor));
                        }
                    }
                });

            ui.separator();

            // Playhead readout: revealed samples and the timestamp of the
            // newest visible one.
            ui.monospace(format!("{} / {}", view.slider.value, view.slider.max));
            if let Some(sample) = view.visible.last() {
                ui.monospace(format_timestamp(sample.time, TOOLBAR_TIME_FORMAT));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} series | {} samples",
                    self.registry.len(),
                    self.dataset.len()
                ));
            });
        });
    }

    /// Render the timeline slider row
    fn render_slider(&self, ui: &mut egui::Ui, view: &ChartView<'_>, events: &mut Vec<PlaybackEvent>) {
        ui.horizontal(|ui| {
            let mut position = view.slider.value as f64;
            let max = view.slider.max.max(view.slider.min) as f64;
            let slider = egui::Slider::new(&mut position, view.slider.min as f64..=max)
                .integer()
                .show_value(true);

            let response = ui.add_enabled(view.slider.max > 0, slider);
            if response.changed() {
                events.push(PlaybackEvent::SliderMoved(position));
            }
        });
    }

    /// Render the animated chart with fixed bounds and hover cursor
    fn render_chart(&self, ui: &mut egui::Ui, view: &ChartView<'_>, events: &mut Vec<PlaybackEvent>) {
        let height = ui.available_height().max(MIN_CHART_HEIGHT);
        let has_bounds = view.slider.max > 0;
        let time_range = view.time_range;
        let value_range = view.value_range;
        let cursor_x = view.cursor_x;

        // Per-series legend labels; while hovering they carry the value at
        // the sample nearest the cursor.
        let hovered = cursor_x.and_then(|x| nearest_sample(view.visible, x));
        let labels: Vec<String> = self
            .registry
            .names()
            .iter()
            .map(|name| match hovered {
                Some(sample) => format!("{name}: {:.1}", sample.value_of(name)),
                None => name.clone(),
            })
            .collect();

        let plot = Plot::new("replay_chart")
            .legend(Legend::default())
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .x_axis_formatter(|mark, _range| format_timestamp(mark.value, AXIS_TIME_FORMAT));

        let response = plot.show(ui, |plot_ui| {
            // Pin both axes to the full dataset extent so the chart never
            // resizes as playback reveals more samples.
            if has_bounds {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [time_range[0], value_range[0]],
                    [time_range[1], value_range[1]],
                ));
            }

            for (index, name) in self.registry.names().iter().enumerate() {
                let points: PlotPoints = view
                    .visible
                    .iter()
                    .map(|sample| [sample.time, sample.value_of(name)])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&labels[index])
                        .color(SERIES_COLORS[index % SERIES_COLORS.len()])
                        .width(1.5),
                );
            }

            if let Some(x) = cursor_x {
                plot_ui.vline(
                    VLine::new(x)
                        .color(CURSOR_COLOR)
                        .width(1.0)
                        .style(LineStyle::dashed_loose()),
                );
            }

            plot_ui.pointer_coordinate()
        });

        match response.inner {
            Some(point) => events.push(PlaybackEvent::PointerMoved {
                x: point.x,
                y: point.y,
            }),
            None => {
                if self.playback.hovering {
                    events.push(PlaybackEvent::PointerLeft);
                }
            }
        }
    }
}

/// Pick the registry: configuration wins, otherwise derive from the data.
fn resolve_registry(dataset: &Dataset, configured: &[String]) -> SeriesRegistry {
    if configured.is_empty() {
        SeriesRegistry::from_samples(dataset.samples())
    } else {
        SeriesRegistry::from_names(configured.iter().cloned())
    }
}

/// The visible sample whose timestamp is closest to a chart x coordinate
fn nearest_sample(visible: &[Sample], x: f64) -> Option<&Sample> {
    visible.iter().min_by(|a, b| {
        let da = (a.time - x).abs();
        let db = (b.time - x).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Format an epoch-millis timestamp as local wall-clock time
fn format_timestamp(epoch_ms: f64, format: &str) -> String {
    match Local.timestamp_millis_opt(epoch_ms as i64).single() {
        Some(datetime) => datetime.format(format).to_string(),
        None => String::from("--:--:--"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Sample> {
        (0..5)
            .map(|i| {
                Sample::new(
                    f64::from(i) * 1_000.0,
                    vec![("a".to_string(), f64::from(i) * 10.0)],
                )
            })
            .collect()
    }

    #[test]
    fn test_nearest_sample() {
        let samples = samples();
        assert_eq!(nearest_sample(&samples, 1_400.0).unwrap().time, 1_000.0);
        assert_eq!(nearest_sample(&samples, 1_600.0).unwrap().time, 2_000.0);
        assert!(nearest_sample(&[], 0.0).is_none());
    }

    #[test]
    fn test_from_result_failure_is_inert() {
        let panel = ReplayPanel::from_result(Dataset::from_json("{"), Vec::new(), 8);
        assert!(panel.diagnostic().is_some());
        assert!(panel.dataset().is_empty());
        assert_eq!(panel.playback().displayed, 0.0);
        assert!(!panel.wants_ticks());
    }

    #[test]
    fn test_replace_dataset_resets_playhead_keeps_speed() {
        let mut panel = ReplayPanel::new(Dataset::from_samples(samples()), Vec::new(), 16);
        let stats = *panel.dataset().stats();
        panel.playback.apply(PlaybackEvent::SliderMoved(2.0), &stats);

        panel.replace_dataset(Ok(Dataset::from_samples(samples())));
        assert_eq!(panel.playback().displayed, 5.0);
        assert_eq!(panel.playback().speed_factor, 16);
        assert!(panel.diagnostic().is_none());
    }

    #[test]
    fn test_configured_registry_wins_over_data() {
        let panel = ReplayPanel::new(
            Dataset::from_samples(samples()),
            vec!["ghost".to_string()],
            8,
        );
        assert_eq!(panel.registry.names(), ["ghost"]);
        // A registered series absent from the data reads the fallback value.
        assert_eq!(panel.dataset().samples()[0].value_of("ghost"), 0.0);
    }

    #[test]
    fn test_update_ticks_only_while_animating() {
        let mut panel = ReplayPanel::new(Dataset::from_samples(samples()), Vec::new(), 8);
        let before = panel.playback().displayed;
        panel.update(0.016);
        assert_eq!(panel.playback().displayed, before);

        let stats = *panel.dataset().stats();
        panel.playback.apply(PlaybackEvent::PlayPressed, &stats);
        panel.update(0.016);
        assert!(panel.playback().displayed > 1.0);
    }
}
