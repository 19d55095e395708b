// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback state machine.
//!
//! The controller is a pure reducer: it folds a closed set of interaction
//! and clock events into playhead, animation and cursor state. It performs
//! no rendering and no I/O, which keeps it testable against a
//! [`DatasetStats`] value alone.

use crate::dataset::DatasetStats;

/// Selectable playback speed multipliers
pub const SPEED_FACTORS: [u32; 5] = [2, 4, 8, 16, 32];

/// Speed factor used when none (or an out-of-set value) is configured
pub const DEFAULT_SPEED_FACTOR: u32 = 8;

/// One discrete event fed to the playback reducer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// The play button was pressed
    PlayPressed,
    /// The timeline slider was moved to a new sample position
    SliderMoved(f64),
    /// A new speed multiplier was selected
    SpeedSelected(u32),
    /// An animation clock tick, delivered only while animating
    Tick {
        /// Wall-clock time elapsed since the previous tick, in milliseconds
        elapsed_ms: f64,
    },
    /// The pointer moved over the chart, in chart-space coordinates
    PointerMoved {
        /// Horizontal chart coordinate (timestamp)
        x: f64,
        /// Vertical chart coordinate (series value)
        y: f64,
    },
    /// The pointer left the chart
    PointerLeft,
}

/// Playback controller state.
///
/// `displayed` is the continuous playhead: how many samples, fractionally,
/// are currently revealed. It stays a real number so variable frame deltas
/// accumulate smoothly; only the view projection truncates it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    /// Continuous playhead position in `[0, count]`
    pub displayed: f64,
    /// Whether the animation clock is running
    pub animating: bool,
    /// Playhead advance multiplier, one of [`SPEED_FACTORS`]
    pub speed_factor: u32,
    /// Whether the pointer is currently over the chart
    pub hovering: bool,
    /// Last chart-space pointer position; stale while `hovering` is false
    pub hover_point: [f64; 2],
}

impl PlaybackController {
    /// Create a controller for a freshly loaded dataset: full reveal,
    /// animation stopped.
    pub fn new(stats: &DatasetStats) -> Self {
        Self::with_speed(stats, DEFAULT_SPEED_FACTOR)
    }

    /// Create a controller with a specific initial speed factor, snapped
    /// into the selectable set.
    pub fn with_speed(stats: &DatasetStats, speed_factor: u32) -> Self {
        Self {
            displayed: stats.count as f64,
            animating: false,
            speed_factor: snap_speed(speed_factor),
            hovering: false,
            hover_point: [0.0, 0.0],
        }
    }

    /// Fold one event into the state.
    pub fn apply(&mut self, event: PlaybackEvent, stats: &DatasetStats) {
        match event {
            PlaybackEvent::PlayPressed => {
                // Restart from the first sample when the playhead already
                // sits at or past the end; one sample is the minimum
                // meaningful reveal.
                if self.displayed >= stats.count as f64 {
                    self.displayed = 1.0;
                }
                if !self.animating {
                    tracing::debug!(speed = self.speed_factor, "Playback started");
                }
                self.animating = true;
            }
            PlaybackEvent::SliderMoved(position) => {
                // The user takes explicit control of the playhead; a running
                // animation continues from the new position.
                self.displayed = position;
            }
            PlaybackEvent::SpeedSelected(speed) => {
                self.speed_factor = snap_speed(speed);
            }
            PlaybackEvent::Tick { elapsed_ms } => {
                if !self.animating {
                    return;
                }
                if stats.step > 0.0 {
                    let samples_elapsed = elapsed_ms / stats.step;
                    self.displayed += samples_elapsed * f64::from(self.speed_factor);
                }
                if self.displayed.trunc() >= stats.count as f64 {
                    self.animating = false;
                    tracing::debug!("Playback reached the last sample");
                }
            }
            PlaybackEvent::PointerMoved { x, y } => {
                self.hovering = true;
                self.hover_point = [x, y];
            }
            PlaybackEvent::PointerLeft => {
                self.hovering = false;
            }
        }
    }

    /// Whether the surrounding runtime should deliver clock ticks.
    ///
    /// Tick interest follows the animation flag so the host loop can sleep
    /// while playback is stopped.
    pub fn wants_ticks(&self) -> bool {
        self.animating
    }
}

/// Snap a requested speed factor into [`SPEED_FACTORS`].
fn snap_speed(requested: u32) -> u32 {
    if SPEED_FACTORS.contains(&requested) {
        requested
    } else {
        DEFAULT_SPEED_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, DatasetStats};
    use crate::sample::Sample;

    /// Stats matching a seven-sample capture at one-second spacing.
    fn seven_stats() -> DatasetStats {
        let samples: Vec<Sample> = (0..7)
            .map(|i| {
                Sample::new(
                    1_645_899_285_000.0 + f64::from(i) * 1_000.0,
                    vec![("a".to_string(), f64::from(i))],
                )
            })
            .collect();
        *Dataset::from_samples(samples).stats()
    }

    #[test]
    fn test_initial_full_reveal() {
        let stats = seven_stats();
        let playback = PlaybackController::new(&stats);
        assert_eq!(playback.displayed, 7.0);
        assert!(!playback.animating);
    }

    #[test]
    fn test_play_at_end_resets_to_one() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);
        assert_eq!(playback.displayed, 1.0);
        assert!(playback.animating);
    }

    #[test]
    fn test_play_mid_run_keeps_playhead() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::SliderMoved(3.0), &stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);
        assert_eq!(playback.displayed, 3.0);
        assert!(playback.animating);
    }

    #[test]
    fn test_slider_does_not_touch_animation() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::SliderMoved(3.0), &stats);
        assert_eq!(playback.displayed, 3.0);
        assert!(!playback.animating);

        playback.apply(PlaybackEvent::PlayPressed, &stats);
        playback.apply(PlaybackEvent::SliderMoved(5.0), &stats);
        assert_eq!(playback.displayed, 5.0);
        assert!(playback.animating);
    }

    #[test]
    fn test_tick_advances_and_stops_at_end() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);

        // One tick of exactly one average step at 8x advances eight samples
        // past the reset position and lands beyond the end.
        let elapsed_ms = stats.step;
        playback.apply(PlaybackEvent::Tick { elapsed_ms }, &stats);
        assert!((playback.displayed - 9.0).abs() < 1e-9);
        assert!(!playback.animating);
    }

    #[test]
    fn test_tick_never_decreases_playhead() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);

        let mut previous = playback.displayed;
        while playback.animating {
            playback.apply(PlaybackEvent::Tick { elapsed_ms: 16.0 }, &stats);
            assert!(playback.displayed >= previous);
            previous = playback.displayed;
        }
        assert!(playback.displayed.trunc() >= 7.0);
    }

    #[test]
    fn test_animation_stops_only_at_end() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);
        playback.apply(PlaybackEvent::SpeedSelected(2), &stats);

        // Small ticks that leave the truncated playhead short of the end
        // must keep the animation running.
        playback.apply(PlaybackEvent::Tick { elapsed_ms: stats.step }, &stats);
        assert_eq!(playback.displayed.trunc(), 3.0);
        assert!(playback.animating);
    }

    #[test]
    fn test_empty_dataset_tick_is_inert() {
        let stats = DatasetStats::default();
        let mut playback = PlaybackController::new(&stats);
        assert_eq!(playback.displayed, 0.0);

        playback.apply(PlaybackEvent::PlayPressed, &stats);
        playback.apply(PlaybackEvent::Tick { elapsed_ms: 16.0 }, &stats);
        assert_eq!(playback.displayed, 1.0);
        assert!(!playback.animating);
    }

    #[test]
    fn test_speed_change_takes_effect_on_next_tick() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::SliderMoved(1.0), &stats);
        playback.apply(PlaybackEvent::PlayPressed, &stats);

        let before = playback.displayed;
        playback.apply(PlaybackEvent::SpeedSelected(2), &stats);
        assert_eq!(playback.displayed, before);

        playback.apply(PlaybackEvent::Tick { elapsed_ms: stats.step }, &stats);
        assert!((playback.displayed - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_set_speed_snaps_to_default() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        playback.apply(PlaybackEvent::SpeedSelected(7), &stats);
        assert_eq!(playback.speed_factor, DEFAULT_SPEED_FACTOR);
    }

    #[test]
    fn test_hover_state() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);

        playback.apply(PlaybackEvent::PointerMoved { x: 120.0, y: 40.0 }, &stats);
        assert!(playback.hovering);
        assert_eq!(playback.hover_point, [120.0, 40.0]);

        playback.apply(PlaybackEvent::PointerLeft, &stats);
        assert!(!playback.hovering);
        assert_eq!(playback.hover_point, [120.0, 40.0]);
    }

    #[test]
    fn test_tick_interest_follows_animation() {
        let stats = seven_stats();
        let mut playback = PlaybackController::new(&stats);
        assert!(!playback.wants_ticks());
        playback.apply(PlaybackEvent::PlayPressed, &stats);
        assert!(playback.wants_ticks());
    }
}
