// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-series replay for TraceScope.
//!
//! This crate provides the replay viewer core:
//! - Dataset decoding with derived chart statistics
//! - Playback state machine (play, scrub, speed, hover)
//! - View projection from state to renderable chart description
//! - Replay panel UI (toolbar, animated chart, timeline slider)
//!
//! ## Architecture
//!
//! The replay core is built on:
//! - An immutable dataset with statistics computed once at load
//! - A closed event type folded through one pure reducer
//! - A borrow-based projection consumed by the chart each frame

pub mod sample;
pub mod dataset;
pub mod playback;
pub mod view;
pub mod ui;

pub use sample::{Sample, SeriesRegistry};
pub use dataset::{Dataset, DatasetStats, DecodeError};
pub use playback::{PlaybackController, PlaybackEvent, DEFAULT_SPEED_FACTOR, SPEED_FACTORS};
pub use view::{ChartView, SliderView};
pub use ui::ReplayPanel;
