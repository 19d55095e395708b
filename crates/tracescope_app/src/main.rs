// SPDX-License-Identifier: MIT OR Apache-2.0
//! TraceScope - interactive time-series replay viewer
//!
//! Loads a timestamped multi-series dataset, renders it as an animated line
//! chart, and lets the user:
//! - Scrub through time with a slider
//! - Play an automatic animation at adjustable speed
//! - Hover the chart to inspect a cursor line with nearby values
//!
//! ## Architecture
//!
//! The viewer is a thin winit/egui shell around the `tracescope_replay`
//! crate, which owns the dataset, the playback state machine and the chart
//! panel. The shell contributes configuration, live dataset reload and the
//! animation clock.

mod app;
mod config;
mod demo;
mod file_watcher;
mod theme;

use app::ViewerApp;
use config::ViewerConfig;
use std::path::PathBuf;
use tracescope_replay::{Dataset, ReplayPanel};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("tracescope_app=debug".parse().unwrap())
        .add_directive("tracescope_replay=debug".parse().unwrap())
        .add_directive("wgpu=warn".parse().unwrap())
        .add_directive("naga=warn".parse().unwrap());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TraceScope v{}", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::load_or_default(&ViewerConfig::default_path());

    // The dataset file can come from the command line or the config; with
    // neither, the built-in demo dataset serves as preview content.
    let data_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.data_path.clone());

    let panel = match &data_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => ReplayPanel::from_result(
                Dataset::from_json(&text),
                config.series.clone(),
                config.speed_factor,
            ),
            Err(error) => {
                tracing::error!("Failed to read dataset {}: {error}", path.display());
                ReplayPanel::empty_with_diagnostic(
                    format!("failed to read {}: {error}", path.display()),
                    config.series.clone(),
                    config.speed_factor,
                )
            }
        },
        None => {
            tracing::info!("No dataset configured, showing demo data");
            ReplayPanel::new(demo::demo_dataset(), config.series.clone(), config.speed_factor)
        }
    };

    if let Err(e) = ViewerApp::run(config, panel, data_path) {
        tracing::error!("Viewer crashed: {e}");
        std::process::exit(1);
    }
}
