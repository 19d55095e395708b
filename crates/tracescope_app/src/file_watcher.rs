// SPDX-License-Identifier: MIT OR Apache-2.0
//! File system watcher for the loaded dataset.
//!
//! Provides debounced change events so the viewer can reload the dataset
//! when its file is rewritten on disk.

use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

/// Debounce duration for file events
const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

/// Events emitted by the dataset watcher
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The dataset file was created or modified
    DataChanged,
    /// An error occurred while watching
    Error(String),
}

/// Debounced watcher over a single dataset file.
///
/// The containing directory is watched rather than the file itself, since
/// editors commonly replace the file instead of writing it in place.
pub struct DatasetWatcher {
    /// The underlying debounced watcher
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    /// Receiver for watch events
    event_rx: Receiver<WatchEvent>,
    /// The watched dataset file
    path: PathBuf,
}

impl DatasetWatcher {
    /// Start watching the given dataset file
    pub fn new(data_file: &Path) -> Result<Self, notify::Error> {
        let path = data_file
            .canonicalize()
            .unwrap_or_else(|_| data_file.to_path_buf());
        let file_name: Option<OsString> = path.file_name().map(OsString::from);

        let (event_tx, event_rx) = mpsc::channel();
        let mut debouncer = new_debouncer(
            DEBOUNCE_DURATION,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
                            && event
                                .paths
                                .iter()
                                .any(|p| p.file_name().map(OsString::from) == file_name)
                    });
                    if touched {
                        let _ = event_tx.send(WatchEvent::DataChanged);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(WatchEvent::Error(error.to_string()));
                    }
                }
            },
        )?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        debouncer.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching dataset file for changes: {}", path.display());

        Ok(Self {
            _debouncer: debouncer,
            event_rx,
            path,
        })
    }

    /// The watched dataset file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll for pending watch events (non-blocking)
    pub fn poll_events(&self) -> Vec<WatchEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
