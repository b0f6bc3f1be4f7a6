//! Read-only event snapshots for display surfaces without store access.
//!
//! Widgets and other out-of-process surfaces cannot open the live store, so
//! the host publishes a serialized snapshot of the event set whenever it
//! changes and those surfaces render from the last published copy.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::event::Event;

/// The subset of an event a display surface needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub id: String,
    pub name: String,
    pub target_date: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub color_hex: String,
    pub icon_name: String,
}

impl From<&Event> for EventSnapshot {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            target_date: event.target_date,
            start_date: event.start_date,
            color_hex: event.color_hex.clone(),
            icon_name: event.icon_name.clone(),
        }
    }
}

/// Snapshot every event, in the order given.
pub fn snapshot_events(events: &[Event]) -> Vec<EventSnapshot> {
    events.iter().map(EventSnapshot::from).collect()
}

/// Where published snapshots go.
pub trait SnapshotSink {
    fn publish(&self, snapshots: &[EventSnapshot]) -> Result<(), CoreError>;
}

/// Publishes snapshots as a JSON file.
#[derive(Debug)]
pub struct FileSnapshotSink {
    path: PathBuf,
}

impl FileSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing to `events.json` in the app data directory.
    pub fn at_default_location() -> Result<Self, CoreError> {
        Ok(Self::new(crate::store::data_dir()?.join("events.json")))
    }
}

impl SnapshotSink for FileSnapshotSink {
    fn publish(&self, snapshots: &[EventSnapshot]) -> Result<(), CoreError> {
        let json = serde_json::to_vec_pretty(snapshots)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
