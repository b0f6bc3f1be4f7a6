//! Event persistence boundary.
//!
//! The host owns the durable record store; the core only defines the narrow
//! contract it needs ([`EventStore`]) plus an in-memory implementation used
//! by tests and by hosts that keep the event set resident.

mod config;

pub use config::{AutoDeleteConfig, Config, EventDefaults, ReminderTime, RemindersConfig};

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::event::Event;

/// Returns `~/.config/hourglass[-dev]/` based on HOURGLASS_ENV.
///
/// Set HOURGLASS_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HOURGLASS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("hourglass-dev")
    } else {
        base_dir.join("hourglass")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// The durable record store, keyed by event id.
///
/// `save` upserts: existing ids are replaced, new ids inserted. Reads and
/// writes are assumed to complete or fail atomically per call; the core
/// never retries.
pub trait EventStore {
    fn fetch_all(&self) -> Result<Vec<Event>, StoreError>;
    fn save(&self, events: &[Event]) -> Result<(), StoreError>;
}

/// In-memory [`EventStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<String, Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `events`.
    pub fn seeded(events: impl IntoIterator<Item = Event>) -> Self {
        let map = events.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self {
            events: Mutex::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Event>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventStore for MemoryStore {
    /// Events ordered by insertion date, oldest first, ties broken by id so
    /// repeated fetches are stable.
    fn fetch_all(&self) -> Result<Vec<Event>, StoreError> {
        let mut events: Vec<Event> = self.lock().values().cloned().collect();
        events.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    fn save(&self, events: &[Event]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for event in events {
            map.insert(event.id.clone(), event.clone());
        }
        Ok(())
    }
}
