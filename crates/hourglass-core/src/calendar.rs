//! Calendar import adapter.
//!
//! Maps entries handed over by the platform calendar into [`Event`] records.
//! Thin by design: entries already in the past are skipped, everything else
//! becomes a non-repeating event counting down from the moment of import,
//! with the configured presentation defaults.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::store::EventDefaults;

/// One entry as handed over by the platform calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// The calendar's own identifier, kept so the host can avoid importing
    /// the same entry twice.
    pub external_id: String,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// Convert importable entries into events.
///
/// Entries at or before `now` cannot form a valid countdown and are dropped;
/// the returned events all satisfy `target_date > start_date`.
pub fn import_entries(
    entries: &[CalendarEntry],
    defaults: &EventDefaults,
    now: DateTime<Utc>,
) -> Vec<Event> {
    entries
        .iter()
        .filter(|entry| entry.occurs_at > now)
        .map(|entry| {
            Event::new(entry.title.clone(), now, entry.occurs_at)
                .with_color(defaults.color_hex.clone())
                .with_icon(defaults.icon_name.clone())
        })
        .collect()
}
