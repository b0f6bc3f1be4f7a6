//! Reminder preferences and the platform notification contract.
//!
//! The core never computes notification fire times. It hands the platform
//! layer the authoritative event dates plus the user's enabled offsets, and
//! the [`ReminderScheduler`] implementation turns those into concrete
//! notification requests.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::event::Event;
use crate::store::RemindersConfig;

/// How far ahead of the event day a reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderOffset {
    OnEventDay,
    DayBefore,
    WeekBefore,
    MonthBefore,
}

/// One enabled offset with its time of day (HH:mm).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub offset: ReminderOffset,
    pub time: String,
}

/// The enabled offsets from `config`, in firing-proximity order (closest to
/// the event day first).
pub fn enabled_rules(config: &RemindersConfig) -> Vec<ReminderRule> {
    let slots = [
        (ReminderOffset::OnEventDay, &config.on_event_day),
        (ReminderOffset::DayBefore, &config.day_before),
        (ReminderOffset::WeekBefore, &config.week_before),
        (ReminderOffset::MonthBefore, &config.month_before),
    ];
    slots
        .into_iter()
        .filter(|(_, slot)| slot.enabled)
        .map(|(offset, slot)| ReminderRule {
            offset,
            time: slot.time.clone(),
        })
        .collect()
}

/// Platform notification scheduler.
///
/// Called by the host after any change to the event set (edit, import,
/// repeat reset) with the full updated list; implementations replace their
/// pending notifications to match.
pub trait ReminderScheduler {
    fn reschedule(&mut self, events: &[Event], rules: &[ReminderRule]) -> Result<(), CoreError>;
}
