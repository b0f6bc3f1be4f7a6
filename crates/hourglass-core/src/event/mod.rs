//! Countdown event records and their derived state.
//!
//! An [`Event`] is the sole persistent entity in the system: one named target
//! date with an optional future start date, presentation hints, and a repeat
//! rule. Everything the rest of the app displays (list rows, detail rings,
//! widgets, notification inputs) is derived on the fly from `(event, now)`.
//!
//! All queries here are pure and total: nothing mutates the record, nothing
//! reads a clock internally, nothing panics on malformed date ranges.
//! Mutation happens only in the scheduler reset path and the host edit flow.

mod repeat;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Seconds a completed repeating event stays in the "count up" display phase
/// before it becomes eligible for auto-reset.
pub const COUNT_UP_WINDOW_SECS: i64 = 120;

/// Color assigned to events created without an explicit pick.
pub const DEFAULT_COLOR_HEX: &str = "#3b82f6";

/// Icon assigned to events created without an explicit pick.
pub const DEFAULT_ICON: &str = "hourglass";

/// Repeat cadence of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// How a yearly repeat picks its day. Only read when the repeat kind is
/// [`RepeatKind::Yearly`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearlyRepeatStyle {
    /// Same month and day every year.
    #[default]
    FixedDate,
    /// Same "Nth weekday of the month" slot every year, e.g. the first
    /// Sunday of November.
    RelativeWeekday,
}

/// A time distance broken into display units.
///
/// All four components come from one duration, floored independently and
/// clamped to zero, so a row can show "3d 04h 12m 09s" without cascading
/// subtraction drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let d = to - from;
        Self {
            days: d.num_days().max(0),
            hours: (d.num_hours() - d.num_days() * 24).max(0),
            minutes: (d.num_minutes() - d.num_hours() * 60).max(0),
            seconds: (d.num_seconds() - d.num_minutes() * 60).max(0),
        }
    }
}

/// Elapsed time past the target during the count-up phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountUp {
    pub minutes: i64,
    pub seconds: i64,
}

/// One countdown event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity across app, widget, and notification boundaries.
    pub id: String,
    pub name: String,
    /// The moment the countdown reaches zero.
    pub target_date: DateTime<Utc>,
    /// The countdown start instant. May lie in the past, present, or future
    /// relative to the wall clock at creation.
    pub start_date: DateTime<Utc>,
    /// When the record was inserted. Audit only -- never touched by the
    /// repeat logic.
    pub added_at: DateTime<Utc>,
    pub color_hex: String,
    pub icon_name: String,
    pub repeat: RepeatKind,
    /// "Every N" multiplier for the repeat kind. Always >= 1.
    pub repeat_interval: u32,
    pub yearly_style: YearlyRepeatStyle,
    /// True if this record was auto-advanced or auto-created by the repeat
    /// scheduler rather than hand-entered.
    pub is_repeat_occurrence: bool,
}

impl Event {
    /// Create a non-repeating event with default presentation.
    pub fn new(
        name: impl Into<String>,
        start_date: DateTime<Utc>,
        target_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            target_date,
            start_date,
            added_at: Utc::now(),
            color_hex: DEFAULT_COLOR_HEX.to_string(),
            icon_name: DEFAULT_ICON.to_string(),
            repeat: RepeatKind::None,
            repeat_interval: 1,
            yearly_style: YearlyRepeatStyle::FixedDate,
            is_repeat_occurrence: false,
        }
    }

    pub fn with_repeat(mut self, repeat: RepeatKind, interval: u32) -> Self {
        self.repeat = repeat;
        self.repeat_interval = interval.max(1);
        self
    }

    pub fn with_yearly_style(mut self, style: YearlyRepeatStyle) -> Self {
        self.yearly_style = style;
        self
    }

    pub fn with_color(mut self, hex: impl Into<String>) -> Self {
        self.color_hex = hex.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon_name = icon.into();
        self
    }

    /// Check the invariants the create/edit flow must enforce before saving.
    ///
    /// The derived-state queries below do not depend on this passing; they
    /// degrade instead of failing on a bad record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.target_date <= self.start_date {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.target_date,
            });
        }
        if self.repeat_interval == 0 {
            return Err(ValidationError::InvalidValue {
                field: "repeat_interval".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    // ── Derived state ────────────────────────────────────────────────

    /// The countdown has not started yet.
    pub fn is_scheduled(&self, now: DateTime<Utc>) -> bool {
        now < self.start_date
    }

    /// Time left until the target, broken into display units.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeLeft {
        TimeLeft::between(now, self.target_date)
    }

    /// Time left until the countdown starts. Meaningful while scheduled.
    pub fn until_start(&self, now: DateTime<Utc>) -> TimeLeft {
        TimeLeft::between(now, self.start_date)
    }

    /// Scheduled and starting within the next 24 hours.
    pub fn starts_today(&self, now: DateTime<Utc>) -> bool {
        self.is_scheduled(now) && (self.start_date - now).num_hours() < 24
    }

    /// Fraction of the countdown elapsed, clamped to `[0.0, 1.0]`.
    ///
    /// A record violating `target_date > start_date` renders as a finished
    /// bar instead of dividing by a non-positive span.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.is_scheduled(now) {
            return 0.0;
        }
        let total = (self.target_date - self.start_date).num_seconds();
        if total <= 0 {
            return 1.0;
        }
        let elapsed = (now - self.start_date).num_seconds();
        (elapsed as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn is_completed(&self, now: DateTime<Utc>) -> bool {
        now >= self.target_date
    }

    pub fn repeats(&self) -> bool {
        self.repeat != RepeatKind::None
    }

    /// Completed repeating event whose count-up window has fully elapsed.
    /// True from exactly `target_date + 120s` onward.
    pub fn should_reset_repeat(&self, now: DateTime<Utc>) -> bool {
        self.repeats()
            && self.is_completed(now)
            && now - self.target_date >= Duration::seconds(COUNT_UP_WINDOW_SECS)
    }

    /// Elapsed time past the target, capped at the count-up window.
    pub fn count_up(&self, now: DateTime<Utc>) -> CountUp {
        let secs = (now - self.target_date)
            .num_seconds()
            .clamp(0, COUNT_UP_WINDOW_SECS);
        CountUp {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    }

    /// Whole days spanned by the countdown.
    pub fn total_days(&self) -> i64 {
        (self.target_date - self.start_date).num_days().max(0)
    }

    /// Whole days elapsed, clamped to `[0, total_days]` so progress
    /// visualizations never show more elapsed units than exist.
    pub fn days_since_start(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_date).num_days().clamp(0, self.total_days())
    }
}
