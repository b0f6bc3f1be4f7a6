//! Calendar advance for repeating events.
//!
//! [`Event::next_occurrence`] is the one pure date-advance function both
//! scheduler code paths share. It derives the next cycle strictly from the
//! `after` instant it is given; it never reads a clock.

use chrono::{DateTime, Datelike, Duration, Months, Utc};

use super::{Event, RepeatKind, YearlyRepeatStyle};

impl Event {
    /// Compute the next occurrence after `after` for a repeating event.
    ///
    /// Returns `None` for a non-repeating event, or when the calendar
    /// arithmetic leaves the representable date range. Month-end overflow
    /// for monthly and fixed-date yearly repeats follows chrono's rule of
    /// clamping to the last day of the shorter month.
    pub fn next_occurrence(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let interval = self.repeat_interval.max(1);
        match self.repeat {
            RepeatKind::None => None,
            RepeatKind::Daily => after.checked_add_signed(Duration::days(i64::from(interval))),
            RepeatKind::Weekly => after.checked_add_signed(Duration::weeks(i64::from(interval))),
            RepeatKind::Monthly => after.checked_add_months(Months::new(interval)),
            RepeatKind::Yearly => match self.yearly_style {
                YearlyRepeatStyle::FixedDate => {
                    after.checked_add_months(Months::new(interval.checked_mul(12)?))
                }
                YearlyRepeatStyle::RelativeWeekday => advance_relative_weekday(after, interval),
            },
        }
    }
}

/// Reinterpret `after` as "the Nth occurrence of its weekday within its
/// month" and find the same slot `years` years ahead, keeping the time of
/// day.
///
/// When the Nth slot does not exist in the target month (a 5th Friday in a
/// four-Friday month), the day arithmetic runs past the month end and the
/// result lands in the following month. That spillover is intentional.
fn advance_relative_weekday(after: DateTime<Utc>, years: u32) -> Option<DateTime<Utc>> {
    // Which occurrence of its weekday `after` is, zero-based: days 1-7 are
    // the first, 8-14 the second, and so on.
    let ordinal = (after.day() - 1) / 7;
    let weekday = i64::from(after.weekday().num_days_from_sunday());

    let year = after.year().checked_add(i32::try_from(years).ok()?)?;
    let first_of_month = after.with_day(1)?.with_year(year)?;
    let first_weekday = i64::from(first_of_month.weekday().num_days_from_sunday());

    // Forward distance from the 1st to the first occurrence of the target
    // weekday, then whole weeks out to the Nth.
    let offset = (weekday - first_weekday).rem_euclid(7);
    first_of_month.checked_add_signed(Duration::days(offset + i64::from(ordinal) * 7))
}
