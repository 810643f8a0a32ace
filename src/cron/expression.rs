//! # Five-field cron expressions.
//!
//! [`CronExpression`] is an immutable, validated `minute hour day-of-month month day-of-week`
//! expression. Once parsed it is a pure function object: given a reference instant it
//! yields the next/previous matching minute, with no internal mutable state.
//!
//! ## Day matching
//! ```text
//! day-of-month starts with '*'  OR  day-of-week starts with '*'
//!     → both must match   (the '*' side matches every day it allows)
//! both restricted
//!     → either may match  ("0 0 13 * FRI" fires on the 13th and on every Friday)
//! ```
//!
//! ## Search
//! Candidates are walked coarse-to-fine: a non-matching month jumps to the next month,
//! a non-matching day to the next day, then hours and minutes are resolved through the
//! field bitsets. Expressions that can never fire (`0 0 30 2 *`) are rejected at parse
//! time, so the search always lands within one Gregorian cycle.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};

use super::field::{CronField, DAY_OF_MONTH, DAY_OF_WEEK, FieldKind, HOUR, MINUTE, MONTH};
use crate::error::SchedulerError;

/// Years searched in either direction before giving up (one Gregorian cycle).
const SEARCH_YEARS: i32 = 400;

/// Longest possible length of each month (February counts its leap day).
const MAX_DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Validated five-field cron expression.
///
/// # Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use chronovisor::CronExpression;
///
/// let expr = CronExpression::parse("*/15 * * * *").unwrap();
/// let after = Utc.with_ymd_and_hms(2026, 1, 1, 10, 7, 0).unwrap();
///
/// assert_eq!(
///     expr.next_fire_time(after),
///     Some(Utc.with_ymd_and_hms(2026, 1, 1, 10, 15, 0).unwrap()),
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CronExpression {
    source: String,
    minutes: CronField,
    hours: CronField,
    days_of_month: CronField,
    months: CronField,
    days_of_week: CronField,
}

impl CronExpression {
    /// Parses and validates a five-field cron string.
    ///
    /// Fails with [`SchedulerError::InvalidCron`] when the field count is not five,
    /// a value is out of range, the syntax is wrong, or the expression can never fire.
    pub fn parse(expr: &str) -> Result<Self, SchedulerError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(SchedulerError::invalid_cron(
                expr,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }

        let field = |idx: usize, kind: &FieldKind| {
            CronField::parse(fields[idx], kind)
                .map_err(|reason| SchedulerError::invalid_cron(expr, reason))
        };

        let parsed = Self {
            source: fields.join(" "),
            minutes: field(0, &MINUTE)?,
            hours: field(1, &HOUR)?,
            days_of_month: field(2, &DAY_OF_MONTH)?,
            months: field(3, &MONTH)?,
            days_of_week: field(4, &DAY_OF_WEEK)?,
        };

        if !parsed.can_fire() {
            return Err(SchedulerError::invalid_cron(
                expr,
                "day-of-month never occurs in the selected months",
            ));
        }
        Ok(parsed)
    }

    /// Returns the normalized source text (fields separated by single spaces).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Smallest minute-aligned instant strictly greater than `after` matching every field.
    ///
    /// `None` only when the search leaves chrono's representable range.
    pub fn next_fire_time(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start =
            truncate_to_minute(after.naive_utc())?.checked_add_signed(TimeDelta::minutes(1))?;
        let limit = start.year().saturating_add(SEARCH_YEARS);

        let mut date = start.date();
        let (mut hour, mut minute) = (start.hour(), start.minute());

        while date.year() <= limit {
            if !self.months.contains(date.month()) {
                date = first_of_next_month(date)?;
                (hour, minute) = (0, 0);
                continue;
            }
            if self.day_matches(date) {
                if let Some((h, m)) = self.time_on_or_after(hour, minute) {
                    return Some(Utc.from_utc_datetime(&date.and_hms_opt(h, m, 0)?));
                }
            }
            date = date.succ_opt()?;
            (hour, minute) = (0, 0);
        }
        None
    }

    /// Largest minute-aligned instant strictly less than `before` matching every field.
    pub fn previous_fire_time(&self, before: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let naive = before.naive_utc();
        let truncated = truncate_to_minute(naive)?;
        let start = if truncated == naive {
            truncated.checked_sub_signed(TimeDelta::minutes(1))?
        } else {
            truncated
        };
        let limit = start.year().saturating_sub(SEARCH_YEARS);

        let mut date = start.date();
        let (mut hour, mut minute) = (start.hour(), start.minute());

        while date.year() >= limit {
            if !self.months.contains(date.month()) {
                date = last_of_previous_month(date)?;
                (hour, minute) = (23, 59);
                continue;
            }
            if self.day_matches(date) {
                if let Some((h, m)) = self.time_on_or_before(hour, minute) {
                    return Some(Utc.from_utc_datetime(&date.and_hms_opt(h, m, 0)?));
                }
            }
            date = date.pred_opt()?;
            (hour, minute) = (23, 59);
        }
        None
    }

    /// The next `n` fire times after `after`, each computed from the previous one.
    ///
    /// Recomputed on every call; the result holds exactly `n` strictly increasing
    /// instants unless chrono's range is exhausted first.
    pub fn next_n_fire_times(&self, n: usize, after: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut out = Vec::with_capacity(n);
        let mut cursor = after;
        while out.len() < n {
            match self.next_fire_time(cursor) {
                Some(next) => {
                    out.push(next);
                    cursor = next;
                }
                None => break,
            }
        }
        out
    }

    /// Time from `after` to the next fire time.
    ///
    /// This is the quantity a cron loop sleeps on.
    pub fn duration_until_next(&self, after: DateTime<Utc>) -> Option<Duration> {
        let next = self.next_fire_time(after)?;
        (next - after).to_std().ok()
    }

    /// [`duration_until_next`](Self::duration_until_next) in (fractional) seconds, `>= 0`.
    pub fn seconds_until_next(&self, after: DateTime<Utc>) -> Option<f64> {
        self.duration_until_next(after).map(|d| d.as_secs_f64())
    }

    /// [`next_fire_time`](Self::next_fire_time) from the current wall-clock time.
    pub fn next_fire_time_from_now(&self) -> Option<DateTime<Utc>> {
        self.next_fire_time(Utc::now())
    }

    /// [`previous_fire_time`](Self::previous_fire_time) from the current wall-clock time.
    pub fn previous_fire_time_from_now(&self) -> Option<DateTime<Utc>> {
        self.previous_fire_time(Utc::now())
    }

    /// [`seconds_until_next`](Self::seconds_until_next) from the current wall-clock time.
    pub fn seconds_until_next_from_now(&self) -> Option<f64> {
        self.seconds_until_next(Utc::now())
    }

    /// True when the minute containing `instant` is a fire time.
    pub fn matches(&self, instant: DateTime<Utc>) -> bool {
        let date = instant.date_naive();
        self.months.contains(date.month())
            && self.day_matches(date)
            && self.hours.contains(instant.hour())
            && self.minutes.contains(instant.minute())
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.days_of_month.contains(date.day());
        let dow = self
            .days_of_week
            .contains(date.weekday().num_days_from_sunday());

        if self.days_of_month.is_unrestricted() || self.days_of_week.is_unrestricted() {
            dom && dow
        } else {
            dom || dow
        }
    }

    /// Earliest `(hour, minute)` at or after the given time of day.
    fn time_on_or_after(&self, hour: u32, minute: u32) -> Option<(u32, u32)> {
        let h = self.hours.next_set(hour)?;
        if h == hour {
            if let Some(m) = self.minutes.next_set(minute) {
                return Some((h, m));
            }
            let h = self.hours.next_set(hour + 1)?;
            return Some((h, self.minutes.first()?));
        }
        Some((h, self.minutes.first()?))
    }

    /// Latest `(hour, minute)` at or before the given time of day.
    fn time_on_or_before(&self, hour: u32, minute: u32) -> Option<(u32, u32)> {
        let h = self.hours.prev_set(hour)?;
        if h == hour {
            if let Some(m) = self.minutes.prev_set(minute) {
                return Some((h, m));
            }
            let h = self.hours.prev_set(hour.checked_sub(1)?)?;
            return Some((h, self.minutes.last()?));
        }
        Some((h, self.minutes.last()?))
    }

    /// Whether any calendar day can satisfy the month and day fields.
    ///
    /// Over a 400-year cycle every valid `(month, day)` falls on every weekday, so only
    /// the month/day-of-month pairing can make an expression unsatisfiable.
    fn can_fire(&self) -> bool {
        let or_mode =
            !self.days_of_month.is_unrestricted() && !self.days_of_week.is_unrestricted();
        if or_mode {
            return true;
        }
        self.months.values().any(|month| {
            let longest = MAX_DAYS_IN_MONTH[(month - 1) as usize];
            self.days_of_month
                .first()
                .is_some_and(|day| day <= longest)
        })
    }
}

impl FromStr for CronExpression {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn truncate_to_minute(t: NaiveDateTime) -> Option<NaiveDateTime> {
    t.with_second(0)?.with_nanosecond(0)
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

fn last_of_previous_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.pred_opt()
}
