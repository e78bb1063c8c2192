//! Collection Scheduling
//!
//! Decides when the collector runs. The exporter either collects once before it
//! starts serving, or fires on a cron-style calendar cadence while the HTTP
//! server runs alongside.
//!
//! # Cron Expressions
//!
//! Five whitespace-separated fields, evaluated in local time:
//!
//! ```text
//! ┌───────────── minute (0-59)
//! │ ┌─────────── hour (0-23)
//! │ │ ┌───────── day of month (1-31)
//! │ │ │ ┌─────── month (1-12)
//! │ │ │ │ ┌───── day of week (0-6, Sunday = 0 or 7)
//! │ │ │ │ │
//! 30 * * * *
//! ```
//!
//! Each field accepts `*`, `?`, single values, ranges (`1-5`), steps (`*/15`,
//! `10-40/10`, `5/20`) and comma-separated lists of those. The descriptors
//! `@yearly`, `@annually`, `@monthly`, `@weekly`, `@daily`, `@midnight` and
//! `@hourly` are accepted as shorthands.

use crate::error::{ExporterError, Result};
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone,
    Timelike,
};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use tracing::debug;

/// How many years ahead `next_after` searches before giving up.
const SEARCH_LIMIT_YEARS: i32 = 5;

/// When the collector runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Collect once, before the HTTP server starts
    Once,
    /// Collect on every fire of a cron expression
    Cron(CronSchedule),
}

/// A parsed five-field cron expression
///
/// Every field is stored as a bitmask with bit `n` set when value `n` matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expression: String,
    minutes: u64,
    hours: u64,
    days_of_month: u64,
    months: u64,
    days_of_week: u64,
    dom_wildcard: bool,
    dow_wildcard: bool,
}

struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
}

const MINUTE: FieldSpec = FieldSpec { name: "minute", min: 0, max: 59 };
const HOUR: FieldSpec = FieldSpec { name: "hour", min: 0, max: 23 };
const DAY_OF_MONTH: FieldSpec = FieldSpec { name: "day of month", min: 1, max: 31 };
const MONTH: FieldSpec = FieldSpec { name: "month", min: 1, max: 12 };
const DAY_OF_WEEK: FieldSpec = FieldSpec { name: "day of week", min: 0, max: 7 };

impl CronSchedule {
    /// The expression this schedule was parsed from
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the first whole minute strictly after `after` that matches the
    /// expression, in `after`'s time zone.
    ///
    /// Local times that do not exist (skipped by a DST transition) never match.
    /// Local times that occur twice match once, at the earlier instant unless
    /// `after` already lies between the two.
    /// Returns `None` when nothing matches within the next five years, e.g.
    /// for `0 0 30 2 *`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        let mut t = after
            .naive_local()
            .with_second(0)?
            .with_nanosecond(0)?
            + Duration::minutes(1);
        let limit = t.year() + SEARCH_LIMIT_YEARS;

        loop {
            if t.year() > limit {
                return None;
            }
            if !has_bit(self.months, t.month()) {
                t = start_of_next_month(t)?;
                continue;
            }
            if !self.day_matches(t.date()) {
                t = t.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !has_bit(self.hours, t.hour()) {
                t = t.date().and_hms_opt(t.hour(), 0, 0)? + Duration::hours(1);
                continue;
            }
            if !has_bit(self.minutes, t.minute()) {
                t += Duration::minutes(1);
                continue;
            }

            // A wall-clock time repeated by a DST fall-back fires once, at its
            // first occurrence after `after`
            let fire = match tz.from_local_datetime(&t) {
                LocalResult::Single(fire) => Some(fire),
                LocalResult::Ambiguous(a, b) => {
                    let (first, second) = if a <= b { (a, b) } else { (b, a) };
                    [first, second].into_iter().find(|fire| fire > after)
                }
                LocalResult::None => None,
            };
            match fire {
                Some(fire) if fire > *after => return Some(fire),
                _ => t += Duration::minutes(1),
            }
        }
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = has_bit(self.days_of_month, date.day());
        let dow = has_bit(self.days_of_week, date.weekday().num_days_from_sunday());

        if self.dom_wildcard || self.dow_wildcard {
            dom && dow
        } else {
            dom || dow
        }
    }
}

impl FromStr for CronSchedule {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        let expression = s.trim();
        let expanded = match expression {
            "@yearly" | "@annually" => "0 0 1 1 *",
            "@monthly" => "0 0 1 * *",
            "@weekly" => "0 0 * * 0",
            "@daily" | "@midnight" => "0 0 * * *",
            "@hourly" => "0 * * * *",
            other if other.starts_with('@') => {
                return Err(ExporterError::Schedule(format!(
                    "unknown descriptor {}",
                    other
                )))
            }
            other => other,
        };

        let fields: Vec<&str> = expanded.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ExporterError::Schedule(format!(
                "expected 5 fields in {:?}, found {}",
                expression,
                fields.len()
            )));
        }

        let mut days_of_week = parse_field(fields[4], &DAY_OF_WEEK)?;
        // 7 is an alias for Sunday
        if has_bit(days_of_week, 7) {
            days_of_week = (days_of_week & !(1u64 << 7)) | 1;
        }

        Ok(Self {
            expression: expression.to_string(),
            minutes: parse_field(fields[0], &MINUTE)?,
            hours: parse_field(fields[1], &HOUR)?,
            days_of_month: parse_field(fields[2], &DAY_OF_MONTH)?,
            months: parse_field(fields[3], &MONTH)?,
            days_of_week,
            dom_wildcard: is_wildcard(fields[2]),
            dow_wildcard: is_wildcard(fields[4]),
        })
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn is_wildcard(field: &str) -> bool {
    field == "*" || field == "?"
}

fn has_bit(mask: u64, value: u32) -> bool {
    mask & (1u64 << value) != 0
}

fn start_of_next_month(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

fn parse_field(field: &str, bounds: &FieldSpec) -> Result<u64> {
    let mut mask = 0u64;
    for part in field.split(',') {
        mask |= parse_part(part, bounds)?;
    }
    Ok(mask)
}

fn parse_part(part: &str, bounds: &FieldSpec) -> Result<u64> {
    let invalid = |reason: &str| {
        ExporterError::Schedule(format!("invalid {} {:?}: {}", bounds.name, part, reason))
    };

    let (range, step) = match part.split_once('/') {
        Some((range, step)) => {
            let step: u32 = step.parse().map_err(|_| invalid("step is not a number"))?;
            if step == 0 {
                return Err(invalid("step must be positive"));
            }
            (range, Some(step))
        }
        None => (part, None),
    };

    let parse_value = |value: &str| -> Result<u32> {
        let value: u32 = value.parse().map_err(|_| invalid("not a number"))?;
        if value < bounds.min || value > bounds.max {
            return Err(invalid(&format!(
                "{} is outside {}-{}",
                value, bounds.min, bounds.max
            )));
        }
        Ok(value)
    };

    let (start, end) = if is_wildcard(range) {
        (bounds.min, bounds.max)
    } else if let Some((start, end)) = range.split_once('-') {
        (parse_value(start)?, parse_value(end)?)
    } else {
        let start = parse_value(range)?;
        // "N/step" runs from N to the end of the field
        let end = if step.is_some() { bounds.max } else { start };
        (start, end)
    };

    if start > end {
        return Err(invalid("range start is after range end"));
    }

    let step = step.unwrap_or(1);
    let mut mask = 0u64;
    let mut value = start;
    while value <= end {
        mask |= 1u64 << value;
        value += step;
    }
    Ok(mask)
}

/// Runs `job` every time `schedule` fires, in local time.
///
/// Each run is awaited before the next fire time is computed, so runs never
/// overlap. The first error ends the loop and is returned to the caller.
pub async fn run_on_schedule<F, Fut>(schedule: &CronSchedule, job: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    run_on_schedule_with_clock(schedule, Local::now, job).await
}

/// Like [`run_on_schedule`], reading wall-clock time from `clock`.
///
/// The next fire is computed after the later of `clock()` and the previous
/// fire, so a wall clock stepped backwards never repeats a fire.
pub async fn run_on_schedule_with_clock<Tz, C, F, Fut>(
    schedule: &CronSchedule,
    clock: C,
    mut job: F,
) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    C: Fn() -> DateTime<Tz>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut last_fire: Option<DateTime<Tz>> = None;

    loop {
        let now = clock();
        let reference = match &last_fire {
            Some(fire) if *fire > now => fire.clone(),
            _ => now.clone(),
        };
        let next = schedule.next_after(&reference).ok_or_else(|| {
            ExporterError::Schedule(format!("schedule {} never fires", schedule))
        })?;

        let wait = (next.clone() - now).to_std().unwrap_or_default();
        debug!("Next collection at {} (in {:?})", next, wait);
        tokio::time::sleep(wait).await;

        job().await?;
        last_fire = Some(next);
    }
}
