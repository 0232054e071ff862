//! Date-bucketed activity aggregation: streaks, completion rate, calendar grid.
//!
//! Everything here is a pure computation over data already fetched from the
//! store. `as_of` is always passed in explicitly so results are deterministic.

use crate::errors::{AppError, AppResult};
use crate::models::{ActivityStats, CalendarDay};
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

/// Trailing window used for the dashboard completion rate.
pub const COMPLETION_WINDOW_DAYS: u32 = 30;

static DATE_KEY_RE: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

/// Deduplicated set of local calendar days on which an activity was logged.
pub type DateSet = BTreeSet<NaiveDate>;

/// One date set per tracked activity kind. This is the fixed activity list
/// every dashboard and calendar query works from.
#[derive(Debug, Clone, Default)]
pub struct ActivityDateSets {
    pub answers: DateSet,
    pub affirmations: DateSet,
    pub gratitude: DateSet,
    pub creativity: DateSet,
}

impl ActivityDateSets {
    fn all(&self) -> [&DateSet; 4] {
        [
            &self.answers,
            &self.affirmations,
            &self.gratitude,
            &self.creativity,
        ]
    }
}

/// Raw record counts per activity kind, as reported by the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityTotals {
    pub answers: u64,
    pub affirmation_logs: u64,
    pub gratitude_items: u64,
    pub creativity_entries: u64,
}

pub fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|error| AppError::InvalidTimestamp(format!("{raw}: {error}")))
}

pub fn parse_date_key(raw: &str) -> AppResult<NaiveDate> {
    if !DATE_KEY_RE.is_match(raw) {
        return Err(AppError::InvalidTimestamp(format!(
            "{raw}: expected YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|error| AppError::InvalidTimestamp(format!("{raw}: {error}")))
}

pub fn date_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Calendar day a timestamp falls on in the given timezone. Bucketing uses
/// the zone's calendar fields, never hour arithmetic, so DST transitions and
/// near-midnight events land on the day the user experienced.
pub fn local_day<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    ts.with_timezone(tz).date_naive()
}

/// Bucket raw timestamp strings into a `DateSet`. Unparseable rows are
/// skipped with a warning rather than failing the whole computation.
pub fn date_set_from_timestamps<'a, Tz, I>(raws: I, tz: &Tz) -> DateSet
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a str>,
{
    raws.into_iter()
        .filter_map(|raw| match parse_timestamp(raw) {
            Ok(ts) => Some(local_day(ts, tz)),
            Err(error) => {
                tracing::warn!(timestamp = raw, error = %error, "skipping record with bad timestamp");
                None
            }
        })
        .collect()
}

/// Bucket pre-keyed `YYYY-MM-DD` strings (gratitude and creativity entries
/// store their local day directly). Same skip-and-warn policy.
pub fn date_set_from_keys<'a, I>(raws: I) -> DateSet
where
    I: IntoIterator<Item = &'a str>,
{
    raws.into_iter()
        .filter_map(|raw| match parse_date_key(raw) {
            Ok(day) => Some(day),
            Err(error) => {
                tracing::warn!(date = raw, error = %error, "skipping record with bad date key");
                None
            }
        })
        .collect()
}

/// Consecutive-day streak ending at `as_of`, with a one-day grace: if `as_of`
/// itself has no entry but the day before does, the streak is still alive and
/// counts from yesterday backward. The user has until the end of today to
/// keep it going.
pub fn compute_streak(dates: &DateSet, as_of: NaiveDate) -> u32 {
    let anchor = if dates.contains(&as_of) {
        as_of
    } else {
        match as_of.pred_opt() {
            Some(yesterday) if dates.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut day = anchor;
    while dates.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

/// Percentage of (day x activity) slots filled across all sets over the
/// `window_days` days ending at `as_of` inclusive, rounded to the nearest
/// integer. One headline number, unweighted across activities.
pub fn completion_rate(sets: &[&DateSet], window_days: u32, as_of: NaiveDate) -> u32 {
    if sets.is_empty() || window_days == 0 {
        return 0;
    }

    let mut hits: u64 = 0;
    let mut day = as_of;
    for _ in 0..window_days {
        for set in sets {
            if set.contains(&day) {
                hits += 1;
            }
        }
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }

    let slots = window_days as u64 * sets.len() as u64;
    ((hits as f64 / slots as f64) * 100.0).round() as u32
}

/// Calendar grid for one month: leading days from the previous month so the
/// first row starts on Sunday, every day of the month, then trailing days to
/// pad the final row to a full week. Each cell carries a flag per activity.
///
/// An out-of-range `month` is a caller bug and fails immediately.
pub fn build_calendar_month(
    year: i32,
    month: u32,
    sets: &ActivityDateSets,
) -> AppResult<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Internal(format!("invalid calendar month {year}-{month}")))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| AppError::Internal(format!("invalid calendar month {year}-{month}")))?;
    let days_in_month = next_first.signed_duration_since(first).num_days() as u32;

    let leading = first.weekday().num_days_from_sunday();
    let total = (leading + days_in_month).div_ceil(7) * 7;
    let start = first
        .checked_sub_days(Days::new(u64::from(leading)))
        .ok_or_else(|| AppError::Internal(format!("invalid calendar month {year}-{month}")))?;

    Ok(start
        .iter_days()
        .take(total as usize)
        .map(|day| CalendarDay {
            date: date_key(day),
            day: day.day(),
            is_current_month: day.year() == year && day.month() == month,
            has_answer: sets.answers.contains(&day),
            has_affirmation: sets.affirmations.contains(&day),
            has_gratitude: sets.gratitude.contains(&day),
            has_creativity: sets.creativity.contains(&day),
        })
        .collect())
}

/// Assemble the dashboard stats from raw totals and per-activity date sets.
///
/// `longest_streak` is the highest of the three current streaks, not a
/// historical maximum over all time.
pub fn activity_stats(
    totals: ActivityTotals,
    sets: &ActivityDateSets,
    as_of: NaiveDate,
) -> ActivityStats {
    let affirmation_streak = compute_streak(&sets.affirmations, as_of);
    let gratitude_streak = compute_streak(&sets.gratitude, as_of);
    let creativity_streak = compute_streak(&sets.creativity, as_of);

    ActivityStats {
        total_answers: totals.answers,
        total_affirmations: totals.affirmation_logs,
        total_gratitude_items: totals.gratitude_items,
        total_creativity_entries: totals.creativity_entries,
        total_answer_days: sets.answers.len() as u64,
        total_affirmation_days: sets.affirmations.len() as u64,
        total_gratitude_days: sets.gratitude.len() as u64,
        total_creativity_days: sets.creativity.len() as u64,
        current_affirmation_streak: affirmation_streak,
        current_gratitude_streak: gratitude_streak,
        current_creativity_streak: creativity_streak,
        longest_streak: affirmation_streak
            .max(gratitude_streak)
            .max(creativity_streak),
        completion_rate: completion_rate(&sets.all(), COMPLETION_WINDOW_DAYS, as_of),
    }
}
