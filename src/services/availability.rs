use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{day_of_week, Provider, TimeWindow};
use crate::services::slots;

/// Why a date has nothing bookable. Availability lookups annotate with
/// these; they never produce admission errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnavailableReason {
    NoSchedule,
    FullyBooked,
    NoBookableTime,
}

impl UnavailableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailableReason::NoSchedule => "no_schedule",
            UnavailableReason::FullyBooked => "fully_booked",
            UnavailableReason::NoBookableTime => "no_bookable_time",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotAvailability {
    pub window: TimeWindow,
    pub booked_count: i64,
    pub remaining_slots: i64,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub day_of_week: u8,
    pub day_name: String,
    pub is_available: bool,
    pub reason: Option<UnavailableReason>,
}

/// Every window the provider offers on `date`, annotated with its live
/// booking count. Exhausted windows stay in the list with
/// `is_available = false`; callers filter, we annotate.
pub fn available_slots(
    conn: &Connection,
    provider: &Provider,
    date: NaiveDate,
    now: NaiveDateTime,
    hide_past_today: bool,
) -> anyhow::Result<Vec<SlotAvailability>> {
    let rules = queries::get_schedule_rules(conn, &provider.id)?;
    let windows = slots::windows_for_date(&rules, date);
    let counts = queries::scheduled_counts(conn, &provider.id, date)?;
    Ok(annotate(windows, &counts, now, hide_past_today))
}

/// Availability for each date in `today .. today + min(days, limit) - 1`.
/// The whole range is returned; unavailable dates carry a reason instead
/// of being dropped.
pub fn available_dates(
    conn: &Connection,
    provider: &Provider,
    days: i64,
    now: NaiveDateTime,
    hide_past_today: bool,
) -> anyhow::Result<Vec<DateAvailability>> {
    let effective = days.min(provider.booking_limit_days);
    if effective <= 0 {
        return Ok(vec![]);
    }

    let rules = queries::get_schedule_rules(conn, &provider.id)?;
    let today = now.date();

    let mut dates = vec![];
    for offset in 0..effective {
        let date = today + Duration::days(offset);
        let windows = slots::windows_for_date(&rules, date);
        let counts = queries::scheduled_counts(conn, &provider.id, date)?;
        let annotated = annotate(windows, &counts, now, hide_past_today);
        let (is_available, reason) = classify(&annotated);
        dates.push(DateAvailability {
            date,
            day_of_week: day_of_week(date),
            day_name: date.format("%A").to_string(),
            is_available,
            reason,
        });
    }
    Ok(dates)
}

fn annotate(
    windows: Vec<TimeWindow>,
    counts: &[queries::ScheduledCount],
    now: NaiveDateTime,
    hide_past_today: bool,
) -> Vec<SlotAvailability> {
    let by_window: HashMap<(NaiveTime, NaiveTime), i64> = counts
        .iter()
        .map(|c| ((c.start_time, c.end_time), c.scheduled))
        .collect();

    windows
        .into_iter()
        .map(|window| {
            let booked_count = by_window
                .get(&(window.start_time, window.end_time))
                .copied()
                .unwrap_or(0);
            // an overfull window reads as zero remaining, never negative
            let remaining_slots = (i64::from(window.capacity) - booked_count).max(0);
            let bookable = is_bookable(&window, now, hide_past_today);
            SlotAvailability {
                is_available: remaining_slots > 0 && bookable,
                window,
                booked_count,
                remaining_slots,
            }
        })
        .collect()
}

/// Past dates are never offered. Whether an already-started window on
/// today is offered depends on the `hide_past_today` policy.
fn is_bookable(window: &TimeWindow, now: NaiveDateTime, hide_past_today: bool) -> bool {
    let today = now.date();
    if window.date < today {
        return false;
    }
    if window.date == today && hide_past_today && window.start_time <= now.time() {
        return false;
    }
    true
}

fn classify(slots: &[SlotAvailability]) -> (bool, Option<UnavailableReason>) {
    if slots.is_empty() {
        return (false, Some(UnavailableReason::NoSchedule));
    }
    if slots.iter().any(|s| s.is_available) {
        return (true, None);
    }
    if slots.iter().all(|s| s.remaining_slots == 0) {
        return (false, Some(UnavailableReason::FullyBooked));
    }
    (false, Some(UnavailableReason::NoBookableTime))
}
