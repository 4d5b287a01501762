use chrono::{Duration, NaiveDate};

use crate::models::{day_of_week, ScheduleRule, SlotMode, TimeWindow};

/// Expands one schedule rule into the concrete time windows it produces
/// on the given date. The windows exist only for the duration of the
/// request; nothing here touches the database.
///
/// TimeDivided rules tile the window front-to-back and drop a trailing
/// remainder shorter than the slot length. CountBased rules produce a
/// single window spanning the whole rule.
pub fn expand_rule(rule: &ScheduleRule, date: NaiveDate) -> Vec<TimeWindow> {
    match rule.mode {
        SlotMode::CountBased { max_capacity } => {
            if rule.start_time >= rule.end_time {
                return vec![];
            }
            vec![TimeWindow {
                provider_id: rule.provider_id.clone(),
                date,
                start_time: rule.start_time,
                end_time: rule.end_time,
                capacity: max_capacity,
            }]
        }
        SlotMode::TimeDivided { minutes_per_slot } => {
            let step = Duration::minutes(i64::from(minutes_per_slot));
            let mut windows = vec![];
            let mut start = rule.start_time;
            loop {
                let (end, wrapped) = start.overflowing_add_signed(step);
                // wrapped != 0 means the slot crossed midnight
                if wrapped != 0 || end > rule.end_time {
                    break;
                }
                windows.push(TimeWindow {
                    provider_id: rule.provider_id.clone(),
                    date,
                    start_time: start,
                    end_time: end,
                    capacity: 1,
                });
                start = end;
            }
            windows
        }
    }
}

/// All windows the provider's rules produce on a date, sorted by
/// start then end time. Rules sharing a weekday each contribute their
/// own windows; overlapping windows are kept distinct, never merged.
pub fn windows_for_date(rules: &[ScheduleRule], date: NaiveDate) -> Vec<TimeWindow> {
    let day = day_of_week(date);
    let mut windows: Vec<TimeWindow> = rules
        .iter()
        .filter(|rule| rule.day_of_week == day)
        .flat_map(|rule| expand_rule(rule, date))
        .collect();
    windows.sort_by_key(|w| (w.start_time, w.end_time));
    windows
}
