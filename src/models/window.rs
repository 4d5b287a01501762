use chrono::{NaiveDate, NaiveTime};

/// A concrete bookable time range on a specific date, derived from a
/// weekly rule. Windows are produced fresh on every query and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub provider_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub capacity: u32,
}
