use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// How a weekly window turns into bookable slots.
///
/// `TimeDivided` splits the window into fixed-length sub-slots, each
/// bookable by exactly one customer. `CountBased` treats the whole window
/// as one shared resource bookable by up to `max_capacity` customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMode {
    TimeDivided { minutes_per_slot: u32 },
    CountBased { max_capacity: u32 },
}

impl SlotMode {
    /// Build a mode from the wire shape (`is_count` flag plus metric).
    pub fn from_flag(is_count: bool, slot_metric: i64) -> anyhow::Result<Self> {
        let metric = u32::try_from(slot_metric)
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| anyhow::anyhow!("slot_metric must be a positive integer, got {slot_metric}"))?;

        Ok(if is_count {
            SlotMode::CountBased { max_capacity: metric }
        } else {
            SlotMode::TimeDivided { minutes_per_slot: metric }
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotMode::TimeDivided { .. } => "time_divided",
            SlotMode::CountBased { .. } => "count_based",
        }
    }

    pub fn parse(mode: &str, metric: u32) -> anyhow::Result<Self> {
        match mode {
            "time_divided" => Ok(SlotMode::TimeDivided { minutes_per_slot: metric }),
            "count_based" => Ok(SlotMode::CountBased { max_capacity: metric }),
            _ => Err(anyhow::anyhow!("unknown slot mode: {mode}")),
        }
    }

    pub fn metric(&self) -> u32 {
        match self {
            SlotMode::TimeDivided { minutes_per_slot } => *minutes_per_slot,
            SlotMode::CountBased { max_capacity } => *max_capacity,
        }
    }

    pub fn is_count(&self) -> bool {
        matches!(self, SlotMode::CountBased { .. })
    }
}

/// One recurring weekly availability rule for a provider.
///
/// Rules are immutable once created; an update is a delete plus a
/// recreate. Several rules may target the same weekday, and their
/// generated windows are additive.
#[derive(Debug, Clone)]
pub struct ScheduleRule {
    pub id: String,
    pub provider_id: String,
    /// 0-6, Sunday = 0.
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub mode: SlotMode,
    pub created_at: NaiveDateTime,
}

/// Weekday index with Sunday = 0, matching `ScheduleRule::day_of_week`.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

pub fn parse_day_of_week(raw: i64) -> anyhow::Result<u8> {
    if (0..=6).contains(&raw) {
        Ok(raw as u8)
    } else {
        Err(anyhow::anyhow!("day_of_week must be 0-6 (Sunday=0), got {raw}"))
    }
}

/// Parse a wall-clock time in the wire format `HH:MM`.
pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| anyhow::anyhow!("invalid time (expected HH:MM): {s}"))
}

/// Parse a calendar date in the wire format `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_flag_time_divided() {
        let mode = SlotMode::from_flag(false, 30).unwrap();
        assert_eq!(mode, SlotMode::TimeDivided { minutes_per_slot: 30 });
        assert_eq!(mode.as_str(), "time_divided");
        assert_eq!(mode.metric(), 30);
        assert!(!mode.is_count());
    }

    #[test]
    fn test_mode_from_flag_count_based() {
        let mode = SlotMode::from_flag(true, 50).unwrap();
        assert_eq!(mode, SlotMode::CountBased { max_capacity: 50 });
        assert_eq!(mode.as_str(), "count_based");
        assert_eq!(mode.metric(), 50);
        assert!(mode.is_count());
    }

    #[test]
    fn test_mode_rejects_non_positive_metric() {
        assert!(SlotMode::from_flag(false, 0).is_err());
        assert!(SlotMode::from_flag(true, -5).is_err());
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        let mode = SlotMode::from_flag(true, 12).unwrap();
        let parsed = SlotMode::parse(mode.as_str(), mode.metric()).unwrap();
        assert_eq!(parsed, mode);
        assert!(SlotMode::parse("hourly", 1).is_err());
    }

    #[test]
    fn test_day_of_week_sunday_is_zero() {
        // 2025-06-15 is a Sunday, 2025-06-16 a Monday
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()), 0);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()), 1);
        assert_eq!(day_of_week(NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()), 6);
    }

    #[test]
    fn test_parse_day_of_week_bounds() {
        assert_eq!(parse_day_of_week(0).unwrap(), 0);
        assert_eq!(parse_day_of_week(6).unwrap(), 6);
        assert!(parse_day_of_week(7).is_err());
        assert!(parse_day_of_week(-1).is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("9am").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-16").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
        );
        assert!(parse_date("16/06/2025").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }
}
