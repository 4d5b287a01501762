use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub default_booking_limit_days: i64,
    pub hide_past_slots_today: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "slotbook.db".to_string()),
            default_booking_limit_days: env::var("DEFAULT_BOOKING_LIMIT_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            hide_past_slots_today: env::var("HIDE_PAST_SLOTS_TODAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
