pub mod appointment;
pub mod provider;
pub mod schedule;
pub mod window;

pub use appointment::{Appointment, AppointmentStatus};
pub use provider::Provider;
pub use schedule::{day_of_week, parse_date, parse_day_of_week, parse_time, ScheduleRule, SlotMode};
pub use window::TimeWindow;
