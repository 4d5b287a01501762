pub mod availability;
pub mod bookings;
pub mod calendar;
pub mod health;
pub mod providers;
pub mod schedule;
