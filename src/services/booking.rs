use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Appointment, AppointmentStatus, TimeWindow};
use crate::services::slots;

/// Admission failure taxonomy. Everything the booking path can reject
/// a request with, plus the database escape hatch.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    OutOfWindow(String),
    #[error("{0}")]
    OutOfHorizon(String),
    #[error("{0}")]
    SlotFull(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(anyhow::Error),
}

impl AdmissionError {
    pub fn kind(&self) -> &'static str {
        match self {
            AdmissionError::NotFound(_) => "not_found",
            AdmissionError::OutOfWindow(_) => "out_of_window",
            AdmissionError::OutOfHorizon(_) => "out_of_horizon",
            AdmissionError::SlotFull(_) => "slot_full",
            AdmissionError::Validation(_) => "validation",
            AdmissionError::Database(_) => "internal",
        }
    }
}

impl From<anyhow::Error> for AdmissionError {
    fn from(err: anyhow::Error) -> Self {
        AdmissionError::Database(err)
    }
}

impl From<rusqlite::Error> for AdmissionError {
    fn from(err: rusqlite::Error) -> Self {
        AdmissionError::Database(err.into())
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub provider_id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub service_description: Option<String>,
}

/// Admits a booking or rejects it with a taxonomy error. The whole
/// check-then-insert runs in one IMMEDIATE transaction so the recount
/// is the arbiter: of N concurrent requests for a window with K seats,
/// exactly min(N, K) commit.
///
/// The stored end time always comes from the resolved window; callers
/// never supply one.
pub fn book(
    conn: &mut Connection,
    request: &BookingRequest,
    now: NaiveDateTime,
    hide_past_today: bool,
) -> Result<Appointment, AdmissionError> {
    validate_request(request)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let provider = queries::get_provider(&tx, &request.provider_id)?
        .ok_or_else(|| AdmissionError::NotFound(format!("Provider {} not found", request.provider_id)))?;

    check_horizon(
        request.date,
        request.start_time,
        now,
        provider.booking_limit_days,
        hide_past_today,
    )?;

    let rules = queries::get_schedule_rules(&tx, &provider.id)?;
    let windows = slots::windows_for_date(&rules, request.date);
    if windows.is_empty() {
        return Err(AdmissionError::NotFound(format!(
            "No bookable windows on {}",
            request.date.format("%Y-%m-%d")
        )));
    }

    // windows arrive sorted by (start, end), so same-start overlaps are
    // tried shortest window first
    let matching: Vec<&TimeWindow> = windows
        .iter()
        .filter(|w| w.start_time == request.start_time)
        .collect();
    if matching.is_empty() {
        return Err(AdmissionError::OutOfWindow(format!(
            "No window starts at {} on {}",
            request.start_time.format("%H:%M"),
            request.date.format("%Y-%m-%d")
        )));
    }

    let mut resolved = None;
    for window in matching {
        let scheduled = queries::count_scheduled(
            &tx,
            &provider.id,
            request.date,
            window.start_time,
            window.end_time,
        )?;
        if scheduled < i64::from(window.capacity) {
            resolved = Some(window);
            break;
        }
    }
    let window = resolved.ok_or_else(|| {
        AdmissionError::SlotFull(format!(
            "Slot {} on {} is fully booked",
            request.start_time.format("%H:%M"),
            request.date.format("%Y-%m-%d")
        ))
    })?;

    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        customer_id: request.customer_id.trim().to_string(),
        provider_id: provider.id.clone(),
        appointment_date: request.date,
        start_time: window.start_time,
        end_time: window.end_time,
        status: AppointmentStatus::Scheduled,
        service_description: request.service_description.clone(),
        created_at: now,
        updated_at: now,
    };
    queries::create_appointment(&tx, &appointment)?;
    tx.commit()?;

    Ok(appointment)
}

fn validate_request(request: &BookingRequest) -> Result<(), AdmissionError> {
    if request.provider_id.trim().is_empty() {
        return Err(AdmissionError::Validation("provider_id is required".to_string()));
    }
    if request.customer_id.trim().is_empty() {
        return Err(AdmissionError::Validation("customer_id is required".to_string()));
    }
    Ok(())
}

/// The horizon runs from today through `today + booking_limit_days`.
/// With the past-start policy on, a window on today that has already
/// started is out of reach too.
fn check_horizon(
    date: NaiveDate,
    start_time: NaiveTime,
    now: NaiveDateTime,
    booking_limit_days: i64,
    hide_past_today: bool,
) -> Result<(), AdmissionError> {
    let today = now.date();
    if date < today {
        return Err(AdmissionError::OutOfHorizon(format!(
            "{} is in the past",
            date.format("%Y-%m-%d")
        )));
    }
    let last = today + Duration::days(booking_limit_days.max(0));
    if date > last {
        return Err(AdmissionError::OutOfHorizon(format!(
            "{} is beyond the booking horizon ({} days)",
            date.format("%Y-%m-%d"),
            booking_limit_days
        )));
    }
    if date == today && hide_past_today && start_time <= now.time() {
        return Err(AdmissionError::OutOfHorizon(format!(
            "{} today has already started",
            start_time.format("%H:%M")
        )));
    }
    Ok(())
}
