use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{parse_date, parse_time, Appointment, AppointmentStatus};
use crate::services::booking::{self, BookingRequest};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AppointmentResponse {
    id: String,
    customer_id: String,
    provider_id: String,
    appointment_date: String,
    start_time: String,
    end_time: String,
    status: String,
    service_description: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            customer_id: a.customer_id,
            provider_id: a.provider_id,
            appointment_date: a.appointment_date.format("%Y-%m-%d").to_string(),
            start_time: a.start_time.format("%H:%M").to_string(),
            end_time: a.end_time.format("%H:%M").to_string(),
            status: a.status.as_str().to_string(),
            service_description: a.service_description,
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: a.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub provider_id: String,
    pub customer_id: String,
    pub appointment_date: String,
    pub start_time: String,
    pub service_description: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let date =
        parse_date(&body.appointment_date).map_err(|e| AppError::Validation(e.to_string()))?;
    let start_time =
        parse_time(&body.start_time).map_err(|e| AppError::Validation(e.to_string()))?;

    let request = BookingRequest {
        provider_id: body.provider_id,
        customer_id: body.customer_id,
        date,
        start_time,
        service_description: body.service_description,
    };
    let now = Utc::now().naive_utc();

    let appointment = {
        let mut db = state.db.lock().unwrap();
        booking::book(&mut db, &request, now, state.config.hide_past_slots_today)?
    };

    tracing::info!(
        appointment_id = %appointment.id,
        provider_id = %appointment.provider_id,
        date = %appointment.appointment_date,
        start = %appointment.start_time.format("%H:%M"),
        "booking admitted"
    );
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

// GET /api/providers/:id/bookings
#[derive(Deserialize)]
pub struct ProviderBookingsQuery {
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn provider_bookings(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<ProviderBookingsQuery>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let today = Utc::now().naive_utc().date();

    let appointments = {
        let db = state.db.lock().unwrap();
        let provider = queries::get_provider(&db, &provider_id)?
            .ok_or_else(|| AppError::NotFound(format!("provider {provider_id}")))?;

        let (from, to) = match &query.date {
            Some(raw) => {
                let date = parse_date(raw).map_err(|e| AppError::Validation(e.to_string()))?;
                (date, date)
            }
            None => {
                let from = match &query.from {
                    Some(raw) => parse_date(raw).map_err(|e| AppError::Validation(e.to_string()))?,
                    None => today,
                };
                let to = match &query.to {
                    Some(raw) => parse_date(raw).map_err(|e| AppError::Validation(e.to_string()))?,
                    None => today + Duration::days(provider.booking_limit_days),
                };
                (from, to)
            }
        };

        queries::get_appointments_for_provider(&db, &provider_id, from, to)?
    };

    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

// GET /api/customers/:id/bookings
pub async fn customer_bookings(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_appointments_for_customer(&db, &customer_id)?
    };

    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_appointment_status(&db, &id, &AppointmentStatus::Cancelled)?
    };

    if updated {
        tracing::info!(appointment_id = %id, "appointment cancelled");
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("appointment {id}")))
    }
}
