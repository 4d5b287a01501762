use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::parse_date;
use crate::services::availability;
use crate::state::AppState;

// GET /api/providers/:id/available-dates
#[derive(Deserialize)]
pub struct DatesQuery {
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct DateResponse {
    date: String,
    day_of_week: u8,
    day_name: String,
    is_available: bool,
    reason: Option<String>,
}

pub async fn available_dates(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<DatesQuery>,
) -> Result<Json<Vec<DateResponse>>, AppError> {
    let now = Utc::now().naive_utc();

    let dates = {
        let db = state.db.lock().unwrap();
        let provider = queries::get_provider(&db, &provider_id)?
            .ok_or_else(|| AppError::NotFound(format!("provider {provider_id}")))?;
        let days = query.days.unwrap_or(provider.booking_limit_days);
        availability::available_dates(&db, &provider, days, now, state.config.hide_past_slots_today)?
    };

    let response = dates
        .into_iter()
        .map(|d| DateResponse {
            date: d.date.format("%Y-%m-%d").to_string(),
            day_of_week: d.day_of_week,
            day_name: d.day_name,
            is_available: d.is_available,
            reason: d.reason.map(|r| r.as_str().to_string()),
        })
        .collect();

    Ok(Json(response))
}

// GET /api/providers/:id/available-slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct SlotResponse {
    start_time: String,
    end_time: String,
    capacity: u32,
    booked_count: i64,
    remaining_slots: i64,
    is_available: bool,
}

pub async fn available_slots(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<SlotResponse>>, AppError> {
    let date = query
        .date
        .as_deref()
        .ok_or_else(|| AppError::Validation("date query parameter is required".to_string()))?;
    let date = parse_date(date).map_err(|e| AppError::Validation(e.to_string()))?;
    let now = Utc::now().naive_utc();

    let slots = {
        let db = state.db.lock().unwrap();
        let provider = queries::get_provider(&db, &provider_id)?
            .ok_or_else(|| AppError::NotFound(format!("provider {provider_id}")))?;
        availability::available_slots(&db, &provider, date, now, state.config.hide_past_slots_today)?
    };

    let response = slots
        .into_iter()
        .map(|s| SlotResponse {
            start_time: s.window.start_time.format("%H:%M").to_string(),
            end_time: s.window.end_time.format("%H:%M").to_string(),
            capacity: s.window.capacity,
            booked_count: s.booked_count,
            remaining_slots: s.remaining_slots,
            is_available: s.is_available,
        })
        .collect();

    Ok(Json(response))
}
