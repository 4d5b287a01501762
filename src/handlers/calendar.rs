use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};

use crate::db::queries;
use crate::services::calendar::{feed_ics, single_event_ics};
use crate::state::AppState;

// GET /calendar/:provider_id/feed.ics
pub async fn provider_feed(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Response {
    let today = Utc::now().naive_utc().date();

    let (provider, appointments) = {
        let db = state.db.lock().unwrap();
        let provider = match queries::get_provider(&db, &provider_id) {
            Ok(Some(p)) => p,
            Ok(None) => {
                return (StatusCode::NOT_FOUND, "Provider not found").into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load provider for feed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        };
        let to = today + Duration::days(provider.booking_limit_days);
        match queries::get_appointments_for_provider(&db, &provider_id, today, to) {
            Ok(appointments) => (provider, appointments),
            Err(e) => {
                tracing::error!(error = %e, "failed to load appointments for feed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        }
    };

    let ics = feed_ics(&appointments, &provider.display_name);

    (
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        ics,
    )
        .into_response()
}

// GET /calendar/appointment/:id
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    // Strip .ics suffix if present
    let appointment_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let appointment = {
        let db = state.db.lock().unwrap();
        match queries::get_appointment_by_id(&db, appointment_id) {
            Ok(Some(a)) => a,
            Ok(None) => {
                return (StatusCode::NOT_FOUND, "Appointment not found").into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load appointment for .ics");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        }
    };

    let provider_name = {
        let db = state.db.lock().unwrap();
        queries::get_provider(&db, &appointment.provider_id)
            .ok()
            .flatten()
            .map(|p| p.display_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Appointment".to_string())
    };

    let ics = single_event_ics(&appointment, &provider_name);
    let filename = format!("appointment-{appointment_id}.ics");

    (
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                &format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response()
}
