use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Provider;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProviderResponse {
    id: String,
    display_name: String,
    booking_limit_days: i64,
}

impl From<Provider> for ProviderResponse {
    fn from(p: Provider) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
            booking_limit_days: p.booking_limit_days,
        }
    }
}

// PUT /api/providers/:id
#[derive(Deserialize)]
pub struct UpsertProviderRequest {
    pub display_name: String,
    pub booking_limit_days: Option<i64>,
}

pub async fn upsert_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpsertProviderRequest>,
) -> Result<Json<ProviderResponse>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::Validation("provider id is required".to_string()));
    }
    if body.display_name.trim().is_empty() {
        return Err(AppError::Validation("display_name is required".to_string()));
    }
    let booking_limit_days = body
        .booking_limit_days
        .unwrap_or(state.config.default_booking_limit_days);
    if booking_limit_days < 0 {
        return Err(AppError::Validation(
            "booking_limit_days must not be negative".to_string(),
        ));
    }

    let provider = Provider {
        id: id.trim().to_string(),
        display_name: body.display_name.trim().to_string(),
        booking_limit_days,
    };

    {
        let db = state.db.lock().unwrap();
        queries::upsert_provider(&db, &provider)?;
    }

    tracing::info!(provider_id = %provider.id, "provider profile upserted");
    Ok(Json(provider.into()))
}

// GET /api/providers/:id
pub async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProviderResponse>, AppError> {
    let provider = {
        let db = state.db.lock().unwrap();
        queries::get_provider(&db, &id)?
    };

    provider
        .map(|p| Json(p.into()))
        .ok_or_else(|| AppError::NotFound(format!("provider {id}")))
}
