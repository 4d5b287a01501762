use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{parse_day_of_week, parse_time, ScheduleRule, SlotMode};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ScheduleRuleResponse {
    id: String,
    provider_id: String,
    day_of_week: u8,
    start_time: String,
    end_time: String,
    slot_mode: String,
    slot_metric: u32,
    created_at: String,
}

impl From<ScheduleRule> for ScheduleRuleResponse {
    fn from(rule: ScheduleRule) -> Self {
        Self {
            id: rule.id,
            provider_id: rule.provider_id,
            day_of_week: rule.day_of_week,
            start_time: rule.start_time.format("%H:%M").to_string(),
            end_time: rule.end_time.format("%H:%M").to_string(),
            slot_mode: rule.mode.as_str().to_string(),
            slot_metric: rule.mode.metric(),
            created_at: rule.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// POST /api/providers/:id/schedule
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub slot_metric: i64,
    pub is_count: bool,
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
    Json(body): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<ScheduleRuleResponse>), AppError> {
    let day_of_week = parse_day_of_week(body.day_of_week)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let start_time =
        parse_time(&body.start_time).map_err(|e| AppError::Validation(e.to_string()))?;
    let end_time = parse_time(&body.end_time).map_err(|e| AppError::Validation(e.to_string()))?;
    if start_time >= end_time {
        return Err(AppError::Validation(
            "start_time must be before end_time".to_string(),
        ));
    }
    let mode = SlotMode::from_flag(body.is_count, body.slot_metric)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let rule = {
        let db = state.db.lock().unwrap();
        if queries::get_provider(&db, &provider_id)?.is_none() {
            return Err(AppError::NotFound(format!("provider {provider_id}")));
        }
        let rule = ScheduleRule {
            id: Uuid::new_v4().to_string(),
            provider_id: provider_id.clone(),
            day_of_week,
            start_time,
            end_time,
            mode,
            created_at: Utc::now().naive_utc(),
        };
        queries::create_schedule_rule(&db, &rule)?;
        rule
    };

    tracing::info!(
        provider_id = %provider_id,
        rule_id = %rule.id,
        day_of_week = rule.day_of_week,
        "schedule rule created"
    );
    Ok((StatusCode::CREATED, Json(rule.into())))
}

// GET /api/providers/:id/schedule
pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Path(provider_id): Path<String>,
) -> Result<Json<Vec<ScheduleRuleResponse>>, AppError> {
    let rules = {
        let db = state.db.lock().unwrap();
        if queries::get_provider(&db, &provider_id)?.is_none() {
            return Err(AppError::NotFound(format!("provider {provider_id}")));
        }
        queries::get_schedule_rules(&db, &provider_id)?
    };

    Ok(Json(rules.into_iter().map(Into::into).collect()))
}

// DELETE /api/providers/:id/schedule/:rule_id
pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path((provider_id, rule_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_schedule_rule(&db, &provider_id, &rule_id)?
    };

    if deleted {
        tracing::info!(provider_id = %provider_id, rule_id = %rule_id, "schedule rule deleted");
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("schedule rule {rule_id}")))
    }
}
