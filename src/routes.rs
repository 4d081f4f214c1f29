// ABOUTME: HTTP route handlers exposing the engine operations as a JSON API
// ABOUTME: Auth is the gateway's concern; handlers trust the x-user-id header it installs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! JSON HTTP surface for the training engine.

use crate::engine::TrainingEngine;
use crate::errors::{EngineError, ErrorResponse};
use crate::intelligence::{FrequencyReport, StreakSummary, WeekComparison, WeeklyGrid};
use crate::models::{Insight, ProgramStatus, TrainingProgram};
use crate::trainer::constraints::GenerationRequest;
use crate::trainer::schedule::DailyResolution;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

/// Authenticated user id, installed by the gateway as `x-user-id`.
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());
        header.map(Self).ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": {
                        "code": "AUTH_REQUIRED",
                        "message": "missing or malformed x-user-id header",
                    }
                })),
            )
                .into_response()
        })
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}

/// Build the engine router.
#[must_use]
pub fn router(engine: TrainingEngine) -> Router {
    Router::new()
        .route(
            "/api/trainer/programs",
            post(generate_program).get(list_programs),
        )
        .route("/api/trainer/programs/active", get(get_active_program))
        .route("/api/trainer/programs/:program_id", get(get_program))
        .route(
            "/api/trainer/programs/:program_id/accept",
            post(accept_program),
        )
        .route("/api/trainer/daily-workout", get(get_daily_workout))
        .route("/api/insights", get(get_insights))
        .route("/api/dashboard/streak", get(get_streak))
        .route("/api/dashboard/weekly-grid", get(get_weekly_grid))
        .route("/api/dashboard/frequency", get(get_frequency_trend))
        .route("/api/dashboard/week-comparison", get(get_week_comparison))
        .route("/health", get(health))
        .with_state(engine)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}

async fn generate_program(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Json(request): Json<GenerationRequest>,
) -> Result<(StatusCode, Json<TrainingProgram>), EngineError> {
    debug!(user_id = %user_id, "program generation requested");
    let program = engine
        .generate_program(user_id, &request, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(program)))
}

async fn accept_program(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Path(program_id): Path<Uuid>,
) -> Result<Json<TrainingProgram>, EngineError> {
    let program = engine
        .accept_program(user_id, program_id, Utc::now())
        .await?;
    Ok(Json(program))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<ProgramStatus>,
}

async fn list_programs(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TrainingProgram>>, EngineError> {
    let programs = engine.list_programs(user_id, params.status).await?;
    Ok(Json(programs))
}

async fn get_program(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Path(program_id): Path<Uuid>,
) -> Result<Json<TrainingProgram>, EngineError> {
    let program = engine.get_program(user_id, program_id).await?;
    Ok(Json(program))
}

async fn get_active_program(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
) -> Result<Json<Option<TrainingProgram>>, EngineError> {
    let program = engine.get_active_program(user_id).await?;
    Ok(Json(program))
}

async fn get_daily_workout(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
) -> Result<Json<DailyResolution>, EngineError> {
    let resolution = engine
        .get_daily_workout(user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(resolution))
}

#[derive(Debug, Deserialize)]
struct InsightParams {
    limit: Option<usize>,
}

async fn get_insights(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Query(params): Query<InsightParams>,
) -> Result<Json<Vec<Insight>>, EngineError> {
    let now = Utc::now();
    let insights = engine
        .get_insights(user_id, now.date_naive(), now, params.limit)
        .await?;
    Ok(Json(insights))
}

async fn get_streak(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
) -> Result<Json<StreakSummary>, EngineError> {
    let streak = engine
        .get_streak(user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(streak))
}

async fn get_weekly_grid(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
) -> Result<Json<WeeklyGrid>, EngineError> {
    let grid = engine
        .get_weekly_grid(user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(grid))
}

#[derive(Debug, Deserialize)]
struct FrequencyParams {
    weeks: Option<u32>,
}

async fn get_frequency_trend(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
    Query(params): Query<FrequencyParams>,
) -> Result<Json<FrequencyReport>, EngineError> {
    let report = engine
        .get_frequency_trend(user_id, Utc::now().date_naive(), params.weeks)
        .await?;
    Ok(Json(report))
}

async fn get_week_comparison(
    State(engine): State<TrainingEngine>,
    UserId(user_id): UserId,
) -> Result<Json<WeekComparison>, EngineError> {
    let comparison = engine
        .get_week_comparison(user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(comparison))
}
