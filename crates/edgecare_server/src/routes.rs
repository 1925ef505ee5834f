use std::sync::Arc;

use axum::debug_handler;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header::SET_COOKIE},
    response::IntoResponse,
};
use chrono::Utc;
use edgecare_core::observability::Health;
use edgecare_core::{CoachWeeklyReport, LogEntry, SubmitOutcome, WeeklyChart, WeeklySummary};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::session::{CurrentUser, Role, SESSION_COOKIE};

const PLAYERS_ONLY: &str = "Unauthorized: Players only.";
const COACHES_ONLY: &str = "Unauthorized";

fn default_severity() -> i64 {
    edgecare_core::form::DEFAULT_SEVERITY
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LogPainRequest {
    #[serde(default)]
    pub body_part: String,
    #[serde(default = "default_severity")]
    pub severity: i64,
}

#[debug_handler]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = Health::readiness(state.store.as_ref()).await;
    let status = if health.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

#[debug_handler]
pub async fn metrics_endpoint(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|m| m.render())
        .unwrap_or_default();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|_| ApiError::Validation("Invalid request body.".into()))?;
    let username = req.username.trim();
    let Some(user) = state.users.authenticate(username, &req.password) else {
        warn!(username, "rejected login");
        return Err(ApiError::Unauthorized(
            "Invalid username or password.".into(),
        ));
    };

    let token = state.sessions.sign(&user.username);
    info!(username = %user.username, role = ?user.role, "login");
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            role: user.role,
        }),
    ))
}

#[debug_handler]
pub async fn log_pain(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<LogPainRequest>, JsonRejection>,
) -> ApiResult<Json<SubmitOutcome>> {
    user.require(Role::Player, PLAYERS_ONLY)?;
    let Json(req) = body.map_err(|_| ApiError::Validation("Invalid request body.".into()))?;
    let outcome = state
        .service
        .submit_pain(&user.username, &req.body_part, req.severity)
        .await?;
    Ok(Json(outcome))
}

#[debug_handler]
pub async fn log_no_pain(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<SubmitOutcome>> {
    user.require(Role::Player, PLAYERS_ONLY)?;
    let outcome = state.service.submit_no_pain(&user.username).await?;
    Ok(Json(outcome))
}

#[debug_handler]
pub async fn recent_logs(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<LogEntry>>> {
    user.require(Role::Player, PLAYERS_ONLY)?;
    Ok(Json(state.service.recent_logs(&user.username).await?))
}

#[debug_handler]
pub async fn weekly_summary(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<WeeklySummary>> {
    user.require(Role::Player, PLAYERS_ONLY)?;
    let summary = state
        .service
        .weekly_summary(&user.username, Utc::now())
        .await?;
    Ok(Json(summary))
}

#[debug_handler]
pub async fn weekly_data(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<WeeklyChart>> {
    user.require(Role::Player, PLAYERS_ONLY)?;
    let chart = state
        .service
        .weekly_chart(&user.username, Utc::now())
        .await?;
    Ok(Json(chart))
}

#[debug_handler]
pub async fn players(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<String>>> {
    user.require(Role::Coach, COACHES_ONLY)?;
    Ok(Json(state.service.athletes().await?))
}

#[debug_handler]
pub async fn coach_weekly(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(player_id): Path<String>,
) -> ApiResult<Json<CoachWeeklyReport>> {
    user.require(Role::Coach, COACHES_ONLY)?;
    let report = state.service.coach_report(&player_id, Utc::now()).await?;
    Ok(Json(report))
}
