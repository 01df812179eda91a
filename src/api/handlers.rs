//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;
use uuid::Uuid;

use crate::state::{AppState, TimerConfig, TimerSession};
use super::{
    error::ApiError,
    responses::{
        HealthResponse, OpenTimerRequest, PresetsResponse, StatusResponse, TimerResponse,
    },
};

fn find_timer(state: &AppState, id: Uuid) -> Result<Arc<TimerSession>, ApiError> {
    state
        .get_timer(id)
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::TimerNotFound(id))
}

/// Handle POST /timers - Open a timer view
pub async fn open_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OpenTimerRequest>,
) -> Result<(StatusCode, Json<TimerResponse>), ApiError> {
    let config = request.config(state.default_config);
    let session = state
        .open_timer(request.task, config)
        .map_err(ApiError::Internal)?;
    Ok((StatusCode::CREATED, Json(TimerResponse::from_session(&session))))
}

/// Handle GET /timers - List open timers
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TimerResponse>>, ApiError> {
    let sessions = state.list_timers().map_err(ApiError::Internal)?;
    Ok(Json(sessions.iter().map(|s| TimerResponse::from_session(s)).collect()))
}

/// Handle GET /timers/:id - Current snapshot
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle DELETE /timers/:id - Close the view and tear the timer down
pub async fn close_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = state
        .close_timer(id)
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::TimerNotFound(id))?;
    info!("Close endpoint called for timer {}", id);
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle POST /timers/:id/start - Start or resume
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    session.timer.start()?;
    state.record_action("start");
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle POST /timers/:id/pause - Pause, keeping remaining time
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    session.timer.pause();
    state.record_action("pause");
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle POST /timers/:id/reset - Back to a full, idle work phase
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    session.timer.reset();
    state.record_action("reset");
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle POST /timers/:id/acknowledge - Dismiss the phase-end notification
pub async fn acknowledge_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    session.timer.acknowledge_transition();
    state.record_action("acknowledge");
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle PUT /timers/:id/config - Change durations while idle
pub async fn config_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(config): Json<TimerConfig>,
) -> Result<Json<TimerResponse>, ApiError> {
    let session = find_timer(&state, id)?;
    if !session.timer.update_config(config) {
        return Err(ApiError::ConfigLocked(id));
    }
    state.record_action("config");
    Ok(Json(TimerResponse::from_session(&session)))
}

/// Handle GET /presets - Durations offered by the selectors
pub async fn presets_handler(State(state): State<Arc<AppState>>) -> Json<PresetsResponse> {
    Json(PresetsResponse {
        work_seconds: TimerConfig::WORK_PRESETS.to_vec(),
        break_seconds: TimerConfig::BREAK_PRESETS.to_vec(),
        default: state.default_config,
    })
}

/// Handle GET /status - Return server status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let sessions = state.list_timers().map_err(ApiError::Internal)?;
    let snapshots: Vec<_> = sessions.iter().map(|s| s.timer.snapshot()).collect();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        open_timers: snapshots.len(),
        running_timers: snapshots.iter().filter(|s| s.is_running()).count(),
        pending_timers: snapshots.iter().filter(|s| s.is_pending()).count(),
        default_config: state.default_config,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
