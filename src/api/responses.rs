//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    state::{TimerConfig, TimerSession, TimerState},
    utils::format_clock,
};

/// Body of POST /timers; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenTimerRequest {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub work_seconds: Option<u64>,
    #[serde(default)]
    pub break_seconds: Option<u64>,
}

impl OpenTimerRequest {
    /// Durations for the new timer, falling back to `defaults` per field
    pub fn config(&self, defaults: TimerConfig) -> Option<TimerConfig> {
        if self.work_seconds.is_none() && self.break_seconds.is_none() {
            return None;
        }
        Some(TimerConfig::new(
            self.work_seconds.unwrap_or(defaults.work_seconds),
            self.break_seconds.unwrap_or(defaults.break_seconds),
        ))
    }
}

/// Snapshot of one timer as a view renders it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub id: Uuid,
    pub task: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub config: TimerConfig,
    pub state: TimerState,
    /// Remaining time as `MM:SS`
    pub display: String,
    pub headline: String,
    /// Set while a transition waits for acknowledgement
    pub notification: Option<String>,
    pub closed: bool,
}

impl TimerResponse {
    pub fn from_session(session: &TimerSession) -> Self {
        let (config, state) = session.timer.view();
        Self {
            id: session.id(),
            task: session.task.clone(),
            opened_at: session.opened_at,
            config,
            state,
            display: format_clock(state.remaining_seconds),
            headline: state.headline().to_string(),
            notification: state.pending_transition.map(|p| p.message().to_string()),
            closed: session.timer.is_closed(),
        }
    }
}

/// Server status with a summary of open timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub open_timers: usize,
    pub running_timers: usize,
    pub pending_timers: usize,
    pub default_config: TimerConfig,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Durations a view offers in its selectors, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub work_seconds: Vec<u64>,
    pub break_seconds: Vec<u64>,
    pub default: TimerConfig,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
