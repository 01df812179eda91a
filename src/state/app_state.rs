//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use super::{PomodoroTimer, TimerConfig, TimerEvent};

/// One open timer view, usually tied to a todo item
#[derive(Debug)]
pub struct TimerSession {
    pub task: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub timer: PomodoroTimer,
}

impl TimerSession {
    pub fn id(&self) -> Uuid {
        self.timer.id()
    }
}

/// Main application state that owns every open timer
#[derive(Debug)]
pub struct AppState {
    /// Durations used when a timer is opened without its own
    pub default_config: TimerConfig,
    timers: Mutex<HashMap<Uuid, Arc<TimerSession>>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Lifecycle events from all timers
    pub events_tx: broadcast::Sender<TimerEvent>,
}

impl AppState {
    pub fn new(port: u16, host: String, default_config: TimerConfig) -> Self {
        let (events_tx, _) = broadcast::channel(100);

        Self {
            default_config,
            timers: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            events_tx,
        }
    }

    /// Open a new timer view, idle at the start of a work phase
    pub fn open_timer(
        &self,
        task: Option<String>,
        config: Option<TimerConfig>,
    ) -> Result<Arc<TimerSession>, String> {
        let config = config.unwrap_or(self.default_config);
        let id = Uuid::new_v4();
        let session = Arc::new(TimerSession {
            task,
            opened_at: Utc::now(),
            timer: PomodoroTimer::new(id, config, self.events_tx.clone()),
        });

        self.timers.lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?
            .insert(id, Arc::clone(&session));

        match &session.task {
            Some(task) => info!("Opened timer {} for task: {}", id, task),
            None => info!("Opened timer {}", id),
        }
        self.record_action("open");
        Ok(session)
    }

    pub fn get_timer(&self, id: Uuid) -> Result<Option<Arc<TimerSession>>, String> {
        self.timers.lock()
            .map(|timers| timers.get(&id).cloned())
            .map_err(|e| format!("Failed to lock timer registry: {}", e))
    }

    /// All open timers, oldest first
    pub fn list_timers(&self) -> Result<Vec<Arc<TimerSession>>, String> {
        let mut sessions: Vec<_> = self.timers.lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?
            .values()
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.opened_at);
        Ok(sessions)
    }

    /// Tear down a timer view and forget it
    pub fn close_timer(&self, id: Uuid) -> Result<Option<Arc<TimerSession>>, String> {
        let removed = self.timers.lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?
            .remove(&id);

        if let Some(session) = &removed {
            session.timer.close();
            self.record_action("close");
        }
        Ok(removed)
    }

    /// Close every open timer, returning how many there were
    pub fn close_all(&self) -> Result<usize, String> {
        let drained: Vec<_> = self.timers.lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))?
            .drain()
            .map(|(_, session)| session)
            .collect();

        for session in &drained {
            session.timer.close();
        }
        if !drained.is_empty() {
            info!("Closed {} open timer(s)", drained.len());
        }
        Ok(drained.len())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.events_tx.subscribe()
    }

    /// Remember the latest user action for status reporting
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
