//! Phase-end notification background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::{AppState, TimerEvent};

/// Text announced when a timer finishes a phase, if the event is one
pub fn notification_for(event: &TimerEvent, task: Option<&str>) -> Option<String> {
    let TimerEvent::PhaseCompleted { pending, .. } = event else {
        return None;
    };
    Some(match task {
        Some(task) => format!("{} ({})", pending.message(), task),
        None => pending.message().to_string(),
    })
}

/// Background task that announces finished phases until the event channel closes
pub async fn transition_notifier_task(state: Arc<AppState>) {
    info!("Starting transition notifier task");

    let mut events_rx = state.subscribe_events();

    loop {
        match events_rx.recv().await {
            Ok(event) => {
                let timer_id = event.timer_id();
                let task = match state.get_timer(timer_id) {
                    Ok(session) => session.and_then(|s| s.task.clone()),
                    Err(e) => {
                        warn!("Failed to look up timer {}: {}", timer_id, e);
                        None
                    }
                };

                match notification_for(&event, task.as_deref()) {
                    Some(message) => info!("Timer {}: {}", timer_id, message),
                    None => debug!("Timer event: {:?}", event),
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Transition notifier fell behind, {} event(s) dropped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer event channel closed, stopping transition notifier");
                break;
            }
        }
    }
}
