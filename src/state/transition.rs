//! Phase-end notifications and the acknowledgement gate
//!
//! When a phase counts down to zero the timer does not move on by itself. It
//! freezes and records a [`PendingTransition`], which stays in place until the
//! owner of the timer acknowledges it. Front ends render the pending value as
//! whatever blocking notification suits them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Phase, TimerState};

/// Direction of a phase change waiting for acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingTransition {
    ToBreak,
    ToWork,
}

impl PendingTransition {
    /// Phase entered once the transition is acknowledged
    pub fn target(self) -> Phase {
        match self {
            PendingTransition::ToBreak => Phase::Break,
            PendingTransition::ToWork => Phase::Work,
        }
    }

    /// Whether the next phase starts counting down on acknowledgement.
    ///
    /// Breaks begin immediately; the next work session waits for `start()`.
    pub fn auto_runs(self) -> bool {
        matches!(self, PendingTransition::ToBreak)
    }

    /// Notification text shown to the user
    pub fn message(self) -> &'static str {
        match self {
            PendingTransition::ToBreak => "Times up! Take a break",
            PendingTransition::ToWork => "Go back to work!",
        }
    }
}

/// Lifecycle notifications published by every timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    Started {
        timer_id: Uuid,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Paused {
        timer_id: Uuid,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Reset {
        timer_id: Uuid,
        state: TimerState,
        at: DateTime<Utc>,
    },
    /// A phase reached zero and is waiting for acknowledgement
    PhaseCompleted {
        timer_id: Uuid,
        completed: Phase,
        pending: PendingTransition,
        at: DateTime<Utc>,
    },
    TransitionAcknowledged {
        timer_id: Uuid,
        transition: PendingTransition,
        state: TimerState,
        at: DateTime<Utc>,
    },
    Closed {
        timer_id: Uuid,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    pub fn timer_id(&self) -> Uuid {
        match self {
            TimerEvent::Started { timer_id, .. }
            | TimerEvent::Paused { timer_id, .. }
            | TimerEvent::Reset { timer_id, .. }
            | TimerEvent::PhaseCompleted { timer_id, .. }
            | TimerEvent::TransitionAcknowledged { timer_id, .. }
            | TimerEvent::Closed { timer_id, .. } => *timer_id,
        }
    }
}
