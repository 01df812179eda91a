//! Timer state structure and observable snapshot

use serde::{Deserialize, Serialize};

use super::{PendingTransition, TimerConfig};

/// The two timer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The transition raised when this phase counts down to zero
    pub fn completion(self) -> PendingTransition {
        match self {
            Phase::Work => PendingTransition::ToBreak,
            Phase::Break => PendingTransition::ToWork,
        }
    }
}

/// Mutable state of one timer instance.
///
/// `running` and `pending_transition` are never set together, and while a
/// transition is pending `remaining_seconds` stays at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
    pub pending_transition: Option<PendingTransition>,
}

impl TimerState {
    /// Idle at the start of a full work phase
    pub fn idle(config: &TimerConfig) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: config.work_seconds,
            running: false,
            pending_transition: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_pending(&self) -> bool {
        self.pending_transition.is_some()
    }

    /// Neither counting down nor waiting for an acknowledgement
    pub fn is_idle(&self) -> bool {
        !self.running && self.pending_transition.is_none()
    }

    /// Short status line for a timer view
    pub fn headline(&self) -> &'static str {
        if let Some(pending) = self.pending_transition {
            return pending.message();
        }
        match (self.running, self.phase) {
            (true, Phase::Work) => "Working...",
            (true, Phase::Break) => "Break time!",
            (false, _) => "Let's start working!",
        }
    }
}
