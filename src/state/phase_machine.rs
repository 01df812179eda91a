//! Work/break phase state machine
//!
//! ```text
//! Idle(Work, full)  --start-->        Running(Work)
//! Running(Work)     --pause-->        Idle(Work, partial)
//! Running(Work)     --tick to 0-->    Pending(ToBreak)
//! Pending(ToBreak)  --acknowledge-->  Running(Break)
//! Running(Break)    --tick to 0-->    Pending(ToWork)
//! Pending(ToWork)   --acknowledge-->  Idle(Work, full)
//! any               --reset-->        Idle(Work, full)
//! ```
//!
//! The machine holds no clock. Whoever owns it calls [`PhaseMachine::tick`]
//! once per elapsed second while [`TimerState::running`] is set.

use tracing::debug;

use crate::error::TimerError;

use super::{Phase, PendingTransition, TimerConfig, TimerState};

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer is not running; nothing changed
    Idle,
    /// One second was taken off the current phase
    Counting { remaining_seconds: u64 },
    /// The phase reached zero and now waits for acknowledgement
    Completed {
        phase: Phase,
        pending: PendingTransition,
    },
}

#[derive(Debug, Clone)]
pub struct PhaseMachine {
    config: TimerConfig,
    state: TimerState,
}

impl PhaseMachine {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            state: TimerState::idle(&config),
            config,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Begin or resume counting down.
    ///
    /// Returns `Ok(true)` when the timer went from stopped to running and
    /// `Ok(false)` when it was already running or a transition is pending.
    pub fn start(&mut self) -> Result<bool, TimerError> {
        self.config.validate()?;

        if self.state.running || self.state.pending_transition.is_some() {
            debug!("start ignored: running={}, pending={:?}",
                   self.state.running, self.state.pending_transition);
            return Ok(false);
        }

        if self.state.remaining_seconds == 0 {
            self.state.remaining_seconds = self.config.duration_of(self.state.phase);
        }
        self.state.running = true;
        Ok(true)
    }

    /// Stop counting down, keeping the remaining time. Returns whether the
    /// timer was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.state.running, false)
    }

    /// Back to a full, idle work phase from any state
    pub fn reset(&mut self) {
        self.state = TimerState::idle(&self.config);
    }

    /// Consume the pending transition, if any, and enter the next phase
    pub fn acknowledge_transition(&mut self) -> Option<PendingTransition> {
        let pending = self.state.pending_transition.take()?;
        let phase = pending.target();
        self.state.phase = phase;
        self.state.remaining_seconds = self.config.duration_of(phase);
        self.state.running = pending.auto_runs();
        Some(pending)
    }

    /// Take one second off the running phase.
    ///
    /// Reaching zero stops the timer and records the pending transition in
    /// the same step, so no later tick can observe a running timer at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return TickOutcome::Counting {
                remaining_seconds: self.state.remaining_seconds,
            };
        }

        let phase = self.state.phase;
        let pending = phase.completion();
        self.state.running = false;
        self.state.pending_transition = Some(pending);
        TickOutcome::Completed { phase, pending }
    }

    /// Replace the durations while idle.
    ///
    /// The remaining time is reseeded from the new duration of the current
    /// phase. Returns `false`, leaving everything untouched, while running or
    /// while a transition is pending.
    pub fn update_config(&mut self, config: TimerConfig) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        self.config = config;
        self.state.remaining_seconds = config.duration_of(self.state.phase);
        true
    }
}
