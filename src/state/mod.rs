//! State management module
//!
//! This module contains the timer state machine, its observable state and
//! the application state that owns every open timer.

pub mod app_state;
pub mod phase_machine;
pub mod pomodoro_timer;
pub mod timer_config;
pub mod timer_state;
pub mod transition;

// Re-export main types
pub use app_state::{AppState, TimerSession};
pub use phase_machine::{PhaseMachine, TickOutcome};
pub use pomodoro_timer::PomodoroTimer;
pub use timer_config::TimerConfig;
pub use timer_state::{Phase, TimerState};
pub use transition::{PendingTransition, TimerEvent};
