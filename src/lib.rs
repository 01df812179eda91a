//! Pomodoro Gate - A work/break interval timer service
//!
//! Each open timer counts a work phase down once per second, then freezes and
//! waits for the user to acknowledge before moving into a break. Breaks start
//! by themselves on acknowledgement; the next work phase needs an explicit start.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, PomodoroTimer, TimerConfig, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
