//! Background tasks module
//!
//! This module contains the tick stream that drives running timers and the
//! task that announces finished phases.

pub mod tick_scheduler;
pub mod transition_notifier;

// Re-export main types and functions
pub use tick_scheduler::{TickFlow, TickScheduler, TickToken, TICK_PERIOD};
pub use transition_notifier::transition_notifier_task;
