//! Timer error types

use thiserror::Error;

/// Errors reported by timer operations.
///
/// Operations attempted in the wrong state are no-ops, not errors; the only
/// failure is trying to run a phase without usable durations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("work and break durations must both be set and positive (work={work_seconds}s, break={break_seconds}s)")]
    Configuration { work_seconds: u64, break_seconds: u64 },
}
