//! Work/break duration configuration

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

use super::Phase;

/// Durations for the two timer phases, in seconds.
///
/// A zero duration means "not chosen yet". Such a config can be stored, but
/// [`TimerConfig::validate`] rejects it and the timer refuses to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default)]
    pub work_seconds: u64,
    #[serde(default)]
    pub break_seconds: u64,
}

impl TimerConfig {
    pub const DEFAULT_WORK_MINUTES: u64 = 25;
    pub const DEFAULT_BREAK_MINUTES: u64 = 5;

    /// Work durations offered by the timer view, in seconds
    pub const WORK_PRESETS: [u64; 4] = [6, 25 * 60, 45 * 60, 60 * 60];
    /// Break durations offered by the timer view, in seconds
    pub const BREAK_PRESETS: [u64; 4] = [6, 5 * 60, 10 * 60, 15 * 60];

    pub fn new(work_seconds: u64, break_seconds: u64) -> Self {
        Self {
            work_seconds,
            break_seconds,
        }
    }

    pub fn from_minutes(work_minutes: u64, break_minutes: u64) -> Self {
        Self::new(
            work_minutes.saturating_mul(60),
            break_minutes.saturating_mul(60),
        )
    }

    /// Configured duration of the given phase
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_seconds,
            Phase::Break => self.break_seconds,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.work_seconds > 0 && self.break_seconds > 0
    }

    /// Both durations must be positive before a phase may run
    pub fn validate(&self) -> Result<(), TimerError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(TimerError::Configuration {
                work_seconds: self.work_seconds,
                break_seconds: self.break_seconds,
            })
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_minutes(Self::DEFAULT_WORK_MINUTES, Self::DEFAULT_BREAK_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_twenty_five_and_five() {
        let config = TimerConfig::default();
        assert_eq!(config.work_seconds, 1500);
        assert_eq!(config.break_seconds, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(TimerConfig::new(0, 60).validate().is_err());
        assert!(TimerConfig::new(60, 0).validate().is_err());
    }

    #[test]
    fn missing_fields_deserialize_as_unset() {
        let config: TimerConfig = serde_json::from_str(r#"{"break_seconds": 30}"#).unwrap();
        assert_eq!(config, TimerConfig::new(0, 30));
        assert!(!config.is_complete());
    }
}
