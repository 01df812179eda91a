//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::TimerConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomodoro-gate")]
#[command(about = "A work/break interval timer service with acknowledgement-gated phase transitions")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default work phase duration in minutes
    #[arg(short, long, default_value_t = TimerConfig::DEFAULT_WORK_MINUTES)]
    pub work: u64,

    /// Default break phase duration in minutes
    #[arg(short, long = "break", default_value_t = TimerConfig::DEFAULT_BREAK_MINUTES)]
    pub break_minutes: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Durations for timers opened without their own
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig::from_minutes(self.work, self.break_minutes)
    }
}
