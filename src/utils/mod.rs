//! Utility functions module
//!
//! Shutdown signal handling and display formatting.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::format_clock;
pub use signals::shutdown_signal;
