//! # exbreak Utilities
//!
//! Shared utilities for exbreak.
//!
//! Currently this is the logging bootstrap built on `tracing`; the core
//! crate only emits events and leaves subscriber setup to the host.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    default_log_path, init_logging, init_logging_to_file, init_logging_with_level, LogFormat, LogLevel, LoggingError, LoggingGuard,
};
pub use tracing::{debug, error, info, trace, warn};
