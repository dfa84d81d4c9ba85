//! # Lifetrace Utilities
//!
//! Shared utilities for Lifetrace.
//!
//! Currently this is the logging setup used by the `lifetrace` binary and by
//! hosts embedding the recorder, built on `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
