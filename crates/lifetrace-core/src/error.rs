//! # Error Types
//!
//! Errors for the configuration and installation paths of the recorder.
//!
//! The recording hot path (`notify`, `history_for`, `symbol_for`) has no
//! failure modes: unknown identities yield empty histories, unresolvable
//! addresses yield no symbol, and uninspectable objects are skipped. Only
//! setting the recorder up can fail.

use thiserror::Error;

/// Main error type for recorder setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError
{
    /// A configuration value could not be parsed or is out of range
    ///
    /// Raised by [`RecorderConfig::from_env`](crate::config::RecorderConfig::from_env)
    /// for malformed environment variables, and by recorder construction when
    /// a value is unusable (e.g. a backtrace depth of zero).
    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig
    {
        /// Name of the setting (environment variable or field)
        key: String,
        /// The rejected value as supplied
        value: String,
    },

    /// The process-wide recorder was already installed
    ///
    /// [`global::install`](crate::global::install) may succeed only once per
    /// process; the existing recorder stays in place.
    #[error("A process-wide recorder is already installed")]
    AlreadyInstalled,
}

/// Convenience type alias for `Result<T, RecorderError>`
///
/// ```rust
/// use lifetrace_core::error::RecorderResult;
/// fn foo() -> RecorderResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type RecorderResult<T> = std::result::Result<T, RecorderError>;
