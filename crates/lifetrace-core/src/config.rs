//! # Recorder Configuration
//!
//! Settings that shape how much work each recorded event costs.
//!
//! ## Environment Variables
//!
//! - `LIFETRACE_BACKTRACE`: capture a call stack per event (`1`/`0`,
//!   `true`/`false`, `on`/`off`, `yes`/`no`; default: off)
//! - `LIFETRACE_BACKTRACE_DEPTH`: maximum frames kept per event (default: 1024)
//! - `LIFETRACE_SKIP_FRAMES`: frames dropped from every capture past the
//!   recorder's own dispatch frames, to hide host hook glue (default: 0)
//!
//! ## Example
//!
//! ```rust
//! use lifetrace_core::config::RecorderConfig;
//!
//! let config = RecorderConfig::default().with_backtrace(true).with_max_depth(64);
//! assert!(config.backtrace_enabled);
//! assert_eq!(config.max_depth, 64);
//! ```

use std::env;

use crate::error::{RecorderError, RecorderResult};

/// Default upper bound on captured frames per event.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Default number of frames discarded beyond the recorder's own dispatch frames.
///
/// The recorder's dispatch frames are always removed; this only covers
/// host hook glue, which the recorder cannot recognise.
pub const DEFAULT_SKIP_FRAMES: usize = 0;

const ENV_BACKTRACE: &str = "LIFETRACE_BACKTRACE";
const ENV_DEPTH: &str = "LIFETRACE_BACKTRACE_DEPTH";
const ENV_SKIP: &str = "LIFETRACE_SKIP_FRAMES";

/// Recorder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig
{
    /// Whether backtraces are captured initially. Toggled later with
    /// `set_backtrace_capture`.
    pub backtrace_enabled: bool,
    /// Maximum number of frames kept per backtrace. Must be non-zero.
    pub max_depth: usize,
    /// Frames discarded from every backtrace beyond the recorder's own.
    pub skip_frames: usize,
}

impl Default for RecorderConfig
{
    fn default() -> Self
    {
        Self {
            backtrace_enabled: false,
            max_depth: DEFAULT_MAX_DEPTH,
            skip_frames: DEFAULT_SKIP_FRAMES,
        }
    }
}

impl RecorderConfig
{
    /// Build a configuration from `LIFETRACE_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// ## Errors
    ///
    /// Returns [`RecorderError::InvalidConfig`] if a variable is set to a
    /// value that cannot be parsed, or if the resulting configuration is
    /// invalid.
    pub fn from_env() -> RecorderResult<Self>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    ///
    /// ## Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> RecorderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_BACKTRACE) {
            config.backtrace_enabled = parse_bool(ENV_BACKTRACE, &value)?;
        }
        if let Some(value) = lookup(ENV_DEPTH) {
            config.max_depth = parse_usize(ENV_DEPTH, &value)?;
        }
        if let Some(value) = lookup(ENV_SKIP) {
            config.skip_frames = parse_usize(ENV_SKIP, &value)?;
        }

        config.validate()?;
        tracing::debug!(?config, "loaded recorder configuration");
        Ok(config)
    }

    #[must_use]
    pub fn with_backtrace(mut self, enabled: bool) -> Self
    {
        self.backtrace_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self
    {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_skip_frames(mut self, skip_frames: usize) -> Self
    {
        self.skip_frames = skip_frames;
        self
    }

    /// Check that the configuration is usable.
    ///
    /// ## Errors
    ///
    /// Returns [`RecorderError::InvalidConfig`] if `max_depth` is zero.
    pub fn validate(&self) -> RecorderResult<()>
    {
        if self.max_depth == 0 {
            return Err(RecorderError::InvalidConfig {
                key: "max_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> RecorderResult<bool>
{
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_usize(key: &str, value: &str) -> RecorderResult<usize>
{
    value.trim().parse::<usize>().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> RecorderError
{
    RecorderError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}
