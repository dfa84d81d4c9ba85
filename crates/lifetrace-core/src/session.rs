//! # Session Controller
//!
//! Recording state machine and the active class-name filter.
//!
//! ```text
//!            begin                 end
//!   Idle ───────────▶ Recording ─────────▶ Stopped
//!                        ▲   ▲                │
//!                        │   └──── resume ────┘
//!                        └──── begin (any state)
//! ```
//!
//! The state lives in an atomic and is read on every notification; the
//! prefix filter is read under a shared lock and written only by `begin`.
//! A notification racing with a transition on another thread may land on
//! either side of it.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::RwLock;

/// Recording state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState
{
    /// No session has been started yet.
    Idle,
    /// Events are being appended.
    Recording,
    /// The session was ended; stored data is kept and may be resumed.
    Stopped,
}

impl SessionState
{
    const fn to_raw(self) -> u8
    {
        match self {
            SessionState::Idle => 0,
            SessionState::Recording => 1,
            SessionState::Stopped => 2,
        }
    }

    const fn from_raw(raw: u8) -> Self
    {
        match raw {
            1 => SessionState::Recording,
            2 => SessionState::Stopped,
            _ => SessionState::Idle,
        }
    }
}

impl fmt::Display for SessionState
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Stopped => "stopped",
        };
        write!(f, "{label}")
    }
}

/// Process-wide session flag and class-prefix filter.
///
/// Only transitions the state; clearing the store and symbol cache on
/// `begin` is done by the owning [`Recorder`](crate::Recorder), which
/// calls [`begin`](Self::begin) after the reset.
#[derive(Debug)]
pub struct SessionController
{
    state: AtomicU8,
    class_prefix: RwLock<Option<String>>,
}

impl Default for SessionController
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl SessionController
{
    pub fn new() -> Self
    {
        Self {
            state: AtomicU8::new(SessionState::Idle.to_raw()),
            class_prefix: RwLock::new(None),
        }
    }

    pub fn state(&self) -> SessionState
    {
        SessionState::from_raw(self.state.load(Ordering::Acquire))
    }

    pub fn is_recording(&self) -> bool
    {
        self.state() == SessionState::Recording
    }

    /// Start recording from any state, replacing the prefix filter.
    pub fn begin(&self, prefix: Option<&str>)
    {
        *self.class_prefix.write() = prefix.map(str::to_owned);
        self.set_state(SessionState::Recording);
        tracing::debug!(prefix = ?prefix, "session begun");
    }

    /// Stop recording; stored data and the filter are kept.
    ///
    /// Ending an idle controller leaves it idle.
    pub fn end(&self)
    {
        let moved = self
            .state
            .compare_exchange(
                SessionState::Recording.to_raw(),
                SessionState::Stopped.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        tracing::debug!(moved, state = %self.state(), "session ended");
    }

    /// Continue a stopped session with the filter from the last `begin`.
    ///
    /// Has no effect unless the controller is stopped.
    pub fn resume(&self)
    {
        let resumed = self
            .state
            .compare_exchange(
                SessionState::Stopped.to_raw(),
                SessionState::Recording.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if resumed {
            tracing::debug!("session resumed");
        } else {
            tracing::debug!(state = %self.state(), "resume ignored, session is not stopped");
        }
    }

    /// The prefix set by the last `begin`, if any.
    pub fn class_prefix(&self) -> Option<String>
    {
        self.class_prefix.read().clone()
    }

    /// Run `f` against the current prefix without copying it.
    pub(crate) fn with_class_prefix<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> R
    {
        let prefix = self.class_prefix.read();
        f(prefix.as_deref())
    }

    fn set_state(&self, state: SessionState)
    {
        self.state.store(state.to_raw(), Ordering::Release);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_starts_idle()
    {
        let session = SessionController::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.is_recording());
        assert_eq!(session.class_prefix(), None);
    }

    #[test]
    fn test_begin_end_resume_cycle()
    {
        let session = SessionController::new();
        session.begin(Some("Foo"));
        assert!(session.is_recording());

        session.end();
        assert_eq!(session.state(), SessionState::Stopped);
        // Ending twice is harmless.
        session.end();
        assert_eq!(session.state(), SessionState::Stopped);

        session.resume();
        assert!(session.is_recording());
        assert_eq!(session.class_prefix().as_deref(), Some("Foo"));
    }

    #[test]
    fn test_resume_requires_stopped()
    {
        let session = SessionController::new();
        session.resume();
        assert_eq!(session.state(), SessionState::Idle);
        session.end();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_begin_replaces_prefix()
    {
        let session = SessionController::new();
        session.begin(Some("Foo"));
        session.begin(Some("Bar"));
        assert_eq!(session.class_prefix().as_deref(), Some("Bar"));
        session.begin(None);
        assert_eq!(session.class_prefix(), None);
        assert!(session.is_recording());
    }
}
