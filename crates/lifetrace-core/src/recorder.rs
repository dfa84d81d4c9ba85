//! # Recorder
//!
//! The service object that owns every piece of recording state.
//!
//! A `Recorder` bundles the session controller, the event store (with its
//! backtrace capturer), and the symbol cache, and is the only thing hosts
//! and tools talk to. It is created explicitly; its store and cache start
//! empty and are reset, not recreated, by each [`begin_session`](Recorder::begin_session).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lifetrace_core::hooks::TypeRegistry;
//! use lifetrace_core::types::{EventKind, ObjectIdentity};
//! use lifetrace_core::Recorder;
//!
//! let host = Arc::new(TypeRegistry::new());
//! let recorder = Recorder::new(host.clone());
//!
//! let object = ObjectIdentity::from_raw(0x6000);
//! host.register(object, "MyAppFoo");
//!
//! recorder.begin_session(Some("MyApp"));
//! recorder.notify(object, EventKind::Allocate);
//! recorder.notify(object, EventKind::Retain);
//! assert_eq!(recorder.history_for(object).len(), 2);
//! ```

use std::sync::Arc;

use crate::capture::BacktraceCapturer;
use crate::config::RecorderConfig;
use crate::error::RecorderResult;
use crate::filter::can_record;
use crate::hooks::{HookGuard, HostRuntime};
use crate::session::{SessionController, SessionState};
use crate::store::EventStore;
use crate::symbols::{default_backend, SymbolBackend, SymbolResolver};
use crate::types::{Address, EventHistory, EventKind, LifecycleEvent, ObjectIdentity, SymbolName};

/// Memory-lifecycle event recorder.
pub struct Recorder
{
    host: Arc<dyn HostRuntime>,
    session: SessionController,
    store: EventStore,
    symbols: SymbolResolver,
}

impl Recorder
{
    /// Create a recorder with the default configuration and symbol backend.
    pub fn new(host: Arc<dyn HostRuntime>) -> Self
    {
        Self::build(host, &RecorderConfig::default(), default_backend())
    }

    /// Create a recorder with explicit settings.
    ///
    /// ## Errors
    ///
    /// Returns [`RecorderError::InvalidConfig`](crate::RecorderError::InvalidConfig)
    /// if `config` does not validate.
    pub fn with_config(host: Arc<dyn HostRuntime>, config: RecorderConfig) -> RecorderResult<Self>
    {
        Self::with_backend(host, config, default_backend())
    }

    /// Create a recorder with explicit settings and symbol backend.
    ///
    /// ## Errors
    ///
    /// Returns [`RecorderError::InvalidConfig`](crate::RecorderError::InvalidConfig)
    /// if `config` does not validate.
    pub fn with_backend(
        host: Arc<dyn HostRuntime>,
        config: RecorderConfig,
        backend: Box<dyn SymbolBackend>,
    ) -> RecorderResult<Self>
    {
        config.validate()?;
        Ok(Self::build(host, &config, backend))
    }

    fn build(host: Arc<dyn HostRuntime>, config: &RecorderConfig, backend: Box<dyn SymbolBackend>) -> Self
    {
        Self {
            host,
            session: SessionController::new(),
            store: EventStore::new(BacktraceCapturer::new(config)),
            symbols: SymbolResolver::with_backend(backend),
        }
    }

    /// Start a fresh session, discarding all histories and cached symbols.
    ///
    /// With `prefix`, only objects whose type name starts with it are
    /// recorded until the next `begin_session`, including across resumes.
    pub fn begin_session(&self, prefix: Option<&str>)
    {
        self.store.clear();
        self.symbols.clear();
        self.session.begin(prefix);
        tracing::info!(prefix = ?prefix, "recording session started");
    }

    /// Stop recording. Histories stay available.
    pub fn end_session(&self)
    {
        self.session.end();
        tracing::info!(
            identities = self.store.len(),
            events = self.store.total_events(),
            "recording session stopped"
        );
    }

    /// Continue a stopped session without clearing anything.
    pub fn resume_session(&self)
    {
        self.session.resume();
    }

    pub fn is_recording(&self) -> bool
    {
        self.session.is_recording()
    }

    pub fn state(&self) -> SessionState
    {
        self.session.state()
    }

    /// Enable or disable per-event backtraces, effective on the next event.
    pub fn set_backtrace_capture(&self, enabled: bool)
    {
        self.store.capturer().set_enabled(enabled);
        tracing::debug!(enabled, "backtrace capture toggled");
    }

    pub fn backtrace_capture(&self) -> bool
    {
        self.store.capturer().is_enabled()
    }

    /// Inbound hook: the host reports one lifecycle transition of `identity`.
    ///
    /// Records it if a session is recording and the object passes the class
    /// filter. Never fails and never touches the object. A call made while
    /// the same thread is already inside `notify` is ignored.
    #[inline(never)]
    pub fn notify(&self, identity: ObjectIdentity, kind: EventKind)
    {
        let Some(_guard) = HookGuard::enter() else {
            return;
        };
        if can_record(&self.session, self.host.as_ref(), identity) {
            self.store.record(identity, kind);
        }
    }

    /// Snapshot of the events recorded for `identity`.
    ///
    /// Histories are keyed by address: if the address was reused by a new
    /// object during the session, both objects' events appear here.
    ///
    /// Copying the history allocates under a store guard, so the thread is
    /// marked as inside the hook for the duration: notifications raised by an
    /// instrumented allocator meanwhile are dropped instead of re-entering
    /// the store.
    pub fn history_for(&self, identity: ObjectIdentity) -> EventHistory
    {
        let _guard = HookGuard::enter();
        self.store.history_for(identity)
    }

    /// Identities with at least one recorded event.
    pub fn tracked_identities(&self) -> Vec<ObjectIdentity>
    {
        let _guard = HookGuard::enter();
        self.store.identities()
    }

    /// Memoized symbol lookup for a backtrace address.
    pub fn symbol_for(&self, address: Address) -> Option<SymbolName>
    {
        self.symbols.symbol_for(address)
    }

    /// Resolve every frame of `event`'s backtrace.
    pub fn symbolicate(&self, event: &LifecycleEvent) -> Vec<(Address, Option<SymbolName>)>
    {
        self.symbols.symbolicate(&event.backtrace)
    }
}

impl std::fmt::Debug for Recorder
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Recorder")
            .field("session", &self.session)
            .field("store", &self.store)
            .field("symbols", &self.symbols)
            .finish_non_exhaustive()
    }
}
