//! # lifetrace-core
//!
//! Memory-lifecycle event recording for leak and over-retention diagnosis.
//!
//! The host object runtime reports every allocation, ownership increase,
//! ownership decrease, and destruction through [`Recorder::notify`]. While a
//! session is recording, each accepted event is appended, with the call
//! stack active at that moment, to an ordered per-object history that can
//! be browsed later with [`Recorder::history_for`] and
//! [`Recorder::symbol_for`].
//!
//! ## Components
//!
//! - [`session`]: recording state machine and class-prefix filter
//! - [`filter`]: which objects get recorded
//! - [`store`]: concurrent identity-keyed histories
//! - [`capture`]: bounded backtrace capture on the calling thread
//! - [`symbols`]: memoized address-to-symbol resolution
//! - [`hooks`]: the host runtime contract
//! - [`global`]: an optional process-wide instance for hook glue
//!
//! ## Why unsafe code is needed
//!
//! Resolving exported symbols calls `dladdr(3)` through `libc`. The call is
//! wrapped in [`symbols::DladdrBackend`]; nothing else in the crate is unsafe.

#![allow(unsafe_code)] // Required for dladdr symbol lookup

pub mod capture;
pub mod config;
pub mod error;
pub mod filter;
pub mod global;
pub mod hooks;
pub mod recorder;
pub mod session;
pub mod store;
pub mod symbols;
pub mod types;

// Re-export commonly used types
pub use config::RecorderConfig;
pub use error::{RecorderError, RecorderResult};
pub use hooks::{HostRuntime, TypeRegistry};
pub use recorder::Recorder;
pub use session::SessionState;
pub use types::{Address, EventHistory, EventKind, LifecycleEvent, ObjectIdentity, SymbolName};
