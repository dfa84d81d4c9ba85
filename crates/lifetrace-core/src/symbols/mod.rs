//! # Symbols
//!
//! Address-to-name resolution for captured backtraces.
//!
//! - [`SymbolBackend`]: a single uncached lookup strategy
//! - [`DladdrBackend`]: nearest exported symbol from the loader (unix)
//! - [`DebugInfoBackend`]: debug-info aware lookup via the `backtrace` crate
//! - [`SymbolResolver`]: the memoizing cache the recorder exposes

mod backend;
mod cache;
mod demangle;

#[cfg(unix)]
pub use backend::DladdrBackend;
pub use backend::{default_backend, DebugInfoBackend, SymbolBackend};
pub use cache::SymbolResolver;
