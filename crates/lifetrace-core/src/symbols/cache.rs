//! # Symbol Cache
//!
//! Memoizing layer over a [`SymbolBackend`].
//!
//! Every distinct address reaches the backend at most once between two
//! calls to [`SymbolResolver::clear`]. Misses are cached too, so an address
//! that no module claims is not looked up again either.
//!
//! ## Usage
//!
//! ```rust
//! use lifetrace_core::symbols::SymbolResolver;
//! use lifetrace_core::types::Address;
//!
//! let resolver = SymbolResolver::new();
//! assert!(resolver.symbol_for(Address::ZERO).is_none());
//! assert_eq!(resolver.len(), 1);
//! ```

use std::collections::HashMap;

use parking_lot::Mutex;

use super::backend::{default_backend, SymbolBackend};
use crate::types::{Address, SymbolName};

/// Cached address-to-symbol resolution.
///
/// ## Thread Safety
///
/// The cache is guarded by a single mutex that is held across the backend
/// call on a miss. Concurrent lookups of one uncached address therefore
/// resolve it once, and lookups of other addresses wait at most one
/// resolution.
pub struct SymbolResolver
{
    backend: Box<dyn SymbolBackend>,
    entries: Mutex<HashMap<Address, Option<SymbolName>>>,
}

impl SymbolResolver
{
    /// Create an empty cache over the platform's default backend.
    pub fn new() -> Self
    {
        Self::with_backend(default_backend())
    }

    pub fn with_backend(backend: Box<dyn SymbolBackend>) -> Self
    {
        Self {
            backend,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `address`, consulting the backend only on the first request.
    pub fn symbol_for(&self, address: Address) -> Option<SymbolName>
    {
        let mut entries = self.entries.lock();
        if let Some(cached) = entries.get(&address) {
            return cached.clone();
        }

        let resolved = self.backend.resolve(address);
        tracing::trace!(%address, symbol = ?resolved.as_ref().map(SymbolName::display_name), "symbol cache miss");
        entries.insert(address, resolved.clone());
        resolved
    }

    /// Resolve every address of a backtrace, keeping their order.
    pub fn symbolicate(&self, backtrace: &[Address]) -> Vec<(Address, Option<SymbolName>)>
    {
        backtrace.iter().map(|&address| (address, self.symbol_for(address))).collect()
    }

    /// Forget every cached result.
    pub fn clear(&self)
    {
        self.entries.lock().clear();
    }

    /// Number of cached addresses, resolved or not.
    pub fn len(&self) -> usize
    {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries.lock().is_empty()
    }
}

impl Default for SymbolResolver
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl std::fmt::Debug for SymbolResolver
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("SymbolResolver").field("entries", &self.len()).finish_non_exhaustive()
    }
}
