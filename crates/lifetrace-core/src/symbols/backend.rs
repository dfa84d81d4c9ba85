//! Symbol resolution backends.
//!
//! A backend answers "which function contains this address?" without any
//! caching of its own; [`SymbolResolver`](super::SymbolResolver) memoizes on
//! top of it.

use std::ffi::CStr;

use super::demangle::make_symbol_name;
use crate::types::{Address, SymbolName};

/// Uncached address-to-symbol lookup.
pub trait SymbolBackend: Send + Sync
{
    /// Resolve `address` to the nearest known symbol, or `None` if no module claims it.
    fn resolve(&self, address: Address) -> Option<SymbolName>;
}

/// Nearest exported symbol using the dynamic loader's module tables.
///
/// Goes through `dladdr(3)`, which consults only dynamic symbol tables, so
/// static functions in stripped modules resolve to the closest preceding
/// export (or not at all).
#[cfg(unix)]
#[derive(Debug, Default, Clone, Copy)]
pub struct DladdrBackend;

#[cfg(unix)]
impl SymbolBackend for DladdrBackend
{
    fn resolve(&self, address: Address) -> Option<SymbolName>
    {
        if address == Address::ZERO {
            return None;
        }

        // SAFETY: `dladdr` only reads loader bookkeeping for the given address;
        // it never dereferences it. `info` is fully written on success, and the
        // returned strings live as long as the module stays loaded, so they are
        // copied out before returning.
        unsafe {
            let mut info: libc::Dl_info = std::mem::zeroed();
            if libc::dladdr(address.as_ptr().cast_const(), &mut info) == 0 || info.dli_sname.is_null() {
                return None;
            }

            let raw = CStr::from_ptr(info.dli_sname).to_string_lossy().into_owned();
            let module = (!info.dli_fname.is_null()).then(|| CStr::from_ptr(info.dli_fname).to_string_lossy().into_owned());
            let offset = (!info.dli_saddr.is_null())
                .then(|| address.value().saturating_sub(info.dli_saddr as usize as u64));

            Some(make_symbol_name(raw).with_location(module, offset))
        }
    }
}

/// Resolution through the `backtrace` crate's symbolizer.
///
/// Uses debug info when the binary carries it, which also names functions
/// that were never exported.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugInfoBackend;

impl SymbolBackend for DebugInfoBackend
{
    fn resolve(&self, address: Address) -> Option<SymbolName>
    {
        if address == Address::ZERO {
            return None;
        }

        let mut resolved = None;
        backtrace::resolve(address.as_ptr(), |symbol| {
            if resolved.is_some() {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            let raw = String::from_utf8_lossy(name.as_bytes()).into_owned();
            let module = symbol.filename().map(|path| path.display().to_string());
            let offset = symbol
                .addr()
                .map(|start| address.value().saturating_sub(start as usize as u64));
            resolved = Some(make_symbol_name(raw).with_location(module, offset));
        });
        resolved
    }
}

/// Backend used when none is supplied explicitly.
pub fn default_backend() -> Box<dyn SymbolBackend>
{
    #[cfg(unix)]
    {
        Box::new(DladdrBackend)
    }
    #[cfg(not(unix))]
    {
        Box::new(DebugInfoBackend)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[inline(never)]
    fn lifetrace_backend_probe() -> u32
    {
        7
    }

    #[test]
    fn test_zero_address_is_unresolved()
    {
        assert!(default_backend().resolve(Address::ZERO).is_none());
        assert!(DebugInfoBackend.resolve(Address::ZERO).is_none());
    }

    #[test]
    fn test_debug_info_resolves_own_function()
    {
        let address = Address::new(lifetrace_backend_probe as usize as u64);
        let Some(symbol) = DebugInfoBackend.resolve(address) else {
            // Test binaries built without symbols have nothing to find.
            return;
        };
        assert!(symbol.display_name().contains("lifetrace_backend_probe"));
    }
}
