//! Symbol demangling utilities.
//!
//! Exported symbol tables hold linkage names. This module turns them into
//! [`SymbolName`]s carrying a demangled form and a language guess:
//!
//! - Rust symbols: start with `_R` or `_ZN`, or contain `::`
//! - C++ symbols: start with `_Z` (Itanium mangling)
//! - C symbols: plain identifiers with no mangling

use rustc_demangle::try_demangle;

use crate::types::{SymbolLanguage, SymbolName};

/// Create a `SymbolName` from a raw linkage name.
///
/// Rust names are demangled with `rustc_demangle`, hash suffix removed.
/// Other names keep only their raw form.
pub(crate) fn make_symbol_name(raw: String) -> SymbolName
{
    let demangled = try_demangle(&raw).ok().map(|d| format!("{d:#}"));
    let language = classify(&raw, demangled.is_some());
    SymbolName::new(raw, demangled, language)
}

fn classify(raw: &str, rust_demangled: bool) -> SymbolLanguage
{
    if rust_demangled || raw.starts_with("_R") || raw.contains("::") {
        SymbolLanguage::Rust
    } else if raw.starts_with("_Z") {
        SymbolLanguage::Cpp
    } else if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.')
    {
        SymbolLanguage::C
    } else {
        SymbolLanguage::Unknown
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_rust_legacy_symbol_is_demangled()
    {
        let name = make_symbol_name("_ZN4core3ptr13drop_in_place17h0123456789abcdefE".to_string());
        assert_eq!(name.language(), SymbolLanguage::Rust);
        assert_eq!(name.demangled(), Some("core::ptr::drop_in_place"));
        assert_eq!(name.display_name(), "core::ptr::drop_in_place");
    }

    #[test]
    fn test_c_symbol_keeps_raw_name()
    {
        let name = make_symbol_name("malloc".to_string());
        assert_eq!(name.language(), SymbolLanguage::C);
        assert_eq!(name.demangled(), None);
        assert_eq!(name.display_name(), "malloc");
    }

    #[test]
    fn test_itanium_symbol_is_cpp()
    {
        let name = make_symbol_name("_Z3fooi".to_string());
        assert_eq!(name.language(), SymbolLanguage::Cpp);
        assert_eq!(name.raw(), "_Z3fooi");
    }
}
