//! Symbol name types.

use std::fmt;

/// Programming language associated with a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolLanguage
{
    /// Rust symbol (detected via mangling or namespace patterns).
    Rust,
    /// C++ symbol (Itanium mangling without Rust extensions).
    Cpp,
    /// C symbol or unmangled global.
    C,
    /// Unknown or mixed language.
    Unknown,
}

impl fmt::Display for SymbolLanguage
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolLanguage::Rust => "rust",
            SymbolLanguage::Cpp => "c++",
            SymbolLanguage::C => "c",
            SymbolLanguage::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// A resolved function name with demangling metadata.
///
/// Besides the name itself, a resolution may know which loaded module the
/// address belongs to and how far past the symbol's start it lies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
    language: SymbolLanguage,
    module: Option<String>,
    offset: Option<u64>,
}

impl SymbolName
{
    /// Construct from a raw linkage name.
    pub fn new(raw: String, demangled: Option<String>, language: SymbolLanguage) -> Self
    {
        Self {
            raw,
            demangled,
            language,
            module: None,
            offset: None,
        }
    }

    /// Attach the containing module path and the address's offset past the symbol start.
    #[must_use]
    pub fn with_location(mut self, module: Option<String>, offset: Option<u64>) -> Self
    {
        self.module = module;
        self.offset = offset;
        self
    }

    /// Raw (mangled) name as exported by the module.
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Demangled human-friendly name if available.
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    /// Preferred presentation (demangled fallback to raw).
    pub fn display_name(&self) -> &str
    {
        self.demangled.as_deref().unwrap_or(&self.raw)
    }

    /// Language classification for the symbol.
    pub fn language(&self) -> SymbolLanguage
    {
        self.language
    }

    /// Path of the loaded module that exports the symbol, if known.
    pub fn module(&self) -> Option<&str>
    {
        self.module.as_deref()
    }

    /// Distance in bytes from the symbol's start to the resolved address.
    pub fn offset(&self) -> Option<u64>
    {
        self.offset
    }
}

/// Renders as `name+0xoffset`, dropping the offset when unknown or zero.
impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self.offset {
            Some(offset) if offset > 0 => write!(f, "{}+0x{offset:x}", self.display_name()),
            _ => write!(f, "{}", self.display_name()),
        }
    }
}
