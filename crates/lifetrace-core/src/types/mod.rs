//! # Types
//!
//! Value types shared by the recorder's components.
//!
//! None of these own or point at observed objects; identities and addresses
//! are plain integers.

pub mod address;
pub mod event;
pub mod identity;
pub mod symbols;

// Re-export all public types
pub use address::Address;
pub use event::{EventHistory, EventKind, LifecycleEvent};
pub use identity::ObjectIdentity;
pub use symbols::{SymbolLanguage, SymbolName};
