//! # Hook Integration
//!
//! The contract between the recorder and the host object runtime.
//!
//! The host is responsible for calling [`Recorder::notify`](crate::Recorder::notify)
//! (or [`global::notify`](crate::global::notify)) exactly once per creation,
//! ownership change, and destruction of each object, from whichever thread
//! performs it. How it gets itself to do so (allocator wrappers, runtime
//! callbacks, instrumented smart pointers) is its own business.
//!
//! In return the recorder asks the host two questions about an identity,
//! through [`HostRuntime`], and never anything else: it does not touch the
//! object, so it cannot extend or end its life.

use std::cell::Cell;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::ObjectIdentity;

/// Queries the recorder needs answered by the host runtime.
pub trait HostRuntime: Send + Sync
{
    /// Runtime type name of the object at `identity`.
    ///
    /// Only called for identities where [`is_opaque_proxy`](Self::is_opaque_proxy)
    /// returned `false`.
    fn type_name_of(&self, identity: ObjectIdentity) -> String;

    /// `true` if the object has no stable type identity and must not be
    /// inspected (e.g. a dynamic forwarding proxy).
    fn is_opaque_proxy(&self, identity: ObjectIdentity) -> bool;
}

/// Host runtime backed by an explicit identity-to-type-name table.
///
/// Suits hosts that know each object's type at allocation time: register
/// the name when the object is created and forget it once it is destroyed.
/// Identities that were never registered have no known type and are
/// treated as opaque.
#[derive(Debug, Default)]
pub struct TypeRegistry
{
    types: RwLock<HashMap<ObjectIdentity, Entry>>,
}

#[derive(Debug, Clone)]
struct Entry
{
    type_name: String,
    opaque: bool,
}

impl TypeRegistry
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Record the type name of a live object.
    pub fn register(&self, identity: ObjectIdentity, type_name: impl Into<String>)
    {
        self.insert(identity, type_name.into(), false);
    }

    /// Record a live object that must never be inspected.
    pub fn register_opaque(&self, identity: ObjectIdentity)
    {
        self.insert(identity, String::new(), true);
    }

    /// Drop what is known about `identity`, typically at destruction.
    pub fn forget(&self, identity: ObjectIdentity)
    {
        self.types.write().remove(&identity);
    }

    pub fn len(&self) -> usize
    {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.types.read().is_empty()
    }

    fn insert(&self, identity: ObjectIdentity, type_name: String, opaque: bool)
    {
        self.types.write().insert(identity, Entry { type_name, opaque });
    }
}

impl HostRuntime for TypeRegistry
{
    fn type_name_of(&self, identity: ObjectIdentity) -> String
    {
        self.types
            .read()
            .get(&identity)
            .map(|entry| entry.type_name.clone())
            .unwrap_or_default()
    }

    fn is_opaque_proxy(&self, identity: ObjectIdentity) -> bool
    {
        self.types.read().get(&identity).map_or(true, |entry| entry.opaque)
    }
}

thread_local! {
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside `notify` until dropped.
///
/// Nested notifications on the same thread (an instrumented allocation made
/// while recording, for instance) see the mark and are dropped rather than
/// re-entering the store.
pub(crate) struct HookGuard(());

impl HookGuard
{
    /// Enter the hook, or `None` if this thread is already inside one or is
    /// tearing down its thread-locals.
    pub(crate) fn enter() -> Option<Self>
    {
        IN_HOOK
            .try_with(|flag| {
                if flag.get() {
                    None
                } else {
                    flag.set(true);
                    Some(HookGuard(()))
                }
            })
            .ok()
            .flatten()
    }
}

impl Drop for HookGuard
{
    fn drop(&mut self)
    {
        let _ = IN_HOOK.try_with(|flag| flag.set(false));
    }
}
