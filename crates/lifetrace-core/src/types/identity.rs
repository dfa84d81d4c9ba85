//! Non-owning object identity.

use std::fmt;

/// Opaque key identifying an observed object by its address
///
/// An `ObjectIdentity` is only a number. It carries no lifetime, no borrow,
/// and no reference count, and the recorder never turns it back into a
/// pointer: nothing here can extend or alter the life of the object it
/// names. Building one from a reference reads the reference's address and
/// nothing else.
///
/// ## Address reuse
///
/// Histories are keyed by address, not by object. When an object is
/// destroyed and a new one is later allocated at the same address, both
/// share one identity, and `history_for` returns a history that blends the
/// events of both occupants. A `Deallocate` event followed by an `Allocate`
/// event marks the boundary between them.
///
/// ## Example
///
/// ```rust
/// use lifetrace_core::types::ObjectIdentity;
///
/// let value = Box::new(42_u32);
/// let id = ObjectIdentity::of(&*value);
/// assert_eq!(id, ObjectIdentity::from_ptr(&*value as *const u32));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectIdentity(u64);

impl ObjectIdentity
{
    /// Identity of the object behind a reference.
    pub fn of<T: ?Sized>(object: &T) -> Self
    {
        Self::from_ptr(object as *const T)
    }

    /// Identity of the object at `ptr`. The pointer is never dereferenced.
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self
    {
        ObjectIdentity(ptr.cast::<()>() as usize as u64)
    }

    /// Identity from a raw address, for hosts that already track addresses as integers.
    pub const fn from_raw(address: u64) -> Self
    {
        ObjectIdentity(address)
    }

    /// The address this identity was built from.
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

impl fmt::Display for ObjectIdentity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "<0x{:x}>", self.0)
    }
}
