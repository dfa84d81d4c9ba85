//! Code address type.

use std::fmt;

/// Strongly typed code address
///
/// Backtrace frames and symbol lookups deal in raw return addresses. This
/// wrapper around `u64` keeps them from being confused with object
/// identities, counts, or sequence numbers, all of which are also integers.
///
/// ## Example
///
/// ```rust
/// use lifetrace_core::types::Address;
///
/// let addr = Address::from(0x1000);
/// assert_eq!(addr.value(), 0x1000);
/// assert_eq!(addr.to_string(), "0x0000000000001000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// Never a valid return address; unwinders stop when they reach it.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// Equivalent to `Address::from(value)` but usable in const contexts.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Build an address from an instruction pointer reported by the unwinder.
    pub(crate) fn from_ip(ip: *mut std::ffi::c_void) -> Self
    {
        Address(ip as usize as u64)
    }

    /// Pointer form expected by platform symbol lookup APIs.
    pub(crate) fn as_ptr(self) -> *mut std::ffi::c_void
    {
        self.0 as usize as *mut std::ffi::c_void
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}
