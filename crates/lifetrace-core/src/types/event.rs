//! Lifecycle event types.

use std::fmt;
use std::sync::Arc;

use super::Address;

/// Kind of lifecycle transition observed on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind
{
    /// The object was created.
    Allocate,
    /// Plain reference-count increase.
    Retain,
    /// Reference-count decrease.
    Release,
    /// Retain paired with a deferred release.
    RetainAutorelease,
    /// Retain of a copyable closure.
    RetainBlockCopy,
    /// Combined "store into a strong slot" operation (retain new, release old).
    StoreStrong,
    /// The object was destroyed.
    Deallocate,
}

impl EventKind
{
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Allocate,
        EventKind::Retain,
        EventKind::Release,
        EventKind::RetainAutorelease,
        EventKind::RetainBlockCopy,
        EventKind::StoreStrong,
        EventKind::Deallocate,
    ];

    /// Short lowercase label used in logs and reports.
    pub const fn label(self) -> &'static str
    {
        match self {
            EventKind::Allocate => "alloc",
            EventKind::Retain => "retain",
            EventKind::Release => "release",
            EventKind::RetainAutorelease => "retain-autorelease",
            EventKind::RetainBlockCopy => "retain-block-copy",
            EventKind::StoreStrong => "store-strong",
            EventKind::Deallocate => "dealloc",
        }
    }

    /// Contribution of this event to the object's net ownership count.
    ///
    /// Retain-like kinds count `+1`, `Release` counts `-1`. Allocation and
    /// destruction are boundaries rather than ownership changes and count `0`.
    pub const fn retain_delta(self) -> i64
    {
        match self {
            EventKind::Retain | EventKind::RetainAutorelease | EventKind::RetainBlockCopy | EventKind::StoreStrong => 1,
            EventKind::Release => -1,
            EventKind::Allocate | EventKind::Deallocate => 0,
        }
    }
}

impl fmt::Display for EventKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.label())
    }
}

/// One observed transition, immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent
{
    /// What happened.
    pub kind: EventKind,
    /// Return addresses at the time of the event, innermost first.
    ///
    /// Empty when backtrace capture was disabled.
    pub backtrace: Arc<[Address]>,
    /// Process-wide order in which the recorder accepted this event.
    pub sequence: u64,
}

impl LifecycleEvent
{
    pub(crate) fn new(kind: EventKind, backtrace: Vec<Address>, sequence: u64) -> Self
    {
        Self {
            kind,
            backtrace: backtrace.into(),
            sequence,
        }
    }

    /// `true` if a call stack was captured for this event.
    pub fn has_backtrace(&self) -> bool
    {
        !self.backtrace.is_empty()
    }
}

/// Snapshot of the events recorded for one identity, oldest first.
///
/// Later recording does not change a snapshot already handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHistory
{
    events: Vec<LifecycleEvent>,
}

impl EventHistory
{
    pub(crate) fn from_events(events: Vec<LifecycleEvent>) -> Self
    {
        Self { events }
    }

    pub fn len(&self) -> usize
    {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LifecycleEvent>
    {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[LifecycleEvent]
    {
        &self.events
    }

    /// Most recently recorded event.
    pub fn last(&self) -> Option<&LifecycleEvent>
    {
        self.events.last()
    }

    /// Sum of [`EventKind::retain_delta`] over the history.
    ///
    /// A positive balance on an object that should be gone points at a
    /// retain without a matching release.
    pub fn net_retain_delta(&self) -> i64
    {
        self.events.iter().map(|event| event.kind.retain_delta()).sum()
    }
}

impl IntoIterator for EventHistory
{
    type Item = LifecycleEvent;
    type IntoIter = std::vec::IntoIter<LifecycleEvent>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventHistory
{
    type Item = &'a LifecycleEvent;
    type IntoIter = std::slice::Iter<'a, LifecycleEvent>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.events.iter()
    }
}
