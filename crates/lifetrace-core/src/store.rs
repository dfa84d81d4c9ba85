//! # Event Store
//!
//! Concurrent map from object identity to its ordered event history.
//!
//! The map is sharded (`dashmap`), so writers touching different identities
//! rarely contend, and writers touching the same identity serialize on that
//! identity's shard. Each critical section is one lookup plus one push: the
//! backtrace is captured and the event built before any shard lock is taken,
//! and nothing inside the lock calls back into the recorder.
//!
//! Pushing may grow a history's buffer, i.e. allocate while a shard lock is
//! held. Hosts whose allocator is itself instrumented rely on the per-thread
//! reentrancy guard in [`hooks`](crate::hooks) to keep such nested
//! notifications away from the store.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::capture::BacktraceCapturer;
use crate::types::{EventHistory, EventKind, LifecycleEvent, ObjectIdentity};

/// Identity-keyed, append-only event histories.
#[derive(Debug)]
pub struct EventStore
{
    histories: DashMap<ObjectIdentity, Vec<LifecycleEvent>>,
    capturer: BacktraceCapturer,
    next_sequence: AtomicU64,
}

impl EventStore
{
    pub fn new(capturer: BacktraceCapturer) -> Self
    {
        Self {
            histories: DashMap::new(),
            capturer,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// The capturer that fills in each event's backtrace.
    pub fn capturer(&self) -> &BacktraceCapturer
    {
        &self.capturer
    }

    /// Append a `kind` event to the history of `identity`, creating it if absent.
    ///
    /// Safe to call from any number of threads at once. Every call appends
    /// exactly one event; calls for the same identity are ordered by the
    /// sequence number they receive.
    #[inline(never)]
    pub fn record(&self, identity: ObjectIdentity, kind: EventKind)
    {
        let backtrace = self.capturer.capture();
        let mut history = self.histories.entry(identity).or_default();
        // Numbered under the shard lock so sequence order matches history order.
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        history.push(LifecycleEvent::new(kind, backtrace, sequence));
    }

    /// Snapshot of the history of `identity`; empty if nothing was recorded.
    ///
    /// Clones under the shard's read guard. Callers on a thread whose
    /// allocations are reported back to the recorder must hold a
    /// [`HookGuard`](crate::hooks) meanwhile, as [`Recorder`](crate::Recorder) does.
    pub fn history_for(&self, identity: ObjectIdentity) -> EventHistory
    {
        self.histories
            .get(&identity)
            .map(|events| EventHistory::from_events(events.clone()))
            .unwrap_or_default()
    }

    /// Identities that currently have a history, in no particular order.
    pub fn identities(&self) -> Vec<ObjectIdentity>
    {
        self.histories.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of tracked identities.
    pub fn len(&self) -> usize
    {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.histories.is_empty()
    }

    /// Number of events across all histories.
    pub fn total_events(&self) -> usize
    {
        self.histories.iter().map(|entry| entry.value().len()).sum()
    }

    /// Drop every history.
    pub fn clear(&self)
    {
        self.histories.clear();
    }
}
