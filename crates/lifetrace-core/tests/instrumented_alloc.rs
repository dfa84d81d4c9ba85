//! Recording from a thread whose every allocation is itself reported to the recorder

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lifetrace_core::{global, EventKind, HostRuntime, ObjectIdentity, RecorderConfig};

thread_local! {
    static INSTRUMENTED: Cell<bool> = const { Cell::new(false) };
}

/// Reports each allocation made on an instrumented thread as an `Allocate` event.
struct ReportingAllocator;

unsafe impl GlobalAlloc for ReportingAllocator
{
    unsafe fn alloc(&self, layout: Layout) -> *mut u8
    {
        let ptr = System.alloc(layout);
        if INSTRUMENTED.try_with(Cell::get).unwrap_or(false) && !ptr.is_null() {
            global::notify(ObjectIdentity::from_ptr(ptr), EventKind::Allocate);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout)
    {
        System.dealloc(ptr, layout);
    }
}

#[global_allocator]
static ALLOCATOR: ReportingAllocator = ReportingAllocator;

/// Every object is inspectable and named; answering allocates.
struct EverythingHost;

impl HostRuntime for EverythingHost
{
    fn type_name_of(&self, _identity: ObjectIdentity) -> String
    {
        "HeapBlock".to_string()
    }

    fn is_opaque_proxy(&self, _identity: ObjectIdentity) -> bool
    {
        false
    }
}

#[test]
fn test_queries_do_not_deadlock_under_instrumented_allocator()
{
    const ROUNDS: usize = 2_000;

    let recorder = global::install(Arc::new(EverythingHost), RecorderConfig::default()).unwrap();
    recorder.begin_session(None);

    let target = ObjectIdentity::from_raw(0xa000);
    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        INSTRUMENTED.with(|flag| flag.set(true));
        let mut last_len = 0;
        for _ in 0..ROUNDS {
            global::notify(target, EventKind::Retain);
            last_len = recorder.history_for(target).len();
            let _ = recorder.tracked_identities();
        }
        INSTRUMENTED.with(|flag| flag.set(false));
        let _ = done_tx.send(last_len);
    });

    let history_len = done_rx
        .recv_timeout(Duration::from_secs(60))
        .expect("history queries blocked on the store");
    assert_eq!(history_len, ROUNDS);
    assert!(recorder.history_for(target).iter().all(|event| event.kind == EventKind::Retain));
}
