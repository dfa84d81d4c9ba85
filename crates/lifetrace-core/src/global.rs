//! # Process-wide Recorder
//!
//! Hook glue usually has nowhere to keep a `Recorder` handle; a
//! reference-count entry point or allocator wrapper is a bare function.
//! This module holds one recorder per process, installed on first use
//! and living until the process exits.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::RecorderConfig;
use crate::error::{RecorderError, RecorderResult};
use crate::hooks::HostRuntime;
use crate::recorder::Recorder;
use crate::types::{EventKind, ObjectIdentity};

static RECORDER: OnceCell<Recorder> = OnceCell::new();

/// Install the process-wide recorder.
///
/// ## Errors
///
/// - [`RecorderError::InvalidConfig`] if `config` does not validate
/// - [`RecorderError::AlreadyInstalled`] if a recorder was installed before
pub fn install(host: Arc<dyn HostRuntime>, config: RecorderConfig) -> RecorderResult<&'static Recorder>
{
    let recorder = Recorder::with_config(host, config)?;
    let mut installed = false;
    let current = RECORDER.get_or_init(|| {
        installed = true;
        recorder
    });
    if installed {
        tracing::debug!(?config, "process-wide recorder installed");
        Ok(current)
    } else {
        Err(RecorderError::AlreadyInstalled)
    }
}

/// The process-wide recorder, if installed.
pub fn get() -> Option<&'static Recorder>
{
    RECORDER.get()
}

/// Forward a lifecycle event to the process-wide recorder, if any.
#[inline(never)]
pub fn notify(identity: ObjectIdentity, kind: EventKind)
{
    if let Some(recorder) = RECORDER.get() {
        recorder.notify(identity, kind);
    }
}
