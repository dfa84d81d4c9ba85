//! Tests for error handling

use std::sync::Arc;

use lifetrace_core::error::{RecorderError, RecorderResult};
use lifetrace_core::symbols::{DebugInfoBackend, SymbolBackend};
use lifetrace_core::{global, EventKind, ObjectIdentity, RecorderConfig, TypeRegistry};

#[test]
fn test_invalid_config_display()
{
    let error = RecorderError::InvalidConfig {
        key: "LIFETRACE_BACKTRACE_DEPTH".to_string(),
        value: "deep".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("LIFETRACE_BACKTRACE_DEPTH"));
    assert!(message.contains("deep"));
}

#[test]
fn test_already_installed_display()
{
    let message = format!("{}", RecorderError::AlreadyInstalled);
    assert!(message.contains("already installed"));
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: RecorderResult<()> = Ok(());
    let _error_result: RecorderResult<()> = Err(RecorderError::AlreadyInstalled);
}

// The only test in this binary touching the process-wide recorder.
#[test]
fn test_global_install_once()
{
    let id = ObjectIdentity::from_raw(0x9000);
    global::notify(id, EventKind::Allocate);
    assert!(global::get().is_none());

    let host = Arc::new(TypeRegistry::new());
    host.register(id, "Global");

    let bad = global::install(host.clone(), RecorderConfig::default().with_max_depth(0));
    assert!(matches!(bad, Err(RecorderError::InvalidConfig { .. })));

    let recorder = global::install(host.clone(), RecorderConfig::default().with_backtrace(true)).unwrap();
    recorder.begin_session(None);
    global::notify(id, EventKind::Allocate);
    let history = recorder.history_for(id);
    assert_eq!(history.len(), 1);

    // Frames of the process-wide dispatch are hidden as well.
    let first = history.last().unwrap().backtrace[0];
    let name = DebugInfoBackend.resolve(first).map(|symbol| symbol.display_name().to_string()).unwrap_or_default();
    assert!(name.contains("test_global_install_once"), "unexpected first frame: {name}");

    let again = global::install(host, RecorderConfig::default());
    assert_eq!(again.unwrap_err(), RecorderError::AlreadyInstalled);
}
