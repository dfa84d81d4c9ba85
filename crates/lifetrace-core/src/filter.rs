//! # Class Filter
//!
//! Decides whether an object's events are recorded.

use crate::hooks::HostRuntime;
use crate::session::SessionController;
use crate::types::ObjectIdentity;

/// `true` if events for `identity` should be recorded right now.
///
/// Checks, in order: that a session is recording, that the host can safely
/// name the object's type (opaque proxies are never queried for a name),
/// and that the name starts with the session's class prefix, if one is set.
/// The prefix match is byte-wise.
pub fn can_record(session: &SessionController, host: &dyn HostRuntime, identity: ObjectIdentity) -> bool
{
    if !session.is_recording() {
        return false;
    }
    if host.is_opaque_proxy(identity) {
        return false;
    }

    if session.with_class_prefix(|prefix| prefix.is_none()) {
        return true;
    }

    // Queried outside the prefix lock so a slow host never holds up `begin`.
    let type_name = host.type_name_of(identity);
    session.with_class_prefix(|prefix| prefix.map_or(true, |prefix| type_name.as_bytes().starts_with(prefix.as_bytes())))
}

#[cfg(test)]
mod tests
{
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::hooks::TypeRegistry;

    /// Host whose name query starts a new session from another thread and
    /// waits for it to finish.
    struct SessionSwitchingHost
    {
        session: Arc<SessionController>,
    }

    impl HostRuntime for SessionSwitchingHost
    {
        fn type_name_of(&self, _identity: ObjectIdentity) -> String
        {
            let session = self.session.clone();
            let (done_tx, done_rx) = std::sync::mpsc::channel();
            thread::spawn(move || {
                session.begin(Some("Bar"));
                let _ = done_tx.send(());
            });
            assert!(
                done_rx.recv_timeout(Duration::from_secs(10)).is_ok(),
                "begin blocked behind the type-name query"
            );
            "FooBar".to_string()
        }

        fn is_opaque_proxy(&self, _identity: ObjectIdentity) -> bool
        {
            false
        }
    }

    fn fixture() -> (SessionController, TypeRegistry)
    {
        let registry = TypeRegistry::new();
        registry.register(ObjectIdentity::from_raw(1), "FooBar");
        registry.register(ObjectIdentity::from_raw(2), "BarFoo");
        registry.register_opaque(ObjectIdentity::from_raw(3));
        (SessionController::new(), registry)
    }

    #[test]
    fn test_nothing_passes_while_not_recording()
    {
        let (session, registry) = fixture();
        assert!(!can_record(&session, &registry, ObjectIdentity::from_raw(1)));
        session.begin(None);
        session.end();
        assert!(!can_record(&session, &registry, ObjectIdentity::from_raw(1)));
    }

    #[test]
    fn test_no_prefix_accepts_every_inspectable_object()
    {
        let (session, registry) = fixture();
        session.begin(None);
        assert!(can_record(&session, &registry, ObjectIdentity::from_raw(1)));
        assert!(can_record(&session, &registry, ObjectIdentity::from_raw(2)));
        assert!(!can_record(&session, &registry, ObjectIdentity::from_raw(3)));
    }

    #[test]
    fn test_prefix_matches_start_of_type_name()
    {
        let (session, registry) = fixture();
        session.begin(Some("Foo"));
        assert!(can_record(&session, &registry, ObjectIdentity::from_raw(1)));
        assert!(!can_record(&session, &registry, ObjectIdentity::from_raw(2)));
        assert!(!can_record(&session, &registry, ObjectIdentity::from_raw(3)));
    }

    #[test]
    fn test_type_name_query_does_not_block_begin()
    {
        let session = Arc::new(SessionController::new());
        session.begin(Some("Foo"));
        let host = SessionSwitchingHost { session: session.clone() };

        // The prefix changed to "Bar" while the name was being fetched.
        assert!(!can_record(&session, &host, ObjectIdentity::from_raw(1)));
        assert_eq!(session.class_prefix().as_deref(), Some("Bar"));
    }
}
