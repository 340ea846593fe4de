//! The multi-line formatter installs and carries gate events. Separate
//! binary: the global subscriber can only be set once per process.

use betguard_gate::{ActionGate, LogFormat, init_tracing};
use betguard_types::{ActionRequest, Identity};

#[test]
fn pretty_format_installs() {
    init_tracing(LogFormat::Pretty).unwrap();

    let gate = ActionGate::new();
    let req = ActionRequest::new(Identity::dummy(4), 10_000_000, Vec::new()).unwrap();
    assert!(gate.evaluate(&req).is_approved());

    assert!(init_tracing(LogFormat::Json).is_err());
}
