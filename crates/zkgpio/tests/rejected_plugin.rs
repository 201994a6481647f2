//! Process-wide backend when the host offers a provider that fails the probe.

use std::sync::Arc;

use zkgpio::loopback::{LoopbackNative, ProbeBehavior};
use zkgpio::{install_host, plugin, BackendKind, StaticHost};

#[test]
fn garbled_native_falls_back_to_emulation() {
    let native = Arc::new(LoopbackNative::new().with_probe(ProbeBehavior::Garble));
    install_host(Arc::new(StaticHost::with_default_type(native.clone()))).unwrap();

    let pi = plugin();
    assert_eq!(pi.kind(), BackendKind::Emulated);
    assert_eq!(pi.pi_board_rev(), Ok(2));
    // the probe ran, but nothing else was sent to the rejected provider
    assert_eq!(native.calls(), 0);
}
