//! Process-wide backend with a working native provider installed.

use std::sync::Arc;

use once_cell::sync::Lazy;
use zkgpio::loopback::LoopbackNative;
use zkgpio::{
    install_host, plugin, BackendKind, GpioBackend, GpioBackendExt, Level,
    StaticHost, HIGH, LOW, OUTPUT,
};

static NATIVE: Lazy<Arc<LoopbackNative>> =
    Lazy::new(|| Arc::new(LoopbackNative::new().with_name("bench-rig")));

fn pi() -> Arc<dyn GpioBackend> {
    static INSTALLED: Lazy<()> = Lazy::new(|| {
        let _ = env_logger::builder().is_test(true).try_init();
        let native: Arc<LoopbackNative> = Arc::clone(&NATIVE);
        install_host(Arc::new(StaticHost::with_default_type(native)))
            .expect("host installed before first plugin() call");
    });
    Lazy::force(&INSTALLED);
    plugin()
}

#[test]
fn plugin_adopts_native() {
    let backend = pi();
    assert_eq!(backend.kind(), BackendKind::Native);
    assert_eq!(backend.name(), "bench-rig");

    // the adopted backend is the very object the host supplied
    assert_eq!(
        Arc::as_ptr(&backend) as *const (),
        Arc::as_ptr(&*NATIVE) as *const ()
    );
}

#[test]
fn probe_string_was_written() {
    pi();
    assert_eq!(NATIVE.last_probe().as_deref(), Some("Zetakey Plugin test"));
}

#[test]
fn native_state_is_visible_through_plugin() {
    let backend = pi();
    backend.setup_gpio().unwrap();
    backend.pin_mode(21, OUTPUT).unwrap();
    backend.digital_write(21, HIGH).unwrap();
    assert_eq!(backend.read_level(21), Ok(Level::High));
    backend.digital_write(21, LOW).unwrap();
    assert_eq!(backend.digital_read(21), Ok(LOW));
}

#[test]
fn plugin_is_memoized() {
    assert!(Arc::ptr_eq(&pi(), &pi()));
}
