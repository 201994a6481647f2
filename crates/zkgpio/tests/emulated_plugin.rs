//! Process-wide backend with no native provider installed.

use std::sync::Arc;

use zkgpio::{
    install_host, plugin, resolved_kind, BackendKind, GpioError, NoNativeHost, HIGH, OUTPUT,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn plugin_falls_back_to_emulation() {
    init_logging();
    let pi = plugin();
    assert_eq!(pi.kind(), BackendKind::Emulated);
    assert_eq!(resolved_kind(), Some(BackendKind::Emulated));
    assert_eq!(pi.digital_read(3), Ok(1));
}

#[test]
fn plugin_is_memoized() {
    let first = plugin();
    let second = plugin();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn emulated_reads_return_sentinels() {
    let pi = plugin();
    for pin in [-5, 0, 3, 17, 1 << 20] {
        assert_eq!(pi.digital_read(pin), Ok(1));
        assert_eq!(pi.analog_read(pin), Ok(1));
    }
    assert_eq!(pi.pi_board_rev(), Ok(2));
}

#[test]
fn output_sequence_succeeds() {
    let pi = plugin();
    pi.setup_gpio().unwrap();
    assert_eq!(pi.pin_mode(4, OUTPUT), Ok(()));
    assert_eq!(pi.digital_write(4, HIGH), Ok(()));
}

#[test]
fn late_host_installation_is_refused() {
    plugin();
    assert_eq!(
        install_host(Arc::new(NoNativeHost)),
        Err(GpioError::AlreadyResolved)
    );
    assert!(zkgpio::configure(Default::default()).is_err());
}
