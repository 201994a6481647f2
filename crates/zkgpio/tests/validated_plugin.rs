//! Process-wide backend with validation of the native provider enabled.

use std::sync::Arc;

use zkgpio::loopback::LoopbackNative;
use zkgpio::{
    configure, install_host, plugin, BackendKind, FactoryConfig, GpioError, Operation, StaticHost,
    HIGH, INPUT, OUTPUT, PUD_UP,
};

#[test]
fn native_backend_rejects_invalid_arguments() {
    let native = Arc::new(LoopbackNative::new());
    configure(FactoryConfig::builder().validate_native(true).max_pin(28).build()).unwrap();
    install_host(Arc::new(StaticHost::with_default_type(native.clone()))).unwrap();

    let pi = plugin();
    assert_eq!(pi.kind(), BackendKind::Native);

    pi.setup_gpio().unwrap();
    pi.pin_mode(4, OUTPUT).unwrap();
    pi.digital_write(4, HIGH).unwrap();
    pi.pin_mode(3, INPUT).unwrap();
    pi.pull_up_dn_control(3, PUD_UP).unwrap();
    let accepted = native.calls();

    assert_eq!(
        pi.pin_mode(4, 9).unwrap_err(),
        GpioError::InvalidArgument {
            operation: Operation::PinMode,
            reason: "unknown pin mode code 9".into(),
        }
    );
    assert!(pi.digital_write(40, HIGH).is_err());
    assert!(pi.pwm_set_clock(0).is_err());
    assert_eq!(native.calls(), accepted);
}
