//! Constant table stability across backend selection.

use zkgpio::*;

fn snapshot() -> [i32; 14] {
    [
        OUTPUT,
        INPUT,
        PWM_OUTPUT,
        GPIO_CLOCK,
        SOFT_PWM_OUTPUT,
        SOFT_TONE_OUTPUT,
        PWM_TONE_OUTPUT,
        LOW,
        HIGH,
        PUD_OFF,
        PUD_DOWN,
        PUD_UP,
        PWM_MODE_MS,
        PWM_MODE_BAL,
    ]
}

#[test]
fn constants_are_fixed() {
    let expected = [1, 0, 2, 3, 4, 5, 6, 0, 1, 0, 1, 2, 0, 1];
    assert_eq!(snapshot(), expected);
    plugin();
    assert_eq!(snapshot(), expected);
}

#[test]
fn typed_enums_agree_with_table() {
    assert_eq!(PinMode::Output.code(), OUTPUT);
    assert_eq!(PinMode::PwmToneOutput.code(), PWM_TONE_OUTPUT);
    assert_eq!(Level::High.code(), HIGH);
    assert_eq!(Pull::Up.code(), PUD_UP);
    assert_eq!(PwmMode::Balanced.code(), PWM_MODE_BAL);
    assert_eq!(PinMode::try_from(GPIO_CLOCK), Ok(PinMode::GpioClock));
}
