//! Emulated backend used when no native provider is usable.
//!
//! Every call is traced and accepted, whatever its arguments. Reads return
//! fixed sentinels describing a plausible steady state; nothing written is
//! remembered, so the emulation never pretends to model a circuit.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{BackendKind, GpioBackend, Operation};
use crate::consts::HIGH;
use crate::error::GpioResult;

/// Value returned by `digital_read`.
pub const EMULATED_DIGITAL: i32 = HIGH;
/// Value returned by `analog_read`.
pub const EMULATED_ANALOG: i32 = 1;
/// Board revision reported by the emulation.
pub const EMULATED_BOARD_REV: i32 = 2;
/// Value returned by the pin translation and `get_alt` queries.
pub const EMULATED_PIN: i32 = 1;

/// Zero-hardware backend
#[derive(Debug, Default)]
pub struct EmulatedBackend {
    calls: AtomicUsize,
}

impl EmulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn called(&self, op: Operation) -> GpioResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        log::debug!("{op} called.");
        Ok(())
    }

    fn called_with(&self, op: Operation, a: i32) -> GpioResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        log::debug!("{op} called. arg[0]={a}");
        Ok(())
    }

    fn called_with2(&self, op: Operation, a: i32, b: i32) -> GpioResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        log::debug!("{op} called. arg[0]={a}, arg[1]={b}");
        Ok(())
    }

    fn read(&self, op: Operation, arg: Option<i32>, output: i32) -> GpioResult<i32> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match arg {
            Some(a) => log::debug!("{op} called. arg[0]={a} emulated output={output}"),
            None => log::debug!("{op} called. emulated output={output}"),
        }
        Ok(output)
    }
}

impl GpioBackend for EmulatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Emulated
    }

    fn name(&self) -> &str {
        "emulated"
    }

    fn setup(&self) -> GpioResult<()> {
        self.called(Operation::Setup)
    }

    fn setup_gpio(&self) -> GpioResult<()> {
        self.called(Operation::SetupGpio)
    }

    fn setup_phys(&self) -> GpioResult<()> {
        self.called(Operation::SetupPhys)
    }

    fn setup_sys(&self) -> GpioResult<()> {
        self.called(Operation::SetupSys)
    }

    fn pin_mode(&self, pin: i32, mode: i32) -> GpioResult<()> {
        self.called_with2(Operation::PinMode, pin, mode)
    }

    fn pin_mode_alt(&self, pin: i32, alt: i32) -> GpioResult<()> {
        self.called_with2(Operation::PinModeAlt, pin, alt)
    }

    fn pull_up_dn_control(&self, pin: i32, pud: i32) -> GpioResult<()> {
        self.called_with2(Operation::PullUpDnControl, pin, pud)
    }

    fn digital_read(&self, pin: i32) -> GpioResult<i32> {
        self.read(Operation::DigitalRead, Some(pin), EMULATED_DIGITAL)
    }

    fn digital_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        self.called_with2(Operation::DigitalWrite, pin, value)
    }

    fn analog_read(&self, pin: i32) -> GpioResult<i32> {
        self.read(Operation::AnalogRead, Some(pin), EMULATED_ANALOG)
    }

    fn analog_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        self.called_with2(Operation::AnalogWrite, pin, value)
    }

    fn pwm_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        self.called_with2(Operation::PwmWrite, pin, value)
    }

    fn pwm_tone_write(&self, pin: i32, freq: i32) -> GpioResult<()> {
        self.called_with2(Operation::PwmToneWrite, pin, freq)
    }

    fn digital_write_byte(&self, value: i32) -> GpioResult<()> {
        self.called_with(Operation::DigitalWriteByte, value)
    }

    fn pwm_set_mode(&self, mode: i32) -> GpioResult<()> {
        self.called_with(Operation::PwmSetMode, mode)
    }

    fn pwm_set_range(&self, range: i32) -> GpioResult<()> {
        self.called_with(Operation::PwmSetRange, range)
    }

    fn pwm_set_clock(&self, divisor: i32) -> GpioResult<()> {
        self.called_with(Operation::PwmSetClock, divisor)
    }

    fn gpio_clock_set(&self, pin: i32, freq: i32) -> GpioResult<()> {
        self.called_with2(Operation::GpioClockSet, pin, freq)
    }

    fn set_pad_drive(&self, group: i32, value: i32) -> GpioResult<()> {
        self.called_with2(Operation::SetPadDrive, group, value)
    }

    fn pi_board_rev(&self) -> GpioResult<i32> {
        self.read(Operation::PiBoardRev, None, EMULATED_BOARD_REV)
    }

    fn wpi_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.read(Operation::WpiPinToGpio, Some(pin), EMULATED_PIN)
    }

    fn phys_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.read(Operation::PhysPinToGpio, Some(pin), EMULATED_PIN)
    }

    fn get_alt(&self, pin: i32) -> GpioResult<i32> {
        self.read(Operation::GetAlt, Some(pin), EMULATED_PIN)
    }
}
