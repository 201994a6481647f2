//! Pin state model and argument validation.
//!
//! The emulated backend keeps no pin state. Native backends are expected to
//! treat pins as persistent, and [`ValidatedBackend`] provides that
//! bookkeeping for any backend it wraps: it rejects out-of-range arguments
//! with [`GpioError::InvalidArgument`] before they reach the provider, records
//! the numbering scheme, each pin's mode, pull state and last level, and logs
//! calls that are accepted but have no effect.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::backend::{BackendKind, GpioBackend, Operation};
use crate::consts::{Level, PinMode, Pull, PwmMode};
use crate::error::{GpioError, GpioResult};

/// Default upper bound (exclusive) for pin identifiers.
pub const DEFAULT_MAX_PIN: i32 = 64;

const MAX_ALT_FUNCTION: i32 = 7;
const MAX_PAD_GROUP: i32 = 2;
const MAX_PAD_DRIVE: i32 = 7;

/// Pin numbering scheme established by the setup family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinNumbering {
    /// wiringPi logical numbering (`setup`)
    WiringPi,
    /// BCM chip numbering (`setup_gpio`)
    Gpio,
    /// Physical header position (`setup_phys`)
    Phys,
    /// sysfs exported pins (`setup_sys`)
    Sys,
}

impl PinNumbering {
    pub fn from_setup(op: Operation) -> Option<Self> {
        match op {
            Operation::Setup => Some(Self::WiringPi),
            Operation::SetupGpio => Some(Self::Gpio),
            Operation::SetupPhys => Some(Self::Phys),
            Operation::SetupSys => Some(Self::Sys),
            _ => None,
        }
    }
}

/// Last known state of one pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub id: i32,
    pub mode: Option<PinMode>,
    /// Alternate function selected through `pin_mode_alt`
    pub alt: Option<i32>,
    pub pull: Pull,
    pub level: Option<Level>,
}

impl Pin {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            mode: None,
            alt: None,
            pull: Pull::Off,
            level: None,
        }
    }

    pub fn is_input(&self) -> bool {
        self.mode == Some(PinMode::Input)
    }

    pub fn is_output(&self) -> bool {
        self.mode.map_or(false, PinMode::is_output)
    }
}

/// Per-process pin bookkeeping keyed by identifier.
///
/// Identifiers only mean something within one numbering scheme, so switching
/// schemes forgets every recorded pin. Re-arming the current scheme keeps them.
#[derive(Debug, Default)]
pub struct PinTable {
    numbering: Option<PinNumbering>,
    pins: BTreeMap<i32, Pin>,
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbering(&self) -> Option<PinNumbering> {
        self.numbering
    }

    pub fn set_numbering(&mut self, numbering: PinNumbering) {
        if self.numbering != Some(numbering) {
            self.pins.clear();
            self.numbering = Some(numbering);
        }
    }

    pub fn get(&self, id: i32) -> Option<&Pin> {
        self.pins.get(&id)
    }

    pub fn entry(&mut self, id: i32) -> &mut Pin {
        self.pins.entry(id).or_insert_with(|| Pin::new(id))
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

/// Decorator enforcing argument ranges and tracking pin state.
pub struct ValidatedBackend {
    inner: Arc<dyn GpioBackend>,
    max_pin: i32,
    table: Mutex<PinTable>,
    board_rev: OnceCell<i32>,
}

impl ValidatedBackend {
    pub fn new(inner: Arc<dyn GpioBackend>, max_pin: i32) -> Self {
        Self {
            inner,
            max_pin,
            table: Mutex::new(PinTable::new()),
            board_rev: OnceCell::new(),
        }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &Arc<dyn GpioBackend> {
        &self.inner
    }

    pub fn numbering(&self) -> Option<PinNumbering> {
        self.table.lock().numbering()
    }

    /// Snapshot of a pin's recorded state.
    pub fn pin(&self, id: i32) -> Option<Pin> {
        self.table.lock().get(id).cloned()
    }

    fn check_pin(&self, op: Operation, pin: i32) -> GpioResult<()> {
        if pin < 0 || pin >= self.max_pin {
            return Err(GpioError::invalid(
                op,
                format!("pin {pin} outside 0..{}", self.max_pin),
            ));
        }
        Ok(())
    }

    fn check_range(op: Operation, what: &str, value: i32, min: i32, max: i32) -> GpioResult<()> {
        if value < min || value > max {
            return Err(GpioError::invalid(
                op,
                format!("{what} {value} outside {min}..={max}"),
            ));
        }
        Ok(())
    }

    fn decode<T, E: core::fmt::Display>(op: Operation, decoded: Result<T, E>) -> GpioResult<T> {
        decoded.map_err(|err| GpioError::invalid(op, err.to_string()))
    }

    fn arm(&self, op: Operation, forward: impl FnOnce() -> GpioResult<()>) -> GpioResult<()> {
        forward()?;
        if let Some(numbering) = PinNumbering::from_setup(op) {
            self.table.lock().set_numbering(numbering);
            log::debug!("{op}: pin numbering {numbering:?}");
        }
        Ok(())
    }

    fn warn_unarmed(&self, op: Operation) {
        if self.numbering().is_none() {
            log::debug!("{op} called before any setup call");
        }
    }

    fn note_output_write(&self, op: Operation, pin: i32) {
        let table = self.table.lock();
        match table.get(pin) {
            Some(state) if state.is_output() => {}
            _ => log::debug!("{op} on pin {pin} which is not configured for output"),
        }
    }
}

impl GpioBackend for ValidatedBackend {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn setup(&self) -> GpioResult<()> {
        self.arm(Operation::Setup, || self.inner.setup())
    }

    fn setup_gpio(&self) -> GpioResult<()> {
        self.arm(Operation::SetupGpio, || self.inner.setup_gpio())
    }

    fn setup_phys(&self) -> GpioResult<()> {
        self.arm(Operation::SetupPhys, || self.inner.setup_phys())
    }

    fn setup_sys(&self) -> GpioResult<()> {
        self.arm(Operation::SetupSys, || self.inner.setup_sys())
    }

    fn pin_mode(&self, pin: i32, mode: i32) -> GpioResult<()> {
        let op = Operation::PinMode;
        self.check_pin(op, pin)?;
        let mode = Self::decode(op, PinMode::try_from(mode))?;
        self.warn_unarmed(op);
        self.inner.pin_mode(pin, mode.code())?;

        let mut table = self.table.lock();
        let state = table.entry(pin);
        state.mode = Some(mode);
        state.alt = None;
        Ok(())
    }

    fn pin_mode_alt(&self, pin: i32, alt: i32) -> GpioResult<()> {
        let op = Operation::PinModeAlt;
        self.check_pin(op, pin)?;
        Self::check_range(op, "alt function", alt, 0, MAX_ALT_FUNCTION)?;
        self.inner.pin_mode_alt(pin, alt)?;

        let mut table = self.table.lock();
        let state = table.entry(pin);
        state.alt = Some(alt);
        state.mode = None;
        Ok(())
    }

    fn pull_up_dn_control(&self, pin: i32, pud: i32) -> GpioResult<()> {
        let op = Operation::PullUpDnControl;
        self.check_pin(op, pin)?;
        let pull = Self::decode(op, Pull::try_from(pud))?;

        let mode = self.table.lock().get(pin).and_then(|state| state.mode);
        match mode {
            Some(PinMode::Input) => {}
            Some(other) => log::warn!("{op} on pin {pin} in {other:?} mode has no effect"),
            None => log::warn!("{op} on pin {pin} with no mode set"),
        }

        self.inner.pull_up_dn_control(pin, pull.code())?;
        self.table.lock().entry(pin).pull = pull;
        Ok(())
    }

    fn digital_read(&self, pin: i32) -> GpioResult<i32> {
        self.check_pin(Operation::DigitalRead, pin)?;
        let value = self.inner.digital_read(pin)?;
        let level = if value != 0 { Level::High } else { Level::Low };
        self.table.lock().entry(pin).level = Some(level);
        Ok(value)
    }

    fn digital_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        let op = Operation::DigitalWrite;
        self.check_pin(op, pin)?;
        let level = Self::decode(op, Level::try_from(value))?;
        self.note_output_write(op, pin);
        self.inner.digital_write(pin, level.code())?;
        self.table.lock().entry(pin).level = Some(level);
        Ok(())
    }

    fn analog_read(&self, pin: i32) -> GpioResult<i32> {
        self.check_pin(Operation::AnalogRead, pin)?;
        self.inner.analog_read(pin)
    }

    fn analog_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        self.check_pin(Operation::AnalogWrite, pin)?;
        self.inner.analog_write(pin, value)
    }

    fn pwm_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        let op = Operation::PwmWrite;
        self.check_pin(op, pin)?;
        Self::check_range(op, "duty", value, 0, i32::MAX)?;
        self.note_output_write(op, pin);
        self.inner.pwm_write(pin, value)
    }

    fn pwm_tone_write(&self, pin: i32, freq: i32) -> GpioResult<()> {
        let op = Operation::PwmToneWrite;
        self.check_pin(op, pin)?;
        Self::check_range(op, "frequency", freq, 0, i32::MAX)?;
        self.note_output_write(op, pin);
        self.inner.pwm_tone_write(pin, freq)
    }

    fn digital_write_byte(&self, value: i32) -> GpioResult<()> {
        Self::check_range(Operation::DigitalWriteByte, "byte", value, 0, 0xFF)?;
        self.inner.digital_write_byte(value)
    }

    fn pwm_set_mode(&self, mode: i32) -> GpioResult<()> {
        let mode = Self::decode(Operation::PwmSetMode, PwmMode::try_from(mode))?;
        self.inner.pwm_set_mode(mode.code())
    }

    fn pwm_set_range(&self, range: i32) -> GpioResult<()> {
        Self::check_range(Operation::PwmSetRange, "range", range, 1, i32::MAX)?;
        self.inner.pwm_set_range(range)
    }

    fn pwm_set_clock(&self, divisor: i32) -> GpioResult<()> {
        Self::check_range(Operation::PwmSetClock, "divisor", divisor, 1, i32::MAX)?;
        self.inner.pwm_set_clock(divisor)
    }

    fn gpio_clock_set(&self, pin: i32, freq: i32) -> GpioResult<()> {
        let op = Operation::GpioClockSet;
        self.check_pin(op, pin)?;
        Self::check_range(op, "frequency", freq, 0, i32::MAX)?;
        self.inner.gpio_clock_set(pin, freq)
    }

    fn set_pad_drive(&self, group: i32, value: i32) -> GpioResult<()> {
        let op = Operation::SetPadDrive;
        Self::check_range(op, "pad group", group, 0, MAX_PAD_GROUP)?;
        Self::check_range(op, "drive strength", value, 0, MAX_PAD_DRIVE)?;
        self.inner.set_pad_drive(group, value)
    }

    fn pi_board_rev(&self) -> GpioResult<i32> {
        self.board_rev
            .get_or_try_init(|| self.inner.pi_board_rev())
            .copied()
    }

    fn wpi_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.check_pin(Operation::WpiPinToGpio, pin)?;
        self.inner.wpi_pin_to_gpio(pin)
    }

    fn phys_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.check_pin(Operation::PhysPinToGpio, pin)?;
        self.inner.phys_pin_to_gpio(pin)
    }

    fn get_alt(&self, pin: i32) -> GpioResult<i32> {
        self.check_pin(Operation::GetAlt, pin)?;
        self.inner.get_alt(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HIGH, INPUT, OUTPUT, PUD_UP};
    use crate::emulated::EmulatedBackend;

    fn validated() -> (Arc<EmulatedBackend>, ValidatedBackend) {
        let emu = Arc::new(EmulatedBackend::new());
        let backend = ValidatedBackend::new(emu.clone(), DEFAULT_MAX_PIN);
        (emu, backend)
    }

    #[test]
    fn table_forgets_pins_on_scheme_change() {
        let mut table = PinTable::new();
        table.set_numbering(PinNumbering::Gpio);
        table.entry(4).mode = Some(PinMode::Output);
        table.set_numbering(PinNumbering::Gpio);
        assert_eq!(table.len(), 1);

        table.set_numbering(PinNumbering::Phys);
        assert!(table.is_empty());
        assert_eq!(table.numbering(), Some(PinNumbering::Phys));
    }

    #[test]
    fn setup_selects_numbering() {
        let (_, backend) = validated();
        assert_eq!(backend.numbering(), None);
        backend.setup_gpio().unwrap();
        assert_eq!(backend.numbering(), Some(PinNumbering::Gpio));
        backend.setup().unwrap();
        assert_eq!(backend.numbering(), Some(PinNumbering::WiringPi));
        backend.setup_sys().unwrap();
        assert_eq!(backend.numbering(), Some(PinNumbering::Sys));
    }

    #[test]
    fn records_mode_pull_and_level() {
        let (_, backend) = validated();
        backend.setup_gpio().unwrap();
        backend.pin_mode(3, INPUT).unwrap();
        backend.pull_up_dn_control(3, PUD_UP).unwrap();
        backend.pin_mode(4, OUTPUT).unwrap();
        backend.digital_write(4, HIGH).unwrap();

        let input = backend.pin(3).unwrap();
        assert!(input.is_input());
        assert_eq!(input.pull, Pull::Up);

        let output = backend.pin(4).unwrap();
        assert!(output.is_output());
        assert_eq!(output.level, Some(Level::High));
    }

    #[test]
    fn rejects_out_of_range_without_forwarding() {
        let (emu, backend) = validated();
        let before = emu.calls();

        assert!(matches!(
            backend.pin_mode(4, 7),
            Err(GpioError::InvalidArgument { operation: Operation::PinMode, .. })
        ));
        assert!(backend.pin_mode(-1, OUTPUT).is_err());
        assert!(backend.pin_mode(DEFAULT_MAX_PIN, OUTPUT).is_err());
        assert!(backend.digital_write(4, 2).is_err());
        assert!(backend.pull_up_dn_control(4, 3).is_err());
        assert!(backend.pwm_set_mode(2).is_err());
        assert!(backend.pwm_set_range(0).is_err());
        assert!(backend.digital_write_byte(256).is_err());
        assert!(backend.set_pad_drive(3, 0).is_err());
        assert!(backend.pin_mode_alt(4, 8).is_err());

        assert_eq!(emu.calls(), before);
    }

    #[test]
    fn pull_on_output_pin_is_accepted() {
        let (emu, backend) = validated();
        backend.pin_mode(4, OUTPUT).unwrap();
        backend.pull_up_dn_control(4, PUD_UP).unwrap();
        assert_eq!(emu.calls(), 2);
        assert_eq!(backend.pin(4).unwrap().pull, Pull::Up);
    }

    #[test]
    fn write_to_input_pin_is_passed_through() {
        let (emu, backend) = validated();
        backend.pin_mode(3, INPUT).unwrap();
        backend.digital_write(3, HIGH).unwrap();
        assert_eq!(emu.calls(), 2);
    }

    #[test]
    fn alt_function_clears_mode() {
        let (_, backend) = validated();
        backend.pin_mode(4, OUTPUT).unwrap();
        backend.pin_mode_alt(4, 5).unwrap();
        let state = backend.pin(4).unwrap();
        assert_eq!(state.mode, None);
        assert_eq!(state.alt, Some(5));
    }

    #[test]
    fn board_revision_is_cached() {
        let (emu, backend) = validated();
        assert_eq!(backend.pi_board_rev(), Ok(2));
        assert_eq!(backend.pi_board_rev(), Ok(2));
        assert_eq!(emu.calls(), 1);
    }

    #[test]
    fn read_records_level() {
        let (_, backend) = validated();
        assert_eq!(backend.digital_read(3), Ok(1));
        assert_eq!(backend.pin(3).unwrap().level, Some(Level::High));
    }

    #[test]
    fn forwards_kind_and_name() {
        let (_, backend) = validated();
        assert_eq!(backend.kind(), BackendKind::Emulated);
        assert_eq!(backend.name(), "emulated");
    }
}
