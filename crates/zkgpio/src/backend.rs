//! Backend interface shared by native and emulated GPIO providers.
//!
//! Every backend implements the full [`GpioBackend`] operation set. Values are
//! plain integers drawn from the [constant table](crate::consts); backends
//! decide for themselves how strictly to check them. Operations are
//! synchronous and complete before returning.

use core::fmt;

use crate::consts::{Level, PinMode, Pull, PwmMode};
use crate::error::GpioResult;

/// Which kind of backend the factory selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Host-provided capability object that passed detection
    Native,
    /// In-process emulation with no hardware effect
    Emulated,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Emulated => write!(f, "emulated"),
        }
    }
}

/// Names every operation of the backend interface.
///
/// Used for diagnostics, error reporting and capability negotiation with
/// constrained native providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Setup,
    SetupGpio,
    SetupPhys,
    SetupSys,
    PinMode,
    PinModeAlt,
    PullUpDnControl,
    DigitalRead,
    DigitalWrite,
    AnalogRead,
    AnalogWrite,
    PwmWrite,
    PwmToneWrite,
    DigitalWriteByte,
    PwmSetMode,
    PwmSetRange,
    PwmSetClock,
    GpioClockSet,
    SetPadDrive,
    PiBoardRev,
    WpiPinToGpio,
    PhysPinToGpio,
    GetAlt,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Self::Setup,
        Self::SetupGpio,
        Self::SetupPhys,
        Self::SetupSys,
        Self::PinMode,
        Self::PinModeAlt,
        Self::PullUpDnControl,
        Self::DigitalRead,
        Self::DigitalWrite,
        Self::AnalogRead,
        Self::AnalogWrite,
        Self::PwmWrite,
        Self::PwmToneWrite,
        Self::DigitalWriteByte,
        Self::PwmSetMode,
        Self::PwmSetRange,
        Self::PwmSetClock,
        Self::GpioClockSet,
        Self::SetPadDrive,
        Self::PiBoardRev,
        Self::WpiPinToGpio,
        Self::PhysPinToGpio,
        Self::GetAlt,
    ];

    /// Conventional wiring-library name of the operation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::SetupGpio => "setupGpio",
            Self::SetupPhys => "setupPhys",
            Self::SetupSys => "setupSys",
            Self::PinMode => "pinMode",
            Self::PinModeAlt => "pinModeAlt",
            Self::PullUpDnControl => "pullUpDnControl",
            Self::DigitalRead => "digitalRead",
            Self::DigitalWrite => "digitalWrite",
            Self::AnalogRead => "analogRead",
            Self::AnalogWrite => "analogWrite",
            Self::PwmWrite => "pwmWrite",
            Self::PwmToneWrite => "pwmToneWrite",
            Self::DigitalWriteByte => "digitalWriteByte",
            Self::PwmSetMode => "pwmSetMode",
            Self::PwmSetRange => "pwmSetRange",
            Self::PwmSetClock => "pwmSetClock",
            Self::GpioClockSet => "gpioClockSet",
            Self::SetPadDrive => "setPadDrive",
            Self::PiBoardRev => "piBoardRev",
            Self::WpiPinToGpio => "wpiPinToGpio",
            Self::PhysPinToGpio => "physPinToGpio",
            Self::GetAlt => "getAlt",
        }
    }

    /// Whether the operation produces a value.
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Self::DigitalRead
                | Self::AnalogRead
                | Self::PiBoardRev
                | Self::WpiPinToGpio
                | Self::PhysPinToGpio
                | Self::GetAlt
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GPIO backend trait (object-safe)
///
/// Implementations are shared behind an `Arc` by every caller in the process,
/// so all operations take `&self` and stateful backends use interior
/// mutability.
pub trait GpioBackend: Send + Sync {
    /// Kind reported to callers of the factory.
    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    /// Human-readable backend name for diagnostics.
    fn name(&self) -> &str;

    // Setup family. Each call re-arms the backend and selects the pin
    // numbering used until the next setup call.

    /// Set up using wiringPi pin numbering.
    fn setup(&self) -> GpioResult<()>;
    /// Set up using BCM (chip-logical) pin numbering.
    fn setup_gpio(&self) -> GpioResult<()>;
    /// Set up using physical header pin numbering.
    fn setup_phys(&self) -> GpioResult<()>;
    /// Set up through the sysfs interface; the most restricted mode.
    fn setup_sys(&self) -> GpioResult<()>;

    fn pin_mode(&self, pin: i32, mode: i32) -> GpioResult<()>;
    fn pin_mode_alt(&self, pin: i32, alt: i32) -> GpioResult<()>;

    /// Set the pull resistor. Meaningful only for input pins.
    fn pull_up_dn_control(&self, pin: i32, pud: i32) -> GpioResult<()>;

    fn digital_read(&self, pin: i32) -> GpioResult<i32>;
    fn digital_write(&self, pin: i32, value: i32) -> GpioResult<()>;

    fn analog_read(&self, pin: i32) -> GpioResult<i32>;
    fn analog_write(&self, pin: i32, value: i32) -> GpioResult<()>;
    fn pwm_write(&self, pin: i32, value: i32) -> GpioResult<()>;
    fn pwm_tone_write(&self, pin: i32, freq: i32) -> GpioResult<()>;

    /// Write eight bits at once across a backend-defined set of pins.
    fn digital_write_byte(&self, value: i32) -> GpioResult<()>;

    fn pwm_set_mode(&self, mode: i32) -> GpioResult<()>;
    fn pwm_set_range(&self, range: i32) -> GpioResult<()>;
    fn pwm_set_clock(&self, divisor: i32) -> GpioResult<()>;

    fn gpio_clock_set(&self, pin: i32, freq: i32) -> GpioResult<()>;

    fn set_pad_drive(&self, group: i32, value: i32) -> GpioResult<()>;

    /// Board revision. Immutable for the lifetime of the process.
    fn pi_board_rev(&self) -> GpioResult<i32>;
    fn wpi_pin_to_gpio(&self, pin: i32) -> GpioResult<i32>;
    fn phys_pin_to_gpio(&self, pin: i32) -> GpioResult<i32>;
    fn get_alt(&self, pin: i32) -> GpioResult<i32>;
}

/// Typed convenience layer over [`GpioBackend`].
pub trait GpioBackendExt: GpioBackend {
    fn set_mode(&self, pin: i32, mode: PinMode) -> GpioResult<()> {
        self.pin_mode(pin, mode.code())
    }

    fn set_pull(&self, pin: i32, pull: Pull) -> GpioResult<()> {
        self.pull_up_dn_control(pin, pull.code())
    }

    fn set_pwm_mode(&self, mode: PwmMode) -> GpioResult<()> {
        self.pwm_set_mode(mode.code())
    }

    /// Read current level; any non-zero reading counts as high.
    fn read_level(&self, pin: i32) -> GpioResult<Level> {
        let value = self.digital_read(pin)?;
        Ok(if value != 0 { Level::High } else { Level::Low })
    }

    fn write_level(&self, pin: i32, level: Level) -> GpioResult<()> {
        self.digital_write(pin, level.code())
    }

    /// Toggle output
    fn toggle(&self, pin: i32) -> GpioResult<Level> {
        let next = self.read_level(pin)?.toggled();
        self.write_level(pin, next)?;
        Ok(next)
    }
}

impl<T: GpioBackend + ?Sized> GpioBackendExt for T {}
