//! Constant table shared by every backend.
//!
//! The integer encodings are part of the wire contract between callers and
//! backends: native providers receive exactly these values, so they are never
//! renumbered. Typed enums are provided for callers that prefer them; each
//! converts losslessly to and from its code.

use thiserror::Error;

// Pin modes
pub const INPUT: i32 = 0;
pub const OUTPUT: i32 = 1;
pub const PWM_OUTPUT: i32 = 2;
pub const GPIO_CLOCK: i32 = 3;
pub const SOFT_PWM_OUTPUT: i32 = 4;
pub const SOFT_TONE_OUTPUT: i32 = 5;
pub const PWM_TONE_OUTPUT: i32 = 6;

// Logic levels
pub const LOW: i32 = 0;
pub const HIGH: i32 = 1;

// Pull up/down/none
pub const PUD_OFF: i32 = 0;
pub const PUD_DOWN: i32 = 1;
pub const PUD_UP: i32 = 2;

// PWM
pub const PWM_MODE_MS: i32 = 0;
pub const PWM_MODE_BAL: i32 = 1;

/// Error returned when an integer does not name a known constant.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident = $code:path),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// All variants in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer encoding passed to backends.
            pub const fn code(self) -> i32 {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = UnknownCode;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $(c if c == $code => Ok($name::$variant),)+
                    _ => Err(UnknownCode { kind: $kind, code }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.code()
            }
        }
    };
}

coded_enum! {
    /// GPIO pin modes. A pin has exactly one active mode at a time.
    PinMode, "pin mode" {
        Input = INPUT,
        Output = OUTPUT,
        /// Hardware PWM output
        PwmOutput = PWM_OUTPUT,
        /// General-purpose clock output
        GpioClock = GPIO_CLOCK,
        SoftPwmOutput = SOFT_PWM_OUTPUT,
        SoftToneOutput = SOFT_TONE_OUTPUT,
        PwmToneOutput = PWM_TONE_OUTPUT,
    }
}

coded_enum! {
    /// GPIO pin levels
    Level, "logic level" {
        /// Low level (0V)
        Low = LOW,
        /// High level (VCC)
        High = HIGH,
    }
}

coded_enum! {
    /// Internal pull resistor state, only meaningful for input pins.
    Pull, "pull state" {
        Off = PUD_OFF,
        Down = PUD_DOWN,
        Up = PUD_UP,
    }
}

coded_enum! {
    /// PWM generator mode: mark-space or balanced.
    PwmMode, "pwm mode" {
        MarkSpace = PWM_MODE_MS,
        Balanced = PWM_MODE_BAL,
    }
}

impl PinMode {
    /// Whether a digital write is meaningful in this mode.
    pub fn is_output(self) -> bool {
        !matches!(self, PinMode::Input)
    }
}

impl Level {
    pub fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wiring_convention() {
        assert_eq!(OUTPUT, 1);
        assert_eq!(INPUT, 0);
        assert_eq!(PWM_OUTPUT, 2);
        assert_eq!(GPIO_CLOCK, 3);
        assert_eq!(SOFT_PWM_OUTPUT, 4);
        assert_eq!(SOFT_TONE_OUTPUT, 5);
        assert_eq!(PWM_TONE_OUTPUT, 6);
        assert_eq!((LOW, HIGH), (0, 1));
        assert_eq!((PUD_OFF, PUD_DOWN, PUD_UP), (0, 1, 2));
        assert_eq!((PWM_MODE_MS, PWM_MODE_BAL), (0, 1));
    }

    #[test]
    fn enum_codes_are_contiguous() {
        for (idx, mode) in PinMode::ALL.iter().enumerate() {
            assert_eq!(mode.code(), idx as i32);
        }
        for (idx, pull) in Pull::ALL.iter().enumerate() {
            assert_eq!(pull.code(), idx as i32);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = PinMode::try_from(7).unwrap_err();
        assert_eq!(err.code, 7);
        assert_eq!(err.to_string(), "unknown pin mode code 7");
        let boxed: Box<dyn std::error::Error> = Box::new(Level::try_from(2).unwrap_err());
        assert_eq!(boxed.to_string(), "unknown logic level code 2");
        assert!(Level::try_from(-1).is_err());
        assert!(Pull::try_from(3).is_err());
        assert!(PwmMode::try_from(2).is_err());
    }

    #[test]
    fn only_input_is_not_output() {
        assert!(!PinMode::Input.is_output());
        assert!(PinMode::Output.is_output());
        assert!(PinMode::PwmToneOutput.is_output());
    }

    #[test]
    fn level_toggle() {
        assert_eq!(Level::Low.toggled(), Level::High);
        assert_eq!(Level::High.toggled(), Level::Low);
    }
}
