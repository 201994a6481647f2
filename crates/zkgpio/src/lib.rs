//! # zkgpio
//!
//! Uniform GPIO control for host-side code, whether or not a native hardware
//! backend is available.
//!
//! [`plugin()`] hands out the process-wide backend. On first use it asks the
//! host environment for a native capability object, probes it, and adopts it
//! only if it answers the probe correctly; otherwise an emulated backend with
//! no hardware effect is used. The choice is made once and never revisited.
//!
//! ## Module Overview
//! - [`consts`]   – Constant table (pin modes, levels, pull states, PWM modes).
//! - [`backend`]  – The [`GpioBackend`] operation set.
//! - [`emulated`] – Zero-hardware backend returning fixed readings.
//! - [`detect`]   – Native candidate probing.
//! - [`host`]     – Host environment seam supplying native candidates.
//! - [`factory`]  – Resolve-once backend selection and [`plugin()`].
//! - [`pin`]      – Pin state model and the argument-checking decorator.
//! - [`loopback`] – In-memory native provider.
//!
//! ## Example: reading an input
//!
//! BCM pin 3 is pulled up internally; a button connects it to ground.
//!
//! ```
//! let pi = zkgpio::plugin();
//! pi.setup_gpio().unwrap();
//! let _rev = pi.pi_board_rev().unwrap();
//! pi.pin_mode(3, zkgpio::INPUT).unwrap();
//! let _status = pi.digital_read(3).unwrap();
//! ```
//!
//! ## Example: driving an LED
//!
//! ```
//! let pi = zkgpio::plugin();
//! pi.setup_gpio().unwrap();
//! pi.pin_mode(4, zkgpio::OUTPUT).unwrap();
//! pi.digital_write(4, zkgpio::HIGH).unwrap();
//! pi.digital_write(4, zkgpio::LOW).unwrap();
//! ```

pub mod backend;
pub mod config;
pub mod consts;
pub mod detect;
pub mod emulated;
pub mod error;
pub mod factory;
pub mod host;
pub mod loopback;
pub mod pin;

pub use backend::{BackendKind, GpioBackend, GpioBackendExt, Operation};
pub use config::{FactoryConfig, FactoryConfigBuilder};
pub use consts::*;
pub use detect::{CapabilityDetector, NativeCandidate, RoundTripDetector};
pub use emulated::EmulatedBackend;
pub use error::{GpioError, GpioResult};
pub use factory::{configure, install_host, plugin, resolved_kind, BackendFactory};
pub use host::{FnHost, HostEnvironment, NoNativeHost, StaticHost};
pub use pin::{Pin, PinNumbering, PinTable, ValidatedBackend};
