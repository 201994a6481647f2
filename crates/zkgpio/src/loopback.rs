//! In-memory native provider.
//!
//! `LoopbackNative` behaves like a host-supplied capability object without
//! touching hardware: it answers the detection probe and remembers what was
//! written, so reads return the last written value. Hosts use it to exercise
//! the native path of the factory, and its probe behaviour can be degraded to
//! drive the fallback path.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{GpioBackend, Operation};
use crate::consts::LOW;
use crate::detect::NativeCandidate;
use crate::error::{GpioError, GpioResult};

/// How the provider answers the detection probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehavior {
    /// Store and return the probe string unchanged
    Echo,
    /// Return a different string than the one written
    Garble,
    /// Fail the probe write
    Fail,
}

#[derive(Debug, Default)]
struct LoopbackState {
    test_string: Option<String>,
    modes: BTreeMap<i32, i32>,
    alts: BTreeMap<i32, i32>,
    levels: BTreeMap<i32, i32>,
    analog: BTreeMap<i32, i32>,
    byte: i32,
    calls: usize,
}

/// Native-style provider backed by memory.
#[derive(Debug)]
pub struct LoopbackNative {
    name: String,
    probe: ProbeBehavior,
    board_rev: i32,
    unsupported: HashSet<Operation>,
    state: Mutex<LoopbackState>,
}

impl Default for LoopbackNative {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackNative {
    pub fn new() -> Self {
        Self {
            name: "loopback".to_string(),
            probe: ProbeBehavior::Echo,
            board_rev: 3,
            unsupported: HashSet::new(),
            state: Mutex::new(LoopbackState::default()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_probe(mut self, probe: ProbeBehavior) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_board_rev(mut self, rev: i32) -> Self {
        self.board_rev = rev;
        self
    }

    /// Report `op` as unsupported and fail calls to it.
    pub fn without(mut self, op: Operation) -> Self {
        self.unsupported.insert(op);
        self
    }

    /// Last probe string stored by detection.
    pub fn last_probe(&self) -> Option<String> {
        self.state.lock().test_string.clone()
    }

    /// Last value written with `digital_write_byte`.
    pub fn last_byte(&self) -> i32 {
        self.state.lock().byte
    }

    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    fn enter(&self, op: Operation) -> GpioResult<parking_lot::MutexGuard<'_, LoopbackState>> {
        if self.unsupported.contains(&op) {
            return Err(GpioError::Unsupported(op));
        }
        let mut state = self.state.lock();
        state.calls += 1;
        Ok(state)
    }
}

impl GpioBackend for LoopbackNative {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&self) -> GpioResult<()> {
        self.enter(Operation::Setup).map(drop)
    }

    fn setup_gpio(&self) -> GpioResult<()> {
        self.enter(Operation::SetupGpio).map(drop)
    }

    fn setup_phys(&self) -> GpioResult<()> {
        self.enter(Operation::SetupPhys).map(drop)
    }

    fn setup_sys(&self) -> GpioResult<()> {
        self.enter(Operation::SetupSys).map(drop)
    }

    fn pin_mode(&self, pin: i32, mode: i32) -> GpioResult<()> {
        let mut state = self.enter(Operation::PinMode)?;
        state.modes.insert(pin, mode);
        state.alts.remove(&pin);
        Ok(())
    }

    fn pin_mode_alt(&self, pin: i32, alt: i32) -> GpioResult<()> {
        let mut state = self.enter(Operation::PinModeAlt)?;
        state.alts.insert(pin, alt);
        Ok(())
    }

    fn pull_up_dn_control(&self, _pin: i32, _pud: i32) -> GpioResult<()> {
        self.enter(Operation::PullUpDnControl).map(drop)
    }

    fn digital_read(&self, pin: i32) -> GpioResult<i32> {
        let state = self.enter(Operation::DigitalRead)?;
        Ok(state.levels.get(&pin).copied().unwrap_or(LOW))
    }

    fn digital_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        let mut state = self.enter(Operation::DigitalWrite)?;
        state.levels.insert(pin, value);
        Ok(())
    }

    fn analog_read(&self, pin: i32) -> GpioResult<i32> {
        let state = self.enter(Operation::AnalogRead)?;
        Ok(state.analog.get(&pin).copied().unwrap_or(0))
    }

    fn analog_write(&self, pin: i32, value: i32) -> GpioResult<()> {
        let mut state = self.enter(Operation::AnalogWrite)?;
        state.analog.insert(pin, value);
        Ok(())
    }

    fn pwm_write(&self, _pin: i32, _value: i32) -> GpioResult<()> {
        self.enter(Operation::PwmWrite).map(drop)
    }

    fn pwm_tone_write(&self, _pin: i32, _freq: i32) -> GpioResult<()> {
        self.enter(Operation::PwmToneWrite).map(drop)
    }

    fn digital_write_byte(&self, value: i32) -> GpioResult<()> {
        let mut state = self.enter(Operation::DigitalWriteByte)?;
        state.byte = value;
        Ok(())
    }

    fn pwm_set_mode(&self, _mode: i32) -> GpioResult<()> {
        self.enter(Operation::PwmSetMode).map(drop)
    }

    fn pwm_set_range(&self, _range: i32) -> GpioResult<()> {
        self.enter(Operation::PwmSetRange).map(drop)
    }

    fn pwm_set_clock(&self, _divisor: i32) -> GpioResult<()> {
        self.enter(Operation::PwmSetClock).map(drop)
    }

    fn gpio_clock_set(&self, _pin: i32, _freq: i32) -> GpioResult<()> {
        self.enter(Operation::GpioClockSet).map(drop)
    }

    fn set_pad_drive(&self, _group: i32, _value: i32) -> GpioResult<()> {
        self.enter(Operation::SetPadDrive).map(drop)
    }

    fn pi_board_rev(&self) -> GpioResult<i32> {
        self.enter(Operation::PiBoardRev)?;
        Ok(self.board_rev)
    }

    fn wpi_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.enter(Operation::WpiPinToGpio)?;
        Ok(pin)
    }

    fn phys_pin_to_gpio(&self, pin: i32) -> GpioResult<i32> {
        self.enter(Operation::PhysPinToGpio)?;
        Ok(pin)
    }

    fn get_alt(&self, pin: i32) -> GpioResult<i32> {
        let state = self.enter(Operation::GetAlt)?;
        let alt = state
            .alts
            .get(&pin)
            .or_else(|| state.modes.get(&pin))
            .copied()
            .unwrap_or(0);
        Ok(alt)
    }
}

impl NativeCandidate for LoopbackNative {
    fn set_test_string(&self, value: &str) -> GpioResult<String> {
        let stored = match self.probe {
            ProbeBehavior::Echo => value.to_string(),
            ProbeBehavior::Garble => value.chars().rev().collect(),
            ProbeBehavior::Fail => return Err(GpioError::Native(-1)),
        };
        self.state.lock().test_string = Some(stored);
        Ok("ok".to_string())
    }

    fn get_test_string(&self) -> GpioResult<String> {
        Ok(self.state.lock().test_string.clone().unwrap_or_default())
    }

    fn supports(&self, op: Operation) -> bool {
        !self.unsupported.contains(&op)
    }

    fn into_backend(self: Arc<Self>) -> Arc<dyn GpioBackend> {
        self
    }
}
