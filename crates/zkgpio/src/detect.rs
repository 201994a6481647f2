//! Capability detection for host-provided native backends.
//!
//! A native object can exist without being functional, so the factory never
//! adopts one on presence alone. A [`CapabilityDetector`] decides; the default
//! [`RoundTripDetector`] checks the operation surface and then writes a test
//! string through the probe channel and expects to read the same string back.

use std::sync::Arc;

use crate::backend::{GpioBackend, Operation};
use crate::error::{GpioError, GpioResult};

/// Probe string written during detection unless configured otherwise.
pub const DEFAULT_PROBE: &str = "Zetakey Plugin test";

/// Native capability object offered by the host environment.
///
/// Besides the backend surface it exposes a settable/gettable string used
/// only for detection.
pub trait NativeCandidate: GpioBackend {
    /// Store the probe string; returns the provider's acknowledgement.
    fn set_test_string(&self, value: &str) -> GpioResult<String>;

    /// Read the probe string back.
    fn get_test_string(&self) -> GpioResult<String>;

    /// Whether the provider implements `op`. Constrained providers override
    /// this to report gaps in their surface.
    fn supports(&self, op: Operation) -> bool {
        let _ = op;
        true
    }

    /// View the candidate as a plain backend once it has been adopted.
    fn into_backend(self: Arc<Self>) -> Arc<dyn GpioBackend>;
}

/// Decides whether a native candidate is usable.
///
/// Detection failure is an expected outcome: implementations answer `false`
/// instead of returning errors.
pub trait CapabilityDetector: Send + Sync {
    fn is_usable(&self, candidate: Option<&dyn NativeCandidate>) -> bool;
}

/// Write-then-read probe over the candidate's test string.
#[derive(Debug, Clone)]
pub struct RoundTripDetector {
    probe: String,
    required: Vec<Operation>,
}

impl Default for RoundTripDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE)
    }
}

impl RoundTripDetector {
    /// Detector requiring the full operation set.
    pub fn new(probe: impl Into<String>) -> Self {
        Self {
            probe: probe.into(),
            required: Operation::ALL.to_vec(),
        }
    }

    /// Restrict the operations a candidate must support.
    pub fn with_required(mut self, required: &[Operation]) -> Self {
        self.required = required.to_vec();
        self
    }

    pub fn probe(&self) -> &str {
        &self.probe
    }

    /// Run the probe, describing why a candidate was rejected.
    pub fn check(&self, candidate: Option<&dyn NativeCandidate>) -> GpioResult<()> {
        let candidate = candidate
            .ok_or_else(|| GpioError::DetectionFailure("no native object".into()))?;

        if let Some(op) = self.required.iter().find(|op| !candidate.supports(**op)) {
            return Err(GpioError::DetectionFailure(format!(
                "{} lacks {op}",
                candidate.name()
            )));
        }

        let ack = candidate
            .set_test_string(&self.probe)
            .map_err(|err| GpioError::DetectionFailure(format!("set string failed: {err}")))?;
        let echoed = candidate
            .get_test_string()
            .map_err(|err| GpioError::DetectionFailure(format!("get string failed: {err}")))?;
        log::debug!("get string : {echoed}, set string : {ack}");

        if echoed != self.probe {
            return Err(GpioError::DetectionFailure(format!(
                "probe mismatch: wrote {:?}, read {echoed:?}",
                self.probe
            )));
        }
        Ok(())
    }
}

impl CapabilityDetector for RoundTripDetector {
    fn is_usable(&self, candidate: Option<&dyn NativeCandidate>) -> bool {
        match self.check(candidate) {
            Ok(()) => {
                log::info!("native GPIO plugin detected");
                true
            }
            Err(err) => {
                log::info!("native GPIO plugin not usable: {err}");
                false
            }
        }
    }
}
