//! Backend resolution.
//!
//! A [`BackendFactory`] resolves its backend exactly once: it asks the host
//! environment for a native candidate, lets the capability detector judge it,
//! and adopts either the candidate or the emulation. Every later call returns
//! the same `Arc`, whatever happens to the host afterwards.
//!
//! The process-wide instance behind [`plugin`] is created on first use from
//! whatever [`install_host`] and [`configure`] registered before it.

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;

use crate::backend::{BackendKind, GpioBackend};
use crate::config::FactoryConfig;
use crate::detect::{CapabilityDetector, RoundTripDetector};
use crate::emulated::EmulatedBackend;
use crate::error::{GpioError, GpioResult};
use crate::host::{HostEnvironment, NoNativeHost};
use crate::pin::ValidatedBackend;

/// Lazily resolving, memoizing backend source.
pub struct BackendFactory {
    config: FactoryConfig,
    host: Arc<dyn HostEnvironment>,
    detector: Box<dyn CapabilityDetector>,
    resolved: OnceCell<Arc<dyn GpioBackend>>,
}

impl Default for BackendFactory {
    fn default() -> Self {
        Self::new(FactoryConfig::default())
    }
}

impl BackendFactory {
    /// Factory with no native host and the round-trip detector.
    pub fn new(config: FactoryConfig) -> Self {
        let detector = RoundTripDetector::new(config.probe.clone());
        Self {
            config,
            host: Arc::new(NoNativeHost),
            detector: Box::new(detector),
            resolved: OnceCell::new(),
        }
    }

    pub fn with_host(mut self, host: Arc<dyn HostEnvironment>) -> Self {
        self.host = host;
        self
    }

    pub fn with_detector(mut self, detector: Box<dyn CapabilityDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Resolve on first call, then hand out the cached backend.
    ///
    /// Concurrent first callers block until one resolution completes and all
    /// observe its result.
    pub fn get_backend(&self) -> Arc<dyn GpioBackend> {
        Arc::clone(self.resolved.get_or_init(|| self.resolve()))
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Kind of the selected backend, if resolution has happened.
    pub fn kind(&self) -> Option<BackendKind> {
        self.resolved.get().map(|backend| backend.kind())
    }

    fn resolve(&self) -> Arc<dyn GpioBackend> {
        if self.config.force_emulation {
            log::info!("emulation forced, GPIO calls have no hardware effect");
            return Arc::new(EmulatedBackend::new());
        }

        log::info!("initializing plugin object '{}'", self.config.plugin_type);
        let candidate = self.host.instantiate(&self.config.plugin_type);

        if self.detector.is_usable(candidate.as_deref()) {
            if let Some(native) = candidate {
                log::info!("using native GPIO backend '{}'", native.name());
                let backend = native.into_backend();
                if self.config.validate_native {
                    return Arc::new(ValidatedBackend::new(backend, self.config.max_pin));
                }
                return backend;
            }
        }

        log::info!("falling back to emulated GPIO backend");
        Arc::new(EmulatedBackend::new())
    }
}

/// Registrations collected before the process-wide factory is built.
///
/// Sealed under the lock when the factory takes its contents; any later
/// registration is refused.
#[derive(Default)]
struct Pending {
    config: Option<FactoryConfig>,
    host: Option<Arc<dyn HostEnvironment>>,
    sealed: bool,
}

impl Pending {
    fn set_host(&mut self, host: Arc<dyn HostEnvironment>) -> GpioResult<()> {
        if self.sealed {
            return Err(GpioError::AlreadyResolved);
        }
        self.host = Some(host);
        Ok(())
    }

    fn set_config(&mut self, config: FactoryConfig) -> GpioResult<()> {
        if self.sealed {
            return Err(GpioError::AlreadyResolved);
        }
        self.config = Some(config);
        Ok(())
    }

    fn seal(&mut self) -> BackendFactory {
        self.sealed = true;
        let config = self.config.take().unwrap_or_default();
        let host = self
            .host
            .take()
            .unwrap_or_else(|| Arc::new(NoNativeHost) as Arc<dyn HostEnvironment>);
        BackendFactory::new(config).with_host(host)
    }
}

static PENDING: Lazy<Mutex<Pending>> = Lazy::new(|| Mutex::new(Pending::default()));
static GLOBAL: OnceCell<BackendFactory> = OnceCell::new();

fn global() -> &'static BackendFactory {
    GLOBAL.get_or_init(|| PENDING.lock().seal())
}

/// Process-wide backend. Never fails: without a usable native provider the
/// emulation is returned.
///
/// # Example
///
/// ```
/// use zkgpio::{plugin, INPUT};
///
/// let pi = plugin();
/// pi.setup_gpio().unwrap();
/// pi.pin_mode(3, INPUT).unwrap();
/// assert_eq!(pi.digital_read(3).unwrap(), 1);
/// ```
pub fn plugin() -> Arc<dyn GpioBackend> {
    global().get_backend()
}

/// Register the host environment consulted by [`plugin`].
///
/// Must happen before the first [`plugin`] call; later calls fail with
/// [`GpioError::AlreadyResolved`]. A second registration replaces the first.
pub fn install_host(host: Arc<dyn HostEnvironment>) -> GpioResult<()> {
    PENDING.lock().set_host(host)
}

/// Register the configuration used by [`plugin`]. Same rules as
/// [`install_host`].
pub fn configure(config: FactoryConfig) -> GpioResult<()> {
    PENDING.lock().set_config(config)
}

/// Kind of the process-wide backend, if [`plugin`] has been called.
pub fn resolved_kind() -> Option<BackendKind> {
    GLOBAL.get().and_then(BackendFactory::kind)
}
