//! Host environment seam.
//!
//! The process hosting this layer may be able to instantiate a native GPIO
//! capability object for a given plugin type. How it does so is outside this
//! crate; the factory only asks.

use std::sync::Arc;

use crate::detect::NativeCandidate;

/// Plugin type requested from the host unless configured otherwise.
pub const DEFAULT_PLUGIN_TYPE: &str = "application/x-webkit-zetakeygpio";

/// Supplies native candidates on request.
pub trait HostEnvironment: Send + Sync {
    /// Instantiate a candidate for `plugin_type`, or `None` when the host has
    /// no such provider.
    fn instantiate(&self, plugin_type: &str) -> Option<Arc<dyn NativeCandidate>>;
}

/// Host without any native provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNativeHost;

impl HostEnvironment for NoNativeHost {
    fn instantiate(&self, plugin_type: &str) -> Option<Arc<dyn NativeCandidate>> {
        log::debug!("no native provider for '{plugin_type}'");
        None
    }
}

/// Host offering one pre-built candidate for a single plugin type.
pub struct StaticHost {
    plugin_type: String,
    candidate: Arc<dyn NativeCandidate>,
}

impl StaticHost {
    pub fn new(plugin_type: impl Into<String>, candidate: Arc<dyn NativeCandidate>) -> Self {
        Self {
            plugin_type: plugin_type.into(),
            candidate,
        }
    }

    /// Offer `candidate` under the default plugin type.
    pub fn with_default_type(candidate: Arc<dyn NativeCandidate>) -> Self {
        Self::new(DEFAULT_PLUGIN_TYPE, candidate)
    }
}

impl HostEnvironment for StaticHost {
    fn instantiate(&self, plugin_type: &str) -> Option<Arc<dyn NativeCandidate>> {
        if plugin_type == self.plugin_type {
            log::debug!("instantiated native provider '{}'", self.candidate.name());
            Some(Arc::clone(&self.candidate))
        } else {
            log::debug!("no native provider for '{plugin_type}'");
            None
        }
    }
}

/// Host backed by a closure.
pub struct FnHost<F>(pub F);

impl<F> HostEnvironment for FnHost<F>
where
    F: Fn(&str) -> Option<Arc<dyn NativeCandidate>> + Send + Sync,
{
    fn instantiate(&self, plugin_type: &str) -> Option<Arc<dyn NativeCandidate>> {
        (self.0)(plugin_type)
    }
}
