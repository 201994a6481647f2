//! Backend factory configuration.

use crate::detect::DEFAULT_PROBE;
use crate::host::DEFAULT_PLUGIN_TYPE;
use crate::pin::DEFAULT_MAX_PIN;

/// Configuration for backend resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Plugin type requested from the host environment
    pub plugin_type: String,
    /// String written and read back while probing a native candidate
    pub probe: String,
    /// Skip the host entirely and use the emulation
    pub force_emulation: bool,
    /// Wrap an adopted native backend in argument validation
    pub validate_native: bool,
    /// Exclusive upper bound for pin identifiers under validation
    pub max_pin: i32,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            plugin_type: DEFAULT_PLUGIN_TYPE.to_string(),
            probe: DEFAULT_PROBE.to_string(),
            force_emulation: false,
            validate_native: false,
            max_pin: DEFAULT_MAX_PIN,
        }
    }
}

impl FactoryConfig {
    /// Creates a new factory configuration builder.
    pub fn builder() -> FactoryConfigBuilder {
        FactoryConfigBuilder::default()
    }
}

/// Builder for ergonomic factory configuration construction.
#[derive(Debug, Clone, Default)]
pub struct FactoryConfigBuilder {
    config: FactoryConfig,
}

impl FactoryConfigBuilder {
    /// Sets the plugin type requested from the host.
    pub fn plugin_type(mut self, plugin_type: impl Into<String>) -> Self {
        self.config.plugin_type = plugin_type.into();
        self
    }

    /// Sets the detection probe string.
    pub fn probe(mut self, probe: impl Into<String>) -> Self {
        self.config.probe = probe.into();
        self
    }

    pub fn force_emulation(mut self, force: bool) -> Self {
        self.config.force_emulation = force;
        self
    }

    /// Enables fail-fast argument checking on the native backend.
    pub fn validate_native(mut self, validate: bool) -> Self {
        self.config.validate_native = validate;
        self
    }

    pub fn max_pin(mut self, max_pin: i32) -> Self {
        self.config.max_pin = max_pin;
        self
    }

    /// Builds the factory configuration.
    pub fn build(self) -> FactoryConfig {
        self.config
    }
}
