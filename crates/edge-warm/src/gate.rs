//! Static caching feature gate.

use crate::config::ConfigProvider;
use crate::error::WarmError;

/// Checks whether static caching is enabled.
pub struct FeatureGate<'a> {
    config: &'a dyn ConfigProvider,
}

impl<'a> FeatureGate<'a> {
    /// Create a gate over a config provider.
    pub fn new(config: &'a dyn ConfigProvider) -> Self {
        Self { config }
    }

    /// Whether a static caching strategy is configured.
    pub fn is_enabled(&self) -> bool {
        match self.config.static_caching().strategy.as_deref().map(str::trim) {
            None | Some("") | Some("null") => false,
            Some(_) => true,
        }
    }

    /// Fail with `WarmError::Disabled` when static caching is off.
    pub fn check(&self) -> Result<(), WarmError> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(WarmError::Disabled)
        }
    }
}
