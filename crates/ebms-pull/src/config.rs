//! Arbitration engine configuration
//!
//! ```toml
//! producer_timeout_ms = 2000
//! register_default_channel = true
//! channels = ["urn:fdc:ebms:mpc:orders"]
//! declared_channels = ["urn:fdc:ebms:mpc:invoices"]
//! ```

use ebms_core::{CoreError, MpcId, Result};
use ebms_mpc::{ChannelOrigin, Mpc, MpcRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`EngineConfig::producer_timeout_ms`]
pub const PRODUCER_TIMEOUT_ENV: &str = "EBMS_PRODUCER_TIMEOUT_MS";

/// Default bound on a single producer's answer
pub const DEFAULT_PRODUCER_TIMEOUT_MS: u64 = 5_000;

/// Configuration of the pull arbitration engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long each producer may take before it counts as "no message"
    pub producer_timeout_ms: u64,
    /// Register the ebMS3 default channel at startup
    pub register_default_channel: bool,
    /// Channels registered at startup
    pub channels: Vec<String>,
    /// Keys whose channel is created on first pull
    pub declared_channels: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            producer_timeout_ms: DEFAULT_PRODUCER_TIMEOUT_MS,
            register_default_channel: true,
            channels: Vec::new(),
            declared_channels: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Configuration for tests: short timeout, default channel only
    pub fn testing() -> Self {
        Self {
            producer_timeout_ms: 100,
            ..Default::default()
        }
    }

    /// Producer timeout as a duration
    pub fn producer_timeout(&self) -> Duration {
        Duration::from_millis(self.producer_timeout_ms)
    }

    /// Set the producer timeout
    pub fn with_producer_timeout(mut self, timeout: Duration) -> Self {
        self.producer_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.producer_timeout_ms == 0 {
            return Err(CoreError::config("producer_timeout_ms must be greater than 0"));
        }
        for key in self.channels.iter().chain(&self.declared_channels) {
            MpcId::new(key.as_str())
                .map_err(|e| CoreError::config(format!("invalid channel key: {e}")))?;
        }
        let mut seen = std::collections::BTreeSet::new();
        for key in &self.channels {
            if !seen.insert(key.as_str()) {
                return Err(CoreError::config(format!("channel '{key}' is listed twice")));
            }
        }
        if let Some(key) = self.declared_channels.iter().find(|k| seen.contains(k.as_str())) {
            return Err(CoreError::config(format!(
                "channel '{key}' is both registered and declared"
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        if let Ok(timeout) = std::env::var(PRODUCER_TIMEOUT_ENV) {
            self.producer_timeout_ms = timeout.trim().parse().map_err(|_| {
                CoreError::config(format!("Invalid timeout in {PRODUCER_TIMEOUT_ENV}"))
            })?;
        }
        self.validate()
    }

    /// Build the channel registry described by this configuration
    pub fn build_registry(&self) -> Result<MpcRegistry> {
        self.validate()?;
        let registry = if self.register_default_channel {
            MpcRegistry::with_default_channel()
        } else {
            MpcRegistry::new()
        };
        for key in &self.channels {
            let id = MpcId::new(key.as_str())?;
            if registry.contains(&id) {
                // Listing the default channel explicitly is harmless
                continue;
            }
            registry
                .create(Mpc::with_origin(id, ChannelOrigin::Registered))
                .map_err(|e| CoreError::config(e.to_string()))?;
        }
        for key in &self.declared_channels {
            registry.declare(MpcId::new(key.as_str())?);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ebms_core::DEFAULT_MPC;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.producer_timeout(), Duration::from_secs(5));
        assert!(config.register_default_channel);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig {
            producer_timeout_ms: 0,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(CoreError::Config { .. }));
    }

    #[test]
    fn test_invalid_and_duplicate_keys_rejected() {
        let config = EngineConfig {
            declared_channels: vec!["bad key".into()],
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(CoreError::Config { .. }));

        let config = EngineConfig {
            channels: vec!["urn:a".into(), "urn:a".into()],
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(CoreError::Config { .. }));
    }

    #[test]
    fn test_registered_and_declared_overlap_rejected() {
        let config = EngineConfig {
            channels: vec!["urn:mpc:orders".into()],
            declared_channels: vec!["urn:mpc:invoices".into(), "urn:mpc:orders".into()],
            ..Default::default()
        };
        assert_matches!(
            config.validate(),
            Err(CoreError::Config { message }) if message.contains("urn:mpc:orders")
        );
        assert_matches!(config.build_registry(), Err(CoreError::Config { .. }));
    }

    #[test]
    fn test_from_toml_str() {
        let config = EngineConfig::from_toml_str(
            r#"
            producer_timeout_ms = 250
            channels = ["urn:mpc:orders"]
            declared_channels = ["urn:mpc:invoices"]
            "#,
        )
        .unwrap();
        assert_eq!(config.producer_timeout(), Duration::from_millis(250));
        assert!(config.register_default_channel);
        assert_eq!(config.channels, vec!["urn:mpc:orders"]);

        assert_matches!(
            EngineConfig::from_toml_str("producer_timeout_ms = \"soon\""),
            Err(CoreError::Config { .. })
        );
    }

    #[test]
    fn test_build_registry() {
        let config = EngineConfig {
            channels: vec!["urn:mpc:orders".into(), DEFAULT_MPC.into()],
            declared_channels: vec!["urn:mpc:invoices".into()],
            ..Default::default()
        };
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup(DEFAULT_MPC).unwrap().origin(),
            ChannelOrigin::Default
        );
        assert!(registry.is_declared(&MpcId::new("urn:mpc:invoices").unwrap()));
        assert!(registry.lookup("urn:mpc:invoices").is_err());
    }

    #[test]
    fn test_without_default_channel() {
        let config = EngineConfig {
            register_default_channel: false,
            ..Default::default()
        };
        assert!(config.build_registry().unwrap().is_empty());
    }
}
