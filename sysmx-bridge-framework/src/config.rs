//! Configuration traits and utilities.

use std::path::Path;

use serde::de::DeserializeOwned;
use sysmx_common::validate_domain;

use crate::LoggingConfig;
use crate::error::{BridgeError, Result};

/// Trait for bridge configuration types.
///
/// Implement this trait for your bridge's configuration struct to get
/// automatic loading, validation, and access to common config fields.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use sysmx_bridge_framework::{BridgeConfig, LoggingConfig};
///
/// #[derive(Debug, Deserialize)]
/// pub struct MyBridgeConfig {
///     pub logging: LoggingConfig,
///     pub my_provider: MyProviderConfig,
/// }
///
/// impl BridgeConfig for MyBridgeConfig {
///     fn logging(&self) -> &LoggingConfig {
///         &self.logging
///     }
///
///     fn domain(&self) -> &str {
///         &self.my_provider.domain
///     }
///
///     fn validate(&self) -> Result<()> {
///         if self.my_provider.sources.is_empty() {
///             return Err(BridgeError::validation("At least one source required"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait BridgeConfig: Sized + DeserializeOwned {
    /// Get the logging configuration.
    fn logging(&self) -> &LoggingConfig;

    /// Get the object name domain the bridge registers its objects under.
    fn domain(&self) -> &str;

    /// Validate the configuration.
    ///
    /// Called automatically after loading. The default only checks that
    /// [`domain`](Self::domain) is usable in object names; overrides should
    /// keep that check.
    fn validate(&self) -> Result<()> {
        validate_domain(self.domain()).map_err(|e| BridgeError::validation(e.to_string()))
    }

    /// Load configuration from a file path.
    ///
    /// Supports JSON5 format. Calls [`validate`](Self::validate) after loading.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BridgeError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }
}
