//! Configuration for the sysinfo bridge.

use serde::{Deserialize, Serialize};
use sysmx_bridge_framework::{BridgeConfig, BridgeError, Format, LoggingConfig, Result};
use sysmx_common::{DEFAULT_DOMAIN, validate_domain};

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysinfoBridgeConfig {
    /// Sysinfo collection settings.
    pub sysinfo: SysinfoConfig,

    /// Encoding of logged snapshots.
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// System information collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysinfoConfig {
    /// Object name domain (default: "sysmx").
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Hostname reported by the `System` bridge.
    /// Use "auto" to detect automatically (default).
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Snapshot interval in seconds (default: 5).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// How long the provider cache keeps a value, in milliseconds.
    /// 0 disables caching (default: 1000).
    #[serde(default = "default_cache_expire")]
    pub cache_expire_ms: u64,

    /// Which bridges to register.
    #[serde(default)]
    pub collect: CollectConfig,
}

impl Default for SysinfoConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            hostname: default_hostname(),
            poll_interval_secs: default_poll_interval(),
            cache_expire_ms: default_cache_expire(),
            collect: CollectConfig::default(),
        }
    }
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_hostname() -> String {
    "auto".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_cache_expire() -> u64 {
    1000
}

/// Configuration for which bridges to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Global CPU usage and core count.
    #[serde(default = "default_true")]
    pub cpu: bool,

    /// One bridge per CPU core.
    #[serde(default = "default_true")]
    pub cpu_cores: bool,

    #[serde(default = "default_true")]
    pub memory: bool,

    #[serde(default = "default_true")]
    pub swap: bool,

    /// Load averages.
    #[serde(default = "default_true")]
    pub load: bool,

    /// Uptime, boot time, host and OS identification.
    #[serde(default = "default_true")]
    pub system: bool,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            cpu: true,
            cpu_cores: true,
            memory: true,
            swap: true,
            load: true,
            system: true,
        }
    }
}

impl SysinfoConfig {
    /// The configured hostname, or `None` when it is left to detection.
    pub fn hostname_override(&self) -> Option<&str> {
        match self.hostname.as_str() {
            "auto" => None,
            name => Some(name),
        }
    }
}

impl CollectConfig {
    fn any(&self) -> bool {
        self.cpu || self.cpu_cores || self.memory || self.swap || self.load || self.system
    }
}

fn default_true() -> bool {
    true
}

impl SysinfoBridgeConfig {
    /// Get the hostname to use, resolving "auto" if needed.
    pub fn get_hostname(&self) -> String {
        match self.sysinfo.hostname_override() {
            Some(name) => name.to_string(),
            None => hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

impl BridgeConfig for SysinfoBridgeConfig {
    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn domain(&self) -> &str {
        &self.sysinfo.domain
    }

    fn validate(&self) -> Result<()> {
        validate_domain(&self.sysinfo.domain)
            .map_err(|e| BridgeError::validation(e.to_string()))?;

        if self.sysinfo.poll_interval_secs == 0 {
            return Err(BridgeError::validation("poll_interval_secs must be > 0"));
        }

        if !self.sysinfo.collect.any() {
            return Err(BridgeError::validation(
                "At least one metric type must be enabled",
            ));
        }

        Ok(())
    }
}
