//! Bridge status reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process-level state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeState {
    Running,
    Offline,
    Error,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BridgeState::Running => "running",
            BridgeState::Offline => "offline",
            BridgeState::Error => "error",
        };
        f.write_str(s)
    }
}

/// A status report, logged by the runner at startup and shutdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Bridge name (e.g., "sysinfo").
    pub bridge: String,
    pub version: String,
    pub status: BridgeState,
    /// Bridge-specific details, flattened into the serialized report.
    #[serde(flatten)]
    pub metadata: serde_json::Value,
}

impl BridgeStatus {
    fn new(bridge: impl Into<String>, version: impl Into<String>, status: BridgeState) -> Self {
        Self {
            bridge: bridge.into(),
            version: version.into(),
            status,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn running(bridge: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(bridge, version, BridgeState::Running)
    }

    pub fn offline(bridge: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(bridge, version, BridgeState::Offline)
    }

    /// An error status carrying `{ "error": <message> }` as metadata.
    pub fn error(
        bridge: impl Into<String>,
        version: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::new(bridge, version, BridgeState::Error)
            .with_metadata(serde_json::json!({ "error": error.into() }))
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Emit this status as a structured log event, at error level for
    /// [`BridgeState::Error`] and info level otherwise.
    pub fn log(&self) {
        let metadata = if self.metadata.is_null() {
            String::new()
        } else {
            self.metadata.to_string()
        };

        match self.status {
            BridgeState::Error => tracing::error!(
                bridge = %self.bridge,
                version = %self.version,
                status = %self.status,
                metadata = %metadata,
                "Bridge status"
            ),
            _ => tracing::info!(
                bridge = %self.bridge,
                version = %self.version,
                status = %self.status,
                metadata = %metadata,
                "Bridge status"
            ),
        }
    }
}
