//! Bridge runner for lifecycle management.

use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;

use sysmx_common::{ObjectName, init_tracing};

use crate::BridgeArgs;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::lifecycle::ManageableBridge;
use crate::server::ManagementServer;
use crate::status::BridgeStatus;

/// Bridge runner that manages the lifecycle of a bridge process.
///
/// Handles:
/// - Logging initialization
/// - The management server the bridges are registered with
/// - Task spawning and management
/// - Graceful shutdown on Ctrl+C, unregistering every bridge
/// - Status reporting
///
/// # Example
///
/// ```ignore
/// use sysmx_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let args = BridgeArgs::parse_with_default("mybridge.json5");
///     let config = MyBridgeConfig::load(&args.config)?;
///
///     let mut runner = BridgeRunner::new("mybridge", config)?;
///     runner.register(MyBridge::new(provider))?;
///
///     let server = runner.server();
///     runner.spawn(async move {
///         // Worker logic here
///     });
///
///     runner.run().await
/// }
/// ```
pub struct BridgeRunner<C: BridgeConfig> {
    /// Bridge name for logging and status.
    name: String,
    /// Bridge version.
    version: String,
    /// The loaded configuration.
    config: C,
    /// Server the bridges are attached to.
    server: Arc<ManagementServer>,
    /// Spawned tasks.
    tasks: Vec<JoinHandle<()>>,
}

impl<C: BridgeConfig> BridgeRunner<C> {
    /// Create a new bridge runner.
    ///
    /// Initializes logging from the config and creates an empty management
    /// server named after the bridge.
    pub fn new(name: impl Into<String>, config: C) -> Result<Self> {
        Self::new_with_args(name, config, None)
    }

    /// Create a new bridge runner with CLI args for log level override.
    pub fn new_with_args(
        name: impl Into<String>,
        config: C,
        args: Option<&BridgeArgs>,
    ) -> Result<Self> {
        let name = name.into();
        let version = env!("CARGO_PKG_VERSION").to_string();

        let log_config = config
            .logging()
            .with_level(args.and_then(|a| a.log_level.as_deref()));
        init_tracing(&log_config)?;

        tracing::info!(bridge = %name, version = %version, "Starting bridge");

        let server = Arc::new(ManagementServer::new(format!(
            "{}@{}",
            name,
            config.domain()
        )));

        Ok(Self {
            name,
            version,
            config,
            server,
            tasks: Vec::new(),
        })
    }

    /// Get the bridge name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the bridge version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Get a handle to the management server.
    pub fn server(&self) -> Arc<ManagementServer> {
        self.server.clone()
    }

    /// Register a bridge with the management server.
    pub fn register(&self, bridge: impl ManageableBridge + 'static) -> Result<ObjectName> {
        self.server.register(bridge)
    }

    /// Spawn a worker task.
    ///
    /// The task will be tracked and aborted on shutdown.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        self.tasks.push(handle);
    }

    /// Run the bridge until Ctrl+C is received.
    ///
    /// This will:
    /// 1. Log "running" status
    /// 2. Wait for Ctrl+C signal
    /// 3. Abort all spawned tasks
    /// 4. Unregister every bridge from the server
    /// 5. Log "offline" status
    pub async fn run(self) -> Result<()> {
        self.run_with_metadata(None).await
    }

    /// Run the bridge with custom status metadata.
    pub async fn run_with_metadata(self, metadata: Option<serde_json::Value>) -> Result<()> {
        let mut status = BridgeStatus::running(&self.name, &self.version);
        if let Some(meta) = metadata {
            status = status.with_metadata(meta);
        }
        status.log();

        tracing::info!(
            bridge = %self.name,
            registered = self.server.len(),
            tasks = self.tasks.len(),
            "Bridge running. Press Ctrl+C to stop."
        );

        // Wait for shutdown signal
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }

        tracing::info!(bridge = %self.name, "Received shutdown signal");

        // Abort all tasks
        for task in &self.tasks {
            task.abort();
        }

        // Wait briefly for tasks to clean up
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let released = self.server.unregister_all();
        tracing::info!(released, "Bridges unregistered");

        if self.server.is_empty() {
            BridgeStatus::offline(&self.name, &self.version).log();
        } else {
            BridgeStatus::error(
                &self.name,
                &self.version,
                format!("{} bridge(s) refused to unregister", self.server.len()),
            )
            .log();
        }

        tracing::info!(bridge = %self.name, "Goodbye!");

        Ok(())
    }
}
