//! SysMX Bridge Framework
//!
//! Common abstractions for exposing a live data provider through named
//! management attributes.
//!
//! # Overview
//!
//! This framework provides:
//! - [`Provider`] for the data source a bridge reads from
//! - [`AttributeBridge`] for single-attribute get/set, identity and invocation
//! - [`BulkAccess`] for best-effort bulk get/set over any bridge
//! - [`Registration`] and [`RegistrationHooks`] for the attach/detach lifecycle
//! - [`ManagementServer`] for hosting registered bridges in-process
//! - [`BridgeConfig`], [`BridgeArgs`], [`BridgeRunner`] and [`BridgeStatus`]
//!   for running a bridge process
//!
//! # Example
//!
//! ```ignore
//! use sysmx_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = BridgeArgs::parse_with_default("mybridge.json5");
//!     let config = MyBridgeConfig::load(&args.config)?;
//!
//!     let runner = BridgeRunner::new("mybridge", config)?;
//!     runner.register(MyBridge::new(provider))?;
//!
//!     // Run until Ctrl+C
//!     runner.run().await
//! }
//! ```

mod args;
mod attribute;
mod bulk;
mod config;
mod error;
mod lifecycle;
mod provider;
mod runner;
mod server;
mod status;

pub use args::BridgeArgs;
pub use attribute::AttributeBridge;
pub use bulk::BulkAccess;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result, unexpected_error};
pub use lifecycle::{
    ManageableBridge, ManagedBridge, Registration, RegistrationHooks, RegistrationState,
    ServerHandle,
};
pub use provider::Provider;
pub use runner::BridgeRunner;
pub use server::ManagementServer;
pub use status::{BridgeState, BridgeStatus};

// Re-export commonly used types from sysmx-common
pub use sysmx_common::{
    Attribute, AttributeSnapshot, AttributeValue, Format, LoggingConfig, ObjectName,
    ObjectNameBuilder,
};
