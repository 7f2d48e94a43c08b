//! SysMX management bridge for host metrics.
//!
//! Registers CPU, memory, swap, load and system objects backed by a cached
//! `sysinfo` provider, and logs a snapshot of every object each interval.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sysmx_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};

use sysmx_bridge_sysinfo::cache::CachedProvider;
use sysmx_bridge_sysinfo::config::SysinfoBridgeConfig;
use sysmx_bridge_sysinfo::poller::SnapshotPoller;
use sysmx_bridge_sysinfo::provider::SysinfoProvider;
use sysmx_bridge_sysinfo::register_bridges;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = BridgeArgs::parse_with_default("sysinfo.json5");

    // Load configuration using the framework's BridgeConfig trait
    let config = SysinfoBridgeConfig::load(&args.config).map_err(|e| anyhow::anyhow!("{}", e))?;

    // Resolve hostname for status reporting
    let hostname = config.get_hostname();

    let mut runner = BridgeRunner::new_with_args("sysinfo", config, Some(&args))
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let sysinfo_config = runner.config().sysinfo.clone();
    let format = runner.config().serialization;

    let cache = Arc::new(CachedProvider::new(
        SysinfoProvider::new(),
        Duration::from_millis(sysinfo_config.cache_expire_ms),
    ));

    let server = runner.server();
    register_bridges(&server, &sysinfo_config, cache)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(
        "Sysinfo bridge running (domain: {}, interval: {}s, hostname: {})",
        sysinfo_config.domain,
        sysinfo_config.poll_interval_secs,
        hostname
    );

    let poller = SnapshotPoller::new(
        server,
        Duration::from_secs(sysinfo_config.poll_interval_secs),
        format,
    );
    runner.spawn(async move {
        poller.run().await;
    });

    // Build status metadata
    let collect = &sysinfo_config.collect;
    let metadata = serde_json::json!({
        "hostname": hostname,
        "domain": sysinfo_config.domain,
        "collect": {
            "cpu": collect.cpu,
            "cpu_cores": collect.cpu_cores,
            "memory": collect.memory,
            "swap": collect.swap,
            "load": collect.load,
            "system": collect.system,
        },
        "poll_interval_secs": sysinfo_config.poll_interval_secs,
        "cache_expire_ms": sysinfo_config.cache_expire_ms,
    });

    // Run until Ctrl+C (handles shutdown gracefully)
    runner
        .run_with_metadata(Some(metadata))
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
}
