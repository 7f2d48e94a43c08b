//! SysMX management bridge for host metrics.
//!
//! This bridge reads local system metrics through the `sysinfo` crate and
//! exposes them as management objects, each with a fixed set of attributes.
//! A caching proxy sits between the bridges and the system so that objects
//! read in the same poll share one refresh per metric.
//!
//! # Object Names
//!
//! ```text
//! sysmx:type=Cpu                  Usage, Count
//! sysmx:name=<core>,type=CpuCore  Usage, Frequency
//! sysmx:type=Mem                  Total, Used, Free, Available, UsedPercent
//! sysmx:type=Swap                 Total, Used, Free
//! sysmx:type=LoadAverage          LastMinute, LastFiveMinutes, Last15Minutes
//! sysmx:type=System               Uptime, BootTime, Hostname, OsVersion, KernelVersion
//! sysmx:type=ProxyCache           Hits, Misses, Entries, ExpireMillis; clear()
//! ```

pub mod bridges;
pub mod cache;
pub mod config;
pub mod poller;
pub mod provider;

use std::sync::Arc;

use sysmx_bridge_framework::{ManagementServer, ObjectName, Provider, Result};

use crate::bridges::{
    CacheBridge, CpuBridge, CpuCoreBridge, LoadAverageBridge, MemBridge, ProviderBinding,
    SwapBridge, SystemBridge,
};
use crate::cache::CachedProvider;
use crate::config::SysinfoConfig;

/// Register the bridges enabled in `config`, plus the cache bridge.
///
/// The `System` bridge reports the configured hostname, or the provider's
/// when the config leaves it at `auto`.
///
/// Returns the registered names in registration order. On failure the
/// bridges registered so far stay registered.
pub fn register_bridges<P>(
    server: &ManagementServer,
    config: &SysinfoConfig,
    cache: Arc<CachedProvider<P>>,
) -> Result<Vec<ObjectName>>
where
    P: Provider + 'static,
{
    let binding = ProviderBinding::new(cache.clone(), &config.domain);
    let collect = &config.collect;
    let mut names = Vec::new();

    if collect.cpu {
        names.push(server.register(CpuBridge::new(binding.clone()))?);
    }
    if collect.cpu_cores {
        for core in CpuCoreBridge::for_all_cores(&binding)? {
            names.push(server.register(core)?);
        }
    }
    if collect.memory {
        names.push(server.register(MemBridge::new(binding.clone()))?);
    }
    if collect.swap {
        names.push(server.register(SwapBridge::new(binding.clone()))?);
    }
    if collect.load {
        names.push(server.register(LoadAverageBridge::new(binding.clone()))?);
    }
    if collect.system {
        let mut system = SystemBridge::new(binding);
        if let Some(hostname) = config.hostname_override() {
            system = system.with_hostname(hostname);
        }
        names.push(server.register(system)?);
    }

    names.push(server.register(CacheBridge::new(cache, &config.domain))?);

    tracing::info!(count = names.len(), domain = %config.domain, "Bridges registered");
    Ok(names)
}
