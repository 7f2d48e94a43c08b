//! Host metrics provider backed by the `sysinfo` crate.

use std::sync::Mutex;

use sysinfo::System;
use sysmx_bridge_framework::{AttributeValue, Provider};
use thiserror::Error;

/// Errors produced while fetching a host metric.
#[derive(Debug, Error, PartialEq)]
pub enum SysinfoError {
    #[error("unknown metric key: {0}")]
    UnknownKey(String),
    #[error("cpu core {index} out of range ({count} cores)")]
    CoreOutOfRange { index: usize, count: usize },
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),
}

/// Reads live host metrics by key.
///
/// Keys are slash-separated paths such as `cpu/usage`, `cpu/3/frequency`,
/// `memory/used` or `system/load/5m`. Every fetch refreshes only the part of
/// the system snapshot the key needs.
pub struct SysinfoProvider {
    system: Mutex<System>,
}

impl SysinfoProvider {
    /// Create a provider with a fully refreshed system snapshot.
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new_all()),
        }
    }

    fn with_system<T>(&self, f: impl FnOnce(&mut System) -> T) -> T {
        let mut system = self
            .system
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut system)
    }

    fn fetch_cpu(&self, rest: &str) -> Result<AttributeValue, SysinfoError> {
        match rest {
            "usage" => Ok(self.with_system(|sys| {
                sys.refresh_cpu_usage();
                AttributeValue::Gauge(sys.global_cpu_usage() as f64)
            })),
            "count" => Ok(self.with_system(|sys| AttributeValue::Counter(sys.cpus().len() as u64))),
            _ => {
                let (index, metric) = rest
                    .split_once('/')
                    .ok_or_else(|| SysinfoError::UnknownKey(format!("cpu/{rest}")))?;
                let index: usize = index
                    .parse()
                    .map_err(|_| SysinfoError::UnknownKey(format!("cpu/{rest}")))?;
                self.fetch_core(index, metric)
            }
        }
    }

    fn fetch_core(&self, index: usize, metric: &str) -> Result<AttributeValue, SysinfoError> {
        if metric != "usage" && metric != "frequency" {
            return Err(SysinfoError::UnknownKey(format!("cpu/{index}/{metric}")));
        }
        self.with_system(|sys| {
            if metric == "usage" {
                sys.refresh_cpu_usage();
            } else {
                sys.refresh_cpu_frequency();
            }
            let count = sys.cpus().len();
            let cpu = sys
                .cpus()
                .get(index)
                .ok_or(SysinfoError::CoreOutOfRange { index, count })?;
            Ok(if metric == "usage" {
                AttributeValue::Gauge(cpu.cpu_usage() as f64)
            } else {
                AttributeValue::Counter(cpu.frequency())
            })
        })
    }

    fn fetch_memory(&self, rest: &str) -> Result<AttributeValue, SysinfoError> {
        self.with_system(|sys| {
            sys.refresh_memory();
            let value = match rest {
                "total" => AttributeValue::Counter(sys.total_memory()),
                "used" => AttributeValue::Counter(sys.used_memory()),
                "free" => AttributeValue::Counter(sys.free_memory()),
                "available" => AttributeValue::Counter(sys.available_memory()),
                "usage_percent" => AttributeValue::Gauge(percent(sys.used_memory(), sys.total_memory())),
                _ => return Err(SysinfoError::UnknownKey(format!("memory/{rest}"))),
            };
            Ok(value)
        })
    }

    fn fetch_swap(&self, rest: &str) -> Result<AttributeValue, SysinfoError> {
        self.with_system(|sys| {
            sys.refresh_memory();
            let value = match rest {
                "total" => sys.total_swap(),
                "used" => sys.used_swap(),
                "free" => sys.free_swap(),
                _ => return Err(SysinfoError::UnknownKey(format!("swap/{rest}"))),
            };
            Ok(AttributeValue::Counter(value))
        })
    }

    fn fetch_system(&self, rest: &str) -> Result<AttributeValue, SysinfoError> {
        let value = match rest {
            "uptime" => AttributeValue::Counter(System::uptime()),
            "boot_time" => AttributeValue::Counter(System::boot_time()),
            "load/1m" => AttributeValue::Gauge(System::load_average().one),
            "load/5m" => AttributeValue::Gauge(System::load_average().five),
            "load/15m" => AttributeValue::Gauge(System::load_average().fifteen),
            "hostname" => AttributeValue::Text(
                System::host_name().ok_or(SysinfoError::Unavailable("hostname"))?,
            ),
            "os_version" => AttributeValue::Text(
                System::long_os_version().ok_or(SysinfoError::Unavailable("os version"))?,
            ),
            "kernel_version" => AttributeValue::Text(
                System::kernel_version().ok_or(SysinfoError::Unavailable("kernel version"))?,
            ),
            _ => return Err(SysinfoError::UnknownKey(format!("system/{rest}"))),
        };
        Ok(value)
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for SysinfoProvider {
    type Error = SysinfoError;

    fn fetch(&self, key: &str) -> Result<AttributeValue, SysinfoError> {
        let (group, rest) = key
            .split_once('/')
            .ok_or_else(|| SysinfoError::UnknownKey(key.to_string()))?;

        match group {
            "cpu" => self.fetch_cpu(rest),
            "memory" => self.fetch_memory(rest),
            "swap" => self.fetch_swap(rest),
            "system" => self.fetch_system(rest),
            _ => Err(SysinfoError::UnknownKey(key.to_string())),
        }
    }
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub(crate) fn percent(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
