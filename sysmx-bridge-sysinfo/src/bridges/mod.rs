//! Management bridges over the host metrics provider.
//!
//! Each bridge registers one object under the configured domain:
//!
//! ```text
//! sysmx:type=Cpu
//! sysmx:name=0,type=CpuCore
//! sysmx:type=Mem
//! sysmx:type=Swap
//! sysmx:type=LoadAverage
//! sysmx:type=System
//! sysmx:type=ProxyCache
//! ```

mod cache;
mod cpu;
mod memory;
mod system;

pub use cache::CacheBridge;
pub use cpu::{CpuBridge, CpuCoreBridge};
pub use memory::{MemBridge, SwapBridge};
pub use system::{LoadAverageBridge, SystemBridge};

use std::sync::Arc;

use sysmx_bridge_framework::{
    AttributeValue, BridgeError, ObjectNameBuilder, Provider, Result, unexpected_error,
};

/// The provider a bridge reads from, plus the domain it registers under.
pub struct ProviderBinding<P> {
    provider: Arc<P>,
    domain: String,
}

impl<P> Clone for ProviderBinding<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            domain: self.domain.clone(),
        }
    }
}

impl<P: Provider> ProviderBinding<P> {
    pub fn new(provider: Arc<P>, domain: impl Into<String>) -> Self {
        Self {
            provider,
            domain: domain.into(),
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Object name builder for `domain:type=<kind>`.
    pub(crate) fn name(&self, kind: &str) -> ObjectNameBuilder {
        ObjectNameBuilder::new(&self.domain).property("type", kind)
    }

    /// Fetch `key`, wrapping provider failures under `category`.
    pub(crate) fn fetch(&self, category: &str, key: &str) -> Result<AttributeValue> {
        self.provider
            .fetch(key)
            .map_err(|e| unexpected_error(category, e))
    }

    /// Resolve `name` through a static attribute table, then fetch it.
    pub(crate) fn fetch_mapped(
        &self,
        category: &str,
        table: &[(&str, &str)],
        name: &str,
    ) -> Result<AttributeValue> {
        let key = table
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, key)| *key)
            .ok_or_else(|| BridgeError::not_found(name))?;
        self.fetch(category, key)
    }
}
