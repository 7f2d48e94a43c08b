//! CPU bridges.

use sysmx_bridge_framework::{
    AttributeBridge, AttributeValue, BridgeError, Provider, RegistrationHooks, Result,
};

use super::ProviderBinding;

const CPU_ATTRIBUTES: &[(&str, &str)] = &[("Usage", "cpu/usage"), ("Count", "cpu/count")];

/// Global CPU usage and core count.
pub struct CpuBridge<P> {
    binding: ProviderBinding<P>,
}

impl<P: Provider> CpuBridge<P> {
    pub fn new(binding: ProviderBinding<P>) -> Self {
        Self { binding }
    }
}

impl<P: Provider> AttributeBridge for CpuBridge<P> {
    fn object_name(&self) -> String {
        self.binding.name("Cpu").to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Usage", "Count"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.binding.fetch_mapped("Cpu", CPU_ATTRIBUTES, name)
    }
}

impl<P> RegistrationHooks for CpuBridge<P> {}

/// Usage and frequency of a single core.
pub struct CpuCoreBridge<P> {
    binding: ProviderBinding<P>,
    core: usize,
}

impl<P: Provider> CpuCoreBridge<P> {
    pub fn new(binding: ProviderBinding<P>, core: usize) -> Self {
        Self { binding, core }
    }

    /// One bridge per core reported by the provider's `cpu/count`.
    pub fn for_all_cores(binding: &ProviderBinding<P>) -> Result<Vec<Self>> {
        let count = binding
            .fetch("Cpu", "cpu/count")?
            .as_u64()
            .ok_or_else(|| BridgeError::ProviderFailure {
                category: "Cpu".to_string(),
                message: "cpu/count is not a counter".to_string(),
            })?;

        Ok((0..count as usize)
            .map(|core| Self::new(binding.clone(), core))
            .collect())
    }

    pub fn core(&self) -> usize {
        self.core
    }
}

impl<P: Provider> AttributeBridge for CpuCoreBridge<P> {
    fn object_name(&self) -> String {
        self.binding
            .name("CpuCore")
            .property("name", self.core.to_string())
            .to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Usage", "Frequency"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        let metric = match name {
            "Usage" => "usage",
            "Frequency" => "frequency",
            _ => return Err(BridgeError::not_found(name)),
        };
        self.binding
            .fetch("CpuCore", &format!("cpu/{}/{}", self.core, metric))
    }
}

impl<P> RegistrationHooks for CpuCoreBridge<P> {}
