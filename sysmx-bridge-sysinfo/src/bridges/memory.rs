//! Memory and swap bridges.

use sysmx_bridge_framework::{AttributeBridge, AttributeValue, Provider, RegistrationHooks, Result};

use super::ProviderBinding;

const MEM_ATTRIBUTES: &[(&str, &str)] = &[
    ("Total", "memory/total"),
    ("Used", "memory/used"),
    ("Free", "memory/free"),
    ("Available", "memory/available"),
    ("UsedPercent", "memory/usage_percent"),
];

const SWAP_ATTRIBUTES: &[(&str, &str)] = &[
    ("Total", "swap/total"),
    ("Used", "swap/used"),
    ("Free", "swap/free"),
];

/// Physical memory, in bytes.
pub struct MemBridge<P> {
    binding: ProviderBinding<P>,
}

impl<P: Provider> MemBridge<P> {
    pub fn new(binding: ProviderBinding<P>) -> Self {
        Self { binding }
    }
}

impl<P: Provider> AttributeBridge for MemBridge<P> {
    fn object_name(&self) -> String {
        self.binding.name("Mem").to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Total", "Used", "Free", "Available", "UsedPercent"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.binding.fetch_mapped("Mem", MEM_ATTRIBUTES, name)
    }
}

impl<P> RegistrationHooks for MemBridge<P> {}

/// Swap space, in bytes.
pub struct SwapBridge<P> {
    binding: ProviderBinding<P>,
}

impl<P: Provider> SwapBridge<P> {
    pub fn new(binding: ProviderBinding<P>) -> Self {
        Self { binding }
    }
}

impl<P: Provider> AttributeBridge for SwapBridge<P> {
    fn object_name(&self) -> String {
        self.binding.name("Swap").to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Total", "Used", "Free"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.binding.fetch_mapped("Swap", SWAP_ATTRIBUTES, name)
    }
}

impl<P> RegistrationHooks for SwapBridge<P> {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sysmx_bridge_framework::{Attribute, BulkAccess};

    use super::*;
    use crate::bridges::testing::FakeProvider;

    #[test]
    fn test_mem_bridge() {
        let binding = ProviderBinding::new(
            Arc::new(FakeProvider::with(&[
                ("memory/total", AttributeValue::Counter(8_000)),
                ("memory/used", AttributeValue::Counter(2_000)),
                ("memory/usage_percent", AttributeValue::Gauge(25.0)),
            ])),
            "sysmx",
        );
        let bridge = MemBridge::new(binding);

        assert_eq!(bridge.object_name(), "sysmx:type=Mem");
        assert_eq!(
            bridge.get_many(&["UsedPercent", "Free", "Used", "Cached"]),
            vec![
                Attribute::new("UsedPercent", 25.0),
                Attribute::new("Used", 2_000u64),
            ]
        );
    }

    #[test]
    fn test_every_attribute_is_mapped() {
        let mem = MemBridge::new(ProviderBinding::new(Arc::new(FakeProvider::default()), "d"));
        let swap = SwapBridge::new(ProviderBinding::new(Arc::new(FakeProvider::default()), "d"));

        // An empty provider fails every mapped name, but never with "not found".
        for name in mem.attribute_names() {
            assert!(!mem.get_attribute(name).unwrap_err().is_not_found(), "{name}");
        }
        for name in swap.attribute_names() {
            assert!(!swap.get_attribute(name).unwrap_err().is_not_found(), "{name}");
        }
    }
}
