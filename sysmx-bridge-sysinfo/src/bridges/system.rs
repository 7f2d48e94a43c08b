//! Load average and host information bridges.

use sysmx_bridge_framework::{AttributeBridge, AttributeValue, Provider, RegistrationHooks, Result};

use super::ProviderBinding;

const LOAD_ATTRIBUTES: &[(&str, &str)] = &[
    ("LastMinute", "system/load/1m"),
    ("LastFiveMinutes", "system/load/5m"),
    ("Last15Minutes", "system/load/15m"),
];

const SYSTEM_ATTRIBUTES: &[(&str, &str)] = &[
    ("Uptime", "system/uptime"),
    ("BootTime", "system/boot_time"),
    ("Hostname", "system/hostname"),
    ("OsVersion", "system/os_version"),
    ("KernelVersion", "system/kernel_version"),
];

pub struct LoadAverageBridge<P> {
    binding: ProviderBinding<P>,
}

impl<P: Provider> LoadAverageBridge<P> {
    pub fn new(binding: ProviderBinding<P>) -> Self {
        Self { binding }
    }
}

impl<P: Provider> AttributeBridge for LoadAverageBridge<P> {
    fn object_name(&self) -> String {
        self.binding.name("LoadAverage").to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["LastMinute", "LastFiveMinutes", "Last15Minutes"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        self.binding.fetch_mapped("LoadAverage", LOAD_ATTRIBUTES, name)
    }
}

impl<P> RegistrationHooks for LoadAverageBridge<P> {}

/// Uptime, boot time and host identification.
///
/// `Hostname` reports the configured hostname when one is set, and the
/// provider's otherwise.
pub struct SystemBridge<P> {
    binding: ProviderBinding<P>,
    hostname: Option<String>,
}

impl<P: Provider> SystemBridge<P> {
    pub fn new(binding: ProviderBinding<P>) -> Self {
        Self {
            binding,
            hostname: None,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }
}

impl<P: Provider> AttributeBridge for SystemBridge<P> {
    fn object_name(&self) -> String {
        self.binding.name("System").to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Uptime", "BootTime", "Hostname", "OsVersion", "KernelVersion"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        match (&self.hostname, name) {
            (Some(hostname), "Hostname") => Ok(AttributeValue::Text(hostname.clone())),
            _ => self.binding.fetch_mapped("System", SYSTEM_ATTRIBUTES, name),
        }
    }
}

impl<P> RegistrationHooks for SystemBridge<P> {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sysmx_bridge_framework::{Attribute, BulkAccess};

    use super::*;
    use crate::bridges::testing::FakeProvider;

    fn binding() -> ProviderBinding<FakeProvider> {
        ProviderBinding::new(
            Arc::new(FakeProvider::with(&[
                ("system/load/1m", AttributeValue::Gauge(0.5)),
                ("system/load/5m", AttributeValue::Gauge(0.25)),
                ("system/load/15m", AttributeValue::Gauge(0.125)),
                ("system/uptime", AttributeValue::Counter(3600)),
                ("system/hostname", AttributeValue::from("probe")),
            ])),
            "sysmx",
        )
    }

    #[test]
    fn test_load_average() {
        let bridge = LoadAverageBridge::new(binding());

        assert_eq!(bridge.object_name(), "sysmx:type=LoadAverage");
        assert_eq!(
            bridge.get_all(),
            vec![
                Attribute::new("LastMinute", 0.5),
                Attribute::new("LastFiveMinutes", 0.25),
                Attribute::new("Last15Minutes", 0.125),
            ]
        );
    }

    #[test]
    fn test_system_skips_unavailable() {
        let bridge = SystemBridge::new(binding());

        assert_eq!(
            bridge.get_all(),
            vec![
                Attribute::new("Uptime", 3600u64),
                Attribute::new("Hostname", "probe"),
            ]
        );
    }

    #[test]
    fn test_configured_hostname_wins() {
        let bridge = SystemBridge::new(binding()).with_hostname("web01");

        assert_eq!(
            bridge.get_attribute("Hostname").unwrap(),
            AttributeValue::from("web01")
        );
        assert!(bridge.get_attribute("hostname").unwrap_err().is_not_found());
    }
}
