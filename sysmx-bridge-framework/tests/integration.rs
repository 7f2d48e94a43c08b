//! End-to-end tests for the attribute bridge core.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sysmx_bridge_framework::{
    Attribute, AttributeBridge, AttributeValue, BridgeError, BulkAccess, ManagedBridge,
    ManagementServer, ObjectName, ObjectNameBuilder, Provider, RegistrationHooks,
    RegistrationState, Result, unexpected_error,
};

#[derive(Debug, thiserror::Error)]
enum MockError {
    #[error("no such metric: {0}")]
    Missing(String),
    #[error("metric {0} is read-only")]
    ReadOnly(String),
}

/// In-memory provider. Keys without a value fail on fetch.
#[derive(Default)]
struct MockProvider {
    values: Mutex<HashMap<String, AttributeValue>>,
    fetches: Mutex<Vec<String>>,
}

impl MockProvider {
    fn with(values: &[(&str, AttributeValue)]) -> Arc<Self> {
        let provider = Self::default();
        {
            let mut map = provider.values.lock().unwrap();
            for (k, v) in values {
                map.insert(k.to_string(), v.clone());
            }
        }
        Arc::new(provider)
    }

    fn store(&self, key: &str, value: AttributeValue) -> std::result::Result<(), MockError> {
        if key == "mem/used" {
            return Err(MockError::ReadOnly(key.to_string()));
        }
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

impl Provider for MockProvider {
    type Error = MockError;

    fn fetch(&self, key: &str) -> std::result::Result<AttributeValue, MockError> {
        self.fetches.lock().unwrap().push(key.to_string());
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| MockError::Missing(key.to_string()))
    }
}

/// Bridge with namespace `{cpuPercent, memUsed}`, both writable through the provider.
struct HostBridge {
    provider: Arc<MockProvider>,
    host: String,
}

impl HostBridge {
    fn key(name: &str) -> Option<&'static str> {
        match name {
            "cpuPercent" => Some("cpu/percent"),
            "memUsed" => Some("mem/used"),
            _ => None,
        }
    }
}

impl AttributeBridge for HostBridge {
    fn object_name(&self) -> String {
        ObjectNameBuilder::new("test")
            .property("type", "Host")
            .property("name", &self.host)
            .to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["cpuPercent", "memUsed"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        let key = Self::key(name).ok_or_else(|| BridgeError::not_found(name))?;
        self.provider
            .fetch(key)
            .map_err(|e| unexpected_error("Host", e))
    }

    fn set_attribute(&self, attribute: &Attribute) -> Result<()> {
        let key = Self::key(&attribute.name).ok_or_else(|| BridgeError::not_found(&attribute.name))?;
        self.provider
            .store(key, attribute.value.clone())
            .map_err(|e| unexpected_error("Host", e))
    }
}

impl RegistrationHooks for HostBridge {}

fn bridge(provider: &Arc<MockProvider>) -> HostBridge {
    HostBridge {
        provider: provider.clone(),
        host: "web01".to_string(),
    }
}

#[test]
fn test_get_many_example() {
    let provider = MockProvider::with(&[("cpu/percent", AttributeValue::Counter(42))]);
    let bridge = bridge(&provider);

    let result = bridge.get_many(&["cpuPercent", "memUsed", "bogus"]);
    assert_eq!(result, vec![Attribute::new("cpuPercent", 42u64)]);

    // Every name was tried exactly once, in order; `bogus` never reached the provider.
    assert_eq!(*provider.fetches.lock().unwrap(), vec!["cpu/percent", "mem/used"]);
}

#[test]
fn test_get_attribute_wraps_provider_error() {
    let provider = MockProvider::with(&[]);
    let bridge = bridge(&provider);

    let err = bridge.get_attribute("memUsed").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected error in provider fetch of Host: no such metric: mem/used"
    );
    assert!(matches!(
        bridge.get_attribute("bogus"),
        Err(BridgeError::AttributeNotFound(_))
    ));
}

#[test]
fn test_get_many_is_subsequence_of_input() {
    let provider = MockProvider::with(&[
        ("cpu/percent", AttributeValue::Gauge(12.5)),
        ("mem/used", AttributeValue::Counter(1024)),
    ]);
    let bridge = bridge(&provider);

    let request = ["x", "memUsed", "y", "cpuPercent", "memUsed"];
    let result = bridge.get_many(&request);

    let mut remaining = request.iter();
    for attr in &result {
        assert!(remaining.any(|n| *n == attr.name), "{} out of order", attr.name);
        assert_eq!(bridge.get_attribute(&attr.name).unwrap(), attr.value);
    }
    assert_eq!(result.len(), 3);
}

#[test]
fn test_set_many_then_read_back() {
    let provider = MockProvider::with(&[("cpu/percent", AttributeValue::Counter(1))]);
    let bridge = bridge(&provider);

    let applied = bridge
        .set_many(vec![
            Attribute::new("bogus", 5u64),
            Attribute::new("cpuPercent", 99u64),
        ])
        .unwrap();
    assert_eq!(applied, vec![Attribute::new("cpuPercent", 99u64)]);
    assert_eq!(
        bridge.get_attribute("cpuPercent").unwrap(),
        AttributeValue::Counter(99)
    );
}

#[test]
fn test_set_many_aborts_on_provider_failure() {
    let provider = MockProvider::with(&[("cpu/percent", AttributeValue::Counter(1))]);
    let bridge = bridge(&provider);

    let result = bridge.set_many(vec![
        Attribute::new("cpuPercent", 2u64),
        Attribute::new("memUsed", 3u64),
        Attribute::new("cpuPercent", 4u64),
    ]);

    assert!(matches!(result, Err(BridgeError::ProviderFailure { .. })));
    // The first write was applied; the third was never attempted.
    assert_eq!(
        bridge.get_attribute("cpuPercent").unwrap(),
        AttributeValue::Counter(2)
    );
}

#[test]
fn test_lifecycle_through_managed_bridge() {
    let provider = MockProvider::with(&[]);
    let server = ManagementServer::new("agent");
    let mut managed: ManagedBridge = ManagedBridge::new(bridge(&provider));

    assert_eq!(managed.state(), RegistrationState::Unregistered);
    let identity = managed.attach(server.handle()).unwrap();
    assert_eq!(identity, managed.identity().unwrap());
    assert_eq!(identity.to_string(), "test:name=web01,type=Host");
    assert!(matches!(
        managed.attach(server.handle()),
        Err(BridgeError::IllegalState { .. })
    ));

    managed.post_attach(true);
    managed.detach().unwrap();
    managed.post_detach();
    managed.post_detach();
    assert_eq!(managed.state(), RegistrationState::Unregistered);
    assert!(managed.server().is_none());
}

#[test]
fn test_server_round_trip() {
    let provider = MockProvider::with(&[
        ("cpu/percent", AttributeValue::Counter(42)),
        ("mem/used", AttributeValue::Counter(2048)),
    ]);
    let server = ManagementServer::new("agent");

    let name = server.register(bridge(&provider)).unwrap();
    assert_eq!(
        server.query_names(&ObjectName::parse("test:type=Host,*").unwrap()),
        vec![name.clone()]
    );

    let snapshot = server.snapshot(&name).unwrap();
    assert_eq!(snapshot.identity, "test:name=web01,type=Host");
    assert_eq!(snapshot.get("memUsed"), Some(&AttributeValue::Counter(2048)));

    let released = server.unregister(&name).unwrap();
    assert!(!released.is_registered());
    assert!(server.is_empty());

    // The released bridge still answers attribute calls.
    assert_eq!(
        released.get_attribute("cpuPercent").unwrap(),
        AttributeValue::Counter(42)
    );
}
