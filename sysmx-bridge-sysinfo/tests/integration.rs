//! Integration tests for the sysinfo bridge.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sysmx_bridge_framework::{
    Attribute, AttributeValue, BridgeError, Format, ManagementServer, ObjectName, Provider,
};
use sysmx_bridge_sysinfo::cache::CachedProvider;
use sysmx_bridge_sysinfo::config::{CollectConfig, SysinfoConfig};
use sysmx_bridge_sysinfo::poller::SnapshotPoller;
use sysmx_bridge_sysinfo::provider::{SysinfoError, SysinfoProvider};
use sysmx_bridge_sysinfo::register_bridges;

/// Two-core host with fixed readings. Counts every fetch.
struct StaticHost {
    values: HashMap<&'static str, AttributeValue>,
    fetches: AtomicUsize,
}

impl StaticHost {
    fn new() -> Self {
        let values = HashMap::from([
            ("cpu/usage", AttributeValue::Gauge(12.0)),
            ("cpu/count", AttributeValue::Counter(2)),
            ("cpu/0/usage", AttributeValue::Gauge(10.0)),
            ("cpu/0/frequency", AttributeValue::Counter(3000)),
            ("cpu/1/usage", AttributeValue::Gauge(14.0)),
            ("cpu/1/frequency", AttributeValue::Counter(3000)),
            ("memory/total", AttributeValue::Counter(16_000)),
            ("memory/used", AttributeValue::Counter(4_000)),
            ("memory/free", AttributeValue::Counter(12_000)),
            ("memory/available", AttributeValue::Counter(11_000)),
            ("memory/usage_percent", AttributeValue::Gauge(25.0)),
            ("system/uptime", AttributeValue::Counter(42)),
            ("system/hostname", AttributeValue::from("detected")),
        ]);
        Self {
            values,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl Provider for StaticHost {
    type Error = SysinfoError;

    fn fetch(&self, key: &str) -> Result<AttributeValue, SysinfoError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| SysinfoError::UnknownKey(key.to_string()))
    }
}

fn name(s: &str) -> ObjectName {
    ObjectName::parse(s).unwrap()
}

fn setup(collect: CollectConfig) -> (Arc<ManagementServer>, Arc<CachedProvider<StaticHost>>) {
    setup_with_hostname(collect, "web01")
}

fn setup_with_hostname(
    collect: CollectConfig,
    hostname: &str,
) -> (Arc<ManagementServer>, Arc<CachedProvider<StaticHost>>) {
    let server = Arc::new(ManagementServer::new("sysinfo@test"));
    let cache = Arc::new(CachedProvider::new(
        StaticHost::new(),
        Duration::from_secs(60),
    ));
    let config = SysinfoConfig {
        domain: "test".to_string(),
        hostname: hostname.to_string(),
        collect,
        ..Default::default()
    };

    register_bridges(&server, &config, cache.clone()).unwrap();
    (server, cache)
}

#[test]
fn test_registers_enabled_bridges() {
    let (server, _) = setup(CollectConfig::default());

    let names: Vec<String> = server.names().iter().map(|n| n.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "test:name=0,type=CpuCore",
            "test:name=1,type=CpuCore",
            "test:type=Cpu",
            "test:type=LoadAverage",
            "test:type=Mem",
            "test:type=ProxyCache",
            "test:type=Swap",
            "test:type=System",
        ]
    );
    assert_eq!(server.query_names(&name("test:type=CpuCore,*")).len(), 2);
}

#[test]
fn test_collect_flags_limit_registration() {
    let (server, _) = setup(CollectConfig {
        cpu: false,
        cpu_cores: false,
        memory: true,
        swap: false,
        load: false,
        system: false,
    });

    let names: Vec<String> = server.names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names, vec!["test:type=Mem", "test:type=ProxyCache"]);
}

#[test]
fn test_partial_snapshots() {
    let (server, _) = setup(CollectConfig::default());

    let mem = server.snapshot(&name("test:type=Mem")).unwrap();
    assert_eq!(mem.attributes.len(), 5);
    assert_eq!(mem.get("UsedPercent"), Some(&AttributeValue::Gauge(25.0)));

    // No swap or load readings: the objects exist but read empty.
    assert!(server.snapshot(&name("test:type=Swap")).unwrap().attributes.is_empty());
    assert!(
        server
            .get_attribute(&name("test:type=LoadAverage"), "LastMinute")
            .is_err()
    );

    let system = server.snapshot(&name("test:type=System")).unwrap();
    assert_eq!(
        system.attributes,
        vec![
            Attribute::new("Uptime", 42u64),
            Attribute::new("Hostname", "web01"),
        ]
    );
}

#[test]
fn test_auto_hostname_reads_provider() {
    let (server, _) = setup_with_hostname(CollectConfig::default(), "auto");

    assert_eq!(
        server
            .get_attribute(&name("test:type=System"), "Hostname")
            .unwrap(),
        AttributeValue::from("detected")
    );
}

#[test]
fn test_cache_shared_across_bridges() {
    let (server, cache) = setup(CollectConfig::default());
    let poller = SnapshotPoller::new(server.clone(), Duration::from_secs(1), Format::Json);

    assert_eq!(poller.poll_once(), 8);
    let after_first = cache.inner().fetches.load(Ordering::Relaxed);

    // Every cached key was fetched once; the rest failed. A second round
    // within the expiry only re-fetches the failing keys.
    let failing = after_first - cache.len();
    poller.poll_once();
    let after_second = cache.inner().fetches.load(Ordering::Relaxed);
    assert_eq!(after_second - after_first, failing);

    let cache_name = name("test:type=ProxyCache");
    let hits = server.get_attribute(&cache_name, "Hits").unwrap();
    assert!(hits.as_u64().unwrap() > 0);
}

#[test]
fn test_cache_management() {
    let (server, cache) = setup(CollectConfig::default());
    let cache_name = name("test:type=ProxyCache");

    server.get_attribute(&name("test:type=Cpu"), "Usage").unwrap();
    assert_eq!(
        server.get_attribute(&cache_name, "Entries").unwrap(),
        AttributeValue::Counter(cache.len() as u64)
    );

    let applied = server
        .set_attributes(
            &cache_name,
            vec![
                Attribute::new("Hits", 0u64),
                Attribute::new("ExpireMillis", 0u64),
            ],
        )
        .unwrap();
    assert_eq!(applied, vec![Attribute::new("ExpireMillis", 0u64)]);
    assert_eq!(cache.expire_millis(), 0);

    assert!(matches!(
        server.set_attribute(&cache_name, &Attribute::new("ExpireMillis", -5i64)),
        Err(BridgeError::InvalidValue { .. })
    ));

    let dropped = server.invoke(&cache_name, "clear", &[]).unwrap();
    assert!(dropped.as_u64().unwrap() > 0);
    assert!(cache.is_empty());
}

#[test]
fn test_unregister_all() {
    let (server, _) = setup(CollectConfig::default());

    assert_eq!(server.unregister_all(), 8);
    assert!(server.is_empty());
    assert!(matches!(
        server.snapshot(&name("test:type=Mem")),
        Err(BridgeError::InstanceNotFound(_))
    ));
}

#[test]
fn test_live_host() {
    let server = ManagementServer::new("sysinfo@live");
    let cache = Arc::new(CachedProvider::new(
        SysinfoProvider::new(),
        Duration::from_millis(1000),
    ));

    register_bridges(&server, &SysinfoConfig::default(), cache).unwrap();

    let mem = server.snapshot(&name("sysmx:type=Mem")).unwrap();
    let total = mem.get("Total").and_then(|v| v.as_u64()).unwrap();
    let used = mem.get("Used").and_then(|v| v.as_u64()).unwrap();
    assert!(total > 0);
    assert!(used <= total);

    let count = server
        .get_attribute(&name("sysmx:type=Cpu"), "Count")
        .unwrap()
        .as_u64()
        .unwrap() as usize;
    assert_eq!(server.query_names(&name("sysmx:type=CpuCore,*")).len(), count);
}
