//! Management view of the caching provider.

use std::sync::Arc;

use sysmx_bridge_framework::{
    Attribute, AttributeBridge, AttributeValue, BridgeError, ObjectNameBuilder, Provider,
    RegistrationHooks, Result,
};

use crate::cache::CachedProvider;

/// Exposes the cache's statistics and expiry.
///
/// `Hits`, `Misses` and `Entries` are read-only. `ExpireMillis` is writable
/// and takes a non-negative integer. The `clear` operation drops every
/// cached value and returns how many were dropped.
pub struct CacheBridge<P> {
    cache: Arc<CachedProvider<P>>,
    domain: String,
}

impl<P: Provider> CacheBridge<P> {
    pub fn new(cache: Arc<CachedProvider<P>>, domain: impl Into<String>) -> Self {
        Self {
            cache,
            domain: domain.into(),
        }
    }
}

impl<P: Provider> AttributeBridge for CacheBridge<P> {
    fn object_name(&self) -> String {
        ObjectNameBuilder::new(&self.domain)
            .property("type", "ProxyCache")
            .to_string()
    }

    fn attribute_names(&self) -> &[&'static str] {
        &["Hits", "Misses", "Entries", "ExpireMillis"]
    }

    fn get_attribute(&self, name: &str) -> Result<AttributeValue> {
        let value = match name {
            "Hits" => self.cache.hits(),
            "Misses" => self.cache.misses(),
            "Entries" => self.cache.len() as u64,
            "ExpireMillis" => self.cache.expire_millis(),
            _ => return Err(BridgeError::not_found(name)),
        };
        Ok(AttributeValue::Counter(value))
    }

    fn set_attribute(&self, attribute: &Attribute) -> Result<()> {
        if attribute.name != "ExpireMillis" {
            return Err(BridgeError::not_found(&attribute.name));
        }

        let millis = attribute.value.as_u64().ok_or_else(|| {
            BridgeError::invalid_value(
                "ExpireMillis",
                format!(
                    "expected a non-negative integer, got {}",
                    attribute.value.type_name()
                ),
            )
        })?;

        self.cache.set_expire_millis(millis);
        Ok(())
    }

    fn invoke(&self, operation: &str, _params: &[AttributeValue]) -> Result<AttributeValue> {
        match operation {
            "clear" => Ok(AttributeValue::Counter(self.cache.clear() as u64)),
            _ => Err(BridgeError::OperationNotSupported(operation.to_string())),
        }
    }
}

impl<P: Provider> RegistrationHooks for CacheBridge<P> {
    fn post_register(&self, success: bool) {
        if success {
            tracing::info!(
                name = %self.object_name(),
                expire_ms = self.cache.expire_millis(),
                "Cache bridge attached"
            );
        } else {
            tracing::warn!(name = %self.object_name(), "Cache bridge registration failed");
        }
    }

    fn pre_deregister(&self) -> Result<()> {
        tracing::info!(
            name = %self.object_name(),
            hits = self.cache.hits(),
            misses = self.cache.misses(),
            "Cache bridge detaching"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sysmx_bridge_framework::{BulkAccess, ManagementServer};

    use super::*;
    use crate::bridges::testing::FakeProvider;

    fn bridge() -> CacheBridge<FakeProvider> {
        let provider = FakeProvider::with(&[("k", AttributeValue::Counter(1))]);
        let cache = Arc::new(CachedProvider::new(provider, Duration::from_secs(60)));
        CacheBridge::new(cache, "sysmx")
    }

    #[test]
    fn test_statistics() {
        let bridge = bridge();
        bridge.cache.fetch("k").unwrap();
        bridge.cache.fetch("k").unwrap();

        assert_eq!(
            bridge.get_all(),
            vec![
                Attribute::new("Hits", 1u64),
                Attribute::new("Misses", 1u64),
                Attribute::new("Entries", 1u64),
                Attribute::new("ExpireMillis", 60_000u64),
            ]
        );
    }

    #[test]
    fn test_set_expire() {
        let bridge = bridge();

        bridge
            .set_attribute(&Attribute::new("ExpireMillis", 250i64))
            .unwrap();
        assert_eq!(bridge.cache.expire_millis(), 250);

        let err = bridge
            .set_attribute(&Attribute::new("ExpireMillis", -1i64))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidValue { .. }));
        assert!(matches!(
            bridge.set_attribute(&Attribute::new("ExpireMillis", 2.5)),
            Err(BridgeError::InvalidValue { .. })
        ));
        assert_eq!(bridge.cache.expire_millis(), 250);
    }

    #[test]
    fn test_statistics_are_read_only() {
        let bridge = bridge();

        // Unwritable names are skipped; a bad value aborts the batch.
        let result = bridge.set_many(vec![
            Attribute::new("Hits", 0u64),
            Attribute::new("ExpireMillis", 10u64),
            Attribute::new("ExpireMillis", "soon"),
            Attribute::new("ExpireMillis", 20u64),
        ]);
        assert!(matches!(result, Err(BridgeError::InvalidValue { .. })));
        assert_eq!(bridge.cache.expire_millis(), 10);
    }

    #[test]
    fn test_clear_operation() {
        let bridge = bridge();
        bridge.cache.fetch("k").unwrap();

        assert_eq!(bridge.invoke("clear", &[]).unwrap(), AttributeValue::Counter(1));
        assert!(bridge.cache.is_empty());
        assert!(matches!(
            bridge.invoke("reset", &[]),
            Err(BridgeError::OperationNotSupported(op)) if op == "reset"
        ));
    }

    #[test]
    fn test_through_server() {
        let server = ManagementServer::new("test");
        let name = server.register(bridge()).unwrap();

        assert_eq!(name.to_string(), "sysmx:type=ProxyCache");
        assert_eq!(
            server.invoke(&name, "clear", &[]).unwrap(),
            AttributeValue::Counter(0)
        );
        assert!(server.unregister(&name).is_ok());
    }
}
