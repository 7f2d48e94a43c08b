//! In-process management server.
//!
//! The server keeps registered bridges by identity and dispatches the
//! attribute protocol to them. Registration and deregistration take the
//! write lock, which serializes lifecycle calls; attribute calls take the
//! read lock and may run concurrently. Registration hooks run while the
//! write lock is held and must not call back into the server.
//!
//! # Example
//!
//! ```ignore
//! use sysmx_bridge_framework::ManagementServer;
//!
//! let server = ManagementServer::new("local");
//! let name = server.register(MemBridge::new(provider.clone(), "sysmx"))?;
//!
//! let values = server.get_attributes(&name, &["Total", "Used"])?;
//!
//! let bridge = server.unregister(&name)?;
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use sysmx_common::{Attribute, AttributeSnapshot, AttributeValue, ObjectName};

use crate::attribute::AttributeBridge;
use crate::bulk::BulkAccess;
use crate::error::{BridgeError, Result};
use crate::lifecycle::{ManageableBridge, ManagedBridge, ServerHandle};

/// Registry of attached bridges.
#[derive(Debug)]
pub struct ManagementServer {
    handle: ServerHandle,
    bridges: RwLock<HashMap<ObjectName, ManagedBridge>>,
}

impl ManagementServer {
    /// Create an empty server identified by `agent_id`.
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            handle: ServerHandle::new(agent_id.into()),
            bridges: RwLock::new(HashMap::new()),
        }
    }

    /// Handle that bridges are bound to while registered here.
    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Register a bridge and return the identity it registered under.
    ///
    /// If another bridge already holds the same identity, the new bridge is
    /// told the registration failed, its binding is released, and
    /// [`BridgeError::InstanceAlreadyExists`] is returned.
    pub fn register(&self, bridge: impl ManageableBridge + 'static) -> Result<ObjectName> {
        self.register_boxed(Box::new(bridge))
    }

    /// Register an already boxed bridge.
    pub fn register_boxed(&self, bridge: Box<dyn ManageableBridge>) -> Result<ObjectName> {
        let mut managed = ManagedBridge::from_boxed(bridge);
        let name = managed.attach(self.handle())?;

        let mut bridges = self.bridges.write().unwrap_or_else(PoisonError::into_inner);
        if bridges.contains_key(&name) {
            managed.post_attach(false);
            managed.post_detach();
            return Err(BridgeError::InstanceAlreadyExists(name.to_string()));
        }

        managed.post_attach(true);
        tracing::info!(name = %name, agent = %self.handle, "Bridge registered");
        bridges.insert(name.clone(), managed);

        Ok(name)
    }

    /// Unregister a bridge and hand it back to the caller.
    ///
    /// If the bridge's pre-deregister hook fails it stays registered and the
    /// error is returned.
    pub fn unregister(&self, name: &ObjectName) -> Result<ManagedBridge> {
        let mut bridges = self.bridges.write().unwrap_or_else(PoisonError::into_inner);

        let managed = bridges
            .get_mut(name)
            .ok_or_else(|| BridgeError::InstanceNotFound(name.to_string()))?;
        managed.detach()?;

        let mut managed = bridges
            .remove(name)
            .ok_or_else(|| BridgeError::InstanceNotFound(name.to_string()))?;
        managed.post_detach();

        tracing::info!(name = %name, "Bridge unregistered");
        Ok(managed)
    }

    /// Unregister every bridge, e.g. on shutdown.
    ///
    /// Returns the number of bridges released. Bridges whose pre-deregister
    /// hook fails are logged and left registered.
    pub fn unregister_all(&self) -> usize {
        let mut released = 0;
        for name in self.names() {
            match self.unregister(&name) {
                Ok(_) => released += 1,
                Err(e) => tracing::warn!(name = %name, error = %e, "Failed to unregister bridge"),
            }
        }
        released
    }

    /// Whether a bridge is registered under `name`.
    pub fn is_registered(&self, name: &ObjectName) -> bool {
        self.read().contains_key(name)
    }

    /// Number of registered bridges.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<ObjectName> {
        let mut names: Vec<_> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered names matched by `pattern`, in sorted order.
    pub fn query_names(&self, pattern: &ObjectName) -> Vec<ObjectName> {
        let mut names: Vec<_> = self
            .read()
            .keys()
            .filter(|name| pattern.matches(name))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Attribute names exposed by a registered bridge.
    pub fn attribute_names(&self, name: &ObjectName) -> Result<Vec<String>> {
        self.with_bridge(name, |bridge| {
            Ok(bridge
                .attribute_names()
                .iter()
                .map(|n| n.to_string())
                .collect())
        })
    }

    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<AttributeValue> {
        tracing::debug!(name = %name, attribute, "get_attribute");
        self.with_bridge(name, |bridge| bridge.get_attribute(attribute))
    }

    pub fn set_attribute(&self, name: &ObjectName, attribute: &Attribute) -> Result<()> {
        tracing::debug!(name = %name, attribute = %attribute.name, "set_attribute");
        self.with_bridge(name, |bridge| bridge.set_attribute(attribute))
    }

    pub fn get_attributes(&self, name: &ObjectName, attributes: &[&str]) -> Result<Vec<Attribute>> {
        tracing::debug!(name = %name, count = attributes.len(), "get_attributes");
        self.with_bridge(name, |bridge| Ok(bridge.get_many(attributes)))
    }

    pub fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: Vec<Attribute>,
    ) -> Result<Vec<Attribute>> {
        tracing::debug!(name = %name, count = attributes.len(), "set_attributes");
        self.with_bridge(name, |bridge| bridge.set_many(attributes))
    }

    pub fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: &[AttributeValue],
    ) -> Result<AttributeValue> {
        tracing::debug!(name = %name, operation, "invoke");
        self.with_bridge(name, |bridge| bridge.invoke(operation, params))
    }

    /// Read every attribute of a registered bridge into a snapshot.
    pub fn snapshot(&self, name: &ObjectName) -> Result<AttributeSnapshot> {
        self.with_bridge(name, |bridge| {
            Ok(AttributeSnapshot::new(name.to_string(), bridge.get_all()))
        })
    }

    fn read(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<ObjectName, ManagedBridge>> {
        self.bridges.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_bridge<T>(
        &self,
        name: &ObjectName,
        f: impl FnOnce(&ManagedBridge) -> Result<T>,
    ) -> Result<T> {
        let bridges = self.read();
        let bridge = bridges
            .get(name)
            .ok_or_else(|| BridgeError::InstanceNotFound(name.to_string()))?;
        f(bridge)
    }
}
